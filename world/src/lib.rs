#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the treasure map simulator.
//!
//! The world owns the map, the mountains, the treasure piles and the
//! adventurers for the duration of a run. It mutates them exclusively through
//! [`apply`], which stages advances in a per-tick reservation frame and settles
//! them all at once when the tick resolves.

use std::collections::HashSet;

use treasure_map_core::{
    Adventurer, AdventurerId, BlockReason, CellCoord, Command, Event, Instruction, MapDimensions,
    Mountain, Outcome, Rotation, Scenario, TickRecord, Treasure,
};

/// Represents the authoritative world state of a single run.
#[derive(Debug)]
pub struct World {
    map: MapDimensions,
    mountains: Vec<Mountain>,
    terrain: Terrain,
    treasures: Vec<Treasure>,
    adventurers: Vec<Adventurer>,
    reservations: ReservationFrame,
    current_tick: Option<usize>,
    next_tick: usize,
}

impl World {
    /// Takes ownership of a scenario so it can be simulated.
    ///
    /// Journals left over from an earlier run are discarded: the new run replays
    /// every instruction sequence from the adventurers' current cells and facings.
    #[must_use]
    pub fn from_scenario(scenario: Scenario) -> Self {
        let Scenario {
            map,
            mountains,
            treasures,
            mut adventurers,
        } = scenario;
        for adventurer in &mut adventurers {
            adventurer.clear_journal();
        }
        Self {
            map,
            terrain: Terrain::from_mountains(&mountains),
            mountains,
            treasures,
            adventurers,
            reservations: ReservationFrame::default(),
            current_tick: None,
            next_tick: 0,
        }
    }

    /// Releases the simulated scenario, including every mutation applied so far.
    #[must_use]
    pub fn into_scenario(self) -> Scenario {
        Scenario {
            map: self.map,
            mountains: self.mountains,
            treasures: self.treasures,
            adventurers: self.adventurers,
        }
    }

    fn adventurer_index(&self, adventurer: AdventurerId) -> Option<usize> {
        let index = usize::try_from(adventurer.get()).ok()?;
        (index < self.adventurers.len()).then_some(index)
    }

    /// Index of the adventurer when it may still act during the open tick.
    fn ready_adventurer(&self, adventurer: AdventurerId) -> Option<usize> {
        let tick = self.current_tick?;
        let index = self.adventurer_index(adventurer)?;
        if self.adventurers[index].journal().len() > tick || self.reservations.contains(adventurer)
        {
            return None;
        }
        Some(index)
    }

    fn arbitrate(
        &self,
        request: &StepRequest,
        requests: &[StepRequest],
        occupancy: &HashSet<CellCoord>,
    ) -> Result<CellCoord, BlockReason> {
        let Some(destination) = request.to else {
            return Err(BlockReason::OutOfBounds);
        };

        let contested = requests.iter().any(|other| {
            other.adventurer != request.adventurer && other.to == Some(destination)
        });
        if contested {
            return Err(BlockReason::Contested);
        }
        if occupancy.contains(&destination) {
            return Err(BlockReason::Occupied);
        }
        if !self.map.contains(destination) {
            return Err(BlockReason::OutOfBounds);
        }
        if self.terrain.is_mountain(destination) {
            return Err(BlockReason::Mountain);
        }
        Ok(destination)
    }

    fn resolve_pending_steps(&mut self, tick: usize, out_events: &mut Vec<Event>) {
        let requests = self.reservations.drain_sorted();
        let occupancy: HashSet<CellCoord> =
            self.adventurers.iter().map(Adventurer::cell).collect();

        let verdicts: Vec<Result<CellCoord, BlockReason>> = requests
            .iter()
            .map(|request| self.arbitrate(request, &requests, &occupancy))
            .collect();

        for (request, verdict) in requests.iter().zip(verdicts) {
            let Some(index) = self.adventurer_index(request.adventurer) else {
                continue;
            };
            let adventurer = &mut self.adventurers[index];

            match verdict {
                Ok(to) => {
                    let from = adventurer.cell();
                    adventurer.relocate(to);
                    adventurer.record(TickRecord {
                        instruction: Some(Instruction::Advance),
                        outcome: Outcome::Executed,
                    });
                    out_events.push(Event::AdventurerAdvanced {
                        adventurer: request.adventurer,
                        from,
                        to,
                    });

                    if let Some(treasure) = self
                        .treasures
                        .iter_mut()
                        .find(|treasure| treasure.cell() == to)
                    {
                        if treasure.take_one() {
                            adventurer.credit_treasure();
                            out_events.push(Event::TreasureCollected {
                                adventurer: request.adventurer,
                                cell: to,
                                remaining: treasure.count(),
                            });
                        }
                    }
                }
                Err(reason) => {
                    adventurer.record(TickRecord {
                        instruction: Some(Instruction::Advance),
                        outcome: Outcome::Blocked,
                    });
                    out_events.push(Event::AdvanceBlocked {
                        adventurer: request.adventurer,
                        target: request.to,
                        reason,
                    });
                }
            }
        }

        for adventurer in &mut self.adventurers {
            if adventurer.journal().len() <= tick {
                let instruction = adventurer.instruction_at(tick);
                adventurer.record(TickRecord {
                    instruction,
                    outcome: Outcome::Idle,
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that arrive outside an open tick, or that target an adventurer which
/// already acted during the tick, are discarded without emitting events. Opening a
/// tick while another one is still open resolves the earlier tick first.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginTick => {
            if let Some(open) = world.current_tick.take() {
                world.resolve_pending_steps(open, out_events);
                out_events.push(Event::TickResolved { tick: open });
            }
            let tick = world.next_tick;
            world.next_tick = world.next_tick.saturating_add(1);
            world.current_tick = Some(tick);
            world.reservations.clear();
            out_events.push(Event::TickStarted { tick });
        }
        Command::Turn {
            adventurer,
            rotation,
        } => {
            let Some(index) = world.ready_adventurer(adventurer) else {
                return;
            };
            let state = &mut world.adventurers[index];
            let facing = state.facing().rotated(rotation);
            state.face(facing);
            let instruction = match rotation {
                Rotation::Right => Instruction::TurnRight,
                Rotation::Left => Instruction::TurnLeft,
            };
            state.record(TickRecord {
                instruction: Some(instruction),
                outcome: Outcome::Executed,
            });
            out_events.push(Event::AdventurerTurned { adventurer, facing });
        }
        Command::RequestAdvance { adventurer } => {
            let Some(index) = world.ready_adventurer(adventurer) else {
                return;
            };
            let state = &world.adventurers[index];
            let from = state.cell();
            let to = from.neighbor(state.facing());
            world.reservations.queue(StepRequest { adventurer, to });
            out_events.push(Event::AdvanceQueued {
                adventurer,
                from,
                to,
            });
        }
        Command::ResolveTick => {
            let Some(tick) = world.current_tick.take() else {
                return;
            };
            world.resolve_pending_steps(tick, out_events);
            out_events.push(Event::TickResolved { tick });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use treasure_map_core::{Adventurer, AdventurerId, CellCoord, Direction, Instruction, Treasure};

    /// Index of the open tick, if any.
    #[must_use]
    pub fn current_tick(world: &World) -> Option<usize> {
        world.current_tick
    }

    /// Treasure piles in declaration order.
    #[must_use]
    pub fn treasures(world: &World) -> &[Treasure] {
        &world.treasures
    }

    /// Adventurers in declaration order.
    #[must_use]
    pub fn adventurers(world: &World) -> &[Adventurer] {
        &world.adventurers
    }

    /// Captures a read-only view of the adventurers for the open tick.
    #[must_use]
    pub fn adventurer_view(world: &World) -> AdventurerView {
        let snapshots = world
            .adventurers
            .iter()
            .enumerate()
            .filter_map(|(index, adventurer)| {
                Some(AdventurerSnapshot {
                    id: AdventurerId::new(u32::try_from(index).ok()?),
                    cell: adventurer.cell(),
                    facing: adventurer.facing(),
                    instruction: world
                        .current_tick
                        .and_then(|tick| adventurer.instruction_at(tick)),
                })
            })
            .collect();
        AdventurerView { snapshots }
    }

    /// Read-only snapshot describing all adventurers in declaration order.
    #[derive(Clone, Debug)]
    pub struct AdventurerView {
        snapshots: Vec<AdventurerSnapshot>,
    }

    impl AdventurerView {
        /// Iterator over the captured snapshots in declaration order.
        pub fn iter(&self) -> impl Iterator<Item = &AdventurerSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<AdventurerSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single adventurer used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AdventurerSnapshot {
        /// Identifier of the adventurer.
        pub id: AdventurerId,
        /// Cell currently occupied.
        pub cell: CellCoord,
        /// Current facing.
        pub facing: Direction,
        /// Instruction due during the open tick, if any.
        pub instruction: Option<Instruction>,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StepRequest {
    adventurer: AdventurerId,
    to: Option<CellCoord>,
}

#[derive(Debug, Default)]
struct ReservationFrame {
    requests: Vec<StepRequest>,
}

impl ReservationFrame {
    fn clear(&mut self) {
        self.requests.clear();
    }

    fn queue(&mut self, request: StepRequest) {
        self.requests.push(request);
    }

    fn contains(&self, adventurer: AdventurerId) -> bool {
        self.requests
            .iter()
            .any(|request| request.adventurer == adventurer)
    }

    fn drain_sorted(&mut self) -> Vec<StepRequest> {
        self.requests.sort_by_key(|request| request.adventurer);
        self.requests.drain(..).collect()
    }
}

#[derive(Debug, Default)]
struct Terrain {
    mountains: HashSet<CellCoord>,
}

impl Terrain {
    fn from_mountains(mountains: &[Mountain]) -> Self {
        Self {
            mountains: mountains.iter().map(Mountain::cell).collect(),
        }
    }

    fn is_mountain(&self, cell: CellCoord) -> bool {
        self.mountains.contains(&cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_sorted_orders_by_adventurer() {
        let mut frame = ReservationFrame::default();
        frame.queue(StepRequest {
            adventurer: AdventurerId::new(2),
            to: None,
        });
        frame.queue(StepRequest {
            adventurer: AdventurerId::new(0),
            to: Some(CellCoord::new(1, 1)),
        });

        let drained = frame.drain_sorted();
        let order: Vec<u32> = drained.iter().map(|request| request.adventurer.get()).collect();
        assert_eq!(order, vec![0, 2]);
        assert!(!frame.contains(AdventurerId::new(0)));
    }

    #[test]
    fn terrain_tolerates_duplicate_mountains() {
        let cell = CellCoord::new(1, 0);
        let terrain = Terrain::from_mountains(&[Mountain::new(cell), Mountain::new(cell)]);
        assert!(terrain.is_mountain(cell));
        assert!(!terrain.is_mountain(CellCoord::new(0, 0)));
    }
}
