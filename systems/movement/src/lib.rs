#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that turns instruction sequences into world commands.
//!
//! Each tick runs in two phases. While handling `TickStarted` the system walks the
//! adventurers in declaration order and emits one command per pending instruction:
//! turns take effect as soon as the world applies them, advances are only staged.
//! The trailing `ResolveTick` command then lets the world arbitrate every staged
//! advance against the same start-of-tick snapshot.

use tracing::{debug, info};
use treasure_map_core::{Command, Event, Scenario};
use treasure_map_world::{
    self as world,
    query::{self, AdventurerView},
    World,
};

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    last_planned: Option<usize>,
}

impl Movement {
    /// Consumes world events and an adventurer view to emit the commands of the opened tick.
    ///
    /// The view must be captured after the world processed `BeginTick` so that it
    /// exposes the instructions due during the new tick. A tick is planned at most once.
    pub fn handle(
        &mut self,
        events: &[Event],
        adventurer_view: &AdventurerView,
        out: &mut Vec<Command>,
    ) {
        let Some(tick) = events.iter().rev().find_map(|event| match event {
            Event::TickStarted { tick } => Some(*tick),
            _ => None,
        }) else {
            return;
        };

        if self.last_planned == Some(tick) {
            return;
        }
        self.last_planned = Some(tick);

        for snapshot in adventurer_view.iter() {
            let Some(instruction) = snapshot.instruction else {
                continue;
            };
            let command = match instruction.rotation() {
                Some(rotation) => Command::Turn {
                    adventurer: snapshot.id,
                    rotation,
                },
                None => Command::RequestAdvance {
                    adventurer: snapshot.id,
                },
            };
            out.push(command);
        }

        out.push(Command::ResolveTick);
    }
}

/// Runs the scenario to completion and returns the final state.
#[must_use]
pub fn simulate(scenario: Scenario) -> Scenario {
    simulate_with(scenario, |_| {})
}

/// Runs the scenario to completion, handing every tick's events to `observer`.
///
/// The run lasts exactly as many ticks as the longest instruction sequence.
pub fn simulate_with<F>(scenario: Scenario, mut observer: F) -> Scenario
where
    F: FnMut(&[Event]),
{
    let budget = scenario.tick_budget();
    let mut world = World::from_scenario(scenario);
    let mut movement = Movement::default();
    info!(
        ticks = budget,
        adventurers = query::adventurers(&world).len(),
        "simulation started"
    );

    let mut events = Vec::new();
    let mut commands = Vec::new();
    for tick in 0..budget {
        events.clear();
        commands.clear();

        world::apply(&mut world, Command::BeginTick, &mut events);
        let view = query::adventurer_view(&world);
        movement.handle(&events, &view, &mut commands);
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }

        debug!(tick, events = events.len(), "tick resolved");
        observer(&events);
    }

    let scenario = world.into_scenario();
    info!(
        collected = scenario.collected_treasures(),
        remaining = scenario.remaining_treasures(),
        "simulation finished"
    );
    scenario
}
