#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the treasure map simulator.
//!
//! This crate defines the data model and the message surface that connects
//! adapters, the authoritative world, and pure systems. Systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Opens the next tick and discards any reservation left over from the previous one.
    BeginTick,
    /// Rotates an adventurer in place. Takes effect immediately.
    Turn {
        /// Adventurer performing the rotation.
        adventurer: AdventurerId,
        /// Sense of the quarter turn.
        rotation: Rotation,
    },
    /// Requests that an adventurer advance one cell along its current facing.
    ///
    /// The request is only staged; it commits or fails when the tick resolves.
    RequestAdvance {
        /// Adventurer attempting to advance.
        adventurer: AdventurerId,
    },
    /// Arbitrates every staged advance of the current tick and closes the tick.
    ResolveTick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that a new tick opened.
    TickStarted {
        /// Zero-based index of the tick, equal to the instruction index consumed during it.
        tick: usize,
    },
    /// Confirms that an adventurer rotated.
    AdventurerTurned {
        /// Adventurer that rotated.
        adventurer: AdventurerId,
        /// Facing after the rotation.
        facing: Direction,
    },
    /// Confirms that an advance request was staged for arbitration.
    AdvanceQueued {
        /// Adventurer that requested the advance.
        adventurer: AdventurerId,
        /// Cell the adventurer occupies while the request is pending.
        from: CellCoord,
        /// Candidate destination, absent when the step would leave the coordinate space.
        to: Option<CellCoord>,
    },
    /// Confirms that an adventurer moved between two cells.
    AdventurerAdvanced {
        /// Adventurer that advanced.
        adventurer: AdventurerId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Reports that a staged advance was rejected during arbitration.
    AdvanceBlocked {
        /// Adventurer whose advance failed.
        adventurer: AdventurerId,
        /// Candidate destination, absent when the step would leave the coordinate space.
        target: Option<CellCoord>,
        /// First arbitration rule the move violated.
        reason: BlockReason,
    },
    /// Confirms that an adventurer picked up a treasure after advancing.
    TreasureCollected {
        /// Adventurer credited with the treasure.
        adventurer: AdventurerId,
        /// Cell holding the treasure.
        cell: CellCoord,
        /// Treasures left on the cell after the pickup.
        remaining: u32,
    },
    /// Announces that the tick closed and every staged advance was settled.
    TickResolved {
        /// Zero-based index of the tick that closed.
        tick: usize,
    },
}

/// Reason reported when an advance fails arbitration.
///
/// Variants are listed in evaluation order; the first failing rule is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockReason {
    /// Another adventurer targeted the same cell during the same tick.
    Contested,
    /// The destination was occupied by an adventurer when the tick started.
    Occupied,
    /// The destination lies outside the map.
    OutOfBounds,
    /// The destination is a mountain.
    Mountain,
}

/// Identifier assigned to an adventurer, equal to its zero-based declaration index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdventurerId(u32);

impl AdventurerId {
    /// Creates a new adventurer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single map cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell (the `x` of the text format).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell (the `y` of the text format).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the adjacent cell in the provided direction.
    ///
    /// Rows grow southward. Returns `None` when the step would leave the
    /// non-negative coordinate space, which is always outside any map.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        Some(CellCoord::new(column?, row?))
    }
}

/// Dimensions of the rectangular map. Valid cells span `[0, width) × [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapDimensions {
    width: u32,
    height: u32,
}

impl MapDimensions {
    /// Creates a new map description.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns contained in the map.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the map.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within the map.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column < self.width && cell.row < self.height
    }
}

/// Cardinal facings available to adventurers, in clockwise order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Facing toward decreasing row indices.
    North,
    /// Facing toward increasing column indices.
    East,
    /// Facing toward increasing row indices.
    South,
    /// Facing toward decreasing column indices.
    West,
}

impl Direction {
    const CLOCKWISE: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the facing obtained after a quarter turn.
    #[must_use]
    pub fn rotated(self, rotation: Rotation) -> Direction {
        let index = Self::CLOCKWISE
            .iter()
            .position(|direction| *direction == self)
            .unwrap_or(0);
        let next = match rotation {
            Rotation::Right => (index + 1) % Self::CLOCKWISE.len(),
            Rotation::Left => (index + Self::CLOCKWISE.len() - 1) % Self::CLOCKWISE.len(),
        };
        Self::CLOCKWISE[next]
    }

    /// Parses the single-letter form used by the text format.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Direction> {
        match letter {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }

    /// Single-letter form used by the text format.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }
}

/// Sense of a quarter turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// Clockwise turn (`D`, droite).
    Right,
    /// Counter-clockwise turn (`G`, gauche).
    Left,
}

/// Single step of an adventurer's instruction sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// Move one cell along the current facing (`A`).
    Advance,
    /// Quarter turn clockwise (`D`).
    TurnRight,
    /// Quarter turn counter-clockwise (`G`).
    TurnLeft,
}

impl Instruction {
    /// Parses the single-letter form used by the text format.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Instruction> {
        match letter {
            'A' => Some(Instruction::Advance),
            'D' => Some(Instruction::TurnRight),
            'G' => Some(Instruction::TurnLeft),
            _ => None,
        }
    }

    /// Single-letter form used by the text format.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Instruction::Advance => 'A',
            Instruction::TurnRight => 'D',
            Instruction::TurnLeft => 'G',
        }
    }

    /// Rotation performed by the instruction, if it is a turn.
    #[must_use]
    pub const fn rotation(self) -> Option<Rotation> {
        match self {
            Instruction::Advance => None,
            Instruction::TurnRight => Some(Rotation::Right),
            Instruction::TurnLeft => Some(Rotation::Left),
        }
    }
}

/// Entry of the rewritten instruction sequence exposed by [`Adventurer::moves`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Advance that was not rejected.
    Advance,
    /// Clockwise turn.
    TurnRight,
    /// Counter-clockwise turn.
    TurnLeft,
    /// Advance rejected during arbitration.
    Ignored,
}

impl From<Instruction> for Move {
    fn from(instruction: Instruction) -> Self {
        match instruction {
            Instruction::Advance => Move::Advance,
            Instruction::TurnRight => Move::TurnRight,
            Instruction::TurnLeft => Move::TurnLeft,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Advance => write!(f, "A"),
            Move::TurnRight => write!(f, "D"),
            Move::TurnLeft => write!(f, "G"),
            Move::Ignored => write!(f, "Ignored"),
        }
    }
}

/// Result of the instruction an adventurer held during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The instruction took effect.
    Executed,
    /// The advance was rejected during arbitration.
    Blocked,
    /// The adventurer had no instruction for the tick.
    Idle,
}

/// Journal entry describing what an adventurer did during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Instruction held for the tick, absent once the sequence is exhausted.
    pub instruction: Option<Instruction>,
    /// What became of the instruction.
    pub outcome: Outcome,
}

/// Permanently impassable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mountain {
    cell: CellCoord,
}

impl Mountain {
    /// Creates a mountain covering the provided cell.
    #[must_use]
    pub const fn new(cell: CellCoord) -> Self {
        Self { cell }
    }

    /// Cell covered by the mountain.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }
}

/// Depletable pile of treasures bound to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Treasure {
    cell: CellCoord,
    count: u32,
}

impl Treasure {
    /// Creates a treasure pile on the provided cell.
    #[must_use]
    pub const fn new(cell: CellCoord, count: u32) -> Self {
        Self { cell, count }
    }

    /// Cell holding the pile.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Treasures left in the pile.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Removes one treasure from the pile, reporting whether one was available.
    pub fn take_one(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

/// Stateful explorer with a position, a facing and an instruction sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adventurer {
    name: String,
    cell: CellCoord,
    facing: Direction,
    instructions: Vec<Instruction>,
    treasures_collected: u32,
    journal: Vec<TickRecord>,
}

impl Adventurer {
    /// Creates an adventurer that has not collected anything yet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        cell: CellCoord,
        facing: Direction,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            name: name.into(),
            cell,
            facing,
            instructions,
            treasures_collected: 0,
            journal: Vec::new(),
        }
    }

    /// Seeds the treasure counter, used when restoring a rendered report.
    #[must_use]
    pub fn with_treasures(mut self, treasures_collected: u32) -> Self {
        self.treasures_collected = treasures_collected;
        self
    }

    /// Display name. Names are not required to be unique.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell currently occupied.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Original instruction sequence, never rewritten.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Instruction consumed during the provided tick, if the sequence is long enough.
    #[must_use]
    pub fn instruction_at(&self, tick: usize) -> Option<Instruction> {
        self.instructions.get(tick).copied()
    }

    /// Number of treasures picked up so far.
    #[must_use]
    pub const fn treasures_collected(&self) -> u32 {
        self.treasures_collected
    }

    /// Ordered per-tick log. Entry `i` describes tick `i`.
    #[must_use]
    pub fn journal(&self) -> &[TickRecord] {
        &self.journal
    }

    /// Instruction sequence with every rejected advance rewritten to [`Move::Ignored`].
    ///
    /// A rejection during tick `i` marks the first advance at or after index `i`
    /// that has not been marked yet.
    #[must_use]
    pub fn moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = self.instructions.iter().copied().map(Move::from).collect();
        for (tick, record) in self.journal.iter().enumerate() {
            if record.outcome != Outcome::Blocked {
                continue;
            }
            if let Some(slot) = moves
                .iter_mut()
                .skip(tick)
                .find(|entry| **entry == Move::Advance)
            {
                *slot = Move::Ignored;
            }
        }
        moves
    }

    /// Moves the adventurer to the provided cell.
    pub fn relocate(&mut self, cell: CellCoord) {
        self.cell = cell;
    }

    /// Changes the adventurer's facing.
    pub fn face(&mut self, facing: Direction) {
        self.facing = facing;
    }

    /// Credits the adventurer with one treasure.
    pub fn credit_treasure(&mut self) {
        self.treasures_collected = self.treasures_collected.saturating_add(1);
    }

    /// Appends the journal entry for the next tick.
    pub fn record(&mut self, record: TickRecord) {
        self.journal.push(record);
    }

    /// Forgets every journaled tick so a new run starts at tick 0.
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }
}

/// Complete simulation input or output: the map and every entity on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Map bounds.
    pub map: MapDimensions,
    /// Mountains in declaration order.
    pub mountains: Vec<Mountain>,
    /// Treasure piles in declaration order.
    pub treasures: Vec<Treasure>,
    /// Adventurers in declaration order, which is also their processing order.
    pub adventurers: Vec<Adventurer>,
}

impl Scenario {
    /// Creates an empty scenario on a map of the provided dimensions.
    #[must_use]
    pub fn new(map: MapDimensions) -> Self {
        Self {
            map,
            mountains: Vec::new(),
            treasures: Vec::new(),
            adventurers: Vec::new(),
        }
    }

    /// Sum of the treasures still lying on the map.
    #[must_use]
    pub fn remaining_treasures(&self) -> u64 {
        self.treasures
            .iter()
            .map(|treasure| u64::from(treasure.count()))
            .sum()
    }

    /// Sum of the treasures carried by adventurers.
    #[must_use]
    pub fn collected_treasures(&self) -> u64 {
        self.adventurers
            .iter()
            .map(|adventurer| u64::from(adventurer.treasures_collected()))
            .sum()
    }

    /// Length of the longest instruction sequence, which is the number of ticks a run lasts.
    #[must_use]
    pub fn tick_budget(&self) -> usize {
        self.adventurers
            .iter()
            .map(|adventurer| adventurer.instructions().len())
            .max()
            .unwrap_or(0)
    }

    /// Reports whether the cell is covered by a mountain.
    #[must_use]
    pub fn is_mountain(&self, cell: CellCoord) -> bool {
        self.mountains.iter().any(|mountain| mountain.cell() == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_right_turns_return_north() {
        let mut facing = Direction::North;
        for _ in 0..4 {
            facing = facing.rotated(Rotation::Right);
        }
        assert_eq!(facing, Direction::North);
    }

    #[test]
    fn left_turn_from_north_faces_west() {
        assert_eq!(Direction::North.rotated(Rotation::Left), Direction::West);
        assert_eq!(Direction::West.rotated(Rotation::Right), Direction::North);
    }

    #[test]
    fn neighbor_follows_screen_axes() {
        let cell = CellCoord::new(1, 1);
        assert_eq!(cell.neighbor(Direction::North), Some(CellCoord::new(1, 0)));
        assert_eq!(cell.neighbor(Direction::East), Some(CellCoord::new(2, 1)));
        assert_eq!(cell.neighbor(Direction::South), Some(CellCoord::new(1, 2)));
        assert_eq!(cell.neighbor(Direction::West), Some(CellCoord::new(0, 1)));
        assert_eq!(CellCoord::new(0, 0).neighbor(Direction::North), None);
        assert_eq!(CellCoord::new(0, 0).neighbor(Direction::West), None);
    }

    #[test]
    fn letters_round_trip() {
        for letter in ['N', 'E', 'S', 'W'] {
            let direction = Direction::from_letter(letter).expect("valid direction");
            assert_eq!(direction.letter(), letter);
        }
        for letter in ['A', 'D', 'G'] {
            let instruction = Instruction::from_letter(letter).expect("valid instruction");
            assert_eq!(instruction.letter(), letter);
        }
        assert_eq!(Direction::from_letter('X'), None);
        assert_eq!(Instruction::from_letter('B'), None);
    }

    #[test]
    fn treasure_pile_stops_at_zero() {
        let mut treasure = Treasure::new(CellCoord::new(0, 0), 1);
        assert!(treasure.take_one());
        assert!(!treasure.take_one());
        assert_eq!(treasure.count(), 0);
    }

    #[test]
    fn blocked_ticks_rewrite_the_next_advance() {
        let mut adventurer = Adventurer::new(
            "Lara",
            CellCoord::new(0, 0),
            Direction::East,
            vec![
                Instruction::TurnRight,
                Instruction::Advance,
                Instruction::Advance,
            ],
        );
        adventurer.record(TickRecord {
            instruction: Some(Instruction::TurnRight),
            outcome: Outcome::Blocked,
        });
        adventurer.record(TickRecord {
            instruction: Some(Instruction::Advance),
            outcome: Outcome::Blocked,
        });

        assert_eq!(
            adventurer.moves(),
            vec![Move::TurnRight, Move::Ignored, Move::Ignored]
        );
        assert_eq!(
            adventurer.instructions(),
            &[
                Instruction::TurnRight,
                Instruction::Advance,
                Instruction::Advance
            ]
        );
    }

    #[test]
    fn move_display_matches_legacy_letters() {
        let rendered: Vec<String> = [Move::Advance, Move::TurnRight, Move::TurnLeft, Move::Ignored]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, ["A", "D", "G", "Ignored"]);
    }

    #[test]
    fn scenario_serializes_through_json() {
        let mut scenario = Scenario::new(MapDimensions::new(3, 4));
        scenario.mountains.push(Mountain::new(CellCoord::new(1, 1)));
        scenario
            .treasures
            .push(Treasure::new(CellCoord::new(2, 2), 3));
        scenario.adventurers.push(Adventurer::new(
            "Jon",
            CellCoord::new(0, 0),
            Direction::South,
            vec![Instruction::Advance],
        ));

        let json = serde_json::to_string(&scenario).expect("scenario serializes");
        let decoded: Scenario = serde_json::from_str(&json).expect("scenario deserializes");
        assert_eq!(decoded, scenario);
        assert_eq!(decoded.remaining_treasures(), 3);
        assert_eq!(decoded.tick_budget(), 1);
    }
}
