#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that summarises a simulation run.

use std::fmt;

use serde::Serialize;
use treasure_map_core::{BlockReason, Event};

pub mod metrics;

use metrics::BlockTally;

/// Aggregated statistics describing a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Ticks that were resolved.
    pub ticks: u32,
    /// Advances that committed.
    pub advances: u32,
    /// Quarter turns performed.
    pub turns: u32,
    /// Advances rejected during arbitration.
    pub blocked: BlockTally,
    /// Treasures picked up.
    pub treasures_collected: u32,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks: {}", self.ticks)?;
        writeln!(f, "advances: {}", self.advances)?;
        writeln!(f, "turns: {}", self.turns)?;
        writeln!(
            f,
            "blocked: {} (contested {}, occupied {}, out of bounds {}, mountain {})",
            self.blocked.total(),
            self.blocked.get(BlockReason::Contested),
            self.blocked.get(BlockReason::Occupied),
            self.blocked.get(BlockReason::OutOfBounds),
            self.blocked.get(BlockReason::Mountain),
        )?;
        write!(f, "treasures collected: {}", self.treasures_collected)
    }
}

/// Pure analytics system that folds world events into a [`RunReport`].
#[derive(Debug, Default)]
pub struct Analytics {
    report: RunReport,
}

impl Analytics {
    /// Creates a new analytics system with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report accumulated so far.
    #[must_use]
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Consumes a batch of world events.
    pub fn handle(&mut self, events: &[Event]) {
        let report = &mut self.report;
        for event in events {
            match event {
                Event::TickResolved { .. } => report.ticks = report.ticks.saturating_add(1),
                Event::AdventurerAdvanced { .. } => {
                    report.advances = report.advances.saturating_add(1);
                }
                Event::AdventurerTurned { .. } => report.turns = report.turns.saturating_add(1),
                Event::AdvanceBlocked { reason, .. } => report.blocked.record(*reason),
                Event::TreasureCollected { .. } => {
                    report.treasures_collected = report.treasures_collected.saturating_add(1);
                }
                Event::TickStarted { .. } | Event::AdvanceQueued { .. } => {}
            }
        }
    }
}
