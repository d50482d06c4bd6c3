//! JSON export of the per-adventurer journals.

use serde::Serialize;
use treasure_map_core::{Scenario, TickRecord};

/// Audit trail of a single adventurer, exported as JSON.
#[derive(Debug, Serialize)]
pub(crate) struct AdventurerJournal<'a> {
    /// Display name of the adventurer.
    name: &'a str,
    /// Instruction sequence with rejected advances shown as `Ignored`.
    moves: Vec<String>,
    /// One entry per tick of the run.
    ticks: &'a [TickRecord],
}

/// Collects the journals of every adventurer in declaration order.
pub(crate) fn collect(scenario: &Scenario) -> Vec<AdventurerJournal<'_>> {
    scenario
        .adventurers
        .iter()
        .map(|adventurer| AdventurerJournal {
            name: adventurer.name(),
            moves: adventurer
                .moves()
                .iter()
                .map(ToString::to_string)
                .collect(),
            ticks: adventurer.journal(),
        })
        .collect()
}

/// Encodes the journals as pretty-printed JSON.
pub(crate) fn encode(scenario: &Scenario) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&collect(scenario))
}
