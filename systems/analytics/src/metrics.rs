//! Counters folded from arbitration events.

use serde::Serialize;
use treasure_map_core::BlockReason;

/// Number of rejected advances broken down by the arbitration rule that failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BlockTally {
    contested: u32,
    occupied: u32,
    out_of_bounds: u32,
    mountain: u32,
}

impl BlockTally {
    /// Counts one rejection.
    pub fn record(&mut self, reason: BlockReason) {
        let slot = match reason {
            BlockReason::Contested => &mut self.contested,
            BlockReason::Occupied => &mut self.occupied,
            BlockReason::OutOfBounds => &mut self.out_of_bounds,
            BlockReason::Mountain => &mut self.mountain,
        };
        *slot = slot.saturating_add(1);
    }

    /// Rejections attributed to the provided rule.
    #[must_use]
    pub fn get(&self, reason: BlockReason) -> u32 {
        match reason {
            BlockReason::Contested => self.contested,
            BlockReason::Occupied => self.occupied,
            BlockReason::OutOfBounds => self.out_of_bounds,
            BlockReason::Mountain => self.mountain,
        }
    }

    /// Rejections across every rule.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.contested
            .saturating_add(self.occupied)
            .saturating_add(self.out_of_bounds)
            .saturating_add(self.mountain)
    }
}
