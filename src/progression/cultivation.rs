//! Tiered cultivation cost calculator
//!
//! Cultivation is step-billed: currency is charged in fixed blocks of 10 raw
//! experience points at the mode's per-block rate, and partial blocks are
//! always billed as full blocks. Each level has its own experience threshold,
//! counted from zero within the level.

use crate::data::CostTables;

use super::{CostResult, CultivationMode};

/// Highest cultivation level.
pub const CULTIVATION_LEVEL_CAP: u32 = 25;

/// Raw experience points per billing block.
pub const BLOCK_EXP: u32 = 10;

/// Cost of advancing a cultivation track from `current_level` to
/// `target_level`.
///
/// Each leg entering a level consumes that level's full threshold; the first
/// leg is reduced by `current_exp`, later legs start from zero. On a
/// multi-level crossing, `landing_exp` requests the experience to land with
/// inside the destination level: `Some(r)` with `r` below the destination
/// threshold refunds the unconsumed tail, `Some(r)` at or above the
/// threshold clamps to no refund, and `None` bills the crossing in full.
/// `landing_exp` does not participate in a single-level advance.
///
/// Returns a zero result when the range is empty, reversed, or the target
/// exceeds the cap. Levels with no table row contribute nothing.
pub fn advance_cost(
    tables: &CostTables,
    mode: CultivationMode,
    current_level: u32,
    target_level: u32,
    current_exp: u32,
    landing_exp: Option<u32>,
) -> CostResult {
    if current_level >= target_level || target_level > CULTIVATION_LEVEL_CAP {
        return CostResult::zero();
    }

    let mut experience: u64 = 0;
    let mut blocks: u64 = 0;
    for level in current_level + 1..=target_level {
        let threshold = tables.cultivation_threshold(mode, level);
        let consumed = if level == current_level + 1 {
            threshold.saturating_sub(current_exp)
        } else {
            threshold
        };
        experience += consumed as u64;
        blocks += consumed.div_ceil(BLOCK_EXP) as u64;
    }

    // Multi-level crossings bill the destination level in full, then refund
    // the tail above the requested landing experience.
    if target_level > current_level + 1 {
        if let Some(landing) = landing_exp {
            let threshold = tables.cultivation_threshold(mode, target_level);
            if landing < threshold {
                let unused = threshold - landing;
                experience -= unused as u64;
                blocks -= unused.div_ceil(BLOCK_EXP) as u64;
            }
        }
    }

    CostResult {
        experience,
        currency: blocks * mode.currency_per_block(),
        guild_contribution: 0,
    }
}

/// Cost of gaining experience within the current level, no level change.
///
/// The delta is billed block by block at the mode's rate; no threshold
/// lookup is involved. Not an increase, no cost.
pub fn top_up_cost(mode: CultivationMode, current_exp: u32, new_exp: u32) -> CostResult {
    if new_exp <= current_exp {
        return CostResult::zero();
    }
    let delta = new_exp - current_exp;
    CostResult {
        experience: delta as u64,
        currency: delta.div_ceil(BLOCK_EXP) as u64 * mode.currency_per_block(),
        guild_contribution: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CostTables;
    use crate::progression::CultivationMode::{Attack, Defense};

    #[test]
    fn test_first_level_bills_threshold_blocks() {
        let tables = CostTables::default();
        // Defense level 1 threshold is 43: 5 blocks of 20_000.
        let cost = advance_cost(&tables, Defense, 0, 1, 0, None);
        assert_eq!(cost.experience, 43);
        assert_eq!(cost.currency, 100_000);
        assert_eq!(cost.guild_contribution, 0);

        // Attack level 1 threshold is 50: 5 blocks of 30_000.
        let cost = advance_cost(&tables, Attack, 0, 1, 0, None);
        assert_eq!(cost.experience, 50);
        assert_eq!(cost.currency, 150_000);
    }

    #[test]
    fn test_invalid_ranges_cost_nothing() {
        let tables = CostTables::default();
        assert!(advance_cost(&tables, Defense, 3, 3, 0, None).is_zero());
        assert!(advance_cost(&tables, Defense, 5, 2, 0, None).is_zero());
        assert!(advance_cost(&tables, Defense, 0, 26, 0, None).is_zero());
    }

    #[test]
    fn test_current_experience_reduces_first_leg() {
        let tables = CostTables::default();
        // Defense level 5 threshold is 359; 100 already accumulated.
        let cost = advance_cost(&tables, Defense, 4, 5, 100, None);
        assert_eq!(cost.experience, 259);
        assert_eq!(cost.currency, 26 * 20_000);

        // Accumulated experience beyond the threshold clamps to zero.
        assert!(advance_cost(&tables, Defense, 0, 1, 50, None).is_zero());
    }

    #[test]
    fn test_multi_level_adds_up_without_landing() {
        let tables = CostTables::default();
        let whole = advance_cost(&tables, Defense, 0, 3, 0, None);
        let hops = advance_cost(&tables, Defense, 0, 1, 0, None)
            + advance_cost(&tables, Defense, 1, 2, 0, None)
            + advance_cost(&tables, Defense, 2, 3, 0, None);
        assert_eq!(whole, hops);
        // Thresholds 43 + 101 + 181, blocks 5 + 11 + 19.
        assert_eq!(whole.experience, 325);
        assert_eq!(whole.currency, 35 * 20_000);
    }

    #[test]
    fn test_landing_refunds_unconsumed_tail() {
        let tables = CostTables::default();
        // Destination threshold 181, landing at 50: refund 131 experience
        // and ceil(131/10) = 14 blocks.
        let cost = advance_cost(&tables, Defense, 0, 3, 0, Some(50));
        assert_eq!(cost.experience, 325 - 131);
        assert_eq!(cost.currency, (35 - 14) * 20_000);
    }

    #[test]
    fn test_landing_at_threshold_clamps_refund() {
        let tables = CostTables::default();
        let full = advance_cost(&tables, Defense, 0, 3, 0, None);
        assert_eq!(advance_cost(&tables, Defense, 0, 3, 0, Some(181)), full);
        assert_eq!(advance_cost(&tables, Defense, 0, 3, 0, Some(500)), full);
    }

    #[test]
    fn test_landing_ignored_on_single_level_advance() {
        let tables = CostTables::default();
        let plain = advance_cost(&tables, Defense, 0, 1, 0, None);
        assert_eq!(advance_cost(&tables, Defense, 0, 1, 0, Some(0)), plain);
    }

    #[test]
    fn test_top_up_rounds_blocks_up() {
        // 530 - 500 = 30 raw points: exactly 3 blocks.
        let cost = top_up_cost(Defense, 500, 530);
        assert_eq!(cost.experience, 30);
        assert_eq!(cost.currency, 3 * 20_000);

        // 35 raw points: a partial fourth block bills in full.
        let cost = top_up_cost(Attack, 0, 35);
        assert_eq!(cost.experience, 35);
        assert_eq!(cost.currency, 4 * 30_000);

        assert!(top_up_cost(Defense, 500, 500).is_zero());
        assert!(top_up_cost(Defense, 500, 400).is_zero());
    }

    #[test]
    fn test_same_inputs_same_output() {
        let tables = CostTables::default();
        let a = advance_cost(&tables, Attack, 2, 9, 77, Some(120));
        let b = advance_cost(&tables, Attack, 2, 9, 77, Some(120));
        assert_eq!(a, b);
    }
}
