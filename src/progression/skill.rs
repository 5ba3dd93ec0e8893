//! Linear skill cost calculator
//!
//! Raising a skill from one level to another costs the sum of the table row
//! at every level crossed. Invalid ranges cost nothing rather than erroring,
//! so callers can sum results unconditionally.

use crate::data::CostTables;

use super::{CostResult, SkillKind};

/// Total cost of raising a skill from `current_level` to `target_level`.
///
/// Sums the table entry at every level in `(current_level, target_level]`.
/// Returns a zero result when the range is empty, reversed, or the target
/// exceeds the kind's cap. Missing master rows use the polynomial estimate;
/// missing assist rows contribute nothing (assist values, including guild
/// contribution, come only from the table).
pub fn range_cost(
    tables: &CostTables,
    kind: SkillKind,
    current_level: u32,
    target_level: u32,
) -> CostResult {
    if current_level >= target_level || target_level > kind.level_cap() {
        return CostResult::zero();
    }

    let mut total = CostResult::zero();
    for level in current_level + 1..=target_level {
        match tables.skill_cost(kind, level) {
            Some(row) => {
                total.experience += row.experience as u64;
                total.currency += row.currency as u64;
                total.guild_contribution += row.guild_contribution as u64;
            }
            None => {
                if kind == SkillKind::Master {
                    total += fallback_master_cost(level);
                }
            }
        }
    }
    total
}

/// Deterministic estimate for master levels with no table row.
///
/// Stand-in until authoritative rows cover the whole range; the gap itself
/// stays visible through `CostTables::coverage_gaps`.
pub fn fallback_master_cost(level: u32) -> CostResult {
    let l = level as f64;
    CostResult {
        experience: (12.0 * l + 3.6 * l * l).floor() as u64,
        currency: (4.0 * l + 2.4 * l.powf(1.7)).floor() as u64,
        guild_contribution: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CostTables;

    #[test]
    fn test_master_range_is_exact_table_sum() {
        let tables = CostTables::default();
        // Rows 11 and 12: 466/174 and 578/216.
        let cost = range_cost(&tables, SkillKind::Master, 10, 12);
        assert_eq!(cost.experience, 1044);
        assert_eq!(cost.currency, 390);
        assert_eq!(cost.guild_contribution, 0);
    }

    #[test]
    fn test_invalid_ranges_cost_nothing() {
        let tables = CostTables::default();
        assert!(range_cost(&tables, SkillKind::Master, 7, 7).is_zero());
        assert!(range_cost(&tables, SkillKind::Master, 12, 3).is_zero());
        assert!(range_cost(&tables, SkillKind::Master, 0, 151).is_zero());
        assert!(range_cost(&tables, SkillKind::Assist, 0, 181).is_zero());
    }

    #[test]
    fn test_experience_strictly_increases_with_target() {
        let tables = CostTables::default();
        let mut previous = 0;
        for target in 1..=SkillKind::Master.level_cap() {
            let cost = range_cost(&tables, SkillKind::Master, 0, target);
            assert!(cost.experience > previous, "not increasing at level {}", target);
            previous = cost.experience;
        }
    }

    #[test]
    fn test_missing_master_rows_use_fallback() {
        let tables = CostTables::default();
        // Level 51 has no seed row.
        assert!(tables.skill_cost(SkillKind::Master, 51).is_none());
        assert_eq!(range_cost(&tables, SkillKind::Master, 50, 51), fallback_master_cost(51));

        // A range straddling the table edge mixes table rows and estimates.
        let straddle = range_cost(&tables, SkillKind::Master, 49, 51);
        let expected = range_cost(&tables, SkillKind::Master, 49, 50) + fallback_master_cost(51);
        assert_eq!(straddle, expected);
    }

    #[test]
    fn test_missing_assist_rows_contribute_nothing() {
        let tables = CostTables::default();
        assert!(tables.skill_cost(SkillKind::Assist, 61).is_none());
        let through_gap = range_cost(&tables, SkillKind::Assist, 59, 62);
        let to_edge = range_cost(&tables, SkillKind::Assist, 59, 60);
        assert_eq!(through_gap, to_edge);
    }

    #[test]
    fn test_assist_sums_guild_contribution() {
        let tables = CostTables::default();
        // Rows 1 and 2: 28/10/2 and 65/23/5.
        let cost = range_cost(&tables, SkillKind::Assist, 0, 2);
        assert_eq!(cost.experience, 93);
        assert_eq!(cost.currency, 33);
        assert_eq!(cost.guild_contribution, 7);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let tables = CostTables::default();
        let a = range_cost(&tables, SkillKind::Master, 3, 47);
        let b = range_cost(&tables, SkillKind::Master, 3, 47);
        assert_eq!(a, b);
    }
}
