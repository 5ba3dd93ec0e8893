//! Cost table rows and the table repository
//!
//! Per-level costs for master skills, assist skills, and cultivation tracks.
//! Tables are built once at startup (seeded defaults or RON overrides, see
//! `loader`) and never mutated afterward, so a shared `&CostTables` can be
//! read from any number of threads without synchronization.

use serde::{Deserialize, Serialize};

use crate::progression::{CultivationMode, SkillKind};

/// Per-level cost of raising a skill to this level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCost {
    pub level: u32,
    pub experience: u32,
    pub currency: u32,
    /// Guild contribution, consumed by assist skills only.
    #[serde(default)]
    pub guild_contribution: u32,
}

/// Raw experience required to fully clear this cultivation level,
/// counted from zero within the level (not cumulative from level 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultivationCost {
    pub level: u32,
    pub threshold: u32,
}

/// Cultivation thresholds for both billing modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultivationTable {
    pub defense: Vec<CultivationCost>,
    pub attack: Vec<CultivationCost>,
}

impl CultivationTable {
    pub fn for_mode(&self, mode: CultivationMode) -> &[CultivationCost] {
        match mode {
            CultivationMode::Defense => &self.defense,
            CultivationMode::Attack => &self.attack,
        }
    }
}

/// Immutable lookup tables for every progression kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTables {
    pub master: Vec<SkillCost>,
    pub assist: Vec<SkillCost>,
    pub cultivation: CultivationTable,
}

impl Default for CostTables {
    fn default() -> Self {
        Self {
            master: default_master_costs(),
            assist: default_assist_costs(),
            cultivation: default_cultivation_table(),
        }
    }
}

impl CostTables {
    /// Find the cost row for one skill level.
    pub fn skill_cost(&self, kind: SkillKind, level: u32) -> Option<&SkillCost> {
        let table = match kind {
            SkillKind::Master => &self.master,
            SkillKind::Assist => &self.assist,
        };
        table.iter().find(|row| row.level == level)
    }

    /// Find the threshold row for one cultivation level.
    pub fn cultivation(&self, mode: CultivationMode, level: u32) -> Option<&CultivationCost> {
        self.cultivation
            .for_mode(mode)
            .iter()
            .find(|row| row.level == level)
    }

    /// Threshold for a cultivation level, 0 when the row is missing.
    pub fn cultivation_threshold(&self, mode: CultivationMode, level: u32) -> u32 {
        self.cultivation(mode, level).map_or(0, |row| row.threshold)
    }

    /// Report every level inside the valid caps that has no table row.
    ///
    /// The calculators degrade silently on missing rows (fallback estimate
    /// for master, zero contribution otherwise); this keeps the data gap
    /// visible to the test suite instead of masking it permanently.
    pub fn coverage_gaps(&self) -> CoverageGaps {
        let skill_gaps = |kind: SkillKind| -> Vec<u32> {
            (1..=kind.level_cap())
                .filter(|&level| self.skill_cost(kind, level).is_none())
                .collect()
        };
        let cultivation_gaps = |mode: CultivationMode| -> Vec<u32> {
            (1..=crate::progression::CULTIVATION_LEVEL_CAP)
                .filter(|&level| self.cultivation(mode, level).is_none())
                .collect()
        };
        CoverageGaps {
            master: skill_gaps(SkillKind::Master),
            assist: skill_gaps(SkillKind::Assist),
            defense_cultivation: cultivation_gaps(CultivationMode::Defense),
            attack_cultivation: cultivation_gaps(CultivationMode::Attack),
        }
    }
}

/// Levels inside the valid range with no table row, per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageGaps {
    pub master: Vec<u32>,
    pub assist: Vec<u32>,
    pub defense_cultivation: Vec<u32>,
    pub attack_cultivation: Vec<u32>,
}

impl CoverageGaps {
    pub fn is_complete(&self) -> bool {
        self.master.is_empty()
            && self.assist.is_empty()
            && self.defense_cultivation.is_empty()
            && self.attack_cultivation.is_empty()
    }
}

// ============================================================================
// Seed Tables
// ============================================================================

/// Master skill rows: (level, experience, currency).
/// Authoritative values for levels 1-50; higher levels fall back to the
/// polynomial estimate until authoritative rows are supplied.
const MASTER_COSTS: &[(u32, u32, u32)] = &[
    (1, 16, 6), (2, 32, 12), (3, 52, 19), (4, 75, 28),
    (5, 103, 38), (6, 136, 51), (7, 179, 67), (8, 231, 86),
    (9, 295, 110), (10, 372, 139), (11, 466, 174), (12, 578, 216),
    (13, 711, 266), (14, 867, 325), (15, 1049, 393), (16, 1260, 472),
    (17, 1503, 563), (18, 1780, 667), (19, 2096, 786), (20, 2452, 919),
    (21, 2854, 1070), (22, 3304, 1238), (23, 3807, 1426), (24, 4364, 1636),
    (25, 4983, 1868), (26, 5664, 2124), (27, 6415, 2404), (28, 7238, 2714),
    (29, 8138, 3050), (30, 9120, 3420), (31, 10188, 3820), (32, 11347, 4255),
    (33, 12602, 4725), (34, 13959, 5234), (35, 15423, 5783), (36, 16998, 6374),
    (37, 18692, 7009), (38, 20508, 7690), (39, 22452, 8419), (40, 24532, 9199),
    (41, 26753, 10032), (42, 29121, 10920), (43, 31642, 11865), (44, 34323, 12871),
    (45, 37169, 13938), (46, 40188, 15070), (47, 43388, 16270), (48, 46773, 17540),
    (49, 50352, 18882), (50, 54132, 20299),
];

/// Assist skill rows: (level, experience, currency, guild contribution).
/// Seed data for levels 1-60; assist values come only from the table, so
/// uncovered levels contribute nothing.
const ASSIST_COSTS: &[(u32, u32, u32, u32)] = &[
    (1, 28, 10, 2), (2, 65, 23, 5), (3, 110, 39, 8), (4, 164, 57, 12),
    (5, 225, 78, 15), (6, 295, 100, 19), (7, 373, 125, 23), (8, 459, 152, 27),
    (9, 553, 181, 31), (10, 655, 212, 35), (11, 766, 245, 39), (12, 884, 279, 43),
    (13, 1011, 316, 47), (14, 1146, 354, 52), (15, 1289, 394, 56), (16, 1440, 436, 61),
    (17, 1599, 480, 65), (18, 1766, 525, 70), (19, 1941, 572, 75), (20, 2124, 621, 79),
    (21, 2316, 671, 84), (22, 2515, 723, 89), (23, 2723, 777, 94), (24, 2938, 832, 99),
    (25, 3162, 889, 104), (26, 3394, 947, 109), (27, 3634, 1007, 114), (28, 3882, 1069, 119),
    (29, 4138, 1132, 124), (30, 4402, 1197, 130), (31, 4674, 1263, 135), (32, 4954, 1331, 140),
    (33, 5242, 1400, 146), (34, 5539, 1471, 151), (35, 5843, 1543, 157), (36, 6156, 1617, 162),
    (37, 6476, 1692, 168), (38, 6805, 1768, 173), (39, 7141, 1847, 179), (40, 7486, 1926, 184),
    (41, 7839, 2007, 190), (42, 8200, 2090, 196), (43, 8568, 2174, 202), (44, 8945, 2259, 207),
    (45, 9330, 2346, 213), (46, 9723, 2434, 219), (47, 10125, 2523, 225), (48, 10534, 2614, 231),
    (49, 10951, 2707, 237), (50, 11376, 2800, 243), (51, 11810, 2895, 249), (52, 12251, 2992, 255),
    (53, 12700, 3090, 261), (54, 13158, 3189, 267), (55, 13623, 3290, 273), (56, 14097, 3392, 280),
    (57, 14579, 3495, 286), (58, 15068, 3600, 292), (59, 15566, 3706, 298), (60, 16072, 3813, 305),
];

/// Defense cultivation thresholds, levels 1-25.
const DEFENSE_THRESHOLDS: &[u32] = &[
    43, 101, 181, 259, 359, 472, 589, 719, 871, 1021, 1193, 1378, 1567,
    1769, 1993, 2215, 2459, 2716, 2977, 3251, 3547, 3841, 4157, 4486, 4819,
];

/// Attack cultivation thresholds, levels 1-25.
const ATTACK_THRESHOLDS: &[u32] = &[
    50, 124, 210, 318, 430, 564, 710, 878, 1050, 1244, 1450, 1678, 1910,
    2164, 2430, 2718, 3010, 3324, 3650, 3998, 4350, 4724, 5110, 5518, 5930,
];

/// Create the default master skill table (hardcoded fallback).
pub fn default_master_costs() -> Vec<SkillCost> {
    MASTER_COSTS
        .iter()
        .map(|&(level, experience, currency)| SkillCost {
            level,
            experience,
            currency,
            guild_contribution: 0,
        })
        .collect()
}

/// Create the default assist skill table (hardcoded fallback).
pub fn default_assist_costs() -> Vec<SkillCost> {
    ASSIST_COSTS
        .iter()
        .map(|&(level, experience, currency, guild_contribution)| SkillCost {
            level,
            experience,
            currency,
            guild_contribution,
        })
        .collect()
}

/// Create the default cultivation threshold tables (hardcoded fallback).
pub fn default_cultivation_table() -> CultivationTable {
    let rows = |thresholds: &[u32]| -> Vec<CultivationCost> {
        thresholds
            .iter()
            .enumerate()
            .map(|(i, &threshold)| CultivationCost {
                level: i as u32 + 1,
                threshold,
            })
            .collect()
    };
    CultivationTable {
        defense: rows(DEFENSE_THRESHOLDS),
        attack: rows(ATTACK_THRESHOLDS),
    }
}
