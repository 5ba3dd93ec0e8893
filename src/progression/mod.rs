//! Progression cost calculators
//!
//! Pure cost math for skill ranges and cultivation crossings. Everything in
//! here is synchronous, side-effect free and deterministic: the same inputs
//! against the same cost tables always produce the same result.

pub mod cultivation;
pub mod skill;

pub use cultivation::{advance_cost, top_up_cost, BLOCK_EXP, CULTIVATION_LEVEL_CAP};
pub use skill::{fallback_master_cost, range_cost};

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Skill category, each with its own level cap and cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// School skills taught by the character's master.
    Master,
    /// Assist skills, which additionally consume guild contribution.
    Assist,
}

impl SkillKind {
    /// Highest level a skill of this kind can reach.
    pub fn level_cap(&self) -> u32 {
        match self {
            SkillKind::Master => 150,
            SkillKind::Assist => 180,
        }
    }
}

/// Cultivation billing tier. The mode fixes the currency charged per
/// 10-experience block and selects the per-level threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CultivationMode {
    Defense,
    Attack,
}

impl CultivationMode {
    /// Currency charged for each full or partial block of raw experience.
    pub fn currency_per_block(&self) -> u64 {
        match self {
            CultivationMode::Defense => 20_000,
            CultivationMode::Attack => 30_000,
        }
    }

    /// Display name for audit records and UIs.
    pub fn name(&self) -> &'static str {
        match self {
            CultivationMode::Defense => "Defense Cultivation",
            CultivationMode::Attack => "Attack Cultivation",
        }
    }
}

/// Total cost of a progression change. Values are raw in-game units;
/// `guild_contribution` stays 0 for everything except assist skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostResult {
    pub experience: u64,
    pub currency: u64,
    pub guild_contribution: u64,
}

impl CostResult {
    /// A zero-valued result, returned for empty or invalid ranges.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for CostResult {
    type Output = CostResult;

    fn add(self, rhs: CostResult) -> CostResult {
        CostResult {
            experience: self.experience + rhs.experience,
            currency: self.currency + rhs.currency,
            guild_contribution: self.guild_contribution + rhs.guild_contribution,
        }
    }
}

impl AddAssign for CostResult {
    fn add_assign(&mut self, rhs: CostResult) {
        *self = *self + rhs;
    }
}
