//! Cost table repository
//!
//! Immutable per-level cost data for every progression kind, seeded from
//! hardcoded tables and overridable from external RON files.

pub mod costs;
pub mod loader;

pub use costs::{CostTables, CoverageGaps, CultivationCost, CultivationTable, SkillCost};
pub use loader::{default_table_dir, load_tables, load_tables_from};
