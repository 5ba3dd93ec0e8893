//! RON table loader
//!
//! Loads cost tables from external RON files, with fallback to the hardcoded
//! seed tables. Tables are loaded once at process start; the returned
//! `CostTables` is never mutated afterward.

use std::fs;
use std::path::{Path, PathBuf};

use super::costs::{
    default_assist_costs, default_cultivation_table, default_master_costs, CostTables,
    CultivationTable, SkillCost,
};

/// Default directory for table override files.
pub fn default_table_dir() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "jadepath", "Jadepath") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("tables");
        path
    } else {
        PathBuf::from("./tables")
    }
}

/// Load cost tables from the default table directory, falling back to the
/// seed tables for any file that is missing or unreadable.
pub fn load_tables() -> CostTables {
    load_tables_from(&default_table_dir())
}

/// Load cost tables from a specific directory.
pub fn load_tables_from(dir: &Path) -> CostTables {
    CostTables {
        master: load_skill_table(dir, "master_costs.ron").unwrap_or_else(default_master_costs),
        assist: load_skill_table(dir, "assist_costs.ron").unwrap_or_else(default_assist_costs),
        cultivation: load_cultivation_table(dir).unwrap_or_else(default_cultivation_table),
    }
}

fn load_skill_table(dir: &Path, file: &str) -> Option<Vec<SkillCost>> {
    let path = dir.join(file);
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => match ron::from_str(&content) {
            Ok(table) => {
                log::info!("Loaded {} from {:?}", file, path);
                Some(table)
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}. Using seed table.", file, e);
                None
            }
        },
        Err(e) => {
            log::warn!("Failed to read {}: {}. Using seed table.", file, e);
            None
        }
    }
}

fn load_cultivation_table(dir: &Path) -> Option<CultivationTable> {
    let path = dir.join("cultivation_costs.ron");
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => match ron::from_str(&content) {
            Ok(table) => {
                log::info!("Loaded cultivation_costs.ron from {:?}", path);
                Some(table)
            }
            Err(e) => {
                log::warn!("Failed to parse cultivation_costs.ron: {}. Using seed table.", e);
                None
            }
        },
        Err(e) => {
            log::warn!("Failed to read cultivation_costs.ron: {}. Using seed table.", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_missing_directory_yields_seed_tables() {
        init_logging();
        let tables = load_tables_from(Path::new("/nonexistent/jadepath-tables"));
        assert_eq!(tables, CostTables::default());
    }

    #[test]
    fn test_override_file_replaces_one_table() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![
            SkillCost { level: 1, experience: 100, currency: 40, guild_contribution: 0 },
            SkillCost { level: 2, experience: 200, currency: 80, guild_contribution: 0 },
        ];
        let content = ron::to_string(&rows).unwrap();
        fs::write(dir.path().join("master_costs.ron"), content).unwrap();

        let tables = load_tables_from(dir.path());
        assert_eq!(tables.master, rows);
        // Untouched tables keep their seed data.
        assert_eq!(tables.assist, default_assist_costs());
        assert_eq!(tables.cultivation, default_cultivation_table());
    }

    #[test]
    fn test_malformed_file_falls_back_to_seed() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("assist_costs.ron"), "not ron at all [").unwrap();

        let tables = load_tables_from(dir.path());
        assert_eq!(tables.assist, default_assist_costs());
    }
}
