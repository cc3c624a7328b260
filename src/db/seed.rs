//! Reference data seeding: CSV folders and the built-in catalog

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter};
use tracing::{info, warn};

use super::Database;
use crate::error::ValidationError;
use crate::exercises::{BASE_EXERCISES, MUSCLE_GROUPS};

/// Tables a CSV file may target, in foreign key order
pub const SEED_TABLES: &[&str] = &[
    "muscle_groups",
    "exercises",
    "exercise_secondary_muscle_groups",
    "weekly_schedule",
];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Database {
    /// Load every `<table>.csv` in `dir` into the table of the same name.
    ///
    /// The header row names the columns. Empty cells are stored as NULL.
    /// Files whose name is not a seedable table are rejected, the whole
    /// folder loads in a single transaction.
    pub fn seed_from_folder(&mut self, dir: &Path) -> Result<Vec<(String, usize)>> {
        let mut files: Vec<(usize, String, PathBuf)> = Vec::new();

        for entry in fs::read_dir(dir).with_context(|| format!("reading seed folder {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(table) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                warn!("Skipping seed file with unreadable name: {}", path.display());
                continue;
            };
            let Some(order) = SEED_TABLES.iter().position(|t| *t == table) else {
                return Err(ValidationError::UnknownSeedTable(table).into());
            };
            files.push((order, table, path));
        }
        files.sort();

        let tx = self.conn.transaction()?;
        let mut loaded = Vec::new();

        for (_, table, path) in files {
            let mut reader = csv::Reader::from_path(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            let columns: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

            if let Some(bad) = columns.iter().find(|c| !is_identifier(c)) {
                return Err(ValidationError::InvalidSeedColumn {
                    file: path.display().to_string(),
                    column: bad.clone(),
                }
                .into());
            }

            let placeholders = vec!["?"; columns.len()].join(", ");
            let sql = format!("INSERT INTO {table} ({}) VALUES ({placeholders})", columns.join(", "));
            let mut stmt = tx.prepare(&sql)?;

            let mut rows = 0;
            for record in reader.records() {
                let record = record.with_context(|| format!("reading {}", path.display()))?;
                let values = record.iter().map(|v| {
                    let v = v.trim();
                    if v.is_empty() { None } else { Some(v.to_string()) }
                });
                stmt.execute(params_from_iter(values))
                    .with_context(|| format!("inserting row {} of {}", rows + 1, path.display()))?;
                rows += 1;
            }

            info!("Data loaded from {} into {} ({} rows)", path.display(), table, rows);
            loaded.push((table, rows));
        }

        tx.commit()?;
        Ok(loaded)
    }

    /// Insert the built-in exercise catalog
    pub fn seed_catalog(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;

        for group in MUSCLE_GROUPS {
            tx.execute("INSERT INTO muscle_groups (muscle_group) VALUES (?1)", params![group])?;
        }

        for exercise in BASE_EXERCISES {
            tx.execute(
                "INSERT INTO exercises (name, exercise_type, primary_muscle_group_id)
                 SELECT ?1, ?2, id FROM muscle_groups WHERE muscle_group = ?3",
                params![exercise.name, exercise.exercise_type, exercise.primary],
            )?;
            let exercise_id = tx.last_insert_rowid();

            for group in exercise.secondary {
                tx.execute(
                    "INSERT INTO exercise_secondary_muscle_groups (exercise_id, secondary_muscle_group_id)
                     SELECT ?1, id FROM muscle_groups WHERE muscle_group = ?2",
                    params![exercise_id, group],
                )?;
            }
        }

        tx.commit()?;
        info!(
            "Seeded built-in catalog: {} muscle groups, {} exercises",
            MUSCLE_GROUPS.len(),
            BASE_EXERCISES.len()
        );
        Ok(())
    }

    /// Seed reference data once: from `dir` when it exists, else the built-in catalog
    pub fn seed_if_empty(&mut self, dir: &Path) -> Result<bool> {
        if !self.needs_seed()? {
            return Ok(false);
        }
        if dir.is_dir() {
            self.seed_from_folder(dir)?;
        } else {
            info!("Seed folder {} not found, using built-in catalog", dir.display());
            self.seed_catalog()?;
        }
        Ok(true)
    }
}
