//! YAML configuration: data directory, dataset filenames and seed rows,
//! chart series, and the projected-benefits list.

use crate::table::{RecordTable, Value};
use crate::trends::MonthlyTrends;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "planthealth.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the dataset CSV files.
    pub data_dir: PathBuf,
    pub datasets: DatasetsConfig,
    pub trends: MonthlyTrends,
    /// Lines shown under "Projected Benefits" in the report.
    pub benefits: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            datasets: DatasetsConfig::default(),
            trends: MonthlyTrends::default(),
            benefits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatasetsConfig {
    pub production: DatasetConfig,
    pub productivity: DatasetConfig,
    pub action_items: DatasetConfig,
}

/// Filename override plus the initial contents of one dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub file: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<SeedCell>>>,
}

/// A scalar as written in YAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SeedCell {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl From<SeedCell> for Value {
    fn from(cell: SeedCell) -> Self {
        match cell {
            SeedCell::Int(i) => Value::Int(i),
            SeedCell::Float(f) => Value::Float(f),
            SeedCell::Bool(b) => Value::Str(b.to_string()),
            SeedCell::Text(s) => Value::Str(s),
        }
    }
}

impl DatasetConfig {
    /// The configured rows as a table; rows shorter than `columns` are padded with nulls.
    pub fn seed_table(&self) -> RecordTable {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().cloned().map(|c| c.map_or(Value::Null, Value::from)).collect())
            .collect();
        RecordTable::from_parts(self.columns.clone(), rows)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if let Some(file) = &self.file {
            if file.trim().is_empty() {
                bail!("datasets.{}.file must not be empty", name);
            }
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() > self.columns.len() {
                bail!(
                    "datasets.{}.rows[{}] has {} cells but only {} columns are declared",
                    name,
                    i,
                    row.len(),
                    self.columns.len()
                );
            }
        }
        Ok(())
    }
}

impl Config {
    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(text).context("parsing configuration YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration.
    ///
    /// - `Some(path)`: the file must exist.
    /// - `None`: [`DEFAULT_CONFIG_FILE`] is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    debug!("no {} found; using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                p
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))?;
        info!(path = %path.display(), data_dir = %cfg.data_dir.display(), "loaded config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            bail!("data_dir must not be empty");
        }
        self.datasets.production.validate("production")?;
        self.datasets.productivity.validate("productivity")?;
        self.datasets.action_items.validate("action_items")?;
        self.trends.validate()?;
        Ok(())
    }
}
