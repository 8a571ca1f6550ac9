pub mod forms;

pub use forms::{ActionStatus, ProductivityEntry};

use crate::config::{Config, DatasetConfig};
use crate::notice::Notice;
use crate::store::{self, LoadOutcome};
use crate::table::{Record, RecordTable};
use anyhow::{Context, Result};
use glob::{glob, Pattern};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{error, info, warn};

/// The three named datasets the dashboard edits and persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dataset {
    Production,
    Productivity,
    ActionItems,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [
        Dataset::Production,
        Dataset::Productivity,
        Dataset::ActionItems,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Production => "production",
            Dataset::Productivity => "productivity",
            Dataset::ActionItems => "action-items",
        }
    }

    pub fn default_file(&self) -> &'static str {
        match self {
            Dataset::Production => "production_data.csv",
            Dataset::Productivity => "productivity_data.csv",
            Dataset::ActionItems => "action_items.csv",
        }
    }

    /// Heading used when the dataset is displayed.
    pub fn title(&self) -> &'static str {
        match self {
            Dataset::Production => "Production Metrics",
            Dataset::Productivity => "Productivity Improvements",
            Dataset::ActionItems => "Action Items",
        }
    }

    fn config<'a>(&self, cfg: &'a Config) -> &'a DatasetConfig {
        match self {
            Dataset::Production => &cfg.datasets.production,
            Dataset::Productivity => &cfg.datasets.productivity,
            Dataset::ActionItems => &cfg.datasets.action_items,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "production" => Ok(Dataset::Production),
            "productivity" => Ok(Dataset::Productivity),
            "action-items" | "actions" => Ok(Dataset::ActionItems),
            other => Err(anyhow::anyhow!(
                "unknown dataset `{}` (expected production, productivity or action-items)",
                other
            )),
        }
    }
}

struct Slot {
    file: String,
    table: RecordTable,
}

/// Context object holding the three named tables and where they persist.
pub struct Dashboard {
    data_dir: PathBuf,
    production: Slot,
    productivity: Slot,
    action_items: Slot,
}

impl Dashboard {
    /// Seed every dataset from configuration. Nothing is read from disk.
    pub fn from_config(cfg: &Config) -> Self {
        let slot = |ds: Dataset| {
            let dc = ds.config(cfg);
            Slot {
                file: dc
                    .file
                    .clone()
                    .unwrap_or_else(|| ds.default_file().to_string()),
                table: dc.seed_table(),
            }
        };
        Self {
            data_dir: cfg.data_dir.clone(),
            production: slot(Dataset::Production),
            productivity: slot(Dataset::Productivity),
            action_items: slot(Dataset::ActionItems),
        }
    }

    /// Empty datasets with default filenames under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let cfg = Config {
            data_dir: data_dir.into(),
            ..Config::default()
        };
        Self::from_config(&cfg)
    }

    fn slot(&self, ds: Dataset) -> &Slot {
        match ds {
            Dataset::Production => &self.production,
            Dataset::Productivity => &self.productivity,
            Dataset::ActionItems => &self.action_items,
        }
    }

    fn slot_mut(&mut self, ds: Dataset) -> &mut Slot {
        match ds {
            Dataset::Production => &mut self.production,
            Dataset::Productivity => &mut self.productivity,
            Dataset::ActionItems => &mut self.action_items,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn table(&self, ds: Dataset) -> &RecordTable {
        &self.slot(ds).table
    }

    pub fn file_name(&self, ds: Dataset) -> &str {
        &self.slot(ds).file
    }

    pub fn path_for(&self, ds: Dataset) -> PathBuf {
        self.data_dir.join(&self.slot(ds).file)
    }

    /// Write the dataset to its file, overwriting it.
    pub fn save(&self, ds: Dataset) -> Notice {
        let file = self.file_name(ds).to_string();
        let path = self.path_for(ds);
        let result = fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("creating data directory {}", self.data_dir.display()))
            .and_then(|_| store::save(self.table(ds), &path));
        match result {
            Ok(()) => {
                info!(dataset = %ds, path = %path.display(), "dataset saved");
                Notice::success("save", ds.as_str(), format!("Data saved as {}", file))
                    .with_detail("file", file)
                    .with_detail("rows", self.table(ds).row_count())
            }
            Err(e) => {
                error!(dataset = %ds, path = %path.display(), "save failed: {:#}", e);
                Notice::error("save", ds.as_str(), format!("Failed to save {}: {:#}", file, e))
                    .with_detail("file", file)
            }
        }
    }

    /// Replace the dataset with the file's contents.
    ///
    /// A missing file substitutes an empty table; any other failure leaves the
    /// in-memory table untouched.
    pub fn load(&mut self, ds: Dataset) -> Notice {
        let file = self.file_name(ds).to_string();
        let path = self.path_for(ds);
        match store::load(&path) {
            Ok(LoadOutcome::Loaded(table)) => {
                let rows = table.row_count();
                self.slot_mut(ds).table = table;
                Notice::success("load", ds.as_str(), format!("Data loaded from {}", file))
                    .with_detail("file", file)
                    .with_detail("rows", rows)
            }
            Ok(LoadOutcome::NotFound) => {
                warn!(dataset = %ds, path = %path.display(), "no saved data");
                self.slot_mut(ds).table = RecordTable::new();
                Notice::error("load", ds.as_str(), format!("No saved data found for {}", file))
                    .with_detail("file", file)
                    .with_detail("not_found", true)
            }
            Err(e) => {
                error!(dataset = %ds, path = %path.display(), "load failed: {:#}", e);
                Notice::error("load", ds.as_str(), format!("Failed to load {}: {:#}", file, e))
                    .with_detail("file", file)
            }
        }
    }

    /// Load only if the file exists; the seeded table is kept otherwise.
    /// Returns `None` when there was nothing to load.
    pub fn load_if_saved(&mut self, ds: Dataset) -> Option<Notice> {
        if self.path_for(ds).exists() {
            Some(self.load(ds))
        } else {
            None
        }
    }

    /// [`load_if_saved`](Self::load_if_saved) for every dataset, in [`Dataset::ALL`] order.
    pub fn load_saved(&mut self) -> Vec<Notice> {
        Dataset::ALL
            .into_iter()
            .filter_map(|ds| self.load_if_saved(ds))
            .collect()
    }

    /// Append one record in memory. Nothing is persisted until [`save`](Self::save).
    pub fn append(&mut self, ds: Dataset, record: Record) -> Notice {
        let slot = self.slot_mut(ds);
        slot.table.append(record);
        let rows = slot.table.row_count();
        info!(dataset = %ds, rows, "record appended");
        Notice::success("append", ds.as_str(), "Record added").with_detail("rows", rows)
    }

    /// Submit the productivity-improvement form.
    pub fn add_improvement(&mut self, entry: &ProductivityEntry) -> Notice {
        let notice = self.append(Dataset::Productivity, entry.to_record());
        Notice {
            message: "New productivity improvement data added successfully!".to_string(),
            ..notice
        }
    }

    /// CSV text of the dataset, as offered for download.
    pub fn download_csv(&self, ds: Dataset) -> Result<String> {
        store::to_csv_string(self.table(ds))
            .with_context(|| format!("rendering {} as CSV", ds))
    }

    /// CSV files currently present in the data directory, sorted by path.
    pub fn saved_files(&self) -> Result<Vec<PathBuf>> {
        if !self.data_dir.is_dir() {
            return Ok(Vec::new());
        }
        let dir = Pattern::escape(&self.data_dir.display().to_string());
        let pattern = format!("{}/*.csv", dir);
        let mut files: Vec<PathBuf> = glob(&pattern)
            .with_context(|| format!("invalid glob pattern {}", pattern))?
            .filter_map(|entry| match entry {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("cannot read glob entry: {}", e);
                    None
                }
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn entry() -> ProductivityEntry {
        ProductivityEntry {
            training_needs: "Lockout/tagout (group)".into(),
            workflow_suggestion: "Stage materials, then start line".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            assigned_user: "Alex".into(),
            status: ActionStatus::Open,
        }
    }

    #[test]
    fn dataset_names_parse() {
        assert_eq!("production".parse::<Dataset>().unwrap(), Dataset::Production);
        assert_eq!("action_items".parse::<Dataset>().unwrap(), Dataset::ActionItems);
        assert_eq!("Action-Items".parse::<Dataset>().unwrap(), Dataset::ActionItems);
        assert!("sales".parse::<Dataset>().is_err());
        for ds in Dataset::ALL {
            assert_eq!(ds.as_str().parse::<Dataset>().unwrap(), ds);
        }
    }

    #[test]
    fn save_and_load_use_fixed_file_names() -> Result<()> {
        let dir = tempdir()?;
        let mut dash = Dashboard::new(dir.path());
        dash.add_improvement(&entry());

        let notice = dash.save(Dataset::Productivity);
        assert!(notice.is_success());
        assert_eq!(notice.message, "Data saved as productivity_data.csv");
        assert!(dir.path().join("productivity_data.csv").is_file());

        let mut fresh = Dashboard::new(dir.path());
        let notice = fresh.load(Dataset::Productivity);
        assert!(notice.is_success());
        assert_eq!(notice.message, "Data loaded from productivity_data.csv");
        assert_eq!(fresh.table(Dataset::Productivity).row_count(), 1);
        assert_eq!(
            fresh.table(Dataset::Productivity).get(0, "Due Date"),
            Some(&Value::Str("2024-10-01".into()))
        );
        Ok(())
    }

    #[test]
    fn load_missing_substitutes_empty_table() -> Result<()> {
        let dir = tempdir()?;
        let mut dash = Dashboard::new(dir.path());
        dash.append(Dataset::ActionItems, Record::new().with("Task", "x"));

        let notice = dash.load(Dataset::ActionItems);
        assert!(!notice.is_success());
        assert_eq!(notice.message, "No saved data found for action_items.csv");
        assert!(dash.table(Dataset::ActionItems).is_empty());
        Ok(())
    }

    #[test]
    fn failed_load_keeps_table() -> Result<()> {
        let dir = tempdir()?;
        let mut dash = Dashboard::new(dir.path());
        dash.append(Dataset::Production, Record::new().with("Line", "A"));
        fs::write(dir.path().join("production_data.csv"), b"Line\n\xff\n")?;

        let notice = dash.load(Dataset::Production);
        assert!(!notice.is_success());
        assert!(notice.message.starts_with("Failed to load production_data.csv"));
        assert_eq!(dash.table(Dataset::Production).row_count(), 1);
        Ok(())
    }

    #[test]
    fn failed_save_reports_error() -> Result<()> {
        let dir = tempdir()?;
        // a regular file where the data directory should be
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a dir")?;
        let dash = Dashboard::new(&blocker);

        let notice = dash.save(Dataset::Production);
        assert!(!notice.is_success());
        Ok(())
    }

    #[test]
    fn append_is_memory_only() -> Result<()> {
        let dir = tempdir()?;
        let mut dash = Dashboard::new(dir.path());
        let notice = dash.add_improvement(&entry());
        assert_eq!(
            notice.message,
            "New productivity improvement data added successfully!"
        );
        assert_eq!(dash.table(Dataset::Productivity).row_count(), 1);
        assert!(dash.saved_files()?.is_empty());
        Ok(())
    }

    #[test]
    fn config_overrides_file_and_seeds_rows() -> Result<()> {
        let dir = tempdir()?;
        let yaml = format!(
            "data_dir: {}\ndatasets:\n  production:\n    file: prod.csv\n    columns: [Line, Output]\n    rows:\n      - [A, 10]\n",
            dir.path().display()
        );
        let cfg = Config::from_yaml(&yaml)?;
        let mut dash = Dashboard::from_config(&cfg);
        assert_eq!(dash.file_name(Dataset::Production), "prod.csv");
        assert_eq!(dash.table(Dataset::Production).row_count(), 1);

        assert!(dash.load_if_saved(Dataset::Production).is_none());
        assert_eq!(dash.table(Dataset::Production).row_count(), 1);

        dash.save(Dataset::Production);
        assert_eq!(dash.saved_files()?, vec![dir.path().join("prod.csv")]);
        assert!(dash.load_if_saved(Dataset::Production).is_some());
        Ok(())
    }

    #[test]
    fn load_saved_reports_unreadable_files() -> Result<()> {
        let dir = tempdir()?;
        let mut dash = Dashboard::new(dir.path());
        dash.append(Dataset::Production, Record::new().with("Line", "A"));
        dash.append(Dataset::ActionItems, Record::new().with("Task", "x"));
        dash.save(Dataset::ActionItems);
        fs::write(dir.path().join("production_data.csv"), b"Line\n\xff\n")?;

        let notices = dash.load_saved();
        assert_eq!(notices.len(), 2);
        assert!(!notices[0].is_success());
        assert_eq!(notices[0].dataset, "production");
        assert!(notices[0].message.starts_with("Failed to load production_data.csv"));
        assert!(notices[1].is_success());
        // the unreadable file did not replace the in-memory rows
        assert_eq!(dash.table(Dataset::Production).row_count(), 1);
        Ok(())
    }

    #[test]
    fn saved_files_handles_glob_characters_in_dir() -> Result<()> {
        let dir = tempdir()?;
        let data_dir = dir.path().join("run[1]");
        let mut dash = Dashboard::new(&data_dir);
        dash.append(Dataset::Production, Record::new().with("Line", "A"));
        assert!(dash.save(Dataset::Production).is_success());

        assert_eq!(dash.saved_files()?, vec![data_dir.join("production_data.csv")]);
        Ok(())
    }

    #[test]
    fn download_matches_saved_file() -> Result<()> {
        let dir = tempdir()?;
        let mut dash = Dashboard::new(dir.path());
        dash.append(Dataset::Production, Record::new().with("Line", "A, east").with("Output", 7));
        dash.save(Dataset::Production);
        assert_eq!(
            dash.download_csv(Dataset::Production)?,
            fs::read_to_string(dir.path().join("production_data.csv"))?
        );
        Ok(())
    }
}
