use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use planthealth::{
    config::Config,
    dashboard::{ActionStatus, Dashboard, Dataset, ProductivityEntry},
    display,
    notice::{notice_json, Notice},
    table::{column_kinds, Record, RecordTable, Value},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Production plant health check and productivity improvement datasets.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// YAML configuration (defaults to ./planthealth.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the dataset CSV files; overrides `data_dir` from the config
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print notices and tables as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a dataset (seeded from config unless --load)
    Show {
        dataset: Dataset,
        #[arg(long)]
        load: bool,
    },
    /// List each column with the kind of values it holds
    Describe {
        dataset: Dataset,
        #[arg(long)]
        load: bool,
    },
    /// Write a dataset to its CSV file
    Save { dataset: Dataset },
    /// Load a dataset from its CSV file and show it
    Load { dataset: Dataset },
    /// Append one record given as a JSON object
    Append {
        dataset: Dataset,
        #[arg(long)]
        record: String,
        /// Persist after appending
        #[arg(long)]
        save: bool,
    },
    /// Add a productivity improvement (training needs / workflow suggestion)
    AddImprovement {
        #[arg(long, default_value = "")]
        training_needs: String,
        #[arg(long, default_value = "")]
        workflow: String,
        /// YYYY-MM-DD
        #[arg(long)]
        due_date: NaiveDate,
        #[arg(long, default_value = "")]
        assigned_user: String,
        #[arg(long, default_value = "Open")]
        status: ActionStatus,
        /// Persist after adding
        #[arg(long)]
        save: bool,
    },
    /// Print a dataset as CSV on stdout
    Export {
        dataset: Dataset,
        #[arg(long)]
        load: bool,
    },
    /// Monthly production trends
    Trends,
    /// Projected benefits and dataset sizes
    Report,
    /// Data directory and saved CSV files
    Status,
}

fn main() -> Result<()> {
    // logs go to stderr so stdout carries only tables / CSV
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        cfg.data_dir = dir.clone();
    }
    debug!(data_dir = %cfg.data_dir.display(), "configuration ready");

    let mut dash = Dashboard::from_config(&cfg);
    let out = Output { json: args.json };

    match args.command {
        Command::Show { dataset, load } => {
            if load {
                out.notice(&dash.load(dataset));
            }
            out.table(&dash, dataset);
        }
        Command::Describe { dataset, load } => {
            if load {
                out.notice(&dash.load(dataset));
            }
            let kinds = column_kinds(dash.table(dataset));
            if out.json {
                let obj: serde_json::Map<String, serde_json::Value> = kinds
                    .iter()
                    .map(|(c, k)| (c.clone(), serde_json::Value::from(k.as_str())))
                    .collect();
                println!("{}", serde_json::Value::Object(obj));
            } else {
                display::render_kinds(&kinds).printstd();
            }
        }
        Command::Save { dataset } => {
            out.notice(&dash.save(dataset));
        }
        Command::Load { dataset } => {
            let notice = dash.load(dataset);
            out.notice(&notice);
            if notice.is_success() {
                out.table(&dash, dataset);
            }
        }
        Command::Append {
            dataset,
            record,
            save,
        } => {
            let record = parse_record(&record)?;
            if let Some(n) = dash.load_if_saved(dataset) {
                out.notice(&n);
            }
            out.notice(&dash.append(dataset, record));
            if save {
                out.notice(&dash.save(dataset));
            }
            out.table(&dash, dataset);
        }
        Command::AddImprovement {
            training_needs,
            workflow,
            due_date,
            assigned_user,
            status,
            save,
        } => {
            let entry = ProductivityEntry {
                training_needs,
                workflow_suggestion: workflow,
                due_date,
                assigned_user,
                status,
            };
            if let Some(n) = dash.load_if_saved(Dataset::Productivity) {
                out.notice(&n);
            }
            out.notice(&dash.add_improvement(&entry));
            if save {
                out.notice(&dash.save(Dataset::Productivity));
            }
            out.table(&dash, Dataset::Productivity);
        }
        Command::Export { dataset, load } => {
            if load {
                out.notice(&dash.load(dataset));
            }
            print!("{}", dash.download_csv(dataset)?);
        }
        Command::Trends => {
            let table = cfg.trends.to_table();
            if cfg.trends.is_empty() {
                info!("no monthly trends configured");
            }
            out.plain_table("Monthly Production Trends", &table);
            let pairs = cfg.trends.energy_vs_production();
            if !out.json && !pairs.is_empty() {
                println!("### Energy Consumption vs Production Output");
                for (energy, output) in pairs {
                    println!("  {:>12.1} kWh  {:>10.1}", energy, output);
                }
            }
        }
        Command::Report => {
            println!("### Reports & Analytics");
            println!("Projected Benefits for the Current Month:");
            if cfg.benefits.is_empty() {
                println!("  (none configured)");
            }
            for line in &cfg.benefits {
                println!("  - {}", line);
            }
            for notice in dash.load_saved() {
                if !notice.is_success() {
                    out.notice(&notice);
                }
            }
            for ds in Dataset::ALL {
                println!(
                    "{:<28} {:>6} rows  ({})",
                    ds.title(),
                    dash.table(ds).row_count(),
                    dash.file_name(ds)
                );
            }
        }
        Command::Status => {
            println!("data dir: {}", dash.data_dir().display());
            let files = dash.saved_files()?;
            if files.is_empty() {
                println!("no saved CSV files");
            }
            for f in files {
                println!("  {:<40} {:>10} bytes", f.display(), size_label(&f));
            }
        }
    }
    Ok(())
}

/// Parse `--record` JSON into a record, keeping the object's key order.
fn parse_record(text: &str) -> Result<Record> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("--record must be a JSON object")?;
    let Some(obj) = value.as_object() else {
        bail!("--record must be a JSON object, got {}", value);
    };
    let mut record = Record::new();
    for (k, v) in obj {
        record.set(k.as_str(), Value::from_json(v));
    }
    Ok(record)
}

/// File size for the status listing; `?` when the file cannot be stat'ed.
fn size_label(path: &Path) -> String {
    match std::fs::metadata(path) {
        Ok(m) => m.len().to_string(),
        Err(e) => {
            warn!(path = %path.display(), "cannot stat: {}", e);
            "?".to_string()
        }
    }
}

struct Output {
    json: bool,
}

impl Output {
    /// Notices go to stderr, like the dashboard's sidebar messages.
    fn notice(&self, notice: &Notice) {
        if self.json {
            eprintln!("{}", notice_json(notice));
        } else {
            eprintln!("{}", notice);
        }
    }

    fn table(&self, dash: &Dashboard, ds: Dataset) {
        self.plain_table(ds.title(), dash.table(ds));
    }

    fn plain_table(&self, title: &str, table: &RecordTable) {
        if self.json {
            println!("{}", table.to_json());
            return;
        }
        println!("### {}", title);
        if table.columns().is_empty() {
            println!("(no data)");
        } else {
            display::render_table(table).printstd();
        }
    }
}
