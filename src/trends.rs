use crate::table::{Record, RecordTable};
use anyhow::{bail, Result};
use serde::Deserialize;

/// Monthly series behind the trend and visual-analysis views.
/// Every non-empty series must line up with `months`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonthlyTrends {
    pub months: Vec<String>,
    pub production: Vec<f64>,
    /// Energy consumption in kWh.
    pub energy: Vec<f64>,
    pub defects: Vec<u32>,
    pub safety_incidents: Vec<u32>,
}

impl MonthlyTrends {
    pub fn validate(&self) -> Result<()> {
        let n = self.months.len();
        let lens = [
            ("production", self.production.len()),
            ("energy", self.energy.len()),
            ("defects", self.defects.len()),
            ("safety_incidents", self.safety_incidents.len()),
        ];
        for (name, len) in lens {
            if len != 0 && len != n {
                bail!(
                    "trends.{} has {} values but {} months are configured",
                    name,
                    len,
                    n
                );
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// One row per month; series that are not configured are left out.
    pub fn to_table(&self) -> RecordTable {
        let mut table = RecordTable::with_columns(["Month"]);
        for (i, month) in self.months.iter().enumerate() {
            let mut rec = Record::new().with("Month", month.as_str());
            if let Some(v) = self.production.get(i) {
                rec.set("Production Output", *v);
            }
            if let Some(v) = self.energy.get(i) {
                rec.set("Energy Consumption (kWh)", *v);
            }
            if let Some(v) = self.defects.get(i) {
                rec.set("Defects", *v);
            }
            if let Some(v) = self.safety_incidents.get(i) {
                rec.set("Safety Incidents", *v);
            }
            table.append(rec);
        }
        table
    }

    /// `(energy, production)` pairs for the scatter view.
    pub fn energy_vs_production(&self) -> Vec<(f64, f64)> {
        self.energy
            .iter()
            .copied()
            .zip(self.production.iter().copied())
            .collect()
    }
}
