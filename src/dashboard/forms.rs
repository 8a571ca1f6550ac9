use crate::table::Record;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::{fmt, str::FromStr};

pub const COL_TRAINING_NEEDS: &str = "Training Needs";
pub const COL_WORKFLOW_CHANGES: &str = "Suggested Workflow Changes";
pub const COL_DUE_DATE: &str = "Due Date";
pub const COL_ASSIGNED_USER: &str = "Assigned User";
pub const COL_STATUS: &str = "Status";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActionStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Open => "Open",
            ActionStatus::InProgress => "In Progress",
            ActionStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "open" => Ok(ActionStatus::Open),
            "inprogress" => Ok(ActionStatus::InProgress),
            "completed" => Ok(ActionStatus::Completed),
            _ => Err(anyhow!(
                "unknown status `{}` (expected Open, In Progress or Completed)",
                s
            )),
        }
    }
}

/// One submission of the productivity-improvement form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductivityEntry {
    pub training_needs: String,
    pub workflow_suggestion: String,
    pub due_date: NaiveDate,
    pub assigned_user: String,
    pub status: ActionStatus,
}

impl ProductivityEntry {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with(COL_TRAINING_NEEDS, self.training_needs.as_str())
            .with(COL_WORKFLOW_CHANGES, self.workflow_suggestion.as_str())
            .with(COL_DUE_DATE, self.due_date)
            .with(COL_ASSIGNED_USER, self.assigned_user.as_str())
            .with(COL_STATUS, self.status.as_str())
    }
}
