//! Purpose: Outcome messages for dashboard actions (save, load, append).
//! Exports: `Notice`, `NoticeKind`, `notice_json`.
//! Role: Every `Dashboard` action returns one; the CLI prints it on stderr.
//! Invariants: Notices are non-fatal; an error notice never aborts the host.
//! Invariants: Notices never alter stdout payloads (tables, CSV).
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub time: String,
    pub action: String,
    pub dataset: String,
    pub message: String,
    pub details: Map<String, Value>,
}

impl Notice {
    pub fn success(action: &str, dataset: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, action, dataset, message)
    }

    pub fn error(action: &str, dataset: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, action, dataset, message)
    }

    fn new(kind: NoticeKind, action: &str, dataset: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            action: action.to_string(),
            dataset: dataset.to_string(),
            message: message.into(),
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind.as_str()));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("action".to_string(), json!(notice.action));
    inner.insert("dataset".to_string(), json!(notice.dataset));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

#[cfg(test)]
mod tests {
    use super::{notice_json, Notice, NoticeKind};

    #[test]
    fn notice_json_has_required_fields() {
        let notice = Notice::error("load", "production", "No saved data found for production_data.csv")
            .with_detail("file", "production_data.csv");

        let value = notice_json(&notice);
        let obj = value
            .get("notice")
            .and_then(|v| v.as_object())
            .expect("notice object");

        assert_eq!(obj.get("kind").and_then(|v| v.as_str()), Some("error"));
        assert_eq!(obj.get("action").and_then(|v| v.as_str()), Some("load"));
        assert_eq!(obj.get("dataset").and_then(|v| v.as_str()), Some("production"));
        assert_eq!(
            obj.get("message").and_then(|v| v.as_str()),
            Some("No saved data found for production_data.csv")
        );
        assert_eq!(
            obj.get("details")
                .and_then(|v| v.get("file"))
                .and_then(|v| v.as_str()),
            Some("production_data.csv")
        );
        assert!(obj.get("time").and_then(|v| v.as_str()).is_some());
    }

    #[test]
    fn display_is_kind_and_message() {
        let notice = Notice::success("save", "production", "Data saved as production_data.csv");
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.to_string(), "[success] Data saved as production_data.csv");
    }
}
