//! Task

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Priority assigned when the caller leaves it blank
pub const DEFAULT_PRIORITY: &str = "medium";

/// Date format used for due dates, both on the wire and in form input
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier, allocated by the store
    pub id: u64,

    /// Task text
    pub text: String,

    /// Priority tag (free-form, defaults to "medium")
    pub priority: String,

    /// Category label, may be empty
    #[serde(default)]
    pub category: String,

    /// Optional due date without time-of-day
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "due_date_format"
    )]
    pub due_date: Option<NaiveDate>,

    /// Display position
    pub sort_order: usize,

    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with the given ID and display position
    pub fn new(
        id: u64,
        text: &str,
        priority: &str,
        category: &str,
        due_date: Option<NaiveDate>,
        sort_order: usize,
    ) -> Self {
        Self {
            id,
            text: text.to_string(),
            priority: normalize_priority(priority),
            category: category.to_string(),
            due_date,
            sort_order,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Replace the user-editable fields, leaving identity, position,
    /// completion and creation time alone
    pub fn apply_edit(
        &mut self,
        text: &str,
        priority: &str,
        category: &str,
        due_date: Option<NaiveDate>,
    ) {
        self.text = text.to_string();
        self.priority = normalize_priority(priority);
        self.category = category.to_string();
        self.due_date = due_date;
    }

    /// Flip the completion flag
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Parse a `YYYY-MM-DD` form value; blank or malformed input means no due date
    pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(input, DUE_DATE_FORMAT).ok()
    }
}

/// Blank priorities fall back to [`DEFAULT_PRIORITY`]
pub fn normalize_priority(priority: &str) -> String {
    if priority.trim().is_empty() {
        DEFAULT_PRIORITY.to_string()
    } else {
        priority.to_string()
    }
}

/// Serde adapter for `Option<NaiveDate>`.
///
/// Writes `YYYY-MM-DD`. Reads either that or a full RFC 3339 timestamp,
/// which older data files used for due dates; the date part is kept.
mod due_date_format {
    use super::DUE_DATE_FORMAT;
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DUE_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => {
                if let Ok(date) = NaiveDate::parse_from_str(&s, DUE_DATE_FORMAT) {
                    return Ok(Some(date));
                }
                DateTime::parse_from_rfc3339(&s)
                    .map(|ts| Some(ts.date_naive()))
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}
