use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: Uuid,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl ResultEntry {
    /// `(HH:MM:SS) {result}`, as the results panel lists it.
    pub fn display_line(&self) -> String {
        format!("({}) {}", self.timestamp.format("%H:%M:%S"), self.result)
    }
}

/// Append-only list of finished battles for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecorder {
    entries: Vec<ResultEntry>,
}

impl ResultRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &str) -> &ResultEntry {
        let entry = ResultEntry {
            id: Uuid::new_v4(),
            result: result.to_string(),
            timestamp: Utc::now(),
        };
        info!(id = %entry.id, result, "result recorded");
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
