use crate::models::application::LoanApplication;
use crate::models::prediction::{FraudClass, Prediction};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHistoryEntry {
    pub id: String,
    pub analyzed_at: String,
    pub application: LoanApplication,
    pub prediction: Prediction,
    pub heuristic_score: u32,
}

impl AnalysisHistoryEntry {
    pub fn new(application: LoanApplication, prediction: Prediction, heuristic_score: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            analyzed_at: chrono::Utc::now().to_rfc3339(),
            application,
            prediction,
            heuristic_score,
        }
    }
}

/// One user's analyses, oldest first. Owned by the caller and threaded
/// through each handler; nothing here outlives the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    entries: VecDeque<AnalysisHistoryEntry>,
}

impl SessionHistory {
    /// Appends an entry, dropping the oldest ones beyond `limit`.
    pub fn push(&mut self, entry: AnalysisHistoryEntry, limit: usize) {
        self.entries.push_back(entry);
        while self.entries.len() > limit.max(1) {
            self.entries.pop_front();
        }
    }

    /// Keeps only the newest `limit` entries.
    pub fn truncate(&mut self, limit: usize) {
        let excess = self.entries.len().saturating_sub(limit.max(1));
        self.entries.drain(..excess);
    }

    pub fn entries(&self) -> impl Iterator<Item = &AnalysisHistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn flagged_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.prediction.class == FraudClass::Fraud)
            .count()
    }

    pub fn to_vec(&self) -> Vec<AnalysisHistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub analyzed: usize,
    pub flagged: usize,
    /// Share of analysed applications flagged as fraud, in percent.
    pub flagged_share: f64,
}

impl SessionStatistics {
    pub fn from_history(history: &SessionHistory) -> Self {
        let analyzed = history.len();
        let flagged = history.flagged_count();
        let flagged_share = if analyzed == 0 {
            0.0
        } else {
            flagged as f64 / analyzed as f64 * 100.0
        };

        Self {
            analyzed,
            flagged,
            flagged_share,
        }
    }
}
