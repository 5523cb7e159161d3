use std::fmt;

use serde::{Deserialize, Serialize};

/// The analytical query kinds backed by the model gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    /// Member profile as a JSON object
    Profile,
    /// Decisions as a JSON array
    Decisions,
    /// Narrative summary of one week
    WeekSummary,
    /// Narrative progress analysis over the whole transcript
    Progress,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Profile => "profile",
            QueryKind::Decisions => "decisions",
            QueryKind::WeekSummary => "week-summary",
            QueryKind::Progress => "progress",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
