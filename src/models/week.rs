use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::segment::segment_transcript;

/// Format of the date carried in a week header (dd/mm/yy)
pub const WEEK_DATE_FORMAT: &str = "%d/%m/%y";

/// A single timestamped line of dialogue inside a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Timestamp as written in the transcript, e.g. "01/01/24, 09:00 AM"
    pub timestamp: String,
    /// Sender name, trimmed
    pub sender: String,
    /// Message body, trimmed
    pub content: String,
}

/// One header-delimited segment of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    /// Week number captured from the header
    pub week_number: u32,
    /// Header date, kept verbatim (dd/mm/yy)
    pub date: String,
    /// Trimmed text between this header and the next one
    pub content: String,
    /// Messages found in `content`, in source order
    pub messages: Vec<Message>,
}

impl Week {
    /// Number of messages in this week
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Unique senders, in order of first appearance
    pub fn participants(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for message in &self.messages {
            if !seen.contains(&message.sender.as_str()) {
                seen.push(message.sender.as_str());
            }
        }
        seen
    }

    /// Header date as a calendar date, if it is a real one
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, WEEK_DATE_FORMAT).ok()
    }
}

/// The raw transcript together with its parsed week index.
///
/// Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct TranscriptIndex {
    raw: String,
    weeks: Vec<Week>,
}

impl TranscriptIndex {
    /// Segment `raw` and take ownership of it
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let weeks = segment_transcript(&raw);
        Self { raw, weeks }
    }

    /// The full transcript text
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// All weeks in transcript order
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// First week carrying `week_number`
    pub fn get_week(&self, week_number: u32) -> Option<&Week> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    /// Total number of messages across all weeks
    pub fn total_messages(&self) -> usize {
        self.weeks.iter().map(Week::message_count).sum()
    }
}
