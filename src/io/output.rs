use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{DecisionRecord, MemberProfile, TranscriptIndex, Week};

/// Full analysis document written by `export`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisExport<'a> {
    pub total_weeks: usize,
    pub weeks: &'a [Week],
    pub overall_profile: MemberProfile,
    pub overall_decisions: Vec<DecisionRecord>,
    /// RFC 3339 timestamp
    pub generated_at: String,
}

impl<'a> AnalysisExport<'a> {
    pub fn new(
        weeks: &'a [Week],
        overall_profile: MemberProfile,
        overall_decisions: Vec<DecisionRecord>,
    ) -> Self {
        Self {
            total_weeks: weeks.len(),
            weeks,
            overall_profile,
            overall_decisions,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Summary statistics over a segmented transcript
#[derive(Debug, Clone)]
pub struct TranscriptStatistics {
    pub total_weeks: usize,
    pub total_messages: usize,
    /// First and last week dates, in transcript order
    pub date_range: Option<(String, String)>,
    /// Days between the first and last week dates, when both are real dates
    pub span_days: Option<i64>,
    /// Up to three (week number, message count) pairs, busiest first
    pub most_active: Vec<(u32, usize)>,
    /// Unique senders in order of first appearance
    pub participants: Vec<String>,
}

impl TranscriptStatistics {
    pub fn from_index(index: &TranscriptIndex) -> Self {
        let weeks = index.weeks();

        let date_range = weeks
            .first()
            .zip(weeks.last())
            .map(|(first, last)| (first.date.clone(), last.date.clone()));

        let span_days = weeks
            .first()
            .and_then(Week::parsed_date)
            .zip(weeks.last().and_then(Week::parsed_date))
            .map(|(first, last)| (last - first).num_days());

        let mut most_active: Vec<(u32, usize)> = weeks
            .iter()
            .map(|w| (w.week_number, w.message_count()))
            .collect();
        most_active.sort_by(|a, b| b.1.cmp(&a.1));
        most_active.truncate(3);

        let mut participants: Vec<String> = Vec::new();
        for sender in weeks.iter().flat_map(Week::participants) {
            if !participants.iter().any(|p| p == sender) {
                participants.push(sender.to_string());
            }
        }

        Self {
            total_weeks: weeks.len(),
            total_messages: index.total_messages(),
            date_range,
            span_days,
            most_active,
            participants,
        }
    }

    /// Render as a plain-text report
    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str("Conversation Analysis\n");
        output.push_str("=====================\n");
        output.push_str(&format!("Total weeks: {}\n", self.total_weeks));
        output.push_str(&format!("Total messages: {}\n", self.total_messages));

        if let Some((first, last)) = &self.date_range {
            output.push_str(&format!("Date range: {} to {}", first, last));
            if let Some(days) = self.span_days {
                output.push_str(&format!(" ({} days)", days));
            }
            output.push('\n');
        }

        if !self.most_active.is_empty() {
            output.push_str("\nMost active weeks:\n");
            for (week_number, count) in &self.most_active {
                output.push_str(&format!("  Week {}: {} messages\n", week_number, count));
            }
        }

        if !self.participants.is_empty() {
            output.push_str(&format!("\nParticipants: {}\n", self.participants.join(", ")));
        }

        output
    }
}
