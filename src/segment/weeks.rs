use std::num::ParseIntError;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, warn};

use super::parse_messages;
use crate::models::Week;

/// Week header marker: `/new/ --- WEEK <n> (<dd/mm/yy>) ---`
static WEEK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/new/ --- WEEK (\d+) \((\d{2}/\d{2}/\d{2})\) ---")
        .expect("week header pattern is valid")
});

#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("malformed week header {header:?}: {source}")]
    MalformedHeader {
        header: String,
        #[source]
        source: ParseIntError,
    },
}

/// Split a raw transcript into weeks, in header order.
///
/// Each week's content runs from the end of its header to the start of the
/// next header (or end of text) and is trimmed. Headers whose week number
/// cannot be represented are skipped; their text still bounds the previous
/// week.
pub fn segment_transcript(raw: &str) -> Vec<Week> {
    let headers: Vec<Captures<'_>> = WEEK_HEADER.captures_iter(raw).collect();
    let mut weeks = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let Some(header) = caps.get(0) else {
            continue;
        };
        let end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(raw.len());

        match build_week(caps, &raw[header.end()..end]) {
            Ok(week) => {
                debug!(
                    "Week {} ({}): {} messages",
                    week.week_number,
                    week.date,
                    week.messages.len()
                );
                weeks.push(week);
            }
            Err(e) => warn!("Skipping week header: {}", e),
        }
    }

    weeks
}

fn build_week(caps: &Captures<'_>, span: &str) -> Result<Week, SegmentError> {
    let week_number = caps[1]
        .parse::<u32>()
        .map_err(|source| SegmentError::MalformedHeader {
            header: caps[0].to_string(),
            source,
        })?;

    let content = span.trim().to_string();
    let messages = parse_messages(&content);

    Ok(Week {
        week_number,
        date: caps[2].to_string(),
        content,
        messages,
    })
}
