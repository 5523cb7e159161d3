use crate::models::Week;

/// Pick the text a query runs against.
///
/// A week that exists yields its content; a missing or absent week number
/// falls back to the full transcript so a query never gets an empty context.
pub fn select_context<'a>(weeks: &'a [Week], transcript: &'a str, week_number: Option<u32>) -> &'a str {
    week_number
        .and_then(|n| weeks.iter().find(|w| w.week_number == n))
        .map(|w| w.content.as_str())
        .unwrap_or(transcript)
}
