use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::Message;

/// Inline message marker: `[dd/mm/yy, HH:MM AM|PM]`
static MESSAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2}/\d{2}/\d{2}, \d{2}:\d{2} [AP]M)\]")
        .expect("message marker pattern is valid")
});

/// `" <sender>: <body>"` following a marker; the body may span lines
static SENDER_AND_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A ([^:]+): (.*)\z").expect("sender pattern is valid")
});

/// Extract the messages of one week's content, in source order.
///
/// A message body runs up to the next marker or end of content. Markers not
/// followed by `" sender: "` produce no message.
pub fn parse_messages(content: &str) -> Vec<Message> {
    let markers: Vec<_> = MESSAGE_MARKER.captures_iter(content).collect();
    let mut messages = Vec::with_capacity(markers.len());

    for (i, caps) in markers.iter().enumerate() {
        let Some(marker) = caps.get(0) else {
            continue;
        };
        let end = markers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(content.len());
        let rest = &content[marker.end()..end];

        match SENDER_AND_BODY.captures(rest) {
            Some(parts) => messages.push(Message {
                timestamp: caps[1].to_string(),
                sender: parts[1].trim().to_string(),
                content: parts[2].trim().to_string(),
            }),
            None => debug!("Marker [{}] has no sender, skipping", &caps[1]),
        }
    }

    messages
}
