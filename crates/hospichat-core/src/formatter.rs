//! Turns a raw assistant reply into a structured `Message`.
//!
//! A reply line containing [`BULLET_MARKER`] becomes a list item; every other
//! line is prose. Blank items are kept as they are.

use crate::message::Message;

/// Marks a reply line as a list item
pub const BULLET_MARKER: char = '*';

/// Split a raw reply into prose and bullet items.
///
/// Only the first marker on a line is removed, and the item is trimmed. Prose
/// lines are joined with single spaces and the result is trimmed once at the
/// end. Total over all inputs.
pub fn format_reply(raw: &str) -> Message {
    let mut items: Vec<String> = Vec::new();
    let mut prose = String::new();

    for line in raw.split('\n') {
        if line.contains(BULLET_MARKER) {
            items.push(line.replacen(BULLET_MARKER, "", 1).trim().to_string());
        } else {
            prose.push_str(line);
            prose.push(' ');
        }
    }

    Message::assistant(
        prose.trim(),
        if items.is_empty() { None } else { Some(items) },
    )
}
