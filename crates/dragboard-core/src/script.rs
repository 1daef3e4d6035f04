//! Recorded gesture streams.
//!
//! A script is JSON lines, one [`GestureEvent`] per line. Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! # drag item-1 to the top of list-4
//! {"type":"drag-start","source":{"list":"list-1","index":1,"item_id":"item-1"}}
//! {"type":"drag-update","source":{"list":"list-1","index":1},"destination":{"list":"list-4","index":0}}
//! {"type":"drop","source":{"list":"list-1","index":1},"destination":{"list":"list-4","index":0}}
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::session::{Board, GestureEvent, Signal};

/// Parse a script from text.
///
/// # Errors
///
/// Returns an error naming the 1-based line of the first malformed event.
pub fn parse_script(input: &str) -> Result<Vec<GestureEvent>> {
    let mut events = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: GestureEvent = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid gesture event", idx + 1))?;
        events.push(event);
    }
    debug!(events = events.len(), "parsed gesture script");
    Ok(events)
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains a malformed event.
pub fn load_script(path: &Path) -> Result<Vec<GestureEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_script(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Render events back to script text.
///
/// # Errors
///
/// Returns an error if an event fails to serialize.
pub fn to_script(events: &[GestureEvent]) -> Result<String> {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}

/// One event and the signal the board answered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub event: GestureEvent,
    pub signal: Signal,
}

/// Feed every event to `board` in order.
pub fn replay(board: &mut Board, events: impl IntoIterator<Item = GestureEvent>) -> Vec<Step> {
    events
        .into_iter()
        .map(|event| {
            let signal = board.handle(event.clone());
            Step { event, signal }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_script, replay, to_script};
    use crate::model::{ItemId, ListId};
    use crate::session::{Board, GestureEvent, Signal};

    const MOVE_TO_FOURTH: &str = r#"
# drag item-1 to the top of list-4
{"type":"drag-start","source":{"list":"list-1","index":1,"item_id":"item-1"}}
{"type":"drag-update","source":{"list":"list-1","index":1},"destination":{"list":"list-4","index":0}}

{"type":"drop","source":{"list":"list-1","index":1},"destination":{"list":"list-4","index":0}}
"#;

    #[test]
    fn skips_blanks_and_comments() {
        let events = parse_script(MOVE_TO_FOURTH).unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], GestureEvent::DragStart { .. }));
        assert!(matches!(events[2], GestureEvent::Drop { .. }));
    }

    #[test]
    fn reports_line_of_bad_event() {
        let err = parse_script("# ok\n{\"type\":\"hover\"}\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_unknown_list_slug() {
        let err = parse_script(
            r#"{"type":"toggle-selection","item_id":"item-1"}
{"type":"drop","source":{"list":"list-7","index":0},"destination":null}"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn replay_applies_events_in_order() {
        let events = parse_script(MOVE_TO_FOURTH).unwrap();
        let mut board = Board::default();
        let steps = replay(&mut board, events);

        assert_eq!(steps.len(), 3);
        assert!(matches!(
            &steps[2].signal,
            Signal::Settled(report) if report.outcome.is_committed()
        ));
        assert_eq!(board.registry().get(ListId::Fourth)[0].id, ItemId::numbered(1));
    }

    #[test]
    fn written_script_parses_back() {
        let events = parse_script(MOVE_TO_FOURTH).unwrap();
        let text = to_script(&events).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(parse_script(&text).unwrap(), events);
    }
}
