#![no_main]

use dragboard_core::engine::DragSource;
use dragboard_core::model::{ItemId, ListId, Location};
use dragboard_core::session::{Board, GestureEvent};
use libfuzzer_sys::fuzz_target;

fn list(byte: u8) -> ListId {
    ListId::ALL[usize::from(byte) % ListId::ALL.len()]
}

fn location(list_byte: u8, index_byte: u8) -> Location {
    Location::new(list(list_byte), usize::from(index_byte % 16))
}

fn destination(list_byte: u8, index_byte: u8) -> Option<Location> {
    // one in eight releases lands outside every list
    (list_byte % 8 != 7).then(|| location(list_byte, index_byte))
}

/// Four bytes per event: opcode, list, index, item number.
fn decode(chunk: &[u8], board: &Board) -> GestureEvent {
    let (op, a, b, c) = (chunk[0], chunk[1], chunk[2], chunk[3]);
    match op % 4 {
        0 => {
            let at = location(a, b);
            // Usually pick up what is really there; otherwise a stale id.
            let item_id = match board.registry().item_at(at) {
                Some(item) if c % 4 != 0 => item.id.clone(),
                _ => ItemId::numbered(u64::from(c % 24)),
            };
            GestureEvent::DragStart {
                source: DragSource::new(at, item_id),
            }
        }
        1 => GestureEvent::DragUpdate {
            source: location(c, 0),
            destination: destination(a, b),
        },
        2 => GestureEvent::Drop {
            source: location(c, 0),
            destination: destination(a, b),
        },
        _ => GestureEvent::ToggleSelection {
            item_id: ItemId::numbered(u64::from(c % 24)),
        },
    }
}

fuzz_target!(|data: &[u8]| {
    let mut board = Board::default();
    let total = board.registry().total_items();

    for chunk in data.chunks_exact(4) {
        let event = decode(chunk, &board);
        let is_drop = matches!(event, GestureEvent::Drop { .. });
        board.handle(event);

        assert_eq!(board.registry().total_items(), total, "item count drifted");
        board
            .registry()
            .check_integrity()
            .expect("registry lost integrity");
        if is_drop {
            assert!(board.selection().is_empty(), "selection survived a drop");
            assert!(!board.is_dragging(), "drag survived a drop");
        }
    }
});
