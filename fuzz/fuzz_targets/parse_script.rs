#![no_main]

use dragboard_core::script::{parse_script, to_script};
use dragboard_core::session::Board;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(events) = parse_script(text) else {
        return;
    };

    // Whatever parses must survive a rewrite and a replay.
    let rewritten = to_script(&events).expect("parsed events serialize");
    assert_eq!(parse_script(&rewritten).expect("rewritten script parses"), events);

    let mut board = Board::default();
    let before = board.registry().total_items();
    for event in events {
        board.handle(event);
    }
    assert_eq!(board.registry().total_items(), before);
});
