//! End-to-end board behavior driven through gesture events only.

use dragboard_core::engine::{CommitOutcome, DragSource};
use dragboard_core::model::{Item, ItemId, ListId, Location};
use dragboard_core::policy::{GroupValidation, Rejection, ValidationPolicy};
use dragboard_core::registry::ListRegistry;
use dragboard_core::script::{parse_script, replay};
use dragboard_core::session::{AbortReason, Board, DropOutcome, GestureEvent, Signal};

fn numbers(board: &Board, list: ListId) -> Vec<u64> {
    board.registry().ids(list).map(ItemId::number).collect()
}

fn start(board: &mut Board, list: ListId, index: usize, n: u64) -> Signal {
    board.handle(GestureEvent::DragStart {
        source: DragSource::new(Location::new(list, index), ItemId::numbered(n)),
    })
}

fn update(board: &mut Board, from: Location, to: Option<Location>) -> Signal {
    board.handle(GestureEvent::DragUpdate {
        source: from,
        destination: to,
    })
}

fn drop_at(board: &mut Board, from: Location, to: Option<Location>) -> DropOutcome {
    match board.handle(GestureEvent::Drop {
        source: from,
        destination: to,
    }) {
        Signal::Settled(report) => report.outcome,
        other => panic!("drop did not settle: {other:?}"),
    }
}

fn toggle(board: &mut Board, n: u64) {
    let signal = board.handle(GestureEvent::ToggleSelection {
        item_id: ItemId::numbered(n),
    });
    assert!(matches!(signal, Signal::SelectionChanged { .. }));
}

#[test]
fn fresh_board_layout() {
    let board = Board::default();
    assert_eq!(numbers(&board, ListId::First), vec![0, 1, 2, 3, 4]);
    assert_eq!(numbers(&board, ListId::Second), vec![5, 6, 7, 8, 9]);
    assert!(board.registry().get(ListId::Third).is_empty());
    assert!(board.registry().get(ListId::Fourth).is_empty());
    assert_eq!(board.registry().get(ListId::First)[3].content, "item 3");

    let snapshot = board.snapshot();
    let titles: Vec<&str> = snapshot.lists.iter().map(|view| view.title).collect();
    assert_eq!(titles, vec!["Column 1", "Column 2", "Column 3", "Column 4"]);
}

#[test]
fn group_drop_lands_as_one_block_in_selection_order() {
    let mut board = Board::default();
    toggle(&mut board, 1);
    toggle(&mut board, 3);

    let from = Location::new(ListId::First, 1);
    let to = Some(Location::new(ListId::Second, 0));
    start(&mut board, ListId::First, 1, 1);
    let signal = update(&mut board, from, to);
    assert_eq!(
        signal,
        Signal::Highlight {
            invalid_item_id: None,
            rejection: None
        }
    );

    let outcome = drop_at(&mut board, from, to);
    assert!(outcome.is_committed());
    assert_eq!(numbers(&board, ListId::First), vec![0, 2, 4]);
    assert_eq!(numbers(&board, ListId::Second), vec![1, 3, 5, 6, 7, 8, 9]);
    assert!(board.selection().is_empty());
}

#[test]
fn abandoned_drag_leaves_board_untouched() {
    let mut board = Board::default();
    toggle(&mut board, 0);
    toggle(&mut board, 7);
    let before = board.registry().clone();

    let from = Location::new(ListId::Second, 2);
    start(&mut board, ListId::Second, 2, 7);
    update(&mut board, from, Some(Location::new(ListId::Fourth, 0)));
    update(&mut board, from, None);
    let outcome = drop_at(&mut board, from, None);

    assert_eq!(
        outcome,
        DropOutcome::Aborted {
            abort: AbortReason::NoDestination
        }
    );
    assert_eq!(board.registry(), &before);
    assert!(board.selection().is_empty());
}

#[test]
fn banned_pair_is_highlighted_then_rejected() {
    let mut board = Board::default();
    let before = board.registry().clone();
    let from = Location::new(ListId::First, 4);
    let to = Some(Location::new(ListId::Third, 0));

    start(&mut board, ListId::First, 4, 4);
    let signal = update(&mut board, from, to);
    assert_eq!(
        signal,
        Signal::Highlight {
            invalid_item_id: Some(ItemId::numbered(4)),
            rejection: Some(Rejection::ListPairBan {
                from: ListId::First,
                to: ListId::Third
            }),
        }
    );

    let outcome = drop_at(&mut board, from, to);
    assert!(!outcome.is_committed());
    assert_eq!(board.registry(), &before);
    assert_eq!(board.highlighted(), None);
}

#[test]
fn second_list_may_feed_the_third() {
    let mut board = Board::default();
    let from = Location::new(ListId::Second, 0);
    let to = Some(Location::new(ListId::Third, 0));
    start(&mut board, ListId::Second, 0, 5);
    update(&mut board, from, to);
    assert!(drop_at(&mut board, from, to).is_committed());
    assert_eq!(numbers(&board, ListId::Third), vec![5]);
}

#[test]
fn even_onto_even_rejected_but_append_allowed() {
    let mut board = Board::default();
    let from = Location::new(ListId::First, 2);

    // item-2 over item-6.
    start(&mut board, ListId::First, 2, 2);
    let signal = update(&mut board, from, Some(Location::new(ListId::Second, 1)));
    assert!(matches!(
        signal,
        Signal::Highlight {
            rejection: Some(Rejection::ParityClash { .. }),
            ..
        }
    ));

    // Same pair, past the end of list-2.
    let end = Some(Location::new(ListId::Second, 5));
    update(&mut board, from, end);
    assert_eq!(board.highlighted(), None);
    let outcome = drop_at(&mut board, from, end);
    assert_eq!(
        outcome,
        DropOutcome::Committed {
            commit: CommitOutcome::Moved {
                item: ItemId::numbered(2),
                from: Location::new(ListId::First, 2),
                to: Location::new(ListId::Second, 5),
            }
        }
    );
}

#[test]
fn reorder_within_a_list() {
    let mut board = Board::default();
    let from = Location::new(ListId::Second, 4);
    let to = Some(Location::new(ListId::Second, 0));
    start(&mut board, ListId::Second, 4, 9);
    update(&mut board, from, to);
    assert!(drop_at(&mut board, from, to).is_committed());
    assert_eq!(numbers(&board, ListId::Second), vec![9, 5, 6, 7, 8]);
}

#[test]
fn same_slot_drop_is_a_no_op_commit() {
    let mut board = Board::default();
    let before = board.registry().clone();
    // Odd item-3: an even item would clash with itself.
    let at = Location::new(ListId::First, 3);
    start(&mut board, ListId::First, 3, 3);
    update(&mut board, at, Some(at));
    assert!(drop_at(&mut board, at, Some(at)).is_committed());
    assert_eq!(board.registry(), &before);
}

#[test]
fn per_item_validation_is_opt_in() {
    // item-0 would be banned moving list-1 -> list-3; the anchor item-5 is not.
    let registry = ListRegistry::seeded(5);

    let mut anchor_only = Board::with_registry(
        registry.clone(),
        ValidationPolicy::default(),
        GroupValidation::AnchorOnly,
    );
    let mut per_item =
        Board::with_registry(registry, ValidationPolicy::default(), GroupValidation::PerItem);

    let from = Location::new(ListId::Second, 0);
    let to = Some(Location::new(ListId::Third, 0));
    for board in [&mut anchor_only, &mut per_item] {
        toggle(board, 5);
        toggle(board, 0);
        start(board, ListId::Second, 0, 5);
        update(board, from, to);
    }

    assert!(drop_at(&mut anchor_only, from, to).is_committed());
    assert_eq!(numbers(&anchor_only, ListId::Third), vec![5, 0]);

    assert_eq!(
        drop_at(&mut per_item, from, to),
        DropOutcome::Aborted {
            abort: AbortReason::Rejected {
                rejection: Rejection::ListPairBan {
                    from: ListId::First,
                    to: ListId::Third
                }
            }
        }
    );
    assert!(per_item.registry().get(ListId::Third).is_empty());
}

#[test]
fn custom_registry_and_policy() {
    let registry = ListRegistry::from_lists([
        (ListId::Third, vec![Item::numbered(20), Item::numbered(21)]),
        (ListId::Fourth, vec![Item::numbered(22)]),
    ])
    .unwrap();
    let policy = ValidationPolicy::new(vec![(ListId::Fourth, ListId::Third)], false);
    let mut board = Board::with_registry(registry, policy, GroupValidation::AnchorOnly);

    let from = Location::new(ListId::Fourth, 0);
    let to = Some(Location::new(ListId::Third, 0));
    start(&mut board, ListId::Fourth, 0, 22);
    update(&mut board, from, to);
    assert_eq!(board.highlighted(), Some(&ItemId::numbered(22)));
    assert!(!drop_at(&mut board, from, to).is_committed());
}

#[test]
fn scripted_session() {
    let script = r#"
# select two items, then move them behind item-5
{"type":"toggle-selection","item_id":"item-1"}
{"type":"toggle-selection","item_id":"item-3"}
{"type":"drag-start","source":{"list":"list-1","index":1,"item_id":"item-1"}}
{"type":"drag-update","source":{"list":"list-1","index":1},"destination":{"list":"list-2","index":1}}
{"type":"drop","source":{"list":"list-1","index":1},"destination":{"list":"list-2","index":1}}
"#;
    let mut board = Board::default();
    let steps = replay(&mut board, parse_script(script).unwrap());
    assert_eq!(steps.len(), 5);
    assert_eq!(numbers(&board, ListId::Second), vec![5, 1, 3, 6, 7, 8, 9]);

    let json = serde_json::to_value(&steps[4].signal).unwrap();
    assert_eq!(json["signal"], "settled");
    assert_eq!(json["outcome"]["status"], "committed");
    assert_eq!(json["outcome"]["commit"]["kind"], "group-moved");
    assert_eq!(json["snapshot"]["selection"], serde_json::json!([]));
}
