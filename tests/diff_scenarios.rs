mod common;

use anyhow::Result;
use common::{file, moved, names, snapshot};
use dirsnap::diff::{Callbacks, DirEvent, EventLog, diff};
use dirsnap::snapshot::{Classification, Entry, FileKind, Snapshot};
use rstest::rstest;
use std::cell::RefCell;

/// Address of an entry, for identity checks across a merge.
fn addr(snapshot: &Snapshot, name: &str) -> Option<*const Entry> {
    snapshot.find(name).map(std::ptr::from_ref)
}

#[test]
fn test_rename_with_unchanged_sibling() -> Result<()> {
    // a stays, b is renamed to c. The lister marked `a` in both snapshots.
    let mut before = snapshot(&[("a", 1), ("b", 2)])?;
    let mut after = snapshot(&[("a", 1), ("c", 2)])?;
    before.mark_unchanged("a", 1);
    after.mark_unchanged("a", 1);
    let original = addr(&before, "a");
    let mut log = EventLog::new();

    let merged = diff(before, after, &mut log);

    assert_eq!(log.events(), [moved(("b", 2), ("c", 2))]);
    assert_eq!(merged.len(), 2);
    assert_eq!(addr(&merged, "a"), original);
    Ok(())
}

#[test]
fn test_rename_with_unchanged_sibling_left_out_of_after() -> Result<()> {
    let mut before = snapshot(&[("a", 1), ("b", 2)])?;
    before.mark_unchanged("a", 1);
    let after = snapshot(&[("c", 2)])?;
    let original = addr(&before, "a");
    let mut log = EventLog::new();

    let merged = diff(before, after, &mut log);

    assert_eq!(log.events(), [moved(("b", 2), ("c", 2))]);
    assert_eq!(names(&merged), ["c", "a"]);
    assert_eq!(addr(&merged, "a"), original);
    Ok(())
}

#[test]
fn test_rename_over_existing_file() -> Result<()> {
    // `mv a b` where b existed: the old b is gone, a now lives at b.
    let before = snapshot(&[("a", 1), ("b", 2)])?;
    let after = snapshot(&[("b", 1)])?;
    let mut log = EventLog::new();

    let merged = diff(before, after, &mut log);

    assert_eq!(
        log.events(),
        [DirEvent::Replaced(file("b", 2)), moved(("a", 1), ("b", 1))]
    );
    assert_eq!(merged.to_string(), "1:b");
    Ok(())
}

#[rstest]
#[case::remove_and_add(&[("a", 1)], &[("x", 9)], vec![
    DirEvent::Removed(file("a", 1)),
    DirEvent::Added(file("x", 9)),
])]
#[case::all_new(&[], &[("a", 1), ("b", 2)], vec![
    DirEvent::Added(file("a", 1)),
    DirEvent::Added(file("b", 2)),
])]
#[case::all_gone(&[("a", 1), ("b", 2)], &[], vec![
    DirEvent::Removed(file("a", 1)),
    DirEvent::Removed(file("b", 2)),
])]
#[case::swap(&[("a", 1), ("b", 2)], &[("a", 2), ("b", 1)], vec![
    DirEvent::Replaced(file("b", 2)),
    moved(("a", 1), ("b", 1)),
    DirEvent::Replaced(file("a", 1)),
    moved(("b", 2), ("a", 2)),
])]
#[case::move_then_overwrite_vacated_name(&[("b", 2), ("a", 1)], &[("c", 2), ("b", 1)], vec![
    moved(("b", 2), ("c", 2)),
    DirEvent::Replaced(file("b", 2)),
    moved(("a", 1), ("b", 1)),
])]
#[case::both_empty(&[], &[], vec![])]
fn test_event_sequences(
    #[case] before: &[(&str, u64)],
    #[case] after: &[(&str, u64)],
    #[case] expected: Vec<DirEvent>,
) -> Result<()> {
    let mut log = EventLog::new();

    let merged = diff(snapshot(before)?, snapshot(after)?, &mut log);

    assert_eq!(log.into_events(), expected);
    assert_eq!(merged.len(), after.len());
    Ok(())
}

#[test]
fn test_replaced_entry_is_not_also_removed() -> Result<()> {
    let before = snapshot(&[("a", 1), ("b", 2), ("z", 26)])?;
    let after = snapshot(&[("b", 1)])?;
    let mut log = EventLog::new();

    diff(before, after, &mut log);

    let removed: Vec<_> = log
        .events()
        .iter()
        .filter_map(|e| match e {
            DirEvent::Removed(info) => Some(info.inode),
            _ => None,
        })
        .collect();
    assert_eq!(removed, [26]);
    Ok(())
}

#[test]
fn test_merge_keeps_kind_and_clears_classification() -> Result<()> {
    let mut before = Snapshot::new();
    before.insert(Entry::new("d", 4, FileKind::Directory)?)?;
    before.insert(Entry::new("l", 5, FileKind::Symlink)?)?;
    before.mark_unchanged("d", 4);
    before.mark_unchanged("l", 5);

    let merged = diff(before, Snapshot::new(), &mut ());

    assert_eq!(merged.find("d").map(Entry::kind), Some(FileKind::Directory));
    assert_eq!(merged.find("l").map(Entry::kind), Some(FileKind::Symlink));
    assert!(merged.iter().all(|e| e.is(Classification::None)));
    Ok(())
}

#[test]
fn test_rediffing_merged_snapshot_is_quiet() -> Result<()> {
    let before = snapshot(&[("a", 1), ("b", 2)])?;
    let after = snapshot(&[("c", 2), ("d", 3)])?;
    let current = diff(before, after, &mut ());

    // Nothing changed on disk: the lister would mark everything.
    let again = Snapshot::new();
    let mut previous = current;
    for (name, inode) in [("c", 2), ("d", 3)] {
        assert!(previous.mark_unchanged(name, inode));
    }
    let mut log = EventLog::new();

    let merged = diff(previous, again, &mut log);

    assert!(log.is_empty());
    assert_eq!(names(&merged), ["c", "d"]);
    Ok(())
}

#[test]
fn test_callbacks_with_partial_handlers() -> Result<()> {
    let before = snapshot(&[("a", 1), ("b", 2), ("gone", 7)])?;
    let after = snapshot(&[("b", 1), ("new", 8)])?;
    let seen = RefCell::new(Vec::new());

    let mut callbacks = Callbacks::new()
        .on_replaced(|e| seen.borrow_mut().push(format!("replaced {e}")))
        .on_moved(|from, to| seen.borrow_mut().push(format!("moved {from} -> {to}")));
    diff(before, after, &mut callbacks);
    drop(callbacks);

    assert_eq!(seen.into_inner(), ["replaced 2:b", "moved 1:a -> 1:b"]);
    Ok(())
}

#[test]
fn test_callbacks_see_entries_once_per_event() -> Result<()> {
    let before = snapshot(&[("a", 1), ("b", 2)])?;
    let after = snapshot(&[("c", 3)])?;
    let removed = RefCell::new(Vec::new());
    let added = RefCell::new(Vec::new());

    let mut callbacks = Callbacks::new()
        .on_removed(|e| removed.borrow_mut().push(e.inode()))
        .on_added(|e| added.borrow_mut().push(e.inode()));
    diff(before, after, &mut callbacks);
    drop(callbacks);

    assert_eq!(removed.into_inner(), [1, 2]);
    assert_eq!(added.into_inner(), [3]);
    Ok(())
}

#[test]
fn test_empty_snapshot_destroy() {
    let merged = diff(Snapshot::new(), Snapshot::new(), &mut ());
    assert!(merged.is_empty());
    merged.destroy();
}
