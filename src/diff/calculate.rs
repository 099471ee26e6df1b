use tracing::{Level, debug, span};

use super::DiffSink;
use crate::snapshot::{Classification, Entry, Snapshot};

/// Event counts for one diff pass, used for logging.
#[derive(Debug, Default, Clone, Copy)]
struct DiffStats {
    /// Entries carried over from `before`.
    unchanged: usize,
    /// Added events.
    added: usize,
    /// Removed events.
    removed: usize,
    /// Moved events.
    moved: usize,
    /// Replaced events.
    replaced: usize,
}

/// Correlate two scans of one directory and report what changed.
///
/// Between two consecutive scans a file is:
///
/// - *unchanged*: same name, same inode. The lister marks these in `before`
///   (and leaves them out of `after`, or marks the fresh copy in `after`
///   too). They produce no events.
/// - *moved*: its inode reappears under a different name in `after`.
/// - *replaced*: its name is the destination of a move and it was not
///   unchanged, so the rename destroyed it.
/// - *removed*: in `before`, matched by nothing.
/// - *added*: in `after`, matched by nothing.
///
/// Moves are found first, in `before` order. For each source the first
/// `after` entry with the same inode that is not already a move target wins,
/// so with hard links only the first link in insertion order is paired.
/// When a move lands on a name that `before` still holds, the `replaced`
/// event for that name is emitted before the `moved` event. Removals are then
/// reported in `before` order and additions in `after` order. An entry that
/// was replaced is never reported as removed as well.
///
/// Once all events are out, unchanged entries of `before` are moved into
/// `after` without being copied, every classification in `after` is
/// cleared, and `before` is dropped. The returned snapshot is the one to
/// pass as `before` next time.
pub fn diff<S>(mut before: Snapshot, mut after: Snapshot, sink: &mut S) -> Snapshot
where
    S: DiffSink + ?Sized,
{
    let span = span!(
        Level::DEBUG,
        "snapshot_diff",
        before = before.len(),
        after = after.len()
    );
    let _guard = span.enter();

    let mut stats = DiffStats::default();

    pair_unchanged(&mut before, &mut after);
    detect_moves(&mut before, &mut after, sink, &mut stats);
    emit_residual(&before, &after, sink, &mut stats);
    let evict = after.iter().any(|e| e.is(Classification::Unchanged));
    stats.unchanged = merge_unchanged(&mut before, &mut after, evict);
    after.clear_classification();

    debug!(
        unchanged = stats.unchanged,
        added = stats.added,
        removed = stats.removed,
        moved = stats.moved,
        replaced = stats.replaced,
        "Snapshot diff complete"
    );

    after
}

/// Propagate unchanged marks found in `after` back to `before`.
///
/// Marked `after` entries are evicted at merge time in favour of the
/// `before` originals. A mark with no `before` entry of the same name and
/// inode is dropped, so the entry is diffed like any other.
fn pair_unchanged(before: &mut Snapshot, after: &mut Snapshot) {
    for entry in after.iter_mut().filter(|e| e.is(Classification::Unchanged)) {
        let original = before
            .position(entry.name())
            .and_then(|i| before.slot_mut(i))
            .filter(|original| original.inode() == entry.inode());
        match original {
            Some(original) => original.set_classification(Classification::Unchanged),
            None => entry.set_classification(Classification::None),
        }
    }
}

/// First `after` slot with `inode` that is still free to be a move target.
fn move_target(after: &Snapshot, inode: u64) -> Option<usize> {
    (0..after.slot_count()).find(|&i| {
        after.slot(i).is_some_and(|e| {
            e.inode() == inode
                && !e.is(Classification::Moved)
                && !e.is(Classification::Unchanged)
        })
    })
}

/// Set the classification of an occupied slot.
fn classify(snapshot: &mut Snapshot, index: usize, class: Classification) {
    if let Some(entry) = snapshot.slot_mut(index) {
        entry.set_classification(class);
    }
}

/// Pass 1: pair renames and the replacements they cause.
fn detect_moves<S>(before: &mut Snapshot, after: &mut Snapshot, sink: &mut S, stats: &mut DiffStats)
where
    S: DiffSink + ?Sized,
{
    for from in 0..before.slot_count() {
        let Some(source) = before.slot(from) else {
            continue;
        };
        if source.is(Classification::Unchanged) {
            continue;
        }
        let Some(to) = move_target(after, source.inode()) else {
            continue;
        };
        let Some(target) = after.slot(to) else {
            continue;
        };

        // Same name and inode that the lister did not pre-mark.
        if target.name() == source.name() {
            classify(before, from, Classification::Unchanged);
            classify(after, to, Classification::Unchanged);
            continue;
        }

        // The replacement has to be reported before the move that causes it.
        // Its own earlier move does not spare it: the name was still taken.
        let victim = before
            .position(target.name())
            .filter(|&i| before.slot(i).is_some_and(|e| !e.is(Classification::Unchanged)));
        if let Some(victim) = victim {
            classify(before, victim, Classification::Replaced);
            if let Some(entry) = before.slot(victim) {
                sink.replaced(entry);
                stats.replaced += 1;
            }
        }

        classify(before, from, Classification::Moved);
        classify(after, to, Classification::Moved);
        if let (Some(source), Some(target)) = (before.slot(from), after.slot(to)) {
            sink.moved(source, target);
            stats.moved += 1;
        }
    }
}

/// Pass 2: whatever is left unclassified was removed or added.
fn emit_residual<S>(before: &Snapshot, after: &Snapshot, sink: &mut S, stats: &mut DiffStats)
where
    S: DiffSink + ?Sized,
{
    for entry in before.iter().filter(|e| e.is(Classification::None)) {
        sink.removed(entry);
        stats.removed += 1;
    }
    for entry in after.iter().filter(|e| e.is(Classification::None)) {
        sink.added(entry);
        stats.added += 1;
    }
}

/// Move unchanged entries of `before` into `after`, keeping their allocation.
fn merge_unchanged(before: &mut Snapshot, after: &mut Snapshot, evict: bool) -> usize {
    let survivors: Vec<Box<Entry>> = before.detach_where(|e| e.is(Classification::Unchanged));
    let count = survivors.len();
    for entry in survivors {
        if evict {
            after.remove(entry.name());
        }
        after.attach(entry);
    }
    count
}
