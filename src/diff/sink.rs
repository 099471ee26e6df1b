use crate::snapshot::Entry;

/// Receiver for the events a diff produces.
///
/// Every method defaults to doing nothing, so an implementation only
/// overrides the event kinds it cares about. Events arrive in the order the
/// differ detects them; see [`crate::diff::diff`] for the guarantees.
pub trait DiffSink {
    /// `entry` appeared in the directory.
    fn added(&mut self, _entry: &Entry) {}

    /// `entry` disappeared from the directory.
    fn removed(&mut self, _entry: &Entry) {}

    /// The file `from` was renamed to `to` inside the directory.
    fn moved(&mut self, _from: &Entry, _to: &Entry) {}

    /// `entry` was overwritten by a rename onto its name.
    fn replaced(&mut self, _entry: &Entry) {}
}

/// Discards every event.
impl DiffSink for () {}

impl<S: DiffSink + ?Sized> DiffSink for &mut S {
    fn added(&mut self, entry: &Entry) {
        (**self).added(entry);
    }

    fn removed(&mut self, entry: &Entry) {
        (**self).removed(entry);
    }

    fn moved(&mut self, from: &Entry, to: &Entry) {
        (**self).moved(from, to);
    }

    fn replaced(&mut self, entry: &Entry) {
        (**self).replaced(entry);
    }
}

/// Handler for single-entry events.
type EntryHandler<'a> = Box<dyn FnMut(&Entry) + 'a>;
/// Handler for rename events.
type MoveHandler<'a> = Box<dyn FnMut(&Entry, &Entry) + 'a>;

/// A sink built from up to four independent closures.
///
/// A missing handler suppresses its event kind. Context is whatever the
/// closures capture.
///
/// ```
/// use dirsnap::diff::Callbacks;
///
/// let mut added = Vec::new();
/// let callbacks = Callbacks::new().on_added(|e| added.push(e.inode()));
/// # drop(callbacks);
/// ```
#[derive(Default)]
pub struct Callbacks<'a> {
    /// Called for every added entry.
    added: Option<EntryHandler<'a>>,
    /// Called for every removed entry.
    removed: Option<EntryHandler<'a>>,
    /// Called for every rename.
    moved: Option<MoveHandler<'a>>,
    /// Called for every overwritten entry.
    replaced: Option<EntryHandler<'a>>,
}

impl<'a> Callbacks<'a> {
    /// A table with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handler for added entries.
    #[must_use]
    pub fn on_added(mut self, f: impl FnMut(&Entry) + 'a) -> Self {
        self.added = Some(Box::new(f));
        self
    }

    /// Set the handler for removed entries.
    #[must_use]
    pub fn on_removed(mut self, f: impl FnMut(&Entry) + 'a) -> Self {
        self.removed = Some(Box::new(f));
        self
    }

    /// Set the handler for renames.
    #[must_use]
    pub fn on_moved(mut self, f: impl FnMut(&Entry, &Entry) + 'a) -> Self {
        self.moved = Some(Box::new(f));
        self
    }

    /// Set the handler for overwritten entries.
    #[must_use]
    pub fn on_replaced(mut self, f: impl FnMut(&Entry) + 'a) -> Self {
        self.replaced = Some(Box::new(f));
        self
    }
}

impl DiffSink for Callbacks<'_> {
    fn added(&mut self, entry: &Entry) {
        if let Some(f) = self.added.as_mut() {
            f(entry);
        }
    }

    fn removed(&mut self, entry: &Entry) {
        if let Some(f) = self.removed.as_mut() {
            f(entry);
        }
    }

    fn moved(&mut self, from: &Entry, to: &Entry) {
        if let Some(f) = self.moved.as_mut() {
            f(from, to);
        }
    }

    fn replaced(&mut self, entry: &Entry) {
        if let Some(f) = self.replaced.as_mut() {
            f(entry);
        }
    }
}
