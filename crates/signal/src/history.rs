/// Append-only value history with a cursor.
///
/// Invariant: `index < snapshots.len()`; the cursor never passes the last
/// pushed snapshot.
#[derive(Clone, Debug)]
pub struct History<T> {
    snapshots: Vec<T>,
    index: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
        }
    }

    /// Append a snapshot and advance the cursor by one.
    pub fn push(&mut self, value: T) {
        self.snapshots.push(value);
        self.index = (self.index + 1).min(self.snapshots.len() - 1);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[T] {
        &self.snapshots
    }

    /// Snapshot after the cursor, if any.
    pub fn next(&self) -> Option<&T> {
        self.snapshots.get(self.index + 1)
    }

    /// Snapshot before the cursor, if any.
    pub fn previous(&self) -> Option<&T> {
        self.index.checked_sub(1).and_then(|i| self.snapshots.get(i))
    }

    pub(crate) fn step_forward(&mut self) {
        if self.index + 1 < self.snapshots.len() {
            self.index += 1;
        }
    }

    pub(crate) fn step_back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }
}
