use rustc_hash::FxHashMap;

/// Lifecycle of a canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Vacant,
    /// Label reserved, initializer still running.
    Initializing,
    Ready,
}

/// Outcome of [`LabelTable::intern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interned {
    /// New key: the caller must run its initializer and then call
    /// [`LabelTable::finish`].
    Fresh(u32),
    Existing(u32),
    /// The key is being initialized further up the stack.
    Reentrant(u32),
}

impl Interned {
    pub fn raw(self) -> u32 {
        match self {
            Interned::Fresh(raw) | Interned::Existing(raw) | Interned::Reentrant(raw) => raw,
        }
    }
}

/// Canonical key to label number, with one state machine per key.
#[derive(Debug, Default)]
pub struct LabelTable {
    next: u32,
    entries: FxHashMap<String, (u32, KeyState)>,
    reentrant_hits: usize,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, key: &str) -> Interned {
        if let Some(entry) = self.entries.get_mut(key) {
            return match entry.1 {
                KeyState::Initializing => {
                    self.reentrant_hits += 1;
                    Interned::Reentrant(entry.0)
                }
                KeyState::Ready | KeyState::Vacant => Interned::Existing(entry.0),
            };
        }
        let raw = self.allocate();
        self.entries
            .insert(key.to_string(), (raw, KeyState::Initializing));
        Interned::Fresh(raw)
    }

    /// Marks a fresh key's initializer as done.
    pub fn finish(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.1 = KeyState::Ready;
        }
    }

    /// A label bound to no key.
    pub fn fresh(&mut self) -> u32 {
        self.allocate()
    }

    pub fn state(&self, key: &str) -> KeyState {
        self.entries
            .get(key)
            .map(|(_, state)| *state)
            .unwrap_or(KeyState::Vacant)
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.entries.get(key).map(|(raw, _)| *raw)
    }

    pub fn reentrant_hits(&self) -> usize {
        self.reentrant_hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn allocate(&mut self) -> u32 {
        let raw = self.next;
        self.next += 1;
        raw
    }
}
