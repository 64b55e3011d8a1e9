use std::collections::VecDeque;

/// Bounded record of decoded texts, oldest first.
///
/// Once the capacity is reached the oldest entries are evicted first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    /// Create an empty history keeping at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a decoded text. Empty texts are ignored.
    pub fn append(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }

        self.entries.push_back(text);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Iterate over the entries, newest last.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The entries joined one per line, newest last.
    pub fn render(&self) -> String {
        self.iter().collect::<Vec<_>>().join("\n")
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history has no entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
