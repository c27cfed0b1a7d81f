//! Bounded set used to rate-limit fallback warnings

use std::collections::{HashSet, VecDeque};

/// Default number of identifiers remembered
pub const DEFAULT_WARNED_CAPACITY: usize = 1000;

/// FIFO-bounded set of canonical identifiers.
///
/// When full, inserting a new identifier forgets the oldest one.
#[derive(Debug, Clone)]
pub struct WarnedSet {
    capacity: usize,
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl WarnedSet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Record `id`; returns true the first time it is seen.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.members.contains(id) {
            return false;
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
        self.order.push_back(id.to_string());
        self.members.insert(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

impl Default for WarnedSet {
    fn default() -> Self {
        Self::new(DEFAULT_WARNED_CAPACITY)
    }
}
