//! Fixed-capacity stack that forgets its oldest entries

use std::collections::VecDeque;

/// A LIFO stack holding at most `capacity` entries.
///
/// Pushing onto a full stack drops the oldest entry first.
#[derive(Debug, Clone)]
pub struct BoundedStack<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    /// Create an empty stack. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, dropping the oldest entries that no longer fit
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Push an entry, returning the oldest one if it had to be dropped
    pub fn push(&mut self, entry: T) -> Option<T> {
        let dropped = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        dropped
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate from the most recent entry to the oldest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut stack = BoundedStack::new(4);
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.peek(), Some(&3));
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_drops_oldest_when_full() {
        let mut stack = BoundedStack::new(3);
        for i in 0..3 {
            assert_eq!(stack.push(i), None);
        }
        assert_eq!(stack.push(3), Some(0));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut stack = BoundedStack::new(usize::MAX);
        stack.push(7u64);
        assert_eq!(stack.capacity(), usize::MAX);
        assert_eq!(stack.pop(), Some(7));
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut stack = BoundedStack::new(5);
        for i in 0..100 {
            stack.push(i);
            assert!(stack.len() <= stack.capacity());
        }
    }

    #[test]
    fn test_shrink_capacity() {
        let mut stack = BoundedStack::new(5);
        for i in 0..5 {
            stack.push(i);
        }
        stack.set_capacity(2);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![4, 3]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut stack = BoundedStack::new(0);
        stack.push('a');
        stack.push('b');
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop(), Some('b'));
    }
}
