//! Priority-ordered collection
//!
//! Keeps items sorted by descending priority at insertion time. Items with the
//! same priority keep their insertion order, so iteration is deterministic.

/// Collection iterated from the highest to the lowest priority
#[derive(Debug)]
pub struct Prioritized<T> {
    items: Vec<(i32, T)>,
}

impl<T> Default for Prioritized<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Prioritized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item after every item with the same or a higher priority
    pub fn add(&mut self, item: T, priority: i32) {
        let position = self
            .items
            .iter()
            .position(|(existing, _)| *existing < priority)
            .unwrap_or(self.items.len());
        self.items.insert(position, (priority, item));
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_from_highest_priority() {
        let mut items = Prioritized::new();
        items.add("low", 1);
        items.add("high", 10);
        items.add("medium", 5);

        let order: Vec<_> = items.iter().copied().collect();
        assert_eq!(order, vec!["high", "medium", "low"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut items = Prioritized::new();
        items.add("first", 5);
        items.add("second", 5);
        items.add("top", 7);
        items.add("third", 5);

        let order: Vec<_> = items.iter().copied().collect();
        assert_eq!(order, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_empty() {
        let items: Prioritized<u8> = Prioritized::new();
        assert!(items.is_empty());
        assert_eq!(items.len(), 0);
        assert_eq!(items.iter().count(), 0);
    }
}
