use super::item::{FeedbackCollection, FeedbackItem};
use tracing::debug;

/// Holds the feedback of the current analysis run.
///
/// The collection is only ever swapped as a whole; individual items are never
/// edited in place.
#[derive(Debug, Default)]
pub struct FeedbackStore {
    current: FeedbackCollection,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in the result of a completed analysis
    pub(crate) fn replace(&mut self, collection: FeedbackCollection) {
        debug!("Replacing feedback collection ({} items)", collection.len());
        self.current = collection;
    }

    pub(crate) fn clear(&mut self) {
        self.current = FeedbackCollection::empty();
    }

    pub fn current(&self) -> &FeedbackCollection {
        &self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn get(&self, index: usize) -> Option<&FeedbackItem> {
        self.current.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedbackItem> {
        self.current.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(labels: &[&str]) -> FeedbackCollection {
        labels
            .iter()
            .map(|l| FeedbackItem::new(*l, "00:10", "desc"))
            .collect()
    }

    #[test]
    fn test_store_starts_empty() {
        let store = FeedbackStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get(0).is_none());
    }

    #[test]
    fn test_replace_is_wholesale_and_keeps_order() {
        let mut store = FeedbackStore::new();
        store.replace(collection(&["Pacing", "Questioning", "Wait time"]));
        store.replace(collection(&["Praise", "Checks for understanding"]));

        let labels: Vec<&str> = store.iter().map(|i| i.principle.as_str()).collect();
        assert_eq!(labels, vec!["Praise", "Checks for understanding"]);
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = FeedbackStore::new();
        store.replace(collection(&["Pacing"]));
        store.clear();
        assert!(store.is_empty());
    }
}
