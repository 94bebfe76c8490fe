use super::timestamp::{self, TimestampError};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// One timestamped instructional insight returned by the analysis service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    /// Short label, e.g. "Pacing"
    #[serde(default)]
    pub principle: String,

    /// Position in the recording as `MM:SS`
    #[serde(default)]
    pub timestamp: String,

    /// Free-text explanation
    #[serde(default)]
    pub description: String,
}

impl FeedbackItem {
    pub fn new(
        principle: impl Into<String>,
        timestamp: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            principle: principle.into(),
            timestamp: timestamp.into(),
            description: description.into(),
        }
    }

    /// Decode the timestamp into seconds
    pub fn offset_secs(&self) -> Result<u32, TimestampError> {
        timestamp::parse(&self.timestamp)
    }
}

/// Ordered, read-only list of feedback items from one analysis run.
///
/// Order is exactly what the service returned. Clones share the same items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackCollection {
    items: Arc<[FeedbackItem]>,
}

impl FeedbackCollection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[FeedbackItem] {
        &self.items
    }
}

impl Default for FeedbackCollection {
    fn default() -> Self {
        Vec::new().into()
    }
}

impl Deref for FeedbackCollection {
    type Target = [FeedbackItem];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl From<Vec<FeedbackItem>> for FeedbackCollection {
    fn from(items: Vec<FeedbackItem>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

impl FromIterator<FeedbackItem> for FeedbackCollection {
    fn from_iter<I: IntoIterator<Item = FeedbackItem>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl<'a> IntoIterator for &'a FeedbackCollection {
    type Item = &'a FeedbackItem;
    type IntoIter = std::slice::Iter<'a, FeedbackItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for FeedbackCollection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items[..].serialize(serializer)
    }
}
