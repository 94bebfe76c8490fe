//! Feedback returned by the analysis service
//!
//! - `timestamp`: `MM:SS` <-> seconds codec
//! - `item`: feedback items and the ordered collection of one analysis run
//! - `store`: the container the session swaps collections into

mod item;
mod store;
pub mod timestamp;

pub use item::{FeedbackCollection, FeedbackItem};
pub use store::FeedbackStore;
pub use timestamp::TimestampError;
