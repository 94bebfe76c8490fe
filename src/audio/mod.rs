pub mod file;
pub mod playback;
pub mod preview;

pub use file::{AudioFile, FileId};
pub use playback::{PlaybackController, PlaybackStatus, PlaybackSurface, SeekOutcome, TrackedSurface};
pub use preview::PreviewHandle;
