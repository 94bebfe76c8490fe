use crate::feedback::FeedbackItem;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The audio element feedback items seek into.
///
/// Implementations:
/// - `TrackedSurface`: headless, records position and play state so a remote
///   player (e.g. the browser behind the review API) can follow along
pub trait PlaybackSurface: Send + Sync {
    /// Load a new source, resetting the position to the start
    fn load(&mut self, source: &Path);

    /// Drop the current source
    fn unload(&mut self);

    /// Currently loaded source, if any
    fn source(&self) -> Option<&Path>;

    /// Move the playback position
    fn seek(&mut self, offset_secs: u32);

    /// Resume playback from the current position
    fn play(&mut self);

    fn position_secs(&self) -> u32;

    fn is_playing(&self) -> bool;

    /// Surface name for logging
    fn name(&self) -> &str;
}

/// Headless playback surface
#[derive(Debug, Default)]
pub struct TrackedSurface {
    source: Option<PathBuf>,
    position_secs: u32,
    playing: bool,
}

impl TrackedSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackSurface for TrackedSurface {
    fn load(&mut self, source: &Path) {
        self.source = Some(source.to_path_buf());
        self.position_secs = 0;
        self.playing = false;
    }

    fn unload(&mut self) {
        self.source = None;
        self.position_secs = 0;
        self.playing = false;
    }

    fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn seek(&mut self, offset_secs: u32) {
        self.position_secs = offset_secs;
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn position_secs(&self) -> u32 {
        self.position_secs
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn name(&self) -> &str {
        "tracked"
    }
}

/// Result of asking the controller to jump to a feedback item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeekOutcome {
    /// Position moved and playback resumed
    Playing { offset_secs: u32 },
    /// No audio loaded; nothing happened
    NoSource,
    /// The item's timestamp could not be decoded; nothing happened
    Unseekable,
}

/// Current playback state, as reported to observers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackStatus {
    pub loaded: bool,
    pub position_secs: u32,
    pub playing: bool,
}

/// Bridges feedback timestamps to the session's single playback surface
pub struct PlaybackController {
    surface: Box<dyn PlaybackSurface>,
}

impl PlaybackController {
    pub fn new(surface: Box<dyn PlaybackSurface>) -> Self {
        Self { surface }
    }

    pub(crate) fn load(&mut self, source: &Path) {
        info!(
            "Loading {} into {} playback surface",
            source.display(),
            self.surface.name()
        );
        self.surface.load(source);
    }

    pub(crate) fn unload(&mut self) {
        if self.surface.source().is_some() {
            debug!("Unloading {} playback surface", self.surface.name());
            self.surface.unload();
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.surface.source().is_some()
    }

    /// Seek to the item's timestamp and resume playback.
    ///
    /// A no-op when nothing is loaded or the timestamp does not decode.
    pub fn seek_and_play(&mut self, item: &FeedbackItem) -> SeekOutcome {
        if !self.is_loaded() {
            debug!("Seek to {} ignored: no audio loaded", item.timestamp);
            return SeekOutcome::NoSource;
        }

        let offset_secs = match item.offset_secs() {
            Ok(secs) => secs,
            Err(e) => {
                warn!("Skipping seek for \"{}\": {}", item.principle, e);
                return SeekOutcome::Unseekable;
            }
        };

        self.surface.seek(offset_secs);
        self.surface.play();

        info!("Playing from {} ({}s)", item.timestamp, offset_secs);

        SeekOutcome::Playing { offset_secs }
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            loaded: self.is_loaded(),
            position_secs: self.surface.position_secs(),
            playing: self.surface.is_playing(),
        }
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(Box::new(TrackedSurface::new()))
    }
}
