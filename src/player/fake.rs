//! In-memory media backend for tests.

use std::time::Duration;

use super::media::{Generation, MediaBackend, MediaError, MediaEvent, MediaEventKind};

/// Scriptable in-memory media primitive.
#[derive(Default)]
pub(crate) struct FakeBackend {
    /// Duration reported with `Ready`.
    pub(crate) duration: Option<Duration>,
    /// Hold back `Ready` after a load until the test emits it.
    pub(crate) defer_ready: bool,
    /// Sources whose load fails synchronously.
    pub(crate) failing: Vec<String>,
    pub(crate) blocked: bool,
    pub(crate) loaded: Option<(String, Generation)>,
    pub(crate) playing: bool,
    pub(crate) position: Duration,
    pub(crate) volume: f32,
    pub(crate) muted: bool,
    pub(crate) loads: Vec<String>,
    pub(crate) seeks: Vec<Duration>,
    pub(crate) pending: Vec<MediaEvent>,
}

impl FakeBackend {
    pub(crate) fn with_duration(secs: u64) -> Self {
        Self {
            duration: Some(Duration::from_secs(secs)),
            ..Self::default()
        }
    }

    pub(crate) fn generation(&self) -> Generation {
        self.loaded.as_ref().map(|(_, g)| *g).unwrap_or_default()
    }
}

impl MediaBackend for FakeBackend {
    fn load(&mut self, source: &str, generation: Generation) -> Result<(), MediaError> {
        self.unload();
        if self.failing.iter().any(|s| s == source) {
            return Err(MediaError::Load {
                uri: source.to_string(),
                reason: "unsupported format".to_string(),
            });
        }
        self.loads.push(source.to_string());
        self.loaded = Some((source.to_string(), generation));
        self.position = Duration::ZERO;
        if !self.defer_ready {
            self.pending.push(MediaEvent::new(
                generation,
                MediaEventKind::Ready {
                    duration: self.duration,
                },
            ));
        }
        Ok(())
    }

    fn unload(&mut self) {
        self.loaded = None;
        self.playing = false;
        self.pending.clear();
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.blocked {
            return Err(MediaError::Blocked("user gesture required".to_string()));
        }
        if self.loaded.is_none() {
            return Err(MediaError::NotLoaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        if self.loaded.is_none() {
            return Err(MediaError::NotLoaded);
        }
        self.position = position;
        self.seeks.push(position);
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.pending)
    }
}
