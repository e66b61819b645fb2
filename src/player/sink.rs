//! `rodio`-backed implementation of the media primitive.
//!
//! Each loaded track is decoded from a local file into a paused `Sink`.
//! Seeking rebuilds the sink and skips into the file, which also revives a
//! sink that has already played to the end.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use super::media::{Generation, MediaBackend, MediaError, MediaEvent, MediaEventKind};

struct Loaded {
    path: PathBuf,
    generation: Generation,
    /// `None` when there is no output device.
    sink: Option<Sink>,
    /// Where the current sink started within the file.
    offset: Duration,
    playing: bool,
    ended: bool,
}

pub struct RodioBackend {
    stream: Option<OutputStream>,
    loaded: Option<Loaded>,
    volume: f32,
    muted: bool,
    pending: Vec<MediaEvent>,
}

impl RodioBackend {
    /// Open the default output device.
    ///
    /// A missing device is not fatal: tracks still load, but `play` reports
    /// `MediaError::Blocked`.
    pub fn open_default() -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when the stream is dropped, which garbles the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(err) => {
                warn!(error = %err, "no audio output device; playback will be blocked");
                None
            }
        };

        Self {
            stream,
            loaded: None,
            volume: 1.0,
            muted: false,
            pending: Vec::new(),
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn apply_volume(&self) {
        let volume = self.effective_volume();
        if let Some(sink) = self.loaded.as_ref().and_then(|l| l.sink.as_ref()) {
            sink.set_volume(volume);
        }
    }
}

/// Map a track source onto a local file path. Remote URIs are rejected.
fn local_path(source: &str) -> Result<PathBuf, MediaError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return Err(MediaError::Load {
            uri: source.to_string(),
            reason: "remote sources are not supported".to_string(),
        });
    }
    Ok(PathBuf::from(source.strip_prefix("file://").unwrap_or(source)))
}

/// Decode `path` and skip to `start_at`. Also returns the total duration when known.
fn decode_at(
    path: &Path,
    start_at: Duration,
) -> Result<(impl Source + Send + 'static, Option<Duration>), MediaError> {
    let load_error = |reason: String| MediaError::Load {
        uri: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| load_error(e.to_string()))?;
    let duration = decoder.total_duration().or_else(|| probe_duration(path));

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    Ok((decoder.skip_duration(start_at), duration))
}

/// Fall back to the container metadata for formats the decoder cannot size.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

fn paused_sink(stream: &OutputStream, source: impl Source + Send + 'static, volume: f32) -> Sink {
    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    sink.set_volume(volume);
    sink
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, source: &str, generation: Generation) -> Result<(), MediaError> {
        self.unload();

        let path = local_path(source)?;
        let (decoded, duration) = decode_at(&path, Duration::ZERO)?;
        let volume = self.effective_volume();
        let sink = self
            .stream
            .as_ref()
            .map(|stream| paused_sink(stream, decoded, volume));

        debug!(path = %path.display(), generation, ?duration, "media loaded");
        self.loaded = Some(Loaded {
            path,
            generation,
            sink,
            offset: Duration::ZERO,
            playing: false,
            ended: false,
        });
        self.pending
            .push(MediaEvent::new(generation, MediaEventKind::Ready { duration }));
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            if let Some(sink) = loaded.sink {
                sink.stop();
            }
        }
        self.pending.clear();
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let needs_rewind = match self.loaded.as_ref() {
            None => return Err(MediaError::NotLoaded),
            Some(Loaded { sink: None, .. }) => {
                return Err(MediaError::Blocked("no audio output device".to_string()));
            }
            Some(l) => l.ended,
        };
        if needs_rewind {
            self.seek(Duration::ZERO)?;
        }

        if let Some(loaded) = self.loaded.as_mut() {
            if let Some(sink) = loaded.sink.as_ref() {
                sink.play();
            }
            loaded.playing = true;
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            if let Some(sink) = loaded.sink.as_ref() {
                sink.pause();
            }
            loaded.playing = false;
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        let volume = self.effective_volume();
        let Some(loaded) = self.loaded.as_mut() else {
            return Err(MediaError::NotLoaded);
        };

        let (decoded, _) =
            decode_at(&loaded.path, position).map_err(|e| MediaError::Seek(e.to_string()))?;

        // Rebuild the sink at the new offset; the old one is discarded.
        if let Some(old) = loaded.sink.take() {
            old.stop();
        }
        if let Some(stream) = self.stream.as_ref() {
            let sink = paused_sink(stream, decoded, volume);
            if loaded.playing {
                sink.play();
            }
            loaded.sink = Some(sink);
        }
        loaded.offset = position;
        loaded.ended = false;
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_volume();
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume();
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        if let Some(loaded) = self.loaded.as_mut() {
            if let Some(sink) = loaded.sink.as_ref() {
                if loaded.playing && !loaded.ended {
                    let kind = if sink.empty() {
                        loaded.ended = true;
                        loaded.playing = false;
                        MediaEventKind::Ended
                    } else {
                        MediaEventKind::TimeUpdate(loaded.offset + sink.get_pos())
                    };
                    self.pending.push(MediaEvent::new(loaded.generation, kind));
                }
            }
        }
        std::mem::take(&mut self.pending)
    }
}
