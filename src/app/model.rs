//! The host model: catalogue, filter prompt and status line.

use crate::config::UiSettings;
use crate::library::{Track, search};
use crate::player::{PlayerError, PlayerEvent, Queue, QueueError};

use super::queue_view::QueueView;

/// The main application model.
pub struct App {
    /// Every track that was loaded at startup.
    pub catalog: Vec<Track>,
    /// Manifest path or directory the catalogue came from.
    pub source_label: String,
    pub header_text: String,
    pub queue_view: QueueView,

    pub filter_mode: bool,
    pub filter_query: String,
    /// Filter the current queue was built from, if any.
    pub active_filter: Option<String>,

    /// Last hint or warning shown in the status box.
    pub status: Option<String>,
}

impl App {
    pub fn new(catalog: Vec<Track>, source_label: String, ui: &UiSettings) -> Self {
        Self {
            catalog,
            source_label,
            header_text: ui.header_text.clone(),
            queue_view: QueueView::new(ui.show_queue_on_start),
            filter_mode: false,
            filter_query: String::new(),
            active_filter: None,
            status: None,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.catalog.is_empty()
    }

    /// Catalogue indices matching the query being typed.
    pub fn matching_indices(&self) -> Vec<usize> {
        search(&self.catalog, &self.filter_query)
    }

    /// Queue made of the catalogue entries matching `query` (all of them for `None`).
    pub fn queue_for(&self, query: Option<&str>) -> Result<Queue, QueueError> {
        let tracks = search(&self.catalog, query.unwrap_or(""))
            .into_iter()
            .map(|i| self.catalog[i].clone())
            .collect();
        Queue::new(tracks)
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.filter_query = self.active_filter.clone().unwrap_or_default();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
    }

    /// Leave the prompt keeping the queue as it was.
    pub fn cancel_filter(&mut self) {
        self.filter_mode = false;
        self.filter_query.clear();
    }

    /// Leave the prompt and build the queue for the typed query.
    ///
    /// Returns `None` when nothing matches; the current queue stays in place.
    pub fn commit_filter(&mut self) -> Option<Result<Queue, QueueError>> {
        self.filter_mode = false;
        let query = std::mem::take(&mut self.filter_query);
        let query = query.trim();

        if search(&self.catalog, query).is_empty() {
            self.status = Some(format!("No tracks match \"{query}\""));
            return None;
        }

        self.active_filter = (!query.is_empty()).then(|| query.to_string());
        Some(self.queue_for(self.active_filter.as_deref()))
    }

    /// Drop the active filter and rebuild the full catalogue queue.
    pub fn clear_filter(&mut self) -> Result<Queue, QueueError> {
        self.filter_mode = false;
        self.filter_query.clear();
        self.active_filter = None;
        self.queue_for(None)
    }

    /// React to a notification from the player.
    pub fn apply_player_event(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::IndexChanged(i) => self.queue_view.follow(*i),
            PlayerEvent::Warning(err) => self.status = Some(status_hint(err)),
        }
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

fn status_hint(err: &PlayerError) -> String {
    match err {
        PlayerError::PlaybackBlocked(reason) => {
            format!("Playback blocked ({reason}). Press space to try again.")
        }
        PlayerError::LoadError { cause, .. } => format!("Could not play track: {cause}"),
        PlayerError::InvalidIndex { index, len } => {
            format!("No track #{} in a queue of {len}", index + 1)
        }
    }
}
