use super::model::Track;

/// Format seconds as `m:ss`. Unknown, negative or non-finite input renders as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

impl Track {
    /// `Artist - Title`, or just the title when the artist is blank.
    pub fn label(&self) -> String {
        let title = self.title.trim();
        match self.artist.trim() {
            "" => title.to_string(),
            artist => format!("{artist} - {title}"),
        }
    }
}
