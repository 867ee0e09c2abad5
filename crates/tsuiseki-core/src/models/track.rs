use serde::{Deserialize, Serialize};

/// A manga's library entry on one tracker, as the host application stores it.
///
/// The adapter mutates these fields in place while syncing but never owns the
/// record's lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<i64>,
    pub manga_id: i64,
    /// Which tracker this entry belongs to.
    pub sync_id: i64,
    /// Remote id of the title.
    pub media_id: i64,
    /// Remote id of the user's library entry, once known.
    pub library_id: Option<i64>,
    pub title: String,
    pub last_chapter_read: f32,
    pub total_chapters: i32,
    pub score: f32,
    pub status: i32,
    /// Epoch millis, 0 when unset.
    pub started_reading_date: i64,
    /// Epoch millis, 0 when unset.
    pub finished_reading_date: i64,
    pub tracking_url: String,
}

impl Track {
    pub fn new(sync_id: i64, media_id: i64, title: impl Into<String>) -> Self {
        Self {
            sync_id,
            media_id,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Copy the fields that describe the user's relationship to the title.
    pub fn copy_personal_from(&mut self, other: &Track) {
        self.last_chapter_read = other.last_chapter_read;
        self.score = other.score;
        self.status = other.status;
        self.started_reading_date = other.started_reading_date;
        self.finished_reading_date = other.finished_reading_date;
    }
}

/// A remote entry returned by search or library lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSearch {
    pub track: Track,
    pub cover_url: String,
    pub summary: String,
    pub publishing_status: String,
    pub publishing_type: String,
    pub start_date: String,
}
