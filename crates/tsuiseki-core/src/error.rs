use thiserror::Error;
use tsuiseki_api::shikimori::ShikimoriError;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("remote service error: {0}")]
    Remote(#[from] ShikimoriError),

    #[error("not authenticated with {0}")]
    NotAuthenticated(&'static str),

    #[error("track has no remote library entry")]
    MissingLibraryId,

    #[error("unknown status code: {0}")]
    UnknownStatus(i32),

    #[error("expected one library entry, found {0}")]
    AmbiguousEntry(usize),

    #[error("preference error: {0}")]
    Preferences(#[from] PreferenceError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("preference store lock poisoned")]
    Poisoned,
}
