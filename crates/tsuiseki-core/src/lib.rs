pub mod config;
pub mod error;
pub mod models;
pub mod preferences;
pub mod shikimori;
pub mod traits;

pub use error::{PreferenceError, TrackError};
pub use models::{Track, TrackSearch};
pub use traits::{Rgb, TrackService};
