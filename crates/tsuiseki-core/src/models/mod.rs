pub mod track;

pub use track::{Track, TrackSearch};
