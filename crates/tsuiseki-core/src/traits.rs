//! The capability set every tracker plugs into the host with.

use std::future::Future;

use crate::models::{Track, TrackSearch};

/// Brand color of a tracker, used behind its logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A tracking service the host can sync library entries against.
///
/// Sync operations take the host's `Track` by mutable reference and update it
/// in place with whatever the service returns.
pub trait TrackService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn id(&self) -> i64;

    fn name(&self) -> &'static str;

    /// Asset name of the tracker logo.
    fn logo(&self) -> &'static str;

    fn logo_color(&self) -> Rgb;

    fn status_list(&self) -> Vec<i32>;

    /// Display label of a status code; empty for codes the tracker doesn't define.
    fn status(&self, status: i32) -> &'static str;

    fn completion_status(&self) -> i32;

    fn score_list(&self) -> Vec<String>;

    fn display_score(&self, track: &Track) -> String;

    fn is_logged(&self) -> bool;

    /// Create a remote library entry for `track`.
    fn add(&self, track: &mut Track) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Push `track` to its existing remote library entry.
    fn update(&self, track: &mut Track) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Attach `track` to the remote library, reusing an existing entry if there is one.
    fn bind(&self, track: &mut Track) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<TrackSearch>, Self::Error>> + Send;

    /// Pull the remote entry's state into `track` without pushing anything.
    fn refresh(&self, track: &mut Track) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn logout(&self);
}
