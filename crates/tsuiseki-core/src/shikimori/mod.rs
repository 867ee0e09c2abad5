//! Shikimori tracker adapter.

mod interceptor;
mod status;


use std::sync::Arc;

use tsuiseki_api::shikimori::types::{Manga, NewUserRate, OAuth, UserRate};
use tsuiseki_api::shikimori::ShikimoriApi;

pub use interceptor::Interceptor;
pub use status::{ShikimoriStatus, DEFAULT_SCORE, DEFAULT_STATUS};

use crate::error::TrackError;
use crate::models::{Track, TrackSearch};
use crate::preferences::{track_password_key, track_username_key, PreferenceStore};
use crate::traits::{Rgb, TrackService};

pub const NAME: &str = "Shikimori";

/// The Shikimori implementation of [`TrackService`].
pub struct Shikimori<A, P> {
    id: i64,
    api: A,
    prefs: Arc<P>,
    interceptor: Interceptor<P>,
}

impl<A: ShikimoriApi, P: PreferenceStore> Shikimori<A, P> {
    pub fn new(id: i64, api: A, prefs: Arc<P>) -> Self {
        let interceptor = Interceptor::new(Arc::clone(&prefs), id);
        Self {
            id,
            api,
            prefs,
            interceptor,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Consent page to send the user to before [`Self::login_with_code`].
    pub fn auth_url(&self) -> Result<String, TrackError> {
        Ok(self.api.authorize_url()?)
    }

    /// Stored remote user id.
    pub fn username(&self) -> Option<String> {
        self.prefs
            .get(&track_username_key(self.id))
            .filter(|u| !u.is_empty())
    }

    /// Exchange an authorization code and remember who it belongs to.
    ///
    /// Any failure along the way logs the tracker out, so a token is never
    /// left stored without the matching identity.
    pub async fn login_with_code(&self, code: &str) -> Result<(), TrackError> {
        match self.exchange_and_identify(code).await {
            Ok(user_id) => {
                tracing::info!(user_id, "logged in to Shikimori");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Shikimori login failed");
                self.logout();
                Err(e)
            }
        }
    }

    async fn exchange_and_identify(&self, code: &str) -> Result<i64, TrackError> {
        let oauth = self.api.access_token(code).await?;
        self.interceptor.new_auth(oauth.clone())?;

        let token = self.interceptor.access_token(&self.api).await?;
        let user = self.api.current_user(&token).await?;
        self.save_credentials(&user.id.to_string(), &oauth.access_token)?;
        Ok(user.id)
    }

    pub fn save_token(&self, oauth: Option<&OAuth>) -> Result<(), TrackError> {
        self.interceptor.save_token(oauth)
    }

    pub fn restore_token(&self) -> Option<OAuth> {
        self.interceptor.restore_token()
    }

    fn save_credentials(&self, username: &str, password: &str) -> Result<(), TrackError> {
        self.prefs.set(&track_username_key(self.id), username)?;
        self.prefs.set(&track_password_key(self.id), password)?;
        Ok(())
    }

    fn user_id(&self) -> Result<i64, TrackError> {
        self.username()
            .and_then(|u| u.parse().ok())
            .ok_or(TrackError::NotAuthenticated(NAME))
    }

    fn user_rate(&self, track: &Track) -> Result<NewUserRate, TrackError> {
        let status = ShikimoriStatus::from_code(track.status)
            .ok_or(TrackError::UnknownStatus(track.status))?;
        Ok(NewUserRate::manga(
            self.user_id()?,
            track.media_id,
            track.last_chapter_read as i32,
            track.score as i32,
            status.into(),
        ))
    }

    /// The user's remote library entry for `track`, if there is one.
    /// More than one entry for the same title is an error.
    async fn find_lib_manga(&self, track: &Track) -> Result<Option<TrackSearch>, TrackError> {
        let user_id = self.user_id()?;
        let token = self.interceptor.access_token(&self.api).await?;

        let manga = self.api.find_manga(&token, track.media_id).await?;
        let rates = self
            .api
            .find_user_rates(&token, user_id, track.media_id)
            .await?;

        if rates.len() > 1 {
            tracing::warn!(
                media_id = track.media_id,
                count = rates.len(),
                "several Shikimori library entries for one title"
            );
            return Err(TrackError::AmbiguousEntry(rates.len()));
        }

        Ok(rates
            .into_iter()
            .next()
            .map(|rate| self.from_user_rate(rate, &manga)))
    }

    fn from_user_rate(&self, rate: UserRate, manga: &Manga) -> TrackSearch {
        let mut result = self.from_manga(manga);
        result.track.library_id = Some(rate.id);
        result.track.media_id = rate.target_id;
        result.track.last_chapter_read = rate.chapters as f32;
        result.track.score = rate.score as f32;
        result.track.status = ShikimoriStatus::from(rate.status).code();
        result
    }

    fn from_manga(&self, manga: &Manga) -> TrackSearch {
        TrackSearch {
            track: Track {
                media_id: manga.id,
                title: manga.name.clone(),
                total_chapters: manga.chapters.unwrap_or(0),
                tracking_url: manga.url.clone(),
                ..Track::new(self.id, manga.id, manga.name.clone())
            },
            cover_url: manga.preview_url().unwrap_or_default().to_string(),
            summary: manga.description.clone().unwrap_or_default(),
            publishing_status: manga.status.clone().unwrap_or_default(),
            publishing_type: manga.kind.clone().unwrap_or_default(),
            start_date: manga.aired_on.clone().unwrap_or_default(),
        }
    }
}

impl<A: ShikimoriApi, P: PreferenceStore> TrackService for Shikimori<A, P> {
    type Error = TrackError;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn logo(&self) -> &'static str {
        "ic_tracker_shikimori"
    }

    fn logo_color(&self) -> Rgb {
        Rgb(40, 40, 40)
    }

    fn status_list(&self) -> Vec<i32> {
        ShikimoriStatus::ALL.iter().map(|s| s.code()).collect()
    }

    fn status(&self, status: i32) -> &'static str {
        ShikimoriStatus::from_code(status)
            .map(ShikimoriStatus::label)
            .unwrap_or("")
    }

    fn completion_status(&self) -> i32 {
        ShikimoriStatus::Completed.code()
    }

    fn score_list(&self) -> Vec<String> {
        (0..=10).map(|score| score.to_string()).collect()
    }

    fn display_score(&self, track: &Track) -> String {
        (track.score as i32).to_string()
    }

    fn is_logged(&self) -> bool {
        let password = self.prefs.get(&track_password_key(self.id));
        self.username().is_some() && password.is_some_and(|p| !p.is_empty())
    }

    async fn add(&self, track: &mut Track) -> Result<(), TrackError> {
        let rate = self.user_rate(track)?;
        let token = self.interceptor.access_token(&self.api).await?;

        let saved = self.api.add_user_rate(&token, &rate).await?;
        track.library_id = Some(saved.id);
        Ok(())
    }

    async fn update(&self, track: &mut Track) -> Result<(), TrackError> {
        let library_id = track.library_id.ok_or(TrackError::MissingLibraryId)?;
        let rate = self.user_rate(track)?;
        let token = self.interceptor.access_token(&self.api).await?;

        let saved = self.api.update_user_rate(&token, library_id, &rate).await?;
        track.library_id = Some(saved.id);
        Ok(())
    }

    async fn bind(&self, track: &mut Track) -> Result<(), TrackError> {
        match self.find_lib_manga(track).await? {
            Some(remote) => {
                track.copy_personal_from(&remote.track);
                track.library_id = remote.track.library_id;
                self.update(track).await
            }
            None => {
                track.score = DEFAULT_SCORE as f32;
                track.status = DEFAULT_STATUS.code();
                self.add(track).await
            }
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<TrackSearch>, TrackError> {
        let token = self.interceptor.access_token(&self.api).await?;
        let results = self.api.search(&token, query).await?;
        Ok(results.iter().map(|manga| self.from_manga(manga)).collect())
    }

    async fn refresh(&self, track: &mut Track) -> Result<(), TrackError> {
        if let Some(remote) = self.find_lib_manga(track).await? {
            track.copy_personal_from(&remote.track);
            track.total_chapters = remote.track.total_chapters;
        }
        Ok(())
    }

    async fn login(&self, _username: &str, password: &str) -> Result<(), TrackError> {
        self.login_with_code(password).await
    }

    fn logout(&self) {
        for key in [track_username_key(self.id), track_password_key(self.id)] {
            if let Err(e) = self.prefs.delete(&key) {
                tracing::warn!(key = %key, error = %e, "failed to clear Shikimori credential");
            }
        }
        if let Err(e) = self.interceptor.save_token(None) {
            tracing::warn!(error = %e, "failed to delete Shikimori token");
        }
        self.interceptor.clear();
        tracing::info!("logged out of Shikimori");
    }
}
