use std::sync::{Arc, RwLock};

use tsuiseki_api::shikimori::types::OAuth;
use tsuiseki_api::shikimori::ShikimoriApi;

use super::NAME;
use crate::error::TrackError;
use crate::preferences::{track_token_key, PreferenceStore};

/// Supplies the bearer token for outgoing requests.
///
/// The credential is kept in memory once known and mirrored to the preference
/// store, so a restarted process picks it up lazily on its first call.
pub struct Interceptor<P> {
    prefs: Arc<P>,
    token_key: String,
    oauth: RwLock<Option<OAuth>>,
}

impl<P: PreferenceStore> Interceptor<P> {
    pub fn new(prefs: Arc<P>, tracker_id: i64) -> Self {
        Self {
            prefs,
            token_key: track_token_key(tracker_id),
            oauth: RwLock::new(None),
        }
    }

    /// A valid access token, restoring or refreshing the credential as needed.
    pub async fn access_token<A: ShikimoriApi>(&self, api: &A) -> Result<String, TrackError> {
        let oauth = match self.current() {
            Some(oauth) => oauth,
            None => {
                let restored = self
                    .restore_token()
                    .ok_or(TrackError::NotAuthenticated(NAME))?;
                self.set_current(Some(restored.clone()));
                restored
            }
        };

        if !oauth.is_expired() {
            return Ok(oauth.access_token);
        }

        let Some(refresh_token) = oauth.refresh_token else {
            tracing::debug!("expired Shikimori token has no refresh token");
            return Ok(oauth.access_token);
        };

        tracing::debug!("refreshing expired Shikimori token");
        let fresh = api.refresh_token(&refresh_token).await?;
        self.new_auth(fresh.clone())?;
        Ok(fresh.access_token)
    }

    /// Install and persist a credential.
    pub fn new_auth(&self, oauth: OAuth) -> Result<(), TrackError> {
        self.save_token(Some(&oauth))?;
        self.set_current(Some(oauth));
        Ok(())
    }

    /// Forget the in-memory credential. The stored copy is left alone.
    pub fn clear(&self) {
        self.set_current(None);
    }

    pub fn save_token(&self, oauth: Option<&OAuth>) -> Result<(), TrackError> {
        match oauth {
            Some(oauth) => {
                let encoded = serde_json::to_string(oauth)?;
                self.prefs.set(&self.token_key, &encoded)?;
            }
            None => self.prefs.delete(&self.token_key)?,
        }
        Ok(())
    }

    /// The stored credential, or `None` when it is absent or unreadable.
    pub fn restore_token(&self) -> Option<OAuth> {
        let encoded = self.prefs.get(&self.token_key)?;
        match serde_json::from_str(&encoded) {
            Ok(oauth) => Some(oauth),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable Shikimori token");
                None
            }
        }
    }

    fn current(&self) -> Option<OAuth> {
        self.oauth.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_current(&self, oauth: Option<OAuth>) {
        *self.oauth.write().unwrap_or_else(|e| e.into_inner()) = oauth;
    }
}
