//! The request surface the tracker adapter needs from Shikimori.
//!
//! Every authenticated call takes the bearer token explicitly; obtaining and
//! refreshing that token is the caller's business.

use std::future::Future;

use super::error::ShikimoriError;
use super::types::{Manga, NewUserRate, OAuth, User, UserRate};

pub trait ShikimoriApi: Send + Sync {
    /// OAuth consent page the user must visit to obtain an authorization code.
    fn authorize_url(&self) -> Result<String, ShikimoriError>;

    /// Exchange an authorization code for a credential.
    fn access_token(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<OAuth, ShikimoriError>> + Send;

    /// Trade a refresh token for a new credential.
    fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<OAuth, ShikimoriError>> + Send;

    /// The user the token belongs to.
    fn current_user(&self, token: &str)
        -> impl Future<Output = Result<User, ShikimoriError>> + Send;

    fn find_manga(
        &self,
        token: &str,
        manga_id: i64,
    ) -> impl Future<Output = Result<Manga, ShikimoriError>> + Send;

    /// Library entries of `user_id` for the manga `target_id` (zero or one in practice).
    fn find_user_rates(
        &self,
        token: &str,
        user_id: i64,
        target_id: i64,
    ) -> impl Future<Output = Result<Vec<UserRate>, ShikimoriError>> + Send;

    fn add_user_rate(
        &self,
        token: &str,
        rate: &NewUserRate,
    ) -> impl Future<Output = Result<UserRate, ShikimoriError>> + Send;

    fn update_user_rate(
        &self,
        token: &str,
        rate_id: i64,
        rate: &NewUserRate,
    ) -> impl Future<Output = Result<UserRate, ShikimoriError>> + Send;

    fn search(
        &self,
        token: &str,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Manga>, ShikimoriError>> + Send;
}
