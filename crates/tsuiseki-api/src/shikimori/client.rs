use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::api::ShikimoriApi;
use super::auth;
use super::error::ShikimoriError;
use super::types::{Manga, NewUserRate, OAuth, User, UserRate};

const DEFAULT_BASE_URL: &str = "https://shikimori.one";

/// Maximum number of results requested from the search endpoint.
const SEARCH_LIMIT: &str = "20";

/// Endpoint and application credentials for a [`ShikimoriClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "urn:ietf:wg:oauth:2.0:oob".to_string(),
            user_agent: "tsuiseki".to_string(),
        }
    }
}

/// Shikimori REST client.
pub struct ShikimoriClient {
    config: ClientConfig,
    http: Client,
}

impl ShikimoriClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{path}", self.config.base_url)
    }

    /// Attach the bearer token and the user agent Shikimori insists on.
    fn sign(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.bearer_auth(token)
            .header(USER_AGENT, self.config.user_agent.as_str())
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ShikimoriError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Shikimori API error");
            Err(ShikimoriError::Api {
                status,
                message: body,
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ShikimoriError> {
        let resp = Self::check_response(req.send().await?).await?;
        resp.json()
            .await
            .map_err(|e| ShikimoriError::Parse(e.to_string()))
    }

    /// Turn a site-relative path into an absolute URL.
    fn absolute(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{path}", self.config.base_url)
        }
    }

    fn absolutize(&self, mut manga: Manga) -> Manga {
        manga.url = self.absolute(&manga.url);
        if let Some(image) = manga.image.as_mut() {
            image.original = image.original.as_deref().map(|p| self.absolute(p));
            image.preview = image.preview.as_deref().map(|p| self.absolute(p));
        }
        manga
    }
}

impl ShikimoriApi for ShikimoriClient {
    fn authorize_url(&self) -> Result<String, ShikimoriError> {
        auth::authorize_url(&self.config)
    }

    async fn access_token(&self, code: &str) -> Result<OAuth, ShikimoriError> {
        auth::exchange_code(&self.http, &self.config, code).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<OAuth, ShikimoriError> {
        auth::refresh(&self.http, &self.config, refresh_token).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ShikimoriError> {
        let req = self.sign(self.http.get(self.api_url("/users/whoami")), token);
        Self::send_json(req).await
    }

    async fn find_manga(&self, token: &str, manga_id: i64) -> Result<Manga, ShikimoriError> {
        let req = self.sign(
            self.http.get(self.api_url(&format!("/mangas/{manga_id}"))),
            token,
        );
        let manga: Manga = Self::send_json(req).await?;
        Ok(self.absolutize(manga))
    }

    async fn find_user_rates(
        &self,
        token: &str,
        user_id: i64,
        target_id: i64,
    ) -> Result<Vec<UserRate>, ShikimoriError> {
        tracing::debug!(user_id, target_id, "looking up Shikimori user rate");
        let req = self
            .sign(self.http.get(self.api_url("/v2/user_rates")), token)
            .query(&[
                ("user_id", user_id.to_string()),
                ("target_id", target_id.to_string()),
                ("target_type", "Manga".to_string()),
            ]);
        Self::send_json(req).await
    }

    async fn add_user_rate(
        &self,
        token: &str,
        rate: &NewUserRate,
    ) -> Result<UserRate, ShikimoriError> {
        let req = self
            .sign(self.http.post(self.api_url("/v2/user_rates")), token)
            .json(&serde_json::json!({ "user_rate": rate }));
        Self::send_json(req).await
    }

    async fn update_user_rate(
        &self,
        token: &str,
        rate_id: i64,
        rate: &NewUserRate,
    ) -> Result<UserRate, ShikimoriError> {
        let req = self
            .sign(
                self.http
                    .patch(self.api_url(&format!("/v2/user_rates/{rate_id}"))),
                token,
            )
            .json(&serde_json::json!({ "user_rate": rate }));
        Self::send_json(req).await
    }

    async fn search(&self, token: &str, query: &str) -> Result<Vec<Manga>, ShikimoriError> {
        let req = self
            .sign(self.http.get(self.api_url("/mangas")), token)
            .query(&[
                ("order", "popularity"),
                ("search", query),
                ("limit", SEARCH_LIMIT),
            ]);
        let results: Vec<Manga> = Self::send_json(req).await?;
        Ok(results.into_iter().map(|m| self.absolutize(m)).collect())
    }
}
