use reqwest::header::USER_AGENT;
use reqwest::Client;
use url::Url;

use super::client::ClientConfig;
use super::error::ShikimoriError;
use super::types::OAuth;

/// Build the OAuth2 consent URL for the Authorization Code Grant.
pub fn authorize_url(config: &ClientConfig) -> Result<String, ShikimoriError> {
    let url = Url::parse_with_params(
        &format!("{}/oauth/authorize", config.base_url),
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
        ],
    )
    .map_err(|e| ShikimoriError::Auth(format!("invalid authorize URL: {e}")))?;

    Ok(url.to_string())
}

/// Exchange the authorization code for a credential.
pub async fn exchange_code(
    http: &Client,
    config: &ClientConfig,
    code: &str,
) -> Result<OAuth, ShikimoriError> {
    request_token(
        http,
        config,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Refresh an expired access token.
pub async fn refresh(
    http: &Client,
    config: &ClientConfig,
    refresh_token: &str,
) -> Result<OAuth, ShikimoriError> {
    request_token(
        http,
        config,
        &[
            ("grant_type", "refresh_token"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn request_token(
    http: &Client,
    config: &ClientConfig,
    form: &[(&str, &str)],
) -> Result<OAuth, ShikimoriError> {
    let resp = http
        .post(format!("{}/oauth/token", config.base_url))
        .header(USER_AGENT, config.user_agent.as_str())
        .form(form)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status, "Shikimori token request rejected");
        return Err(ShikimoriError::Api {
            status,
            message: body,
        });
    }

    resp.json::<OAuth>()
        .await
        .map_err(|e| ShikimoriError::Parse(e.to_string()))
}
