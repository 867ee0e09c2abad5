use serde::{Deserialize, Serialize};

/// Tokens are treated as expired this many seconds before their real expiry.
const EXPIRY_MARGIN_SECS: i64 = 3600;

// ── OAuth ────────────────────────────────────────────────────────

/// Credential returned by the Shikimori token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Epoch seconds at which the token was issued.
    pub created_at: i64,
    /// Lifetime in seconds.
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl OAuth {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.created_at + self.expires_in - EXPIRY_MARGIN_SECS
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

/// Response of `GET /api/users/whoami`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub nickname: String,
}

// ── User rates (library entries) ────────────────────────────────

/// Library entry status as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateStatus {
    Planned,
    Watching,
    Rewatching,
    Completed,
    OnHold,
    Dropped,
}

/// A library entry as returned by `/api/v2/user_rates`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRate {
    pub id: i64,
    pub user_id: i64,
    pub target_id: i64,
    #[serde(default)]
    pub target_type: Option<String>,
    #[serde(default)]
    pub score: i32,
    pub status: RateStatus,
    #[serde(default)]
    pub chapters: i32,
    #[serde(default)]
    pub volumes: i32,
}

/// Body of a user rate create/update request (wrapped in `{"user_rate": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUserRate {
    pub user_id: i64,
    pub target_id: i64,
    pub target_type: String,
    pub chapters: i32,
    pub score: i32,
    pub status: RateStatus,
}

impl NewUserRate {
    pub fn manga(
        user_id: i64,
        target_id: i64,
        chapters: i32,
        score: i32,
        status: RateStatus,
    ) -> Self {
        Self {
            user_id,
            target_id,
            target_type: "Manga".to_string(),
            chapters,
            score,
            status,
        }
    }
}

// ── Manga ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MangaImage {
    pub original: Option<String>,
    pub preview: Option<String>,
}

/// A manga from `/api/mangas` or `/api/mangas/{id}`.
///
/// `url` and image paths come back relative to the site root; the client
/// rewrites them to absolute URLs before handing the value out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Manga {
    pub id: i64,
    pub name: String,
    pub russian: Option<String>,
    pub image: Option<MangaImage>,
    pub url: String,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub chapters: Option<i32>,
    pub volumes: Option<i32>,
    pub aired_on: Option<String>,
    pub description: Option<String>,
}

impl Manga {
    pub fn preview_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(|i| i.preview.as_deref())
    }
}
