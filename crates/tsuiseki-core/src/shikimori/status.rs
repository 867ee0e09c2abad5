use tsuiseki_api::shikimori::types::RateStatus;

/// Reading status codes as the host stores them on a `Track`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShikimoriStatus {
    Reading = 1,
    Completed = 2,
    OnHold = 3,
    Dropped = 4,
    Planning = 5,
    Repeating = 6,
}

pub const DEFAULT_STATUS: ShikimoriStatus = ShikimoriStatus::Reading;
pub const DEFAULT_SCORE: i32 = 0;

impl ShikimoriStatus {
    pub const ALL: &[ShikimoriStatus] = &[
        Self::Reading,
        Self::Completed,
        Self::OnHold,
        Self::Dropped,
        Self::Planning,
        Self::Repeating,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Reading => "Reading",
            Self::Completed => "Completed",
            Self::OnHold => "On hold",
            Self::Dropped => "Dropped",
            Self::Planning => "Plan to read",
            Self::Repeating => "Rereading",
        }
    }
}

impl From<ShikimoriStatus> for RateStatus {
    fn from(status: ShikimoriStatus) -> Self {
        match status {
            ShikimoriStatus::Reading => RateStatus::Watching,
            ShikimoriStatus::Completed => RateStatus::Completed,
            ShikimoriStatus::OnHold => RateStatus::OnHold,
            ShikimoriStatus::Dropped => RateStatus::Dropped,
            ShikimoriStatus::Planning => RateStatus::Planned,
            ShikimoriStatus::Repeating => RateStatus::Rewatching,
        }
    }
}

impl From<RateStatus> for ShikimoriStatus {
    fn from(status: RateStatus) -> Self {
        match status {
            RateStatus::Watching => ShikimoriStatus::Reading,
            RateStatus::Completed => ShikimoriStatus::Completed,
            RateStatus::OnHold => ShikimoriStatus::OnHold,
            RateStatus::Dropped => ShikimoriStatus::Dropped,
            RateStatus::Planned => ShikimoriStatus::Planning,
            RateStatus::Rewatching => ShikimoriStatus::Repeating,
        }
    }
}
