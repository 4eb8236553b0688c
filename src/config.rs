use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.mobile.endomondo.com/mobile";
pub const DEFAULT_COUNTRY: &str = "GB";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the mobile API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Country code sent when pairing a device.
    pub country: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn auth_url(&self) -> String {
        self.endpoint("auth")
    }

    pub fn workout_get_url(&self) -> String {
        self.endpoint("api/workout/get")
    }

    pub fn workouts_url(&self) -> String {
        self.endpoint("api/workouts")
    }

    pub fn track_url(&self) -> String {
        self.endpoint("track")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Host name used to derive the stable device id.
///
/// `HOSTNAME` wins, then `/etc/hostname`, then `localhost`.
pub fn local_hostname() -> String {
    if let Ok(h) = std::env::var("HOSTNAME")
        && !h.trim().is_empty()
    {
        return h.trim().to_string();
    }

    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
