use crate::codec::KeyValueReply;
use crate::config::{ApiConfig, local_hostname};
use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpTransport};
use std::fmt;
use uuid::Uuid;

/// Authenticated session: the token every API call carries.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Pairs this host as a device and exchanges the credentials for a token.
    ///
    /// Transport failures are returned untouched; a reply that is not `OK` or
    /// carries no `authToken` is `Error::InvalidCredentials`.
    pub fn with_username_and_password<T: HttpTransport>(
        username: &str,
        password: &str,
        transport: &T,
        config: &ApiConfig,
    ) -> Result<Self> {
        Self::pair(username, password, &local_hostname(), transport, config)
    }

    /// Same as [`Session::with_username_and_password`] with an explicit host name.
    pub fn pair<T: HttpTransport>(
        username: &str,
        password: &str,
        hostname: &str,
        transport: &T,
        config: &ApiConfig,
    ) -> Result<Self> {
        let request = HttpRequest::get(config.auth_url())
            .query("country", &config.country)
            .query("action", "pair")
            .query("deviceId", device_id(hostname))
            .query("email", username)
            .query("password", password);

        let response = transport.execute(request)?;
        let body = String::from_utf8(response.body).map_err(|_| Error::InvalidCredentials)?;
        let reply = KeyValueReply::parse(&body);

        if !reply.is_ok() {
            tracing::warn!(status = reply.status(), "authentication rejected");
            return Err(Error::InvalidCredentials);
        }

        match reply.get("authToken") {
            Some(token) if !token.is_empty() => {
                tracing::info!("authenticated");
                Ok(Self::with_token(token))
            }
            _ => Err(Error::InvalidCredentials),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Keep the token out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Stable per-host device id: UUID v5 over the host name in the DNS namespace.
pub fn device_id(hostname: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, hostname.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_kept_verbatim() {
        let s = Session::with_token("my_token");
        assert_eq!(s.token(), "my_token");
        assert!(!format!("{s:?}").contains("my_token"));
    }

    #[test]
    fn device_id_is_deterministic() {
        assert_eq!(device_id("laptop"), device_id("laptop"));
        assert_ne!(device_id("laptop"), device_id("desktop"));
        assert_eq!(device_id("laptop").get_version_num(), 5);
    }
}
