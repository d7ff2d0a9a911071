//! API credentials and the headers attached to outgoing requests.
//! Request signing belongs to the feed operator's auth scheme. It plugs in through
//! [`RequestAuthenticator`]; the bundled [`ApiKeyAuthenticator`] only identifies the client.
use chrono::Utc;
use eyre::Result;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TIMESTAMP_HEADER: &str = "X-Authorization-Timestamp";

#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: String, api_secret: String) -> Credentials {
        Credentials {
            api_key,
            api_secret,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Produces the auth headers for a request to `path_and_query`.
pub trait RequestAuthenticator: Send + Sync {
    fn headers(&self, method: &str, path_and_query: &str) -> Result<Vec<(&'static str, String)>>;
}

pub struct ApiKeyAuthenticator {
    credentials: Credentials,
}

impl ApiKeyAuthenticator {
    pub fn new(credentials: Credentials) -> ApiKeyAuthenticator {
        ApiKeyAuthenticator { credentials }
    }
}

impl RequestAuthenticator for ApiKeyAuthenticator {
    fn headers(&self, method: &str, path_and_query: &str) -> Result<Vec<(&'static str, String)>> {
        log::debug!("Authenticating {} {}", method, path_and_query);
        Ok(vec![
            (AUTHORIZATION_HEADER, self.credentials.api_key.clone()),
            (TIMESTAMP_HEADER, Utc::now().timestamp_millis().to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sends_api_key_and_timestamp() {
        let authenticator =
            ApiKeyAuthenticator::new(Credentials::new("key".to_string(), "secret".to_string()));
        let before = Utc::now().timestamp_millis();

        let headers = authenticator.headers("GET", "/api/v1/ws?feedIDs=0x00").unwrap();

        assert_eq!(headers[0], (AUTHORIZATION_HEADER, "key".to_string()));
        assert_eq!(headers[1].0, TIMESTAMP_HEADER);
        let timestamp: i64 = headers[1].1.parse().unwrap();
        assert!(timestamp >= before);
        assert!(headers.iter().all(|(_, value)| value != "secret"));
    }
}
