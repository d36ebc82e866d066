/**
 * Server Configuration
 *
 * Configuration is environment-sourced with development defaults, so the
 * relay starts with no configuration at all and logs what it fell back
 * to. Variable names are kept from the original deployment so existing
 * process managers work unchanged.
 *
 * | Variable              | Default                    | Meaning                       |
 * |-----------------------|----------------------------|-------------------------------|
 * | `SOCKET_PORT`         | 4000                       | Listening port                |
 * | `CLIENT_URL`          | http://localhost:3000      | Allowed cross-origin client   |
 * | `SOCKET_INTERNAL_KEY` | super-secret-internal-key  | Shared secret for /internal   |
 */

/// Default shared secret; fine for local development, loudly warned
/// about anywhere else.
pub const DEFAULT_INTERNAL_SECRET: &str = "super-secret-internal-key";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 4000;

/// Default allowed client origin.
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";

/// Runtime configuration for the relay process.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Port the HTTP/WebSocket listener binds to.
    pub port: u16,
    /// Origin allowed by CORS (the chat web application).
    pub client_url: String,
    /// Shared secret required on `/internal/notify`.
    pub internal_secret: String,
}

impl RelayConfig {
    /// Load configuration from the environment.
    ///
    /// Missing or unparseable values fall back to defaults with a log
    /// line; configuration problems never prevent startup.
    pub fn from_env() -> Self {
        let port = match std::env::var("SOCKET_PORT") {
            Ok(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!(
                    "SOCKET_PORT={} is not a valid port, falling back to {}",
                    raw,
                    DEFAULT_PORT
                );
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let client_url =
            std::env::var("CLIENT_URL").unwrap_or_else(|_| DEFAULT_CLIENT_URL.to_string());

        let internal_secret = std::env::var("SOCKET_INTERNAL_KEY").unwrap_or_else(|_| {
            tracing::warn!(
                "SOCKET_INTERNAL_KEY not set, using the development default, do not deploy this"
            );
            DEFAULT_INTERNAL_SECRET.to_string()
        });

        Self {
            port,
            client_url,
            internal_secret,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            client_url: DEFAULT_CLIENT_URL.to_string(),
            internal_secret: DEFAULT_INTERNAL_SECRET.to_string(),
        }
    }
}
