use std::env;
use std::sync::Arc;

const DEFAULT_SERVERS: &str =
    "https://coffinated-server-1.vercel.app,https://coffinated-server-2.vercel.app";

/// Client-side configuration. Mirrors what the web client keeps around: the
/// known servers, which one is active, and who we are. Session storage itself
/// lives outside this crate; we only carry the token it hands us.
#[derive(Debug, Clone)]
pub struct Config {
    pub servers: Vec<String>,
    pub current_server: String,
    pub user_id: Option<String>,
    pub auth_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let servers: Vec<String> = env::var("COFFINATED_SERVERS")
            .unwrap_or(DEFAULT_SERVERS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let current_server = env::var("COFFINATED_SERVER")
            .ok()
            .or_else(|| servers.first().cloned())
            .expect("COFFINATED_SERVERS is empty and COFFINATED_SERVER is not set");

        Self {
            servers,
            current_server,
            user_id: env::var("COFFINATED_USER_ID").ok(),
            auth_token: env::var("COFFINATED_TOKEN").ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl ClientState {
    pub fn create_from_env() -> Result<ClientState, reqwest::Error> {
        let config = Config::from_env();
        let http = reqwest::Client::builder()
            .user_agent(concat!("coffinated-feed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ClientState {
            config: Arc::new(config),
            http,
        })
    }
}

pub type ArcClientState = Arc<ClientState>;
