/// Environment configuration.
///
/// Everything the service talks to is configured here: the database, the
/// session cookie, the SPA origin for CORS, and the three external
/// collaborators (object store, SMTP provider, meeting API). The external
/// blocks are optional so the service can run without them; the endpoints
/// that need a missing collaborator fail with an upstream error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub cookie_expire_days: i64,
    pub cookie_secure: bool,
    pub frontend_url: String,

    pub storage_url: Option<String>,
    pub storage_api_key: Option<String>,

    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub smtp_from: String,

    pub meeting_auth_url: Option<String>,
    pub meeting_api_url: Option<String>,
    pub meeting_client_id: Option<String>,
    pub meeting_client_secret: Option<String>,
    pub meeting_account_id: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(val) if !val.is_empty() => val,
        _ => {
            log::warn!("No {key} set — using default \"{default}\"");
            default.to_string()
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let cookie_expire_days = env_opt("COOKIE_EXPIRE")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(7);

        let smtp_port = env_opt("SMTP_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(587);

        Config {
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8080"),
            database_url: env_or("DATABASE_URL", "sqlite://data/pms.db"),
            cookie_expire_days,
            cookie_secure: env_opt("COOKIE_SECURE").as_deref() == Some("true"),
            frontend_url: env_or("FRONTEND_URL", "http://localhost:5173"),

            storage_url: env_opt("STORAGE_URL"),
            storage_api_key: env_opt("STORAGE_API_KEY"),

            smtp_host: env_opt("SMTP_HOST"),
            smtp_port,
            smtp_user: env_opt("SMTP_USER"),
            smtp_pass: env_opt("SMTP_PASS"),
            smtp_from: env_or("SMTP_FROM", "no-reply@pms.local"),

            meeting_auth_url: env_opt("MEETING_AUTH_URL"),
            meeting_api_url: env_opt("MEETING_API_URL"),
            meeting_client_id: env_opt("MEETING_CLIENT_ID"),
            meeting_client_secret: env_opt("MEETING_CLIENT_SECRET"),
            meeting_account_id: env_opt("MEETING_ACCOUNT_ID"),
        }
    }
}
