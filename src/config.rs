use std::env;

use dotenv::dotenv;

const DEV_SECRET: &str = "ciphercanary-dev-secret-change-me";

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub secret_key: String,
    pub token_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .expect("Invalid port number");

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            log::warn!("SECRET_KEY not set, tokens are signed with the dev secret");
            DEV_SECRET.to_string()
        });

        let token_ttl_minutes = env::var("TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<i64>()
            .expect("Invalid token ttl");

        Self {
            port,
            secret_key,
            token_ttl_minutes,
        }
    }
}
