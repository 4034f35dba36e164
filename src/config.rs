#[derive(Debug)]
pub struct Config {
    pub db_connection_string: String,
    pub bind_addr: String,
    pub public_base_url: String,
}

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://mangashelf.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

impl Config {
    pub fn load() -> Self {
        let db_connection_string =
            std::env::var("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.into());
        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or(DEFAULT_PUBLIC_BASE_URL.into());
        Config {
            db_connection_string,
            bind_addr,
            public_base_url,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.db_connection_string.is_empty() {
            return Err("DB_CONNECTION_STRING is empty".into());
        }
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!("BIND_ADDR is not a socket address: {}", self.bind_addr));
        }
        if self.public_base_url.is_empty() {
            return Err("PUBLIC_BASE_URL is empty".into());
        }
        Ok(())
    }
}
