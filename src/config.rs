use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub jwt_secret: String,
    pub jwt_access_ttl_secs: i64,
    pub jwt_refresh_ttl_secs: i64,
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: &str) -> T {
    var_or(key, default)
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a number"))
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: required("DATABASE_URL"),
            host: var_or("HOST", "0.0.0.0"),
            port: parsed_or("PORT", "8080"),
            frontend_url: var_or("FRONTEND_URL", "http://localhost:3000"),

            jwt_secret: required("JWT_SECRET"),
            // 15 minutes / 7 days
            jwt_access_ttl_secs: parsed_or("JWT_ACCESS_TTL_SECS", "900"),
            jwt_refresh_ttl_secs: parsed_or("JWT_REFRESH_TTL_SECS", "604800"),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
