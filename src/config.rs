use std::env;
use std::net::IpAddr;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub host: IpAddr,
    pub port: u16,
    pub bcrypt_cost: u32,
    pub password_reset_ttl_minutes: i64,
    /// Return reset tokens in the API response (no mail delivery exists).
    pub expose_reset_token: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "JWT_SECRET must be set".to_string())?;

        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10);
        let jwt_ttl_hours = parse_or("JWT_TTL_HOURS", 1);
        let host = parse_or("HOST", IpAddr::from([0, 0, 0, 0]));
        let port = parse_or("PORT", 8081);
        let bcrypt_cost = parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST);
        let password_reset_ttl_minutes = parse_or("PASSWORD_RESET_TTL_MINUTES", 30i64).clamp(1, 24 * 60);
        let expose_reset_token = parse_or("RESET_TOKEN_IN_RESPONSE", false);

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl_hours,
            host,
            port,
            bcrypt_cost,
            password_reset_ttl_minutes,
            expose_reset_token,
        })
    }

    pub fn jwt_ttl_seconds(&self) -> i64 {
        self.jwt_ttl_hours.saturating_mul(60 * 60)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
