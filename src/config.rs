use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Stock level at or below which admins get a low-stock alert.
    pub low_stock_threshold: i32,
    /// Order total (centavos) at or above which admins get a high-value alert.
    pub high_value_threshold: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let low_stock_threshold = env::var("LOW_STOCK_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(10);
        let high_value_threshold = env::var("HIGH_VALUE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(500_000);
        Ok(Self {
            database_url,
            host,
            port,
            low_stock_threshold,
            high_value_threshold,
        })
    }

    /// Config for tests and tools that only need a database connection.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".into(),
            port: 3000,
            low_stock_threshold: 10,
            high_value_threshold: 500_000,
        }
    }
}
