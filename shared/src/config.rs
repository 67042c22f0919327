use dotenv::dotenv;

pub struct Config {
    pub backend_base_url: String,
    pub backend_api_token: Option<String>,
    pub price_feed_url: String,
    pub api_bind_addr: String,
    pub user_poll_secs: u64,
    pub positions_poll_secs: u64,
    pub price_poll_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        Ok(Config {
            backend_base_url: std::env::var("BACKEND_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8090".to_string()),
            backend_api_token: std::env::var("BACKEND_API_TOKEN").ok(),
            price_feed_url: std::env::var("PRICE_FEED_URL")
                .unwrap_or_else(|_| "http://localhost:8091".to_string()),
            api_bind_addr: std::env::var("API_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:9900".to_string()),
            user_poll_secs: std::env::var("USER_POLL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            positions_poll_secs: std::env::var("POSITIONS_POLL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            price_poll_secs: std::env::var("PRICE_POLL_SECS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
        })
    }
}
