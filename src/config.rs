use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub places_api_key: String,
    pub places_base_url: String,
    pub apollo_api_key: String,
    pub apollo_base_url: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub stripe_base_url: String,
    pub stripe_price_starter: String,
    pub stripe_price_pro: String,
    pub app_base_url: String,
    pub trial_days: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DB_URL")
                .or_else(|_| std::env::var("DATABASE_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DB_URL or DATABASE_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DB_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            places_api_key: std::env::var("GOOGLE_PLACES_API_KEY")
                .map_err(|_| {
                    anyhow::anyhow!("GOOGLE_PLACES_API_KEY environment variable required")
                })
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("GOOGLE_PLACES_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            places_base_url: std::env::var("GOOGLE_PLACES_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "https://maps.googleapis.com".to_string()),
            apollo_api_key: std::env::var("APOLLO_API_KEY")
                .map_err(|_| anyhow::anyhow!("APOLLO_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("APOLLO_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            apollo_base_url: std::env::var("APOLLO_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "https://api.apollo.io".to_string()),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY")
                .map_err(|_| anyhow::anyhow!("STRIPE_SECRET_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("STRIPE_SECRET_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            stripe_webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
                .map_err(|_| {
                    anyhow::anyhow!("STRIPE_WEBHOOK_SECRET environment variable required")
                })
                .and_then(|secret| {
                    if secret.trim().is_empty() {
                        anyhow::bail!("STRIPE_WEBHOOK_SECRET cannot be empty");
                    }
                    Ok(secret)
                })?,
            stripe_base_url: std::env::var("STRIPE_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "https://api.stripe.com".to_string()),
            stripe_price_starter: std::env::var("STRIPE_PRICE_STARTER")
                .map_err(|_| anyhow::anyhow!("STRIPE_PRICE_STARTER environment variable required"))?,
            stripe_price_pro: std::env::var("STRIPE_PRICE_PRO")
                .map_err(|_| anyhow::anyhow!("STRIPE_PRICE_PRO environment variable required"))?,
            app_base_url: std::env::var("APP_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "https://micro.commcapconnect.com".to_string()),
            trial_days: std::env::var("TRIAL_DAYS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("TRIAL_DAYS must be a valid number of days"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database URL: {}...",
            &config.database_url[..20.min(config.database_url.len())]
        );
        tracing::debug!("Places base URL: {}", config.places_base_url);
        tracing::debug!("Apollo base URL: {}", config.apollo_base_url);
        tracing::debug!("Stripe base URL: {}", config.stripe_base_url);
        tracing::debug!("App base URL: {}", config.app_base_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
