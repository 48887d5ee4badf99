use serde::Deserialize;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_WHOIS_PORT: u16 = 43;
const DEFAULT_IANA_SERVER: &str = "whois.iana.org";
const DEFAULT_MAX_RESPONSE_SIZE: usize = 1024 * 1024;
const DEFAULT_MAX_REFERRALS: usize = 3;
const DEFAULT_LOG_FILTER: &str = "domaininfo_api=info,tower_http=info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub whois_port: u16,
    pub iana_server: String,
    pub whois_timeout_seconds: u64,
    pub max_response_size: usize,
    pub max_referrals: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            whois_port: DEFAULT_WHOIS_PORT,
            iana_server: DEFAULT_IANA_SERVER.to_string(),
            whois_timeout_seconds: Self::default_timeout(false),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            max_referrals: DEFAULT_MAX_REFERRALS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Builds the configuration from defaults, a `.env` file if one exists,
    /// and environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let is_production = Self::is_production_environment();

        let mut settings = config::Config::builder()
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("whois_port", DEFAULT_WHOIS_PORT as i64)?
            .set_default("iana_server", DEFAULT_IANA_SERVER)?
            .set_default("whois_timeout_seconds", Self::default_timeout(is_production))?
            .set_default("max_response_size", DEFAULT_MAX_RESPONSE_SIZE as i64)?
            .set_default("max_referrals", DEFAULT_MAX_REFERRALS as i64)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?;

        settings = Self::apply_env_overrides(settings)?;

        settings.build()?.try_deserialize()
    }

    fn default_timeout(is_production: bool) -> u64 {
        if is_production { 30 } else { 15 }
    }

    fn is_production_environment() -> bool {
        std::env::var("ENVIRONMENT")
            .or_else(|_| std::env::var("ENV"))
            .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
            .unwrap_or(false)
    }

    fn apply_env_overrides(
        mut settings: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        let env_mappings = [
            ("PORT", "port"),
            ("WHOIS_PORT", "whois_port"),
            ("IANA_WHOIS_SERVER", "iana_server"),
            ("WHOIS_TIMEOUT_SECONDS", "whois_timeout_seconds"),
            ("WHOIS_TIMEOUT", "whois_timeout_seconds"),
            ("MAX_RESPONSE_SIZE", "max_response_size"),
            ("MAX_REFERRALS", "max_referrals"),
            ("LOG_FILTER", "log_filter"),
        ];

        for (env_var, config_key) in env_mappings {
            if let Ok(value) = std::env::var(env_var) {
                settings = settings.set_override(config_key, value)?;
            }
        }

        Ok(settings)
    }
}
