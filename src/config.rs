use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PAPER_API_URL is not a valid URL ({value}): {source}")]
    InvalidApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub api_token: Option<String>,
    pub download_folder: PathBuf,
    pub creator_id: i64,
    pub academic_year_id: i64,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw_url = std::env::var("PAPER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidApiUrl {
            value: raw_url.clone(),
            source,
        })?;

        let api_token = std::env::var("PAPER_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let download_folder = base_dir.join(
            std::env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "downloads".to_string()),
        );

        Ok(Self {
            api_url,
            api_token,
            download_folder,
            creator_id: env_number("PAPER_CREATOR_ID", 1),
            academic_year_id: env_number("ACADEMIC_YEAR_ID", 1),
            request_timeout: Duration::from_secs(env_number("REQUEST_TIMEOUT_SECS", 120)),
        })
    }

    /// Config pointing at `api_url` with every other setting at its default.
    pub fn for_base_url(api_url: Url) -> Self {
        Self {
            api_url,
            api_token: None,
            download_folder: PathBuf::from("downloads"),
            creator_id: 1,
            academic_year_id: 1,
            request_timeout: Duration::from_secs(120),
        }
    }
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_base_url_uses_defaults() {
        let config = Config::for_base_url(Url::parse("http://example.test/api/v1").unwrap());
        assert_eq!(config.api_url.as_str(), "http://example.test/api/v1");
        assert!(config.api_token.is_none());
        assert_eq!(config.creator_id, 1);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn env_number_falls_back_on_garbage() {
        std::env::set_var("PAPER_TRANSFER_TEST_NUMBER", "not-a-number");
        assert_eq!(env_number("PAPER_TRANSFER_TEST_NUMBER", 7u64), 7);
        std::env::set_var("PAPER_TRANSFER_TEST_NUMBER", " 42 ");
        assert_eq!(env_number("PAPER_TRANSFER_TEST_NUMBER", 7u64), 42);
        std::env::remove_var("PAPER_TRANSFER_TEST_NUMBER");
    }
}
