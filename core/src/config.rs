//! Client configuration: where to send requests and on whose behalf.

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(String),
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Base URL plus the optional account switch key sent as `accountSwitchKey`
/// on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Url,
    pub account_key: Option<String>,
}

impl Config {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            account_key: None,
        }
    }

    /// Parses `base_url`, prefixing `https://` when it has no scheme.
    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        let with_scheme = if base_url.contains("://") {
            base_url.to_string()
        } else {
            format!("https://{base_url}")
        };
        let url = Url::parse(&with_scheme).map_err(|source| ConfigError::InvalidUrl {
            url: with_scheme.clone(),
            source,
        })?;
        Ok(Self::new(url))
    }

    pub fn with_account_key(mut self, key: impl Into<String>) -> Self {
        self.account_key = Some(key.into());
        self
    }

    /// Reads `AKAMAI_HOST` and `AKAMAI_ACCOUNT_KEY`, or the
    /// `AKAMAI_<SECTION>_` prefixed variants when `section` is given.
    pub fn from_env(section: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_lookup(section, |name| std::env::var(name).ok())
    }

    fn from_lookup(
        section: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let prefix = match section {
            Some(section) if !section.is_empty() && !section.eq_ignore_ascii_case("default") => {
                format!("AKAMAI_{}_", section.to_ascii_uppercase())
            }
            _ => "AKAMAI_".to_string(),
        };
        let host_var = format!("{prefix}HOST");
        let host = lookup(&host_var)
            .filter(|host| !host.is_empty())
            .ok_or(ConfigError::Missing(host_var))?;
        let mut config = Self::parse(&host)?;
        config.account_key = lookup(&format!("{prefix}ACCOUNT_KEY")).filter(|key| !key.is_empty());
        Ok(config)
    }
}
