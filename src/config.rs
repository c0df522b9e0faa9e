use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use url::Url;

pub static CONFIG_FILE: &str = "config.toml";
pub static ENV_PREFIX: &str = "SONG_RESOLVER_";

pub static BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Sent on every upstream request, the provider rejects non-browser clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 0 disables caching
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// 0 disables caching
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
    #[serde(default)]
    pub bandlab: BandlabConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BandlabConfig {
    #[serde(default = "default_site_origin")]
    pub site_origin: Url,
    #[serde(default = "default_api_base")]
    pub api_base: Url,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8788))
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.into()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    1024
}

fn default_site_origin() -> Url {
    Url::parse("https://www.bandlab.com").unwrap()
}

fn default_api_base() -> Url {
    Url::parse("https://www.bandlab.com/api/v1.3").unwrap()
}

impl Default for BandlabConfig {
    fn default() -> Self {
        Self {
            site_origin: default_site_origin(),
            api_base: default_api_base(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            cache_max_entries: default_cache_max_entries(),
            bandlab: BandlabConfig::default(),
        }
    }
}

impl Config {
    pub fn get_config() -> Result<Self> {
        Ok(Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Shared upstream client. Only the connect phase is bounded here so relayed
    /// audio can stream for as long as it needs to.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .build()?)
    }
}

#[cfg(test)]
mod test {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = Config::get_config().map_err(|e| e.to_string())?;
            assert_eq!(config.listen, default_listen());
            assert_eq!(config.user_agent, BROWSER_USER_AGENT);
            assert_eq!(config.cache_ttl_secs, 300);
            assert_eq!(config.cache_max_entries, 1024);
            assert_eq!(config.bandlab.site_origin.as_str(), "https://www.bandlab.com/");
            assert_eq!(
                config.bandlab.api_base.as_str(),
                "https://www.bandlab.com/api/v1.3"
            );
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    listen = "0.0.0.0:9000"
                    cache_ttl_secs = 60
                    cache_max_entries = 10

                    [bandlab]
                    api_base = "http://localhost:1234/api"
                "#,
            )?;
            jail.set_env("SONG_RESOLVER_CACHE_TTL_SECS", "0");
            jail.set_env("SONG_RESOLVER_BANDLAB__SITE_ORIGIN", "http://localhost:1234");

            let config = Config::get_config().map_err(|e| e.to_string())?;
            assert_eq!(config.listen, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
            assert_eq!(config.cache_ttl_secs, 0);
            assert_eq!(config.cache_max_entries, 10);
            assert_eq!(config.bandlab.api_base.as_str(), "http://localhost:1234/api");
            assert_eq!(config.bandlab.site_origin.as_str(), "http://localhost:1234/");
            Ok(())
        });
    }

    #[test]
    fn bad_listen_address() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, r#"listen = "not an address""#)?;
            assert!(Config::get_config().is_err());
            Ok(())
        });
    }
}
