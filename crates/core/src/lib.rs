pub mod client;
pub mod dashboard;
pub mod domain;
pub mod history;
pub mod notify;
pub mod session;
pub mod storage;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;
    use std::time::Duration;

    pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub data_dir: Option<PathBuf>,
        pub http_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let http_timeout_secs = match std::env::var("BIZADVISOR_HTTP_TIMEOUT_SECS") {
                Ok(s) => parse_timeout_secs(&s)?,
                Err(_) => None,
            };

            Ok(Self {
                api_base_url: std::env::var("BIZADVISOR_API_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                data_dir: std::env::var_os("BIZADVISOR_DATA_DIR").map(PathBuf::from),
                http_timeout_secs,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn api_base_url(&self) -> &str {
            self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
        }

        /// `None` leaves the transport's own default in place. Zero means no
        /// timeout.
        pub fn http_timeout(&self) -> Option<Duration> {
            self.http_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
        }

        pub fn resolve_data_dir(&self) -> anyhow::Result<PathBuf> {
            if let Some(dir) = &self.data_dir {
                return Ok(dir.clone());
            }
            let dirs = directories::ProjectDirs::from("", "", "bizadvisor")
                .context("no home directory found; set BIZADVISOR_DATA_DIR")?;
            Ok(dirs.data_dir().to_path_buf())
        }
    }

    fn parse_timeout_secs(raw: &str) -> anyhow::Result<Option<u64>> {
        let secs = raw.trim().parse::<u64>().with_context(|| {
            format!("BIZADVISOR_HTTP_TIMEOUT_SECS must be a whole number of seconds (got {raw:?})")
        })?;
        Ok(Some(secs).filter(|secs| *secs > 0))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn zero_timeout_disables_it() {
            assert_eq!(parse_timeout_secs("0").unwrap(), None);
            assert_eq!(parse_timeout_secs(" 30 ").unwrap(), Some(30));
            assert!(parse_timeout_secs("soon").is_err());

            let settings = Settings {
                http_timeout_secs: Some(0),
                ..Settings::default()
            };
            assert_eq!(settings.http_timeout(), None);
        }

        #[test]
        fn defaults_to_local_service() {
            let settings = Settings::default();
            assert_eq!(settings.api_base_url(), DEFAULT_API_BASE_URL);
            assert_eq!(settings.http_timeout(), None);
        }

        #[test]
        fn explicit_values_win() {
            let settings = Settings {
                api_base_url: Some("https://advisor.example.com".to_string()),
                data_dir: Some(PathBuf::from("/tmp/bizadvisor")),
                http_timeout_secs: Some(15),
                sentry_dsn: None,
            };
            assert_eq!(settings.api_base_url(), "https://advisor.example.com");
            assert_eq!(settings.http_timeout(), Some(Duration::from_secs(15)));
            assert_eq!(
                settings.resolve_data_dir().unwrap(),
                PathBuf::from("/tmp/bizadvisor")
            );
        }
    }
}
