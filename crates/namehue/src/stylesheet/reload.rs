//! Telling clients the stylesheet changed.
//!
//! After each successful stylesheet write the publisher calls
//! [`ReloadNotifier::reload`]. Notifiers must not block: anything slow
//! (network requests) belongs on a background thread. Errors are logged by
//! the publisher and otherwise ignored.

/// Error returned by a notifier that could not even start a reload.
pub type ReloadError = Box<dyn std::error::Error + Send + Sync>;

/// Distributes an updated stylesheet to connected clients.
pub trait ReloadNotifier: Send + Sync {
    fn reload(&self) -> Result<(), ReloadError>;
}

/// A notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReload;

impl ReloadNotifier for NoopReload {
    fn reload(&self) -> Result<(), ReloadError> {
        Ok(())
    }
}

#[cfg(feature = "http")]
pub use http::HttpReload;

#[cfg(feature = "http")]
mod http {
    use super::{ReloadError, ReloadNotifier};
    use crate::config::Config;

    /// Requests a URL (typically the client's custom-CSS endpoint) on a
    /// background thread and logs the response status.
    #[derive(Debug, Clone)]
    pub struct HttpReload {
        url: String,
        client: reqwest::blocking::Client,
    }

    impl HttpReload {
        pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
            Ok(Self {
                url: url.into(),
                client: reqwest::blocking::Client::builder().build()?,
            })
        }

        /// Uses [`Config::reload_url`].
        pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
            Self::new(config.reload_url())
        }

        pub fn url(&self) -> &str {
            &self.url
        }
    }

    impl ReloadNotifier for HttpReload {
        fn reload(&self) -> Result<(), ReloadError> {
            let url = self.url.clone();
            let client = self.client.clone();
            std::thread::Builder::new()
                .name("namehue-reload".to_string())
                .spawn(move || match client.get(&url).send() {
                    Ok(response) => tracing::info!(
                        url = %url,
                        status = %response.status(),
                        "stylesheet reload requested"
                    ),
                    Err(e) => tracing::warn!(
                        url = %url,
                        error = %e,
                        "stylesheet reload request failed"
                    ),
                })?;
            Ok(())
        }
    }
}
