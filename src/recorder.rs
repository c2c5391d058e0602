use crate::models::NewPageView;
use crate::routes::normalize_path;
use crate::stats::UNKNOWN;
use crate::storage::{PageViewStore, StoreError};
use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const ADMIN_PREFIX: &str = "/admin";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("country lookup failed: {0}")]
    Lookup(#[from] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the request tells us about the visitor.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Country name for the address, `None` when unknown.
    async fn country(&self, ip: IpAddr) -> Result<Option<String>, RecordError>;
}

/// Looks countries up against an ipapi-compatible `/{ip}/json/` endpoint.
pub struct IpApiLocator {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiLocator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RecordError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    country_name: Option<String>,
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn country(&self, ip: IpAddr) -> Result<Option<String>, RecordError> {
        if !is_public(ip) {
            return Ok(None);
        }
        let response: IpApiResponse = self
            .client
            .get(format!("{}/{ip}/json/", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.country_name)
    }
}

/// Used when lookups are switched off.
pub struct NoLocator;

#[async_trait]
impl GeoLocator for NoLocator {
    async fn country(&self, _ip: IpAddr) -> Result<Option<String>, RecordError> {
        Ok(None)
    }
}

fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            // fc00::/7 unique-local and fe80::/10 link-local
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80)
        }
    }
}

pub trait AgentParser: Send + Sync {
    /// `(browser, os)`, each `None` when not recognised.
    fn parse(&self, user_agent: &str) -> (Option<String>, Option<String>);
}

/// Recognises the common browser and OS families by their UA tokens.
pub struct KeywordAgentParser;

impl AgentParser for KeywordAgentParser {
    fn parse(&self, user_agent: &str) -> (Option<String>, Option<String>) {
        (browser_family(user_agent), os_family(user_agent))
    }
}

fn browser_family(ua: &str) -> Option<String> {
    // Order matters: Edge and Opera also advertise Chrome, Chrome advertises Safari.
    const BROWSERS: &[(&str, &str)] = &[
        ("Edg/", "Edge"),
        ("OPR/", "Opera"),
        ("Opera", "Opera"),
        ("SamsungBrowser", "Samsung Browser"),
        ("Firefox/", "Firefox"),
        ("FxiOS", "Firefox"),
        ("CriOS", "Chrome"),
        ("Chromium/", "Chromium"),
        ("Chrome/", "Chrome"),
        ("Safari/", "Safari"),
        ("MSIE ", "IE"),
        ("Trident/", "IE"),
    ];
    BROWSERS
        .iter()
        .find(|(token, _)| ua.contains(token))
        .map(|(_, name)| name.to_string())
}

fn os_family(ua: &str) -> Option<String> {
    const SYSTEMS: &[(&str, &str)] = &[
        ("Windows", "Windows"),
        ("iPhone", "iOS"),
        ("iPad", "iOS"),
        ("Android", "Android"),
        ("CrOS", "Chromium OS"),
        ("Mac OS X", "Mac OS"),
        ("Macintosh", "Mac OS"),
        ("Ubuntu", "Ubuntu"),
        ("Linux", "Linux"),
    ];
    SYSTEMS
        .iter()
        .find(|(token, _)| ua.contains(token))
        .map(|(_, name)| name.to_string())
}

pub fn is_admin_path(path: &str) -> bool {
    normalize_path(path).starts_with(ADMIN_PREFIX)
}

/// Requests for files (`/favicon.ico`, `/images/logo.png`) are not page
/// navigations, whether or not the file exists.
pub fn is_asset_path(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

/// Writes one page view per navigation, off the request path.
#[derive(Clone)]
pub struct Recorder {
    store: Arc<dyn PageViewStore>,
    locator: Arc<dyn GeoLocator>,
    agents: Arc<dyn AgentParser>,
}

impl Recorder {
    pub fn new(
        store: Arc<dyn PageViewStore>,
        locator: Arc<dyn GeoLocator>,
        agents: Arc<dyn AgentParser>,
    ) -> Self {
        Self {
            store,
            locator,
            agents,
        }
    }

    /// Spawns the write and returns immediately. Admin and asset paths are
    /// never recorded and spawn nothing. The handle exists for tests; callers drop it.
    pub fn record(&self, path: &str, client: ClientInfo) -> Option<JoinHandle<()>> {
        if is_admin_path(path) {
            debug!(path, "not recording admin page view");
            return None;
        }
        if is_asset_path(path) {
            debug!(path, "not recording asset request");
            return None;
        }
        let recorder = self.clone();
        let path = path.to_string();
        Some(tokio::spawn(async move {
            if let Err(err) = recorder.write(path, client).await {
                warn!("failed to record page view: {err}");
            }
        }))
    }

    async fn write(&self, path: String, client: ClientInfo) -> Result<(), RecordError> {
        let country = match client.ip {
            Some(ip) => match self.locator.country(ip).await {
                Ok(country) => country,
                Err(err) => {
                    warn!("{err}");
                    None
                }
            },
            None => None,
        };
        let (browser, os) = client
            .user_agent
            .as_deref()
            .map(|ua| self.agents.parse(ua))
            .unwrap_or((None, None));

        let view = NewPageView {
            path,
            country: or_unknown(country),
            browser: or_unknown(browser),
            os: or_unknown(os),
        };
        let record = self.store.insert(view).await?;
        debug!(id = %record.id, path = %record.path, "page view recorded");
        Ok(())
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
