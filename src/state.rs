use crate::admin::AdminGate;
use crate::config::Config;
use crate::content::ContentClient;
use crate::errors::StartupError;
use crate::recorder::{GeoLocator, IpApiLocator, KeywordAgentParser, NoLocator, Recorder};
use crate::routes::RouteTableHandle;
use crate::sections::{ContentSectionLoader, SectionLoader, SectionRegistry};
use crate::storage::{JsonFileStore, PageViewStore};
use crate::theme::ThemeStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub content: ContentClient,
    pub routes: Arc<RouteTableHandle>,
    pub sections: Arc<SectionRegistry>,
    pub theme: Arc<ThemeStore>,
    pub store: Arc<dyn PageViewStore>,
    pub recorder: Recorder,
    pub admin: AdminGate,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn PageViewStore>,
        locator: Arc<dyn GeoLocator>,
        loader: Arc<dyn SectionLoader>,
    ) -> Self {
        let content = ContentClient::new(config.content_dir.clone());
        let recorder = Recorder::new(Arc::clone(&store), locator, Arc::new(KeywordAgentParser));
        Self {
            content,
            routes: Arc::new(RouteTableHandle::new()),
            sections: Arc::new(SectionRegistry::new(loader)),
            theme: Arc::new(ThemeStore::new(config.dark_by_default)),
            store,
            recorder,
            admin: AdminGate::new(config.admin_password_hash.clone()),
            config: Arc::new(config),
        }
    }

    /// Wires the production collaborators: file-backed store, content
    /// directory loader, and the HTTP country lookup when configured.
    pub async fn from_config(config: Config) -> Result<Self, StartupError> {
        let store: Arc<dyn PageViewStore> = Arc::new(JsonFileStore::open(&config.data_path).await?);
        let locator: Arc<dyn GeoLocator> = match &config.geo_lookup_url {
            Some(url) => Arc::new(IpApiLocator::new(url.clone(), config.geo_timeout)?),
            None => Arc::new(NoLocator),
        };
        let loader = Arc::new(ContentSectionLoader::new(ContentClient::new(
            config.content_dir.clone(),
        )));
        Ok(Self::new(config, store, locator, loader))
    }
}
