use serde::de::DeserializeOwned;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// The static JSON documents the site is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Navbar,
    Routes,
    Home,
    Social,
    About,
    Skills,
    Education,
    Experiences,
    Projects,
}

impl Endpoint {
    pub fn relative_path(self) -> &'static str {
        match self {
            Endpoint::Navbar => "profile/navbar.json",
            Endpoint::Routes => "profile/routes.json",
            Endpoint::Home => "profile/home.json",
            Endpoint::Social => "profile/social.json",
            Endpoint::About => "profile/about.json",
            Endpoint::Skills => "profile/skills.json",
            Endpoint::Education => "profile/education.json",
            Endpoint::Experiences => "profile/experiences.json",
            Endpoint::Projects => "profile/projects.json",
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {endpoint}: {source}")]
    Read {
        endpoint: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected shape in {endpoint}: {source}")]
    Shape {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads content documents from a directory laid out like the deployed
/// `public/` folder.
#[derive(Debug, Clone)]
pub struct ContentClient {
    root: PathBuf,
}

impl ContentClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ContentError> {
        let name = endpoint.relative_path();
        let bytes = fs::read(self.root.join(name))
            .await
            .map_err(|source| ContentError::Read { endpoint: name, source })?;
        serde_json::from_slice(&bytes).map_err(|source| ContentError::Shape { endpoint: name, source })
    }
}
