use crate::content::{ContentClient, ContentError, Endpoint};
use crate::models::{
    AboutData, EducationData, ExperiencesData, HomeData, ProjectsData, SkillsData, SocialData,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Every section the site knows how to render. Route descriptors name one of
/// these by its component string; anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Home,
    About,
    Skills,
    Education,
    Experience,
    Projects,
}

impl SectionKind {
    pub const COUNT: usize = 6;

    pub const ALL: [SectionKind; Self::COUNT] = [
        SectionKind::Home,
        SectionKind::About,
        SectionKind::Skills,
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Projects,
    ];

    pub fn from_component(component: &str) -> Option<Self> {
        match component {
            "Home" => Some(SectionKind::Home),
            "About" => Some(SectionKind::About),
            "Skills" => Some(SectionKind::Skills),
            "Education" => Some(SectionKind::Education),
            "Experience" => Some(SectionKind::Experience),
            "Projects" => Some(SectionKind::Projects),
            _ => None,
        }
    }

    pub fn component(self) -> &'static str {
        match self {
            SectionKind::Home => "Home",
            SectionKind::About => "About",
            SectionKind::Skills => "Skills",
            SectionKind::Education => "Education",
            SectionKind::Experience => "Experience",
            SectionKind::Projects => "Projects",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A loaded section: its kind plus the content it renders.
#[derive(Debug, Clone)]
pub enum Section {
    Home { home: HomeData, social: SocialData },
    About(AboutData),
    Skills(SkillsData),
    Education(EducationData),
    Experience(ExperiencesData),
    Projects(ProjectsData),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Home { .. } => SectionKind::Home,
            Section::About(_) => SectionKind::About,
            Section::Skills(_) => SectionKind::Skills,
            Section::Education(_) => SectionKind::Education,
            Section::Experience(_) => SectionKind::Experience,
            Section::Projects(_) => SectionKind::Projects,
        }
    }
}

#[async_trait]
pub trait SectionLoader: Send + Sync {
    async fn load(&self, kind: SectionKind) -> Result<Section, ContentError>;
}

/// Loads a section by fetching its content document.
pub struct ContentSectionLoader {
    content: ContentClient,
}

impl ContentSectionLoader {
    pub fn new(content: ContentClient) -> Self {
        Self { content }
    }
}

#[async_trait]
impl SectionLoader for ContentSectionLoader {
    async fn load(&self, kind: SectionKind) -> Result<Section, ContentError> {
        debug!(component = kind.component(), "loading section");
        let section = match kind {
            SectionKind::Home => {
                let home = self.content.fetch(Endpoint::Home).await?;
                // Social links are decoration on the home page.
                let social = match self.content.fetch(Endpoint::Social).await {
                    Ok(social) => social,
                    Err(err) => {
                        warn!("social links unavailable: {err}");
                        SocialData::default()
                    }
                };
                Section::Home { home, social }
            }
            SectionKind::About => Section::About(self.content.fetch(Endpoint::About).await?),
            SectionKind::Skills => Section::Skills(self.content.fetch(Endpoint::Skills).await?),
            SectionKind::Education => {
                Section::Education(self.content.fetch(Endpoint::Education).await?)
            }
            SectionKind::Experience => {
                Section::Experience(self.content.fetch(Endpoint::Experiences).await?)
            }
            SectionKind::Projects => {
                Section::Projects(self.content.fetch(Endpoint::Projects).await?)
            }
        };
        Ok(section)
    }
}

/// Lazily loads each section on first use and keeps it for the life of the
/// process. Failed loads are not cached.
pub struct SectionRegistry {
    loader: Arc<dyn SectionLoader>,
    cells: [OnceCell<Arc<Section>>; SectionKind::COUNT],
}

impl SectionRegistry {
    pub fn new(loader: Arc<dyn SectionLoader>) -> Self {
        Self {
            loader,
            cells: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    pub async fn get(&self, kind: SectionKind) -> Result<Arc<Section>, ContentError> {
        self.cells[kind.index()]
            .get_or_try_init(|| async { self.loader.load(kind).await.map(Arc::new) })
            .await
            .cloned()
    }

    pub fn is_loaded(&self, kind: SectionKind) -> bool {
        self.cells[kind.index()].initialized()
    }
}
