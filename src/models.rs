use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub component: String,
    pub path: String,
    pub header_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutesData {
    #[serde(default)]
    pub sections: Vec<RouteDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NavbarData {
    pub logo: Option<NavbarLogo>,
    #[serde(default)]
    pub sections: Vec<NavbarSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavbarLogo {
    pub source: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavbarSection {
    pub title: String,
    pub href: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl NavbarSection {
    pub fn is_external(&self) -> bool {
        self.kind.as_deref() == Some("link")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeData {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SocialData {
    #[serde(default)]
    pub social: Vec<SocialLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub network: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutData {
    pub about: String,
    pub image_source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsData {
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub title: String,
    #[serde(default)]
    pub items: Vec<SkillItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillItem {
    pub title: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationData {
    #[serde(default)]
    pub education: Vec<EducationItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub title: String,
    pub card_title: String,
    #[serde(default)]
    pub card_subtitle: String,
    #[serde(default)]
    pub card_detailed_text: DetailedText,
    pub icon: Option<EducationIcon>,
}

/// `cardDetailedText` is either one paragraph or a list of lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailedText {
    One(String),
    Many(Vec<String>),
}

impl Default for DetailedText {
    fn default() -> Self {
        DetailedText::Many(Vec::new())
    }
}

impl DetailedText {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            DetailedText::One(text) => vec![text.as_str()],
            DetailedText::Many(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationIcon {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperiencesData {
    #[serde(default)]
    pub experiences: Vec<ExperienceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub date_text: String,
    pub work_type: Option<String>,
    #[serde(default)]
    pub work_description: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsData {
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: Option<String>,
    pub body_text: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub demo: Option<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLink {
    pub text: String,
    pub href: String,
}

/// One row of the `page_views` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageViewRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub path: String,
    pub country: String,
    pub browser: Option<String>,
    pub os: Option<String>,
}

/// Insert payload; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPageView {
    pub path: String,
    pub country: String,
    pub browser: String,
    pub os: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageViewData {
    #[serde(default)]
    pub views: Vec<PageViewRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageStat {
    pub name: String,
    pub views: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SliceStat {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_views: u64,
    pub pages: Vec<PageStat>,
    pub countries: Vec<SliceStat>,
    pub browsers: Vec<SliceStat>,
    pub operating_systems: Vec<SliceStat>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub dark: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub applied: bool,
    pub routes: usize,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub all: Option<String>,
}
