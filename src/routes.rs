use crate::content::{ContentClient, ContentError, Endpoint};
use crate::models::{RouteDescriptor, RoutesData};
use crate::sections::SectionKind;
use serde::Serialize;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};
use tracing::{debug, info, warn};

pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub path: String,
    pub component: String,
    pub header_title: String,
    #[serde(skip)]
    pub kind: SectionKind,
}

impl RouteEntry {
    fn root() -> Self {
        Self {
            path: ROOT_PATH.to_string(),
            component: SectionKind::Home.component().to_string(),
            header_title: "Home".to_string(),
            kind: SectionKind::Home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Found(&'a RouteEntry),
    NotFound,
}

/// The navigable routes: the implicit root entry followed by every fetched
/// descriptor whose component names a known section, in fetched order.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_descriptors(&[])
    }
}

impl RouteTable {
    pub fn from_descriptors(descriptors: &[RouteDescriptor]) -> Self {
        let mut entries = Vec::with_capacity(descriptors.len() + 1);
        entries.push(RouteEntry::root());

        for descriptor in descriptors {
            let Some(kind) = SectionKind::from_component(&descriptor.component) else {
                debug!(component = %descriptor.component, "skipping route with unknown component");
                continue;
            };
            entries.push(RouteEntry {
                path: normalize_path(&descriptor.path),
                component: descriptor.component.clone(),
                header_title: descriptor.header_title.clone(),
                kind,
            });
        }

        Self { entries }
    }

    /// Root is checked first, then entries in order; the first match wins.
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        let path = normalize_path(path);
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map_or(RouteMatch::NotFound, RouteMatch::Found)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Fetched routes, excluding the implicit root.
    pub fn fetched_len(&self) -> usize {
        self.entries.len() - 1
    }
}

/// Leading slash, no trailing slash, and runs of `/` collapsed to one.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.trim().split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Applied { routes: usize },
    /// A newer refresh started while this one was in flight.
    Stale,
    Failed(ContentError),
}

/// Shared, replaceable route table. Each refresh takes a generation ticket and
/// only the newest in-flight refresh may install its result.
#[derive(Debug, Default)]
pub struct RouteTableHandle {
    current: RwLock<Arc<RouteTable>>,
    generation: AtomicU64,
}

impl RouteTableHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Arc<RouteTable> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub fn begin_refresh(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Installs `result` if `ticket` is still the newest refresh. Failures keep
    /// the current table.
    pub fn complete_refresh(
        &self,
        ticket: u64,
        result: Result<RoutesData, ContentError>,
    ) -> RefreshOutcome {
        // The generation is compared under the write lock so an older result
        // can never land after a newer one.
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "discarding stale route list");
            return RefreshOutcome::Stale;
        }
        match result {
            Ok(data) => {
                let table = Arc::new(RouteTable::from_descriptors(&data.sections));
                let routes = table.fetched_len();
                *current = table;
                drop(current);
                info!(routes, "route table replaced");
                RefreshOutcome::Applied { routes }
            }
            Err(err) => {
                warn!("route list fetch failed, keeping current routes: {err}");
                RefreshOutcome::Failed(err)
            }
        }
    }

    pub async fn refresh(&self, content: &ContentClient) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        let result = content.fetch::<RoutesData>(Endpoint::Routes).await;
        self.complete_refresh(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::{content_dir, write};

    fn descriptor(component: &str, path: &str, title: &str) -> RouteDescriptor {
        RouteDescriptor {
            component: component.to_string(),
            path: path.to_string(),
            header_title: title.to_string(),
        }
    }

    fn routes(descriptors: Vec<RouteDescriptor>) -> RoutesData {
        RoutesData { sections: descriptors }
    }

    fn offline() -> ContentError {
        ContentError::Read {
            endpoint: "profile/routes.json",
            source: std::io::Error::other("offline"),
        }
    }

    #[test]
    fn empty_table_still_serves_root() {
        let table = RouteTable::default();
        assert_eq!(table.entries().len(), 1);
        match table.resolve("/") {
            RouteMatch::Found(entry) => assert_eq!(entry.kind, SectionKind::Home),
            RouteMatch::NotFound => panic!("root missing"),
        }
    }

    #[test]
    fn root_cannot_be_shadowed_by_fetched_route() {
        let table = RouteTable::from_descriptors(&[
            descriptor("Projects", "/", "Projects"),
            descriptor("About", "/about", "About"),
        ]);
        match table.resolve("/") {
            RouteMatch::Found(entry) => assert_eq!(entry.kind, SectionKind::Home),
            RouteMatch::NotFound => panic!("root missing"),
        }
        assert_eq!(table.entries()[0].path, "/");
    }

    #[test]
    fn fetched_routes_resolve_and_unknown_paths_do_not() {
        let table = RouteTable::from_descriptors(&[descriptor("Skills", "/skills", "Skills")]);
        match table.resolve("/skills/") {
            RouteMatch::Found(entry) => {
                assert_eq!(entry.kind, SectionKind::Skills);
                assert_eq!(entry.header_title, "Skills");
            }
            RouteMatch::NotFound => panic!("skills missing"),
        }
        assert_eq!(table.resolve("/unknown"), RouteMatch::NotFound);
    }

    #[test]
    fn first_descriptor_wins_for_duplicate_paths() {
        let table = RouteTable::from_descriptors(&[
            descriptor("About", "/me", "About Me"),
            descriptor("Skills", "/me", "Skills"),
        ]);
        match table.resolve("/me") {
            RouteMatch::Found(entry) => assert_eq!(entry.kind, SectionKind::About),
            RouteMatch::NotFound => panic!("route missing"),
        }
    }

    #[test]
    fn unknown_components_register_no_route() {
        let table = RouteTable::from_descriptors(&[
            descriptor("../../secrets", "/secrets", "Secrets"),
            descriptor("Education", "/education", "Education"),
        ]);
        assert_eq!(table.fetched_len(), 1);
        assert_eq!(table.resolve("/secrets"), RouteMatch::NotFound);
        assert!(matches!(table.resolve("/education"), RouteMatch::Found(_)));
    }

    #[test]
    fn normalize_handles_missing_and_trailing_slashes() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("about"), "/about");
        assert_eq!(normalize_path("/about//"), "/about");
        assert_eq!(normalize_path("//admin"), "/admin");
        assert_eq!(normalize_path("///admin//x"), "/admin/x");
        assert_eq!(normalize_path("//"), "/");
    }

    #[test]
    fn refresh_replaces_whole_table() {
        let handle = RouteTableHandle::new();
        let ticket = handle.begin_refresh();
        handle.complete_refresh(
            ticket,
            Ok(routes(vec![
                descriptor("About", "/about", "About"),
                descriptor("Skills", "/skills", "Skills"),
            ])),
        );
        assert_eq!(handle.current().fetched_len(), 2);

        let ticket = handle.begin_refresh();
        let outcome = handle.complete_refresh(ticket, Ok(routes(vec![descriptor("Projects", "/projects", "Projects")])));
        assert!(matches!(outcome, RefreshOutcome::Applied { routes: 1 }));

        let table = handle.current();
        assert_eq!(table.resolve("/about"), RouteMatch::NotFound);
        assert!(matches!(table.resolve("/projects"), RouteMatch::Found(_)));
    }

    #[test]
    fn failed_refresh_keeps_existing_routes() {
        let handle = RouteTableHandle::new();
        let ticket = handle.begin_refresh();
        handle.complete_refresh(ticket, Ok(routes(vec![descriptor("About", "/about", "About")])));

        let ticket = handle.begin_refresh();
        let outcome = handle.complete_refresh(ticket, Err(offline()));
        assert!(matches!(outcome, RefreshOutcome::Failed(_)));
        assert!(matches!(handle.current().resolve("/about"), RouteMatch::Found(_)));
    }

    #[test]
    fn stale_refresh_result_is_discarded() {
        let handle = RouteTableHandle::new();
        let older = handle.begin_refresh();
        let newer = handle.begin_refresh();

        let outcome = handle.complete_refresh(newer, Ok(routes(vec![descriptor("Skills", "/skills", "Skills")])));
        assert!(matches!(outcome, RefreshOutcome::Applied { .. }));

        let outcome = handle.complete_refresh(older, Ok(routes(vec![descriptor("About", "/about", "About")])));
        assert!(matches!(outcome, RefreshOutcome::Stale));
        assert!(matches!(handle.current().resolve("/skills"), RouteMatch::Found(_)));
        assert_eq!(handle.current().resolve("/about"), RouteMatch::NotFound);
    }

    #[test]
    fn newest_refresh_wins_under_contention() {
        const REFRESHES: usize = 16;
        let handle = RouteTableHandle::new();
        let barrier = std::sync::Barrier::new(REFRESHES);

        for _ in 0..50 {
            std::thread::scope(|scope| {
                for _ in 0..REFRESHES {
                    scope.spawn(|| {
                        barrier.wait();
                        let ticket = handle.begin_refresh();
                        let path = format!("/r{ticket}");
                        handle.complete_refresh(ticket, Ok(routes(vec![descriptor("About", &path, "About")])));
                    });
                }
            });

            let newest = handle.generation.load(Ordering::SeqCst);
            let expected = format!("/r{newest}");
            assert!(
                matches!(handle.current().resolve(&expected), RouteMatch::Found(_)),
                "table from ticket {newest} was overwritten"
            );
        }
    }

    #[tokio::test]
    async fn refresh_reads_routes_document() {
        let root = content_dir("routes");
        write(
            &root,
            "routes.json",
            r#"{"sections":[{"component":"Skills","path":"/skills","headerTitle":"Skills"}]}"#,
        );
        let handle = RouteTableHandle::new();
        let outcome = handle.refresh(&ContentClient::new(&root)).await;
        assert!(matches!(outcome, RefreshOutcome::Applied { routes: 1 }));

        let missing = content_dir("routes_missing");
        let outcome = handle.refresh(&ContentClient::new(&missing)).await;
        assert!(matches!(outcome, RefreshOutcome::Failed(_)));
        assert_eq!(handle.current().fetched_len(), 1);
    }
}
