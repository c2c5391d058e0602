use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    handler::Handler,
    routing::{get, post},
};
use tower_http::services::ServeDir;

pub fn router(state: AppState) -> Router {
    let base_path = state.config.base_path.clone();
    // Files under the content directory (images, favicon, profile documents)
    // are served as-is. Any other GET is a page navigation.
    let pages = handlers::page.with_state(state.clone());
    let files = ServeDir::new(&state.config.content_dir).fallback(pages);

    let app = Router::new()
        .route("/", get(handlers::page))
        .route("/admin", get(handlers::admin_page).post(handlers::admin_login))
        .route("/theme/toggle", post(handlers::theme_toggle))
        .route("/theme/enable", post(handlers::theme_enable))
        .route("/theme/disable", post(handlers::theme_disable))
        .route("/api/theme", get(handlers::get_theme))
        .route("/api/routes", get(handlers::get_routes))
        .route("/api/routes/refresh", post(handlers::refresh_routes))
        .route("/api/views/count", get(handlers::views_count))
        .route("/healthz", get(handlers::healthz))
        .fallback_service(files)
        .with_state(state);

    if base_path.is_empty() {
        app
    } else {
        Router::new().nest(&base_path, app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::testing::hash;
    use crate::config::Config;
    use crate::content::fixtures::content_dir;
    use crate::models::{RouteDescriptor, RoutesData};
    use crate::recorder::NoLocator;
    use crate::sections::testing::CountingLoader;
    use crate::sections::SectionKind;
    use crate::storage::testing::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Harness {
        state: AppState,
        store: Arc<MemoryStore>,
        loader: Arc<CountingLoader>,
    }

    fn harness(config: Config, loader: CountingLoader) -> Harness {
        let store = Arc::new(MemoryStore::default());
        let loader = Arc::new(loader);
        let state = AppState::new(config, store.clone(), Arc::new(NoLocator), loader.clone());
        let ticket = state.routes.begin_refresh();
        state.routes.complete_refresh(
            ticket,
            Ok(RoutesData {
                sections: vec![RouteDescriptor {
                    component: "Skills".to_string(),
                    path: "/skills".to_string(),
                    header_title: "Skills".to_string(),
                }],
            }),
        );
        Harness { state, store, loader }
    }

    fn admin_config() -> Config {
        Config {
            admin_password_hash: Some(hash("letmein")),
            geo_lookup_url: None,
            ..Config::default()
        }
    }

    async fn send(state: &AppState, request: Request<Body>) -> Response {
        router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn get(state: &AppState, uri: &str) -> Response {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn settle(store: &MemoryStore, expected: usize) {
        for _ in 0..50 {
            if store.len().await >= expected {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    fn login(password: &str) -> Request<Body> {
        Request::post("/admin")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("password={password}")))
            .unwrap()
    }

    #[tokio::test]
    async fn skills_route_renders_after_deferred_load() {
        let h = harness(admin_config(), CountingLoader::default());
        assert!(!h.state.sections.is_loaded(SectionKind::Skills));

        let response = get(&h.state, "/skills").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1 class=\"header\">Skills</h1>"));
        assert!(html.contains("Rust"));

        get(&h.state, "/skills").await;
        assert_eq!(h.loader.calls(), 1);
    }

    #[tokio::test]
    async fn unknown_path_renders_not_found_instead_of_a_section() {
        let h = harness(admin_config(), CountingLoader::default());
        let response = get(&h.state, "/unknown").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("Nothing lives at <code>/unknown</code>"));
        assert!(!html.contains("Test Person"));
        assert!(!html.contains("Things I use"));
        assert_eq!(h.loader.calls(), 0);
    }

    #[tokio::test]
    async fn failed_section_load_renders_fallback() {
        let h = harness(admin_config(), CountingLoader::failing(&[SectionKind::Skills]));
        let response = get(&h.state, "/skills").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("This section is unavailable"));

        let home = body_text(get(&h.state, "/").await).await;
        assert!(home.contains("Test Person"));
    }

    #[tokio::test]
    async fn navigations_are_recorded_except_admin() {
        let h = harness(admin_config(), CountingLoader::default());
        get(&h.state, "/").await;
        get(&h.state, "/skills").await;
        get(&h.state, "/admin").await;
        send(&h.state, login("wrong")).await;
        settle(&h.store, 2).await;

        let views = h.store.views.lock().await;
        let paths: Vec<&str> = views.iter().map(|view| view.path.as_str()).collect();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&"/"));
        assert!(paths.contains(&"/skills"));
        assert!(views.iter().all(|view| view.country == "Unknown"));
    }

    #[tokio::test]
    async fn content_files_are_served_and_not_recorded() {
        let root = content_dir("assets");
        std::fs::create_dir_all(root.join("images")).unwrap();
        std::fs::write(root.join("images").join("logo.png"), b"png-bytes").unwrap();
        let config = Config {
            content_dir: root,
            ..admin_config()
        };
        let h = harness(config, CountingLoader::default());

        let logo = get(&h.state, "/images/logo.png").await;
        assert_eq!(logo.status(), StatusCode::OK);
        assert_eq!(body_text(logo).await, "png-bytes");
        assert_eq!(get(&h.state, "/favicon.ico").await.status(), StatusCode::NOT_FOUND);
        get(&h.state, "//admin").await;
        get(&h.state, "//admin/x").await;
        get(&h.state, "/skills").await;
        settle(&h.store, 1).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let views = h.store.views.lock().await;
        let paths: Vec<&str> = views.iter().map(|view| view.path.as_str()).collect();
        assert_eq!(paths, vec!["/skills"]);
    }

    #[tokio::test]
    async fn malformed_query_still_renders_the_page() {
        let h = harness(admin_config(), CountingLoader::default());
        let response = get(&h.state, "/skills?all=1&all=1").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Rust"));
        settle(&h.store, 1).await;
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn admin_login_gates_the_dashboard() {
        let h = harness(admin_config(), CountingLoader::default());
        get(&h.state, "/").await;
        settle(&h.store, 1).await;

        let rejected = send(&h.state, login("wrong")).await;
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
        let html = body_text(rejected).await;
        assert!(html.contains("Invalid password"));
        assert!(!html.contains("Site Analytics"));

        let accepted = send(&h.state, login("letmein")).await;
        assert_eq!(accepted.status(), StatusCode::OK);
        let html = body_text(accepted).await;
        assert!(html.contains("<h2 id=\"total-views\">1</h2>"));
        assert!(!html.contains("Invalid password"));

        let again = send(&h.state, login("wrong")).await;
        assert_eq!(again.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn dashboard_reports_store_failure() {
        let store = Arc::new(MemoryStore::failing());
        let state = AppState::new(
            admin_config(),
            store,
            Arc::new(NoLocator),
            Arc::new(CountingLoader::default()),
        );
        let response = send(&state, login("letmein")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_text(response).await.contains("Analytics could not be loaded."));
    }

    #[tokio::test]
    async fn theme_actions_flip_the_shared_flag() {
        let h = harness(admin_config(), CountingLoader::default());
        let response = send(
            &h.state,
            Request::post("/theme/toggle")
                .header(header::REFERER, "http://localhost:8080/skills")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/skills");
        assert!(!h.state.theme.is_dark());

        let html = body_text(get(&h.state, "/").await).await;
        assert!(html.contains("action=\"/theme/enable\""));

        send(&h.state, Request::post("/theme/enable").body(Body::empty()).unwrap()).await;
        let theme = body_text(get(&h.state, "/api/theme").await).await;
        assert_eq!(theme, r#"{"dark":true}"#);
    }

    #[tokio::test]
    async fn routes_api_lists_root_first() {
        let h = harness(admin_config(), CountingLoader::default());
        let body = body_text(get(&h.state, "/api/routes").await).await;
        let routes: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(routes[0]["path"], "/");
        assert_eq!(routes[1]["path"], "/skills");
        assert_eq!(routes[1]["headerTitle"], "Skills");
    }

    #[tokio::test]
    async fn base_path_prefixes_every_route() {
        let config = Config {
            base_path: "/portfolio".to_string(),
            ..admin_config()
        };
        let h = harness(config, CountingLoader::default());

        assert_eq!(get(&h.state, "/portfolio/skills").await.status(), StatusCode::OK);
        assert_eq!(get(&h.state, "/skills").await.status(), StatusCode::NOT_FOUND);

        let html = body_text(get(&h.state, "/portfolio/skills").await).await;
        assert!(html.contains("action=\"/portfolio/theme/disable\""));
    }
}
