use crate::content::Endpoint;
use crate::errors::AppError;
use crate::models::{
    CountResponse, LoginForm, NavbarData, PageQuery, RefreshResponse, ThemeResponse,
};
use crate::recorder::ClientInfo;
use crate::routes::{RefreshOutcome, RouteEntry, RouteMatch, normalize_path};
use crate::state::AppState;
use crate::stats::build_dashboard;
use crate::ui::{self, Chrome};
use axum::{
    Form, Json,
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::net::{IpAddr, SocketAddr};
use tracing::{error, warn};

pub async fn page(
    State(state): State<AppState>,
    uri: Uri,
    // A malformed query string still renders the page.
    query: Option<Query<PageQuery>>,
    headers: HeaderMap,
    connect: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    let path = normalize_path(uri.path());
    // Fire and forget; the response never waits on it.
    drop(state.recorder.record(&path, client_info(&headers, connect)));

    let table = state.routes.current();
    let (status, title, body) = match table.resolve(&path) {
        RouteMatch::Found(entry) => {
            let show_all = query.is_some_and(|Query(query)| query.all.is_some());
            let body = section_body(&state, entry, show_all).await;
            (StatusCode::OK, entry.header_title.clone(), body)
        }
        RouteMatch::NotFound => (
            StatusCode::NOT_FOUND,
            "Not found".to_string(),
            ui::render_not_found(&path),
        ),
    };

    (status, Html(render_with_chrome(&state, &path, &title, &body).await)).into_response()
}

async fn section_body(state: &AppState, entry: &RouteEntry, show_all: bool) -> String {
    match state.sections.get(entry.kind).await {
        Ok(section) => {
            let route_href = state.config.href(&entry.path);
            ui::render_section(&section, &entry.header_title, show_all, &route_href)
        }
        Err(err) => {
            warn!(component = %entry.component, "section unavailable: {err}");
            ui::render_unavailable(&entry.header_title)
        }
    }
}

async fn render_with_chrome(state: &AppState, path: &str, title: &str, body: &str) -> String {
    let navbar = match state.content.fetch::<NavbarData>(Endpoint::Navbar).await {
        Ok(navbar) => Some(navbar),
        Err(err) => {
            warn!("navbar unavailable: {err}");
            None
        }
    };
    let visitor_count = match state.store.count().await {
        Ok(count) => Some(count),
        Err(err) => {
            warn!("visitor count unavailable: {err}");
            None
        }
    };
    let chrome = Chrome {
        base_path: &state.config.base_path,
        current_path: path,
        palette: state.theme.palette(),
        dark: state.theme.is_dark(),
        navbar: navbar.as_ref(),
        visitor_count,
    };
    ui::render_page(&chrome, title, body)
}

fn client_info(headers: &HeaderMap, connect: Option<ConnectInfo<SocketAddr>>) -> ClientInfo {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());
    ClientInfo {
        ip: forwarded.or_else(|| connect.map(|ConnectInfo(addr)| addr.ip())),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    }
}

pub async fn admin_page(State(state): State<AppState>) -> Html<String> {
    let body = ui::render_login(&state.config.href("/admin"), None);
    Html(render_with_chrome(&state, "/admin", "Admin", &body).await)
}

pub async fn admin_login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if let Err(err) = state.admin.verify(&form.password) {
        let body = ui::render_login(&state.config.href("/admin"), Some(&err.to_string()));
        let html = render_with_chrome(&state, "/admin", "Admin", &body).await;
        return (StatusCode::UNAUTHORIZED, Html(html)).into_response();
    }

    let (status, body) = match state.store.list_recent().await {
        Ok(records) => (StatusCode::OK, ui::render_dashboard(&build_dashboard(&records))),
        Err(err) => {
            error!("failed to load analytics: {err}");
            (StatusCode::SERVICE_UNAVAILABLE, ui::render_dashboard_error())
        }
    };
    let html = render_with_chrome(&state, "/admin", "Site Analytics", &body).await;
    (status, Html(html)).into_response()
}

pub async fn theme_toggle(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    state.theme.toggle();
    back(&state, &headers)
}

pub async fn theme_enable(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    state.theme.enable();
    back(&state, &headers)
}

pub async fn theme_disable(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    state.theme.disable();
    back(&state, &headers)
}

/// Redirect target after a form post: the referring page's path, or home.
fn back(state: &AppState, headers: &HeaderMap) -> Redirect {
    let target = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| state.config.href("/"));
    Redirect::to(&target)
}

pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        dark: state.theme.is_dark(),
    })
}

pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteEntry>> {
    Json(state.routes.current().entries().to_vec())
}

pub async fn refresh_routes(State(state): State<AppState>) -> Json<RefreshResponse> {
    let outcome = state.routes.refresh(&state.content).await;
    let applied = matches!(outcome, RefreshOutcome::Applied { .. });
    Json(RefreshResponse {
        applied,
        routes: state.routes.current().fetched_len(),
    })
}

pub async fn views_count(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    let count = state.store.count().await?;
    Ok(Json(CountResponse { count }))
}

pub async fn healthz() -> &'static str {
    "ok"
}
