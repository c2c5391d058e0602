use crate::config::prefixed;
use crate::models::{DashboardStats, NavbarData, Project, SliceStat};
use crate::sections::Section;
use crate::theme::Palette;
use std::fmt::Write;

const PROJECTS_PREVIEW: usize = 6;

/// Everything around the section body: navigation, theme switch, footer.
pub struct Chrome<'a> {
    pub base_path: &'a str,
    pub current_path: &'a str,
    pub palette: Palette,
    pub dark: bool,
    pub navbar: Option<&'a NavbarData>,
    pub visitor_count: Option<u64>,
}

impl Chrome<'_> {
    fn href(&self, path: &str) -> String {
        prefixed(self.base_path, path)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_page(chrome: &Chrome<'_>, title: &str, body: &str) -> String {
    let head = HEAD_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{BG}}", chrome.palette.background)
        .replace("{{INK}}", chrome.palette.color)
        .replace("{{ACCENT}}", chrome.palette.accent)
        .replace("{{CARD_BG}}", chrome.palette.card_background)
        .replace("{{CARD_BORDER}}", chrome.palette.card_border);

    let mut page = head;
    page.push_str(&render_nav(chrome));
    page.push_str("<main class=\"main\">");
    page.push_str(body);
    page.push_str("</main>");
    page.push_str(&render_footer(chrome.visitor_count));
    page.push_str("</body>\n</html>\n");
    page
}

fn render_nav(chrome: &Chrome<'_>) -> String {
    let mut nav = String::from("<nav class=\"navbar\">");
    if let Some(logo) = chrome.navbar.and_then(|navbar| navbar.logo.as_ref()) {
        let size = match (logo.height, logo.width) {
            (Some(height), Some(width)) => format!(" height=\"{height}\" width=\"{width}\""),
            _ => " height=\"45\" width=\"50\"".to_string(),
        };
        let _ = write!(
            nav,
            "<a class=\"brand\" href=\"{}\"><img src=\"{}\" alt=\"main logo\"{size}></a>",
            escape_html(&chrome.href("/")),
            escape_html(&logo.source)
        );
    }
    nav.push_str("<div class=\"links\">");
    for section in chrome.navbar.map(|navbar| navbar.sections.as_slice()).unwrap_or_default() {
        if section.is_external() {
            let _ = write!(
                nav,
                "<a class=\"navbar__link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(&section.href),
                escape_html(&section.title)
            );
        } else {
            let active = if section.href == chrome.current_path { " active" } else { "" };
            let _ = write!(
                nav,
                "<a class=\"navbar__link{active}\" href=\"{}\">{}</a>",
                escape_html(&chrome.href(&section.href)),
                escape_html(&section.title)
            );
        }
    }
    nav.push_str("</div>");

    let (action, label) = if chrome.dark {
        ("disable", "Light mode")
    } else {
        ("enable", "Dark mode")
    };
    let _ = write!(
        nav,
        "<form method=\"post\" action=\"{}\"><button class=\"theme-toggle\" type=\"submit\">{label}</button></form>",
        escape_html(&chrome.href(&format!("/theme/{action}")))
    );
    nav.push_str("</nav>");
    nav
}

fn render_footer(visitor_count: Option<u64>) -> String {
    let mut footer = String::from("<footer class=\"footer\"><span class=\"status\">System Online</span>");
    if let Some(count) = visitor_count {
        let _ = write!(footer, "<span class=\"views\">{count} page views</span>");
    }
    footer.push_str("</footer>");
    footer
}

fn header(title: &str) -> String {
    format!("<h1 class=\"header\">{}</h1>", escape_html(title))
}

/// `route_href` is the prefixed link to the route being rendered.
pub fn render_section(section: &Section, title: &str, show_all: bool, route_href: &str) -> String {
    match section {
        Section::Home { home, social } => {
            let mut body = format!(
                "<section class=\"home\"><h1 class=\"name\">{}</h1><p class=\"roles\">",
                escape_html(&home.name)
            );
            let roles: Vec<String> = home.roles.iter().map(|role| escape_html(role)).collect();
            body.push_str(&roles.join(" · "));
            body.push_str("</p><div class=\"social\">");
            for link in &social.social {
                let _ = write!(
                    body,
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                    escape_html(&link.href),
                    escape_html(&link.network)
                );
            }
            body.push_str("</div></section>");
            body
        }
        Section::About(about) => {
            let mut body = header(title);
            body.push_str("<section class=\"card about\">");
            for paragraph in about.about.split("\n\n") {
                let _ = write!(body, "<p>{}</p>", escape_html(paragraph.trim()));
            }
            if let Some(image) = &about.image_source {
                let _ = write!(body, "<img src=\"{}\" alt=\"profile\">", escape_html(image));
            }
            body.push_str("</section>");
            body
        }
        Section::Skills(skills) => {
            let mut body = header(title);
            let _ = write!(body, "<p class=\"intro\">{}</p>", escape_html(&skills.intro));
            for group in &skills.skills {
                let _ = write!(body, "<section class=\"card\"><h3>{}</h3><ul class=\"skills\">", escape_html(&group.title));
                for item in &group.items {
                    body.push_str("<li>");
                    if let Some(icon) = &item.icon {
                        let _ = write!(
                            body,
                            "<img src=\"{}\" alt=\"{}\">",
                            escape_html(icon),
                            escape_html(&item.title)
                        );
                    }
                    let _ = write!(body, "<span>{}</span></li>", escape_html(&item.title));
                }
                body.push_str("</ul></section>");
            }
            body
        }
        Section::Education(education) => {
            let mut body = header(title);
            body.push_str("<ol class=\"timeline\">");
            for item in &education.education {
                let _ = write!(
                    body,
                    "<li class=\"card\"><span class=\"date\">{}</span><h3>{}</h3><p class=\"subtitle\">{}</p>",
                    escape_html(&item.title),
                    escape_html(&item.card_title),
                    escape_html(&item.card_subtitle)
                );
                if let Some(icon) = &item.icon {
                    let _ = write!(
                        body,
                        "<img class=\"icon\" src=\"{}\" alt=\"{}\">",
                        escape_html(&icon.src),
                        escape_html(&icon.alt)
                    );
                }
                for line in item.card_detailed_text.lines() {
                    let _ = write!(body, "<p>{}</p>", escape_html(line));
                }
                body.push_str("</li>");
            }
            body.push_str("</ol>");
            body
        }
        Section::Experience(experiences) => {
            let mut body = header(title);
            body.push_str("<ol class=\"timeline\">");
            for item in &experiences.experiences {
                let _ = write!(
                    body,
                    "<li class=\"card\"><span class=\"date\">{}</span><h3>{}</h3><p class=\"subtitle\">{}",
                    escape_html(&item.date_text),
                    escape_html(&item.title),
                    escape_html(&item.subtitle)
                );
                if let Some(work_type) = &item.work_type {
                    let _ = write!(body, " · {}", escape_html(work_type));
                }
                body.push_str("</p><ul>");
                for point in &item.work_description {
                    let _ = write!(body, "<li>{}</li>", escape_html(point));
                }
                body.push_str("</ul></li>");
            }
            body.push_str("</ol>");
            body
        }
        Section::Projects(projects) => {
            let mut body = header(title);
            body.push_str("<div class=\"grid\">");
            let shown = if show_all { projects.projects.len() } else { PROJECTS_PREVIEW };
            for project in projects.projects.iter().take(shown) {
                body.push_str(&render_project(project));
            }
            body.push_str("</div>");
            if !show_all && projects.projects.len() > PROJECTS_PREVIEW {
                let _ = write!(
                    body,
                    "<a class=\"show-more\" href=\"{}?all=1\">show more</a>",
                    escape_html(route_href)
                );
            }
            body
        }
    }
}

fn render_project(project: &Project) -> String {
    let mut card = format!("<article class=\"card project\"><h3>{}</h3>", escape_html(&project.title));
    if let Some(image) = &project.image {
        let _ = write!(card, "<img src=\"{}\" alt=\"{}\">", escape_html(image), escape_html(&project.title));
    }
    if let Some(text) = project.body_text.as_ref().or(project.description.as_ref()) {
        let _ = write!(card, "<p>{}</p>", escape_html(text));
    }
    if !project.tags.is_empty() {
        card.push_str("<ul class=\"tags\">");
        for tag in &project.tags {
            let _ = write!(card, "<li>{}</li>", escape_html(tag));
        }
        card.push_str("</ul>");
    }
    let links = project
        .links
        .iter()
        .map(|link| (link.text.as_str(), link.href.as_str()))
        .chain(project.source.as_deref().map(|href| ("Source", href)))
        .chain(project.demo.as_deref().map(|href| ("Demo", href)));
    for (text, href) in links {
        let _ = write!(
            card,
            "<a class=\"action\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            escape_html(href),
            escape_html(text)
        );
    }
    card.push_str("</article>");
    card
}

pub fn render_unavailable(title: &str) -> String {
    format!(
        "{}<section class=\"card fallback\"><p>This section is unavailable right now. Try again shortly.</p></section>",
        header(title)
    )
}

pub fn render_not_found(path: &str) -> String {
    format!(
        "{}<section class=\"card fallback\"><p>Nothing lives at <code>{}</code>.</p></section>",
        header("Not found"),
        escape_html(path)
    )
}

pub fn render_login(action: &str, error: Option<&str>) -> String {
    let mut body = String::from("<section class=\"card login\"><h2>RESTRICTED ACCESS</h2>");
    if let Some(message) = error {
        let _ = write!(body, "<div class=\"alert\">{}</div>", escape_html(message));
    }
    let _ = write!(
        body,
        "<form method=\"post\" action=\"{}\"><input type=\"password\" name=\"password\" placeholder=\"Enter Access Key\" autofocus><button type=\"submit\">AUTHENTICATE</button></form></section>",
        escape_html(action)
    );
    body
}

pub fn render_dashboard(stats: &DashboardStats) -> String {
    let mut body = String::from("<h1 class=\"header\">Site Analytics</h1>");
    let _ = write!(
        body,
        "<section class=\"card stat\"><h4>Total Page Views</h4><h2 id=\"total-views\">{}</h2></section>",
        stats.total_views
    );

    let pages: Vec<SliceStat> = stats
        .pages
        .iter()
        .map(|page| SliceStat {
            name: page.name.clone(),
            value: page.views,
        })
        .collect();
    body.push_str("<div class=\"grid\">");
    body.push_str(&render_breakdown("Views by Page", &pages));
    body.push_str(&render_breakdown("Top Countries", &stats.countries));
    body.push_str(&render_breakdown("Top Browsers", &stats.browsers));
    body.push_str(&render_breakdown("Operating Systems", &stats.operating_systems));
    body.push_str("</div>");
    body
}

pub fn render_dashboard_error() -> String {
    "<h1 class=\"header\">Site Analytics</h1><section class=\"card fallback\"><p>Analytics could not be loaded.</p></section>".to_string()
}

fn render_breakdown(title: &str, slices: &[SliceStat]) -> String {
    let total: u64 = slices.iter().map(|slice| slice.value).sum();
    let mut chart = format!("<section class=\"card chart\"><h4>{}</h4>", escape_html(title));
    if slices.is_empty() {
        chart.push_str("<p class=\"empty\">No views yet.</p>");
    }
    chart.push_str("<table>");
    for slice in slices {
        let percent = if total == 0 { 0 } else { slice.value * 100 / total };
        let _ = write!(
            chart,
            "<tr><td>{}</td><td class=\"count\">{}</td><td class=\"bar\"><span style=\"width: {percent}%\"></span></td><td>{percent}%</td></tr>",
            escape_html(&slice.name),
            slice.value
        );
    }
    chart.push_str("</table></section>");
    chart
}

const HEAD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: {{BG}};
      --ink: {{INK}};
      --accent: {{ACCENT}};
      --card: {{CARD_BG}};
      --card-border: {{CARD_BORDER}};
      --font-mono: "JetBrains Mono", "Fira Code", monospace;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    a {
      color: var(--accent);
    }

    .navbar {
      position: sticky;
      top: 0;
      display: flex;
      align-items: center;
      gap: 16px;
      padding: 12px 24px;
      background: var(--card);
      border-bottom: 1px solid var(--card-border);
    }

    .navbar .links {
      display: flex;
      flex-wrap: wrap;
      gap: 18px;
      margin-left: auto;
    }

    .navbar__link {
      color: var(--ink);
      text-decoration: none;
      font-family: var(--font-mono);
    }

    .navbar__link.active {
      color: var(--accent);
    }

    .theme-toggle,
    button {
      border: 1px solid var(--accent);
      background: transparent;
      color: var(--ink);
      border-radius: 999px;
      padding: 8px 14px;
      cursor: pointer;
    }

    .main {
      width: min(1100px, 100%);
      margin: 0 auto;
      padding: 48px 18px;
      display: grid;
      gap: 24px;
    }

    .header {
      font-family: var(--font-mono);
      color: var(--accent);
    }

    .card {
      background: var(--card);
      border: 1px solid var(--card-border);
      border-radius: 8px;
      padding: 24px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 20px;
    }

    .timeline {
      list-style: none;
      padding: 0;
      display: grid;
      gap: 18px;
    }

    .date {
      font-family: var(--font-mono);
      color: var(--accent);
    }

    .home .name {
      font-size: clamp(2.4rem, 6vw, 4rem);
      margin: 0;
    }

    .alert {
      border: 1px solid #d9534f;
      color: #d9534f;
      padding: 10px 14px;
      margin-bottom: 16px;
    }

    .chart table {
      width: 100%;
      border-collapse: collapse;
    }

    .chart .bar span {
      display: block;
      height: 10px;
      background: var(--accent);
      border-radius: 4px;
    }

    .footer {
      display: flex;
      justify-content: space-between;
      padding: 18px 24px;
      border-top: 1px solid var(--card-border);
      font-family: var(--font-mono);
    }
  </style>
</head>
<body>
"#;
