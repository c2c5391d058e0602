use crate::models::{DashboardStats, PageStat, PageViewRecord, SliceStat};
use std::collections::HashMap;

pub const UNKNOWN: &str = "Unknown";
pub const TOP_COUNTRIES: usize = 10;
pub const TOP_AGENTS: usize = 5;

pub fn build_dashboard(records: &[PageViewRecord]) -> DashboardStats {
    let pages = group_counts(records.iter().map(|view| page_label(&view.path)))
        .into_iter()
        .map(|(name, views)| PageStat { name, views })
        .collect();

    DashboardStats {
        total_views: records.len() as u64,
        pages,
        countries: top_slices(
            records.iter().map(|view| dimension_key(Some(&view.country))),
            TOP_COUNTRIES,
        ),
        browsers: top_slices(
            records.iter().map(|view| dimension_key(view.browser.as_deref())),
            TOP_AGENTS,
        ),
        operating_systems: top_slices(
            records.iter().map(|view| dimension_key(view.os.as_deref())),
            TOP_AGENTS,
        ),
    }
}

/// Counts each distinct key, largest first. Equal counts keep the order in
/// which their key was first seen.
pub fn group_counts<I>(keys: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = String>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, u64)> = Vec::new();

    for key in keys {
        match positions.get(&key) {
            Some(&index) => groups[index].1 += 1,
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, 1));
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
}

pub fn page_label(path: &str) -> String {
    if path == "/" {
        "Home".to_string()
    } else {
        path.replacen('/', "", 1)
    }
}

pub fn dimension_key(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn top_slices<I>(keys: I, limit: usize) -> Vec<SliceStat>
where
    I: IntoIterator<Item = String>,
{
    group_counts(keys)
        .into_iter()
        .take(limit)
        .map(|(name, value)| SliceStat { name, value })
        .collect()
}
