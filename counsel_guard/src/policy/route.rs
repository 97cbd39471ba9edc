use crate::config::{CG_ASSET_PREFIXES, CG_LOGIN_PATH};

/// Access zone a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteCategory {
    Public,
    Login,
    AdminArea,
    CounselorArea,
}

impl RouteCategory {
    pub fn is_protected(&self) -> bool {
        matches!(self, RouteCategory::AdminArea | RouteCategory::CounselorArea)
    }
}

/// A navigation target split into path and query, with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    path: String,
    query: Option<String>,
    category: RouteCategory,
}

impl Route {
    /// Parse `path?query`. A fragment, if any, is dropped.
    pub fn parse(path_and_query: &str) -> Self {
        let without_fragment = path_and_query
            .split_once('#')
            .map_or(path_and_query, |(before, _)| before);
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) if !query.is_empty() => (path, Some(query.to_string())),
            Some((path, _)) => (path, None),
            None => (without_fragment, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        Self {
            category: classify(path),
            path: path.to_string(),
            query,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn category(&self) -> RouteCategory {
        self.category
    }

    /// The original destination, as kept in the login `redirect` parameter.
    pub fn path_and_query(&self) -> String {
        match self.query() {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

fn area_prefixes() -> [(&'static str, RouteCategory); 2] {
    [
        ("/counselor", RouteCategory::CounselorArea),
        ("/admin", RouteCategory::AdminArea),
    ]
}

/// Categorize a request path. Total: anything unmatched is public.
pub fn classify(path: &str) -> RouteCategory {
    if has_segment_prefix(path, CG_LOGIN_PATH.as_str()) {
        return RouteCategory::Login;
    }

    area_prefixes()
        .into_iter()
        .find(|(prefix, _)| has_segment_prefix(path, prefix))
        .map_or(RouteCategory::Public, |(_, category)| category)
}

/// Whether `path` bypasses the policy (framework internals, images, ...).
pub fn is_asset_path(path: &str) -> bool {
    is_asset_path_with(path, &CG_ASSET_PREFIXES)
}

pub(crate) fn is_asset_path_with(path: &str, prefixes: &[String]) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    prefixes.iter().any(|prefix| has_segment_prefix(path, prefix))
}

/// `path` equals `prefix` or continues it with a new segment.
fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
