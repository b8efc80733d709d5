//! Client-side route table.

/// A parsed application path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/admin`
    Admin,
    /// `/add-word/:categoryId`
    AddWord { category_id: String },
    /// `/explore-words`
    ExploreWords,
    NotFound(String),
}

/// Screen shown for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Login,
    Dashboard,
    AddWord { category_id: String },
    ExploreWords,
    NotFound,
}

impl Route {
    /// Parse a path; the query string and a trailing slash are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["admin"] => Route::Admin,
            ["add-word", id] => Route::AddWord {
                category_id: id.to_string(),
            },
            ["explore-words"] => Route::ExploreWords,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::AddWord { category_id } => format!("/add-word/{}", category_id),
            Route::ExploreWords => "/explore-words".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// The admin route shows the dashboard only to a logged-in admin.
    pub fn screen(&self, is_admin: bool) -> Screen {
        match self {
            Route::Home => Screen::Home,
            Route::Admin if is_admin => Screen::Dashboard,
            Route::Admin => Screen::Login,
            Route::AddWord { category_id } => Screen::AddWord {
                category_id: category_id.clone(),
            },
            Route::ExploreWords => Screen::ExploreWords,
            Route::NotFound(_) => Screen::NotFound,
        }
    }
}
