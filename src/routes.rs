//! Routes
//!
//! The three views and their URL paths. The path lives in the location hash
//! (`#/tasks/new`) so the app can be served from any static host.

/// Current view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    List,
    NewTask,
    EditTask(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::List => "/tasks".to_string(),
            Route::NewTask => "/tasks/new".to_string(),
            Route::EditTask(id) => format!("/tasks/{}/edit", id),
        }
    }

    /// Parse a path or location hash; unknown paths land on the list
    pub fn parse(path: &str) -> Self {
        let path = path.trim_start_matches('#');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["tasks", "new"] => Route::NewTask,
            ["tasks", id, "edit"] => Route::EditTask(id.to_string()),
            _ => Route::List,
        }
    }
}

/// Navigation effects needed by the list and the form
pub trait Navigator {
    fn navigate(&self, route: Route);

    fn to_list(&self) {
        self.navigate(Route::List);
    }

    fn to_new(&self) {
        self.navigate(Route::NewTask);
    }

    fn to_edit(&self, id: &str) {
        self.navigate(Route::EditTask(id.to_string()));
    }
}

/// Navigator that only records calls
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNavigator {
    pub calls: std::cell::RefCell<Vec<Route>>,
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.calls.borrow_mut().push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/tasks"), Route::List);
        assert_eq!(Route::parse("#/tasks/new"), Route::NewTask);
        assert_eq!(
            Route::parse("#/tasks/abc-123/edit"),
            Route::EditTask("abc-123".to_string())
        );
    }

    #[test]
    fn test_empty_and_unknown_paths_fall_back_to_list() {
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("#/"), Route::List);
        assert_eq!(Route::parse("#/stats"), Route::List);
        assert_eq!(Route::parse("/tasks/abc"), Route::List);
    }

    #[test]
    fn test_path_parse_roundtrip() {
        for route in [Route::List, Route::NewTask, Route::EditTask("t1".to_string())] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_default_navigation_methods() {
        let nav = RecordingNavigator::default();
        nav.to_new();
        nav.to_edit("t1");
        nav.to_list();
        assert_eq!(
            *nav.calls.borrow(),
            vec![Route::NewTask, Route::EditTask("t1".to_string()), Route::List]
        );
    }
}
