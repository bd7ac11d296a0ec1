//! Page routes the controllers can navigate to.

use std::fmt;

use crate::models::NoteId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Create,
    Detail(NoteId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::List => "/notes".to_string(),
            Self::Create => "/notes/new".to_string(),
            Self::Detail(id) => format!("/notes/{}", id.url_encoded()),
        }
    }

    /// Resolve a path to a route. The root entry redirects to the list.
    pub fn resolve(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" | "/notes" => Some(Self::List),
            "/notes/new" => Some(Self::Create),
            _ => {
                let raw_id = trimmed.strip_prefix("/notes/")?;
                if raw_id.is_empty() || raw_id.contains('/') {
                    return None;
                }
                let id = urlencoding::decode(raw_id).ok()?;
                Some(Self::Detail(NoteId::new(id.into_owned())))
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
