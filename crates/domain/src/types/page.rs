//! List response envelope
//!
//! List endpoints answer either a bare JSON array or, when pagination is
//! enabled server-side, `{ "count": .., "next": .., "previous": .., "results": [..] }`.

use serde::{Deserialize, Serialize};

/// Either shape of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Items of this page (or of the whole list)
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated { results, .. } => results,
            Self::Plain(items) => items,
        }
    }

    /// URL of the next page, if the server paginates
    pub fn next_page(&self) -> Option<&str> {
        match self {
            Self::Paginated { next, .. } => next.as_deref(),
            Self::Plain(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_array_decodes() {
        let list: ListResponse<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert!(list.next_page().is_none());
        assert_eq!(list.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn paginated_envelope_decodes() {
        let list: ListResponse<u32> = serde_json::from_str(
            r#"{"count": 5, "next": "http://api/tasks/tasks/?page=2", "previous": null, "results": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(list.next_page(), Some("http://api/tasks/tasks/?page=2"));
        assert_eq!(list.into_items(), vec![1, 2]);
    }
}
