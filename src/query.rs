// Server-side query parameters for listing records

/// Optional filters understood by the collection endpoint
///
/// The server applies at most one of them, in the order `search`, `genre`,
/// `author`. Blank values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Substring of title or author
    pub search: Option<String>,
    /// Exact genre, case-insensitive
    pub genre: Option<String>,
    /// Substring of author
    pub author: Option<String>,
}

/// Query parameter names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Search,
    Genre,
    Author,
}

impl QueryField {
    pub(crate) fn as_param(self) -> &'static str {
        match self {
            QueryField::Search => "search",
            QueryField::Genre => "genre",
            QueryField::Author => "author",
        }
    }
}

impl std::fmt::Display for QueryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

impl ListQuery {
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Non-blank parameters, trimmed, in server precedence order
    pub fn pairs(&self) -> Vec<(QueryField, &str)> {
        [
            (QueryField::Search, &self.search),
            (QueryField::Genre, &self.genre),
            (QueryField::Author, &self.author),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then_some((field, value))
        })
        .collect()
    }
}
