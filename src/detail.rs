// Book detail view: fetch-and-display of a single record

use crate::client::ClientError;
use crate::list::ListIntent;
use crate::models::{Book, BookId, DateStyle, format_date};
use crate::roundtrip::{PendingToken, Roundtrip};
use colored::Colorize;
use std::fmt::Write as _;
use tracing::{debug, warn};

pub const LOAD_FAILED: &str = "Failed to load book details";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Closed,
    Loading { id: BookId },
    Loaded(Book),
    Failed { id: BookId, message: String },
}

#[derive(Debug)]
pub struct BookDetail {
    state: DetailState,
    roundtrip: Roundtrip,
}

impl Default for BookDetail {
    fn default() -> Self {
        Self::new()
    }
}

impl BookDetail {
    pub fn new() -> Self {
        Self {
            state: DetailState::Closed,
            roundtrip: Roundtrip::new(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DetailState::Closed
    }

    pub fn book(&self) -> Option<&Book> {
        match &self.state {
            DetailState::Loaded(book) => Some(book),
            _ => None,
        }
    }

    /// Open the view for `id` and start fetching it
    ///
    /// A fetch still pending for a previous open is superseded.
    pub fn open(&mut self, id: BookId) -> PendingToken {
        debug!(%id, "open: called");
        self.state = DetailState::Loading { id };
        self.roundtrip.start_pending()
    }

    /// Close the view; a fetch still in flight is discarded when it lands
    pub fn close(&mut self) {
        self.roundtrip.reset();
        self.state = DetailState::Closed;
    }

    /// Apply the outcome of the fetch started with `token`
    ///
    /// Returns `false` if the result was stale and discarded.
    pub fn finish(&mut self, token: PendingToken, result: Result<Book, ClientError>) -> bool {
        if !self.roundtrip.finish_pending(token) {
            debug!("finish: discarding stale result");
            return false;
        }
        let DetailState::Loading { id } = self.state else {
            return false;
        };

        self.state = match result {
            Ok(book) => DetailState::Loaded(book),
            Err(err) => {
                warn!(%id, error = %err, "Failed to load book details");
                DetailState::Failed {
                    id,
                    message: LOAD_FAILED.to_string(),
                }
            }
        };
        true
    }

    /// Close the view and hand the shown book to the form
    pub fn edit(&mut self) -> Option<ListIntent> {
        let book = self.book()?.clone();
        self.close();
        Some(ListIntent::Edit(book))
    }

    /// Close the view and request deletion of the shown book
    pub fn delete(&mut self) -> Option<ListIntent> {
        let id = self.book()?.id;
        self.close();
        Some(ListIntent::Delete(id))
    }

    /// Text for the current state, `None` while closed
    pub fn render(&self) -> Option<String> {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "Book Details".bold());

        match &self.state {
            DetailState::Closed => return None,
            DetailState::Loading { .. } => {
                let _ = writeln!(out, "{}", "Loading book details...".dimmed());
            }
            DetailState::Failed { message, .. } => {
                let _ = writeln!(out, "{}", message.as_str().red());
            }
            DetailState::Loaded(book) => {
                let published = format_date(book.published_date, DateStyle::Long);
                let rows = [
                    ("ID", format!("#{}", book.id)),
                    ("Title", book.title.clone()),
                    ("Author", book.author.clone()),
                    ("Published Date", published),
                    ("Genre", book.genre_label().to_string()),
                ];
                for (label, value) in rows {
                    let _ = writeln!(out, "  {:<16}{}", format!("{}:", label), value);
                }
            }
        }

        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dune() -> Book {
        Book {
            id: BookId(7),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            published_date: NaiveDate::from_ymd_opt(1965, 8, 1),
            genre: Some("Sci-Fi".to_string()),
        }
    }

    fn not_found(id: BookId) -> ClientError {
        ClientError::NotFound {
            collection: "books",
            id: id.to_string(),
        }
    }

    #[test]
    fn test_open_and_load() {
        let mut detail = BookDetail::new();
        let token = detail.open(BookId(7));
        assert_eq!(detail.state(), &DetailState::Loading { id: BookId(7) });

        assert!(detail.finish(token, Ok(dune())));
        assert_eq!(detail.book(), Some(&dune()));

        let rendered = detail.render().unwrap();
        assert!(rendered.contains("August 1, 1965"));
        assert!(rendered.contains("Sci-Fi"));
    }

    #[test]
    fn test_late_response_after_close_is_discarded() {
        let mut detail = BookDetail::new();
        let token = detail.open(BookId(7));
        detail.close();

        assert!(!detail.finish(token, Ok(dune())));
        assert_eq!(detail.state(), &DetailState::Closed);
        assert!(detail.render().is_none());
    }

    #[test]
    fn test_superseded_open_is_discarded() {
        let mut detail = BookDetail::new();
        let first = detail.open(BookId(7));
        let second = detail.open(BookId(8));

        assert!(!detail.finish(first, Ok(dune())));
        assert_eq!(detail.state(), &DetailState::Loading { id: BookId(8) });

        assert!(detail.finish(second, Err(not_found(BookId(8)))));
        assert!(matches!(detail.state(), DetailState::Failed { id: BookId(8), .. }));
        assert!(detail.render().unwrap().contains(LOAD_FAILED));
    }

    #[test]
    fn test_edit_and_delete_close_the_view() {
        let mut detail = BookDetail::new();
        let token = detail.open(BookId(7));
        detail.finish(token, Ok(dune()));

        assert_eq!(detail.edit(), Some(ListIntent::Edit(dune())));
        assert!(!detail.is_open());

        let token = detail.open(BookId(7));
        detail.finish(token, Ok(dune()));
        assert_eq!(detail.delete(), Some(ListIntent::Delete(BookId(7))));
        assert!(!detail.is_open());
    }

    #[test]
    fn test_actions_need_a_loaded_book() {
        let mut detail = BookDetail::new();
        detail.open(BookId(7));
        assert_eq!(detail.edit(), None);
        assert_eq!(detail.delete(), None);
        assert!(detail.is_open());
    }
}
