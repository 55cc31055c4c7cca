// Book form: controlled inputs producing a validated draft

use crate::models::{Book, BookDraft, BookId};
use chrono::NaiveDate;
use colored::Colorize;
use std::fmt::Write as _;
use tracing::debug;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const AUTHOR_REQUIRED: &str = "Author is required";
pub const DATE_IN_FUTURE: &str = "Publication date cannot be in the future";
pub const DATE_INVALID: &str = "Publication date must be a valid date (YYYY-MM-DD)";

/// Input fields of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    PublishedDate,
    Genre,
}

/// Raw input values, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub title: String,
    pub author: String,
    /// ISO date `YYYY-MM-DD`, empty if unset
    pub published_date: String,
    pub genre: String,
}

impl FormFields {
    fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            published_date: book
                .published_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            genre: book.genre.clone().unwrap_or_default(),
        }
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<&'static str>,
    pub author: Option<&'static str>,
    pub published_date: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.published_date.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Title => self.title,
            Field::Author => self.author,
            Field::PublishedDate => self.published_date,
            Field::Genre => None,
        }
    }

    /// Messages in field order
    pub fn messages(&self) -> Vec<&'static str> {
        [self.title, self.author, self.published_date].into_iter().flatten().collect()
    }
}

/// Whether the form creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New,
    Editing(BookId),
}

/// Observable form state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Empty, ready for a new record
    New,
    /// Seeded from an existing record
    Editing(BookId),
    /// A submission is in flight
    Submitting,
    /// The last submission failed, inputs are retained
    Error,
}

/// A validated payload for the caller to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Create(BookDraft),
    Update { id: BookId, patch: BookDraft },
}

/// Why a submit attempt produced no submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    Invalid(FieldErrors),
    InFlight,
}

#[derive(Debug, Clone, Default)]
pub struct BookForm {
    fields: FormFields,
    mode: Option<BookId>,
    errors: FieldErrors,
    submitting: bool,
    submit_error: Option<String>,
}

impl BookForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form in edit mode, seeded from `book`
    pub fn editing(book: &Book) -> Self {
        let mut form = Self::new();
        form.seed(book);
        form
    }

    /// Switch to edit mode for `book`, replacing all inputs and errors
    pub fn seed(&mut self, book: &Book) {
        debug!(id = %book.id, "seed: called");
        *self = Self {
            fields: FormFields::from_book(book),
            mode: Some(book.id),
            ..Self::default()
        };
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn mode(&self) -> FormMode {
        match self.mode {
            Some(id) => FormMode::Editing(id),
            None => FormMode::New,
        }
    }

    pub fn state(&self) -> FormState {
        if self.submitting {
            FormState::Submitting
        } else if self.submit_error.is_some() {
            FormState::Error
        } else {
            match self.mode {
                Some(id) => FormState::Editing(id),
                None => FormState::New,
            }
        }
    }

    /// Change one input value
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.fields.title = value,
            Field::Author => self.fields.author = value,
            Field::PublishedDate => self.fields.published_date = value,
            Field::Genre => self.fields.genre = value,
        }
    }

    /// Check the inputs against `today` and build the normalized draft
    pub fn validate(&self, today: NaiveDate) -> Result<BookDraft, FieldErrors> {
        let title = self.fields.title.trim();
        let author = self.fields.author.trim();
        let mut errors = FieldErrors::default();

        if title.is_empty() {
            errors.title = Some(TITLE_REQUIRED);
        }
        if author.is_empty() {
            errors.author = Some(AUTHOR_REQUIRED);
        }

        let published_date = match self.fields.published_date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) if date > today => {
                    errors.published_date = Some(DATE_IN_FUTURE);
                    None
                }
                Ok(date) => Some(date),
                Err(_) => {
                    errors.published_date = Some(DATE_INVALID);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let genre = (!self.fields.genre.is_empty()).then(|| self.fields.genre.clone());

        Ok(BookDraft {
            title: title.to_string(),
            author: author.to_string(),
            published_date,
            genre,
        })
    }

    /// Validate and hand out the submission
    ///
    /// Field errors are stored on the form; the caller performs the remote
    /// call and reports back through `finish_submit`.
    pub fn submit(&mut self, today: NaiveDate) -> Result<FormSubmission, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::InFlight);
        }

        let draft = match self.validate(today) {
            Ok(draft) => draft,
            Err(errors) => {
                debug!(?errors, "submit: blocked by validation");
                self.errors = errors.clone();
                return Err(SubmitBlocked::Invalid(errors));
            }
        };

        self.errors = FieldErrors::default();
        self.submit_error = None;
        self.submitting = true;

        Ok(match self.mode {
            Some(id) => FormSubmission::Update { id, patch: draft },
            None => FormSubmission::Create(draft),
        })
    }

    /// Report the outcome of the remote call for the last submission
    ///
    /// Success clears the form back to `New`. Failure keeps the inputs and
    /// field messages and records `message`.
    pub fn finish_submit(&mut self, outcome: Result<(), String>) {
        if !self.submitting {
            debug!("finish_submit: no submission in flight");
            return;
        }
        self.submitting = false;

        match outcome {
            Ok(()) => *self = Self::default(),
            Err(message) => self.submit_error = Some(message),
        }
    }

    /// Reset all inputs and errors, returning the mode that was cancelled
    pub fn cancel(&mut self) -> FormMode {
        let mode = self.mode();
        *self = Self::default();
        mode
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let heading = match self.mode() {
            FormMode::New => "Add New Book".to_string(),
            FormMode::Editing(id) => format!("Edit Book #{}", id),
        };
        let _ = writeln!(out, "{}", heading.as_str().bold());

        let rows = [
            ("Title", Field::Title, &self.fields.title),
            ("Author", Field::Author, &self.fields.author),
            ("Published", Field::PublishedDate, &self.fields.published_date),
            ("Genre", Field::Genre, &self.fields.genre),
        ];
        for (label, field, value) in rows {
            let _ = writeln!(out, "  {:<10} {}", format!("{}:", label), value);
            if let Some(message) = self.errors.get(field) {
                let _ = writeln!(out, "  {:<10} {}", "", message.red());
            }
        }

        match self.state() {
            FormState::Submitting => {
                let label = match self.mode() {
                    FormMode::New => "Adding...",
                    FormMode::Editing(_) => "Updating...",
                };
                let _ = writeln!(out, "  {}", label.dimmed());
            }
            FormState::Error => {
                if let Some(message) = &self.submit_error {
                    let _ = writeln!(out, "  {}", message.red());
                }
            }
            FormState::New | FormState::Editing(_) => {}
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn filled(title: &str, author: &str, date: &str, genre: &str) -> BookForm {
        let mut form = BookForm::new();
        form.set(Field::Title, title);
        form.set(Field::Author, author);
        form.set(Field::PublishedDate, date);
        form.set(Field::Genre, genre);
        form
    }

    fn dune() -> Book {
        Book {
            id: BookId(7),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            published_date: NaiveDate::from_ymd_opt(1965, 8, 1),
            genre: Some("Sci-Fi".to_string()),
        }
    }

    #[test]
    fn test_valid_submit_trims_and_normalizes() {
        let mut form = filled("  Dune ", " Herbert", "", "");

        let submission = form.submit(today()).unwrap();
        assert_eq!(
            submission,
            FormSubmission::Create(BookDraft {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                published_date: None,
                genre: None,
            })
        );
        assert_eq!(form.state(), FormState::Submitting);
    }

    #[test]
    fn test_valid_submit_keeps_optional_fields() {
        let mut form = filled("Dune", "Herbert", "1965-08-01", "Sci-Fi");

        let FormSubmission::Create(draft) = form.submit(today()).unwrap() else {
            panic!("expected a create submission");
        };
        assert_eq!(draft.published_date, NaiveDate::from_ymd_opt(1965, 8, 1));
        assert_eq!(draft.genre.as_deref(), Some("Sci-Fi"));
    }

    #[test]
    fn test_date_equal_to_today_is_accepted() {
        let form = filled("Dune", "Herbert", "2024-06-15", "");
        assert!(form.validate(today()).is_ok());
    }

    #[test]
    fn test_missing_title_and_author_block_submit() {
        let mut form = filled("   ", "", "", "Sci-Fi");

        let Err(SubmitBlocked::Invalid(errors)) = form.submit(today()) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.title, Some(TITLE_REQUIRED));
        assert_eq!(errors.author, Some(AUTHOR_REQUIRED));
        assert_eq!(errors.published_date, None);
        assert_eq!(form.errors(), &errors);
        assert_eq!(form.state(), FormState::New);
    }

    #[test]
    fn test_future_date_blocks_submit() {
        let mut form = filled("Dune", "Herbert", "2024-06-16", "");

        let Err(SubmitBlocked::Invalid(errors)) = form.submit(today()) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.messages(), vec![DATE_IN_FUTURE]);
    }

    #[test]
    fn test_malformed_date_blocks_submit() {
        let form = filled("Dune", "Herbert", "1965-13-01", "");
        assert_eq!(form.validate(today()).unwrap_err().published_date, Some(DATE_INVALID));
    }

    #[test]
    fn test_second_submit_while_in_flight_is_blocked() {
        let mut form = filled("Dune", "Herbert", "", "");
        assert!(form.submit(today()).is_ok());
        assert_eq!(form.submit(today()), Err(SubmitBlocked::InFlight));
    }

    #[test]
    fn test_create_success_clears_form() {
        let mut form = filled("Dune", "Herbert", "1965-08-01", "Sci-Fi");
        form.submit(today()).unwrap();
        form.finish_submit(Ok(()));

        assert_eq!(form.state(), FormState::New);
        assert_eq!(form.fields(), &FormFields::default());
    }

    #[test]
    fn test_failure_keeps_inputs() {
        let mut form = filled("Dune", "Herbert", "1965-08-01", "Sci-Fi");
        form.submit(today()).unwrap();
        form.finish_submit(Err("Failed to create book".to_string()));

        assert_eq!(form.state(), FormState::Error);
        assert_eq!(form.fields().title, "Dune");
        assert_eq!(form.submit_error(), Some("Failed to create book"));

        // Retrying is possible from the error state
        assert!(form.submit(today()).is_ok());
        assert_eq!(form.submit_error(), None);
    }

    #[test]
    fn test_edit_mode_produces_update() {
        let mut form = BookForm::editing(&dune());
        assert_eq!(form.state(), FormState::Editing(BookId(7)));
        assert_eq!(form.fields().published_date, "1965-08-01");

        form.set(Field::Title, "Dune Messiah");
        let submission = form.submit(today()).unwrap();
        let FormSubmission::Update { id, patch } = submission else {
            panic!("expected an update submission");
        };
        assert_eq!(id, BookId(7));
        assert_eq!(patch.title, "Dune Messiah");
        assert_eq!(patch.genre.as_deref(), Some("Sci-Fi"));
    }

    #[test]
    fn test_cancel_resets_everything() {
        let mut form = BookForm::editing(&dune());
        form.set(Field::Author, "");
        let _ = form.submit(today());
        assert!(!form.errors().is_empty());

        assert_eq!(form.cancel(), FormMode::Editing(BookId(7)));
        assert_eq!(form.state(), FormState::New);
        assert!(form.errors().is_empty());
        assert_eq!(form.fields(), &FormFields::default());
    }

    #[test]
    fn test_render_shows_field_errors() {
        let mut form = filled("", "Herbert", "", "");
        let _ = form.submit(today());

        let rendered = form.render();
        assert!(rendered.contains("Add New Book"));
        assert!(rendered.contains(TITLE_REQUIRED));
        assert!(!rendered.contains(AUTHOR_REQUIRED));
    }
}
