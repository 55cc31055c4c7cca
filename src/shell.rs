// Application shell: owns the local collection and reconciles it after each call

use crate::client::{ClientError, RemoteCollection};
use crate::collection::LocalCollection;
use crate::detail::BookDetail;
use crate::form::{BookForm, FormSubmission, SubmitBlocked};
use crate::list::{BookList, ListIntent};
use crate::models::{Book, BookDraft, BookId};
use crate::prompt::{Confirm, DELETE_CONFIRMATION};
use crate::query::ListQuery;
use crate::roundtrip::{PendingToken, Roundtrip};
use chrono::NaiveDate;
use colored::Colorize;
use tracing::{debug, info, warn};

pub const LOAD_FAILED: &str = "Failed to load books";
pub const CREATE_FAILED: &str = "Failed to create book";
pub const UPDATE_FAILED: &str = "Failed to update book";
pub const DELETE_FAILED: &str = "Failed to delete book";

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user did not confirm, nothing was sent
    Declined,
    Failed,
}

/// Owns the authoritative local copy of the remote book collection
///
/// Every mutation is reconciled from its own response (append, replace,
/// remove); nothing triggers a full reload. Failures leave the collection as
/// it was and set a user-visible error.
#[derive(Debug)]
pub struct Shell<C> {
    remote: C,
    books: LocalCollection<Book>,
    error: Option<String>,
    loading: Roundtrip,
    form: BookForm,
    detail: BookDetail,
}

impl<C: RemoteCollection<Book>> Shell<C> {
    pub fn new(remote: C) -> Self {
        Self {
            remote,
            books: LocalCollection::new(),
            error: None,
            loading: Roundtrip::new(),
            form: BookForm::new(),
            detail: BookDetail::new(),
        }
    }

    pub fn remote(&self) -> &C {
        &self.remote
    }

    pub fn books(&self) -> &[Book] {
        self.books.as_slice()
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(id)
    }

    /// User-visible message of the last failed operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_pending()
    }

    pub fn form(&self) -> &BookForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BookForm {
        &mut self.form
    }

    pub fn detail(&self) -> &BookDetail {
        &self.detail
    }

    pub fn detail_mut(&mut self) -> &mut BookDetail {
        &mut self.detail
    }

    pub fn list(&self) -> BookList<'_> {
        BookList::new(self.books.as_slice())
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Fetch the full collection, replacing the local copy
    pub async fn load(&mut self) -> bool {
        self.load_with(&ListQuery::default()).await
    }

    /// Fetch the collection filtered by server-side query parameters
    pub async fn load_with(&mut self, query: &ListQuery) -> bool {
        let token = self.start_load();
        let result = if query.is_empty() {
            self.remote.list_all().await
        } else {
            self.remote.search(query).await
        };
        self.finish_load(token, result)
    }

    /// Start a load; a load still pending is superseded
    pub fn start_load(&mut self) -> PendingToken {
        self.loading.start_pending()
    }

    /// Apply the outcome of the load started with `token`
    ///
    /// Returns `true` if the collection was replaced. A superseded result is
    /// discarded without touching collection or error.
    pub fn finish_load(&mut self, token: PendingToken, result: Result<Vec<Book>, ClientError>) -> bool {
        if !self.loading.finish_pending(token) {
            debug!("finish_load: discarding superseded result");
            return false;
        }
        match result {
            Ok(books) => {
                info!(count = books.len(), "Loaded books");
                self.books.replace_all(books);
                self.error = None;
                true
            }
            Err(err) => {
                warn!(error = %err, "Failed to load books");
                self.books.clear();
                self.error = Some(LOAD_FAILED.to_string());
                false
            }
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a book and append the server's record
    pub async fn create(&mut self, draft: BookDraft) -> Option<&Book> {
        match self.remote.create(&draft).await {
            Ok(book) => {
                info!(id = %book.id, "Created book");
                let id = book.id;
                self.books.append(book);
                self.error = None;
                self.books.get(id)
            }
            Err(err) => {
                warn!(error = %err, "Failed to create book");
                self.error = Some(CREATE_FAILED.to_string());
                None
            }
        }
    }

    /// Update a book and replace the matching local entry
    ///
    /// Returns the server's record, also when no local entry matched.
    pub async fn update(&mut self, id: BookId, patch: BookDraft) -> Option<Book> {
        match self.remote.update(id, &patch).await {
            Ok(book) => {
                info!(%id, "Updated book");
                self.books.replace(book.clone());
                self.error = None;
                Some(book)
            }
            Err(err) => {
                warn!(%id, error = %err, "Failed to update book");
                self.error = Some(UPDATE_FAILED.to_string());
                None
            }
        }
    }

    /// Delete a book after confirmation and remove the local entry
    pub async fn delete(&mut self, id: BookId, confirm: &mut impl Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_CONFIRMATION) {
            debug!(%id, "delete: declined");
            return DeleteOutcome::Declined;
        }

        match self.remote.delete_by_id(id).await {
            Ok(()) => {
                info!(%id, "Deleted book");
                self.books.remove(id);
                self.error = None;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(%id, error = %err, "Failed to delete book");
                self.error = Some(DELETE_FAILED.to_string());
                DeleteOutcome::Failed
            }
        }
    }

    // ========================================================================
    // Component wiring
    // ========================================================================

    /// Submit the form and route it to create or update
    ///
    /// Returns the reconciled record on success, `None` if the remote call
    /// failed. Blocked submissions never reach the remote collection.
    pub async fn submit_form(&mut self, today: NaiveDate) -> Result<Option<Book>, SubmitBlocked> {
        let submission = self.form.submit(today)?;

        let book = match submission {
            FormSubmission::Create(draft) => self.create(draft).await.cloned(),
            FormSubmission::Update { id, patch } => self.update(id, patch).await,
        };

        // Every mutation either clears or sets the error
        let outcome = match &self.error {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        };
        self.form.finish_submit(outcome);

        Ok(book)
    }

    /// Honor an edit or delete intent raised by the list or the detail view
    pub async fn handle_intent(&mut self, intent: ListIntent, confirm: &mut impl Confirm) -> Option<DeleteOutcome> {
        match intent {
            ListIntent::Edit(book) => {
                self.form.seed(&book);
                None
            }
            ListIntent::Delete(id) => Some(self.delete(id, confirm).await),
        }
    }

    /// Open the detail view for `id` and fetch the record
    pub async fn show_details(&mut self, id: BookId) -> bool {
        let token = self.detail.open(id);
        let result = self.remote.get_by_id(id).await;
        self.detail.finish(token, result) && self.detail.book().is_some()
    }

    /// Error line (if any) followed by the list
    pub fn render(&self) -> String {
        let list = self.list().render();
        match &self.error {
            Some(error) => format!("{}\n\n{}", error.as_str().red().bold(), list),
            None => list,
        }
    }
}
