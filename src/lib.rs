// Book tracker - terminal client for a REST book collection

pub mod client;
pub mod collection;
pub mod config;
pub mod detail;
pub mod form;
pub mod list;
pub mod models;
pub mod prompt;
pub mod query;
pub mod record;
pub mod roundtrip;
pub mod shell;

// Re-export main types for convenience
pub use client::{ClientError, RemoteBooks, RemoteCollection, RestCollection};
pub use config::Config;
pub use models::{Book, BookDraft, BookId};
pub use query::ListQuery;
pub use record::Record;
pub use shell::{DeleteOutcome, Shell};
