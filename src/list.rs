// Book list: table rendering of the local collection

use crate::models::{Book, BookId, DateStyle, format_date};
use colored::Colorize;
use std::fmt::Write as _;

pub const EMPTY_MESSAGE: &str = "No books available. Add your first book!";

const HEADERS: [&str; 5] = ["ID", "Title", "Author", "Published Date", "Genre"];

/// Row actions raised towards the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListIntent {
    /// Open the form seeded with this book
    Edit(Book),
    /// Delete after confirmation
    Delete(BookId),
}

/// Display-ready cells of one book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow<'a> {
    book: &'a Book,
    cells: [String; 5],
}

impl<'a> ListRow<'a> {
    fn new(book: &'a Book) -> Self {
        Self {
            book,
            cells: [
                format!("#{}", book.id),
                book.title.clone(),
                book.author.clone(),
                format_date(book.published_date, DateStyle::Short),
                book.genre_label().to_string(),
            ],
        }
    }

    pub fn id(&self) -> BookId {
        self.book.id
    }

    pub fn cells(&self) -> &[String; 5] {
        &self.cells
    }

    pub fn edit_intent(&self) -> ListIntent {
        ListIntent::Edit(self.book.clone())
    }

    pub fn delete_intent(&self) -> ListIntent {
        ListIntent::Delete(self.book.id)
    }
}

/// Read-only view over a sequence of books, in the given order
#[derive(Debug, Clone, Copy)]
pub struct BookList<'a> {
    books: &'a [Book],
}

impl<'a> BookList<'a> {
    pub fn new(books: &'a [Book]) -> Self {
        Self { books }
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn rows(&self) -> Vec<ListRow<'a>> {
        self.books.iter().map(ListRow::new).collect()
    }

    pub fn row(&self, id: BookId) -> Option<ListRow<'a>> {
        self.books.iter().find(|book| book.id == id).map(ListRow::new)
    }

    pub fn render(&self) -> String {
        if self.books.is_empty() {
            return format!("{}\n", EMPTY_MESSAGE.dimmed());
        }

        let rows = self.rows();
        let mut widths = HEADERS.map(|header| header.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let heading = format!("Your Book Collection ({} books)", self.books.len());
        let _ = writeln!(out, "{}", heading.as_str().bold());
        let _ = writeln!(out);

        let header_line = join_padded(HEADERS.iter().copied(), &widths);
        let _ = writeln!(out, "{}", header_line.as_str().underline());

        for row in &rows {
            let _ = writeln!(out, "{}", join_padded(row.cells().iter().map(String::as_str), &widths));
        }

        out
    }
}

fn join_padded<'s>(cells: impl Iterator<Item = &'s str>, widths: &[usize; 5]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
