//! # Library Demo API
//!
//! A small read-only book catalogue used by the `serve` command and the
//! integration tests.
//!
//! | URI | Handler | Operations |
//! |-----|---------|------------|
//! | `/` | `Root` | OPTIONS |
//! | `/books` | `BooksCollection` | OPTIONS, GET, POST |
//! | `/books/{book_id}` | `Book` | OPTIONS, GET |
//! | `/books/{book_id}/reviews` | `ReviewsCollection` | OPTIONS, GET |
//! | `/books/{book_id}/reviews/{review_id}` | `Review` | OPTIONS, GET |
//! | `/authors` | `AuthorsCollection` | OPTIONS, GET |
//!
//! `GET /books/57` returns the plain book record:
//!
//! ```json
//! { "author": "Jane Austen", "id": "57", "title": "Pride and Prejudice" }
//! ```
//!
//! while `OPTIONS /books/57` returns the hypermedia description, titled with the
//! book's title and linking to `/books` (parent) and `/books/57/reviews`
//! (child). Requests for an unknown book end in a `404` during construction.

use crate::context::RequestContext;
use crate::dispatcher::Dispatcher;
use crate::error::RouteSpecError;
use crate::registry::HandlerRegistry;
use crate::resource::{default_options, Construction, Operation, OperationFn, Resource};
use crate::response::{LinkEntry, ResponseState};
use crate::router::{LoadPolicy, RouteTable, Router};
use serde::Serialize;

/// Route table of the demo API.
pub const ROUTES: &str = "\
/ - Root
/books - BooksCollection
/books/{book_id} - Book
/books/{book_id}/reviews - ReviewsCollection
/books/{book_id}/reviews/{review_id} - Review
/authors - AuthorsCollection
";

/// One catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub id: &'static str,
    pub title: &'static str,
    pub author: &'static str,
}

/// The static catalogue, ordered by id.
pub const BOOKS: &[BookRecord] = &[
    BookRecord { id: "57", title: "Pride and Prejudice", author: "Jane Austen" },
    BookRecord { id: "64", title: "The Lord of the Rings", author: "JRR Tolkien" },
    BookRecord { id: "71", title: "Jane Eyre", author: "Charlotte Bronte" },
    BookRecord { id: "76", title: "Wuthering Heights", author: "Emily Bronte" },
    BookRecord { id: "82", title: "Great Expectations", author: "Charles Dickens" },
    BookRecord { id: "98", title: "Catch 22", author: "Joseph Heller" },
];

/// Id reported for a book "created" by `POST /books`. Nothing is stored.
pub const NEW_BOOK_ID: u32 = 100;

const REVIEW_TITLES: [&str; 4] = ["Love it", "Boring!", "Thoughtful", "My Favorite book"];

/// Look up a book by id.
#[must_use]
pub fn find_book(id: &str) -> Option<&'static BookRecord> {
    BOOKS.iter().find(|b| b.id == id)
}

/// Every author, in catalogue order.
#[must_use]
pub fn authors() -> Vec<&'static str> {
    BOOKS.iter().map(|b| b.author).collect()
}

/// Registry holding every demo resource kind.
#[must_use]
pub fn registry() -> HandlerRegistry {
    HandlerRegistry::builder()
        .register::<Root>("Root")
        .register::<BooksCollection>("BooksCollection")
        .register::<Book>("Book")
        .register::<ReviewsCollection>("ReviewsCollection")
        .register::<Review>("Review")
        .register::<AuthorsCollection>("AuthorsCollection")
        .build()
}

/// The demo route table.
///
/// # Errors
///
/// Only if [`ROUTES`] itself is malformed.
pub fn route_table() -> Result<RouteTable, RouteSpecError> {
    Ok(RouteTable::parse(ROUTES, LoadPolicy::Strict)?.table)
}

/// A dispatcher serving the demo API below `base_path` (empty for none).
///
/// # Errors
///
/// Only if [`ROUTES`] itself is malformed.
pub fn dispatcher(base_path: &str) -> Result<Dispatcher, RouteSpecError> {
    let router = Router::new(route_table()?).with_base_path(base_path);
    Ok(Dispatcher::new(router, registry()))
}

/// Halt with a 404 unless the bound `book_id` names a known book.
fn lookup_book(ctx: &RequestContext, res: &mut ResponseState) -> Construction<&'static BookRecord> {
    let id = ctx.param("book_id").unwrap_or_default();
    match find_book(id) {
        Some(book) => Construction::Ready(book),
        None => {
            res.hyper_status(404, format!("Could not find a book with ID {id}."));
            Construction::Halted
        }
    }
}

/// Deterministic stand-in review ids in `10..=60`.
fn review_ids(book_id: &str) -> impl Iterator<Item = u32> {
    let seed: u32 = book_id.bytes().map(u32::from).sum();
    (0..REVIEW_TITLES.len() as u32).map(move |i| 10 + (seed * 7 + i * 13) % 51)
}

pub struct Root;

impl Resource for Root {
    const TITLE: &'static str = "Library API Root";
    const DESCRIPTION: &'static str = "Welcome! Try the /books/ (Books Collection) resource.";
    const OPERATIONS: &'static [(Operation, OperationFn<Self>)] = &[];

    fn construct(_: &RequestContext, _: &mut ResponseState) -> Construction<Self> {
        Construction::Ready(Root)
    }
}

pub struct BooksCollection;

impl BooksCollection {
    fn get(&self, _ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
        for book in BOOKS {
            res.add_link(LinkEntry::item(book.title, format!("/books/{}", book.id)));
        }
        Ok(())
    }

    fn post(&self, _ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
        res.insert("new_id", NEW_BOOK_ID);
        Ok(())
    }
}

impl Resource for BooksCollection {
    const TITLE: &'static str = "Books Collection";
    const DESCRIPTION: &'static str =
        "POST a new book or GET a list of books (in hm-json link format).";
    const OPERATIONS: &'static [(Operation, OperationFn<Self>)] =
        &[(Operation::Get, Self::get), (Operation::Post, Self::post)];

    fn construct(_: &RequestContext, _: &mut ResponseState) -> Construction<Self> {
        Construction::Ready(BooksCollection)
    }
}

pub struct Book {
    book: &'static BookRecord,
}

impl Book {
    fn options(&self, ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
        default_options(self, ctx, res)?;
        res.set_title(self.book.title);
        Ok(())
    }

    fn get(&self, _ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
        res.add_data(self.book)?;
        Ok(())
    }
}

impl Resource for Book {
    const TITLE: &'static str = "A Book";
    const DESCRIPTION: &'static str = "You can GET this book's data, POST updates, or DELETE it.";
    const OPERATIONS: &'static [(Operation, OperationFn<Self>)] =
        &[(Operation::Options, Self::options), (Operation::Get, Self::get)];

    fn construct(ctx: &RequestContext, res: &mut ResponseState) -> Construction<Self> {
        match lookup_book(ctx, res) {
            Construction::Ready(book) => Construction::Ready(Book { book }),
            Construction::Halted => Construction::Halted,
        }
    }
}

pub struct ReviewsCollection {
    book: &'static BookRecord,
}

impl ReviewsCollection {
    fn options(&self, ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
        default_options(self, ctx, res)?;
        res.set_title(format!("Reviews for {}", self.book.title));
        Ok(())
    }

    fn get(&self, ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
        for (title, id) in REVIEW_TITLES.iter().zip(review_ids(self.book.id)) {
            res.add_link(LinkEntry::item(*title, format!("{}/{id}", ctx.uri())));
        }
        Ok(())
    }
}

impl Resource for ReviewsCollection {
    const TITLE: &'static str = "Reviews for a book";
    const DESCRIPTION: &'static str = "GET the list of reviews for this book.";
    const OPERATIONS: &'static [(Operation, OperationFn<Self>)] =
        &[(Operation::Options, Self::options), (Operation::Get, Self::get)];

    fn construct(ctx: &RequestContext, res: &mut ResponseState) -> Construction<Self> {
        match lookup_book(ctx, res) {
            Construction::Ready(book) => Construction::Ready(ReviewsCollection { book }),
            Construction::Halted => Construction::Halted,
        }
    }
}

#[derive(Serialize)]
struct ReviewRecord<'a> {
    book_id: &'a str,
    review_author: &'static str,
    title: &'static str,
    content: &'static str,
    rating: u8,
}

pub struct Review;

impl Review {
    fn get(&self, ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
        res.add_data(&ReviewRecord {
            book_id: ctx.param("book_id").unwrap_or_default(),
            review_author: "John Doe",
            title: "This book is great!",
            content: "Lorem ipsum dolor sit amet, consectetur adipiscing elit...",
            rating: 3,
        })?;
        Ok(())
    }
}

impl Resource for Review {
    const TITLE: &'static str = "Book Review";
    const DESCRIPTION: &'static str = "GET this resource for the full data.";
    const OPERATIONS: &'static [(Operation, OperationFn<Self>)] = &[(Operation::Get, Self::get)];

    fn construct(_: &RequestContext, _: &mut ResponseState) -> Construction<Self> {
        Construction::Ready(Review)
    }
}

pub struct AuthorsCollection;

impl AuthorsCollection {
    fn get(&self, _ctx: &RequestContext, res: &mut ResponseState) -> anyhow::Result<()> {
        res.insert("authors_list", authors());
        Ok(())
    }
}

impl Resource for AuthorsCollection {
    const TITLE: &'static str = "Authors";
    const DESCRIPTION: &'static str =
        "You can GET a list of the authors of all of the books available through this API.";
    const OPERATIONS: &'static [(Operation, OperationFn<Self>)] = &[(Operation::Get, Self::get)];

    fn construct(_: &RequestContext, _: &mut ResponseState) -> Construction<Self> {
        Construction::Ready(AuthorsCollection)
    }
}
