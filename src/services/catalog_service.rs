//! Catalog Service - book create/edit/delete and search
//!
//! Writes take the engine's writer lock. A book's `available` count is
//! never taken from the editor: it starts equal to `stock` and an edit
//! recomputes it from the outstanding loans.

use uuid::Uuid;

use crate::domain::{Collection, DomainError, DomainResult, load_records, save_records};
use crate::models::{Book, BookInput, Loan};
use crate::services::loan_service::{CirculationEngine, outstanding_loans};
use crate::services::validation::validate_book_input;

/// List books, optionally filtered by a search term
pub async fn list_books(
    engine: &CirculationEngine,
    search: Option<&str>,
) -> DomainResult<Vec<Book>> {
    let books: Vec<Book> = load_records(engine.store(), Collection::Books).await?;

    Ok(match search {
        Some(term) => books.into_iter().filter(|b| b.matches(term)).collect(),
        None => books,
    })
}

pub async fn get_book(engine: &CirculationEngine, id: &str) -> DomainResult<Book> {
    let books: Vec<Book> = load_records(engine.store(), Collection::Books).await?;
    books
        .into_iter()
        .find(|b| b.id == id)
        .ok_or_else(|| DomainError::not_found("book", id))
}

/// Add a title to the catalog with every copy available
pub async fn create_book(engine: &CirculationEngine, input: BookInput) -> DomainResult<Book> {
    validate_book_input(&input)?;

    let _guard = engine.lock_writes().await;
    let mut books: Vec<Book> = load_records(engine.store(), Collection::Books).await?;

    let book = Book {
        id: Uuid::new_v4().to_string(),
        isbn: input.isbn.trim().to_string(),
        title: input.title.trim().to_string(),
        author: input.author.trim().to_string(),
        publisher: input.publisher.trim().to_string(),
        year: input.year,
        category: input.category,
        stock: input.stock,
        available: input.stock,
    };
    books.push(book.clone());
    save_records(engine.store(), Collection::Books, &books).await?;

    tracing::info!("Book {} created: '{}' x{}", book.id, book.title, book.stock);
    Ok(book)
}

/// Replace a book's descriptive fields and stock.
///
/// `available` becomes `stock` minus the loans still out; a stock below
/// that number is rejected.
pub async fn update_book(
    engine: &CirculationEngine,
    id: &str,
    input: BookInput,
) -> DomainResult<Book> {
    validate_book_input(&input)?;

    let _guard = engine.lock_writes().await;
    let mut books: Vec<Book> = load_records(engine.store(), Collection::Books).await?;
    let loans: Vec<Loan> = load_records(engine.store(), Collection::Loans).await?;

    let book = books
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| DomainError::not_found("book", id))?;

    let on_loan = outstanding_loans(&loans, id);
    if input.stock < on_loan {
        return Err(DomainError::InvalidInput(format!(
            "stock {} is below the {} copies currently on loan",
            input.stock, on_loan
        )));
    }

    book.isbn = input.isbn.trim().to_string();
    book.title = input.title.trim().to_string();
    book.author = input.author.trim().to_string();
    book.publisher = input.publisher.trim().to_string();
    book.year = input.year;
    book.category = input.category;
    book.stock = input.stock;
    book.available = input.stock - on_loan;
    let updated = book.clone();

    save_records(engine.store(), Collection::Books, &books).await?;

    tracing::info!(
        "Book {} updated: stock {}, available {}",
        updated.id,
        updated.stock,
        updated.available
    );
    Ok(updated)
}

/// Remove a book. Loans that reference it are kept and later display the
/// book as unknown.
pub async fn delete_book(engine: &CirculationEngine, id: &str) -> DomainResult<()> {
    let _guard = engine.lock_writes().await;
    let mut books: Vec<Book> = load_records(engine.store(), Collection::Books).await?;

    let before = books.len();
    books.retain(|b| b.id != id);
    if books.len() == before {
        return Err(DomainError::not_found("book", id));
    }

    save_records(engine.store(), Collection::Books, &books).await?;
    tracing::info!("Book {} deleted", id);
    Ok(())
}
