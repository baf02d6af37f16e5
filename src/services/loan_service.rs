//! Loan Service - the circulation engine
//!
//! The engine owns the loan lifecycle and is the only writer of a book's
//! `available` counter. Every mutation of the entity store goes through its
//! writer lock, so the read-modify-write cycles of checkout, return and
//! catalog edits never interleave.
//!
//! Lateness is derived: `classify` and `lateness_days` compare the due date
//! against the caller's clock and are used by every reader.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{
    Collection, DomainError, DomainResult, EntityStore, load_records, save_records,
};
use crate::infrastructure::config::{DEFAULT_LOAN_PERIOD_DAYS, MAX_LOAN_PERIOD_DAYS};
use crate::models::{Book, Loan, LoanStatus, Member};

/// Loans more than this many days late raise a critical alert
pub const CRITICAL_LATENESS_DAYS: i64 = 3;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Classify a loan at `now`. Pure.
pub fn classify(loan: &Loan, now: DateTime<Utc>) -> LoanStatus {
    if loan.is_returned() {
        LoanStatus::Returned
    } else if now > loan.due_date {
        LoanStatus::Overdue
    } else {
        LoanStatus::Active
    }
}

/// Whole days past due, rounded up. `None` for returned loans; zero or
/// negative while the loan is not yet late.
pub fn lateness_days(loan: &Loan, now: DateTime<Utc>) -> Option<i64> {
    if loan.is_returned() {
        return None;
    }
    let late_ms = (now - loan.due_date).num_milliseconds();
    // ceil(late_ms / DAY_MILLIS) for either sign
    Some(-(-late_ms).div_euclid(DAY_MILLIS))
}

pub fn is_critical(loan: &Loan, now: DateTime<Utc>) -> bool {
    matches!(lateness_days(loan, now), Some(days) if days > CRITICAL_LATENESS_DAYS)
}

/// Number of non-returned loans that reference `book_id`
pub fn outstanding_loans(loans: &[Loan], book_id: &str) -> u32 {
    let count = loans
        .iter()
        .filter(|l| l.book_id == book_id && !l.is_returned())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

pub struct CirculationEngine {
    store: Arc<dyn EntityStore>,
    writer: Mutex<()>,
    loan_period: Duration,
}

impl CirculationEngine {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
            loan_period: Duration::days(DEFAULT_LOAN_PERIOD_DAYS),
        }
    }

    /// Set the loan period, clamped to `0..=MAX_LOAN_PERIOD_DAYS`
    pub fn with_loan_period_days(mut self, days: i64) -> Self {
        let days = days.clamp(0, MAX_LOAN_PERIOD_DAYS);
        if let Some(period) = Duration::try_days(days) {
            self.loan_period = period;
        }
        self
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    pub fn loan_period(&self) -> Duration {
        self.loan_period
    }

    /// Serialize a write against every other write of the store
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }

    pub async fn checkout(&self, book_id: &str, member_id: &str) -> DomainResult<Loan> {
        self.checkout_at(book_id, member_id, Utc::now()).await
    }

    /// Lend one copy of `book_id` to `member_id`.
    ///
    /// Fails with `NotFound` for an unknown book or member and with
    /// `OutOfStock` when no copy is available; in both cases nothing is
    /// written.
    pub async fn checkout_at(
        &self,
        book_id: &str,
        member_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Loan> {
        let _guard = self.lock_writes().await;

        let books_before = self.store.get(Collection::Books).await?;
        let mut books: Vec<Book> = books_before
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?;
        let members: Vec<Member> = load_records(self.store(), Collection::Members).await?;
        let mut loans: Vec<Loan> = load_records(self.store(), Collection::Loans).await?;

        let book = books
            .iter_mut()
            .find(|b| b.id == book_id)
            .ok_or_else(|| DomainError::not_found("book", book_id))?;

        // Loans reference the member id in its stored case
        let member_id = members
            .iter()
            .find(|m| m.has_id(member_id))
            .map(|m| m.id.clone())
            .ok_or_else(|| DomainError::not_found("member", member_id))?;

        if book.available == 0 {
            tracing::warn!("Checkout rejected: book {} has no copies available", book_id);
            return Err(DomainError::OutOfStock(book_id.to_string()));
        }

        book.available -= 1;
        let remaining = book.available;

        let loan = Loan::open(book_id, &member_id, now, self.loan_period)?;
        loans.push(loan.clone());

        self.commit(books_before, &books, &loans).await?;

        tracing::info!(
            "Loan {} created: book {} to member {}, due {} ({} left)",
            loan.id,
            book_id,
            member_id,
            loan.due_date.to_rfc3339(),
            remaining
        );
        Ok(loan)
    }

    pub async fn return_loan(&self, loan_id: &str) -> DomainResult<Loan> {
        self.return_loan_at(loan_id, Utc::now()).await
    }

    /// Close a loan and put its copy back on the shelf.
    ///
    /// A loan that is already returned is rejected with `AlreadyReturned`,
    /// so availability is restored at most once per loan. If the book was
    /// deleted since checkout the loan still closes and no book changes.
    pub async fn return_loan_at(&self, loan_id: &str, now: DateTime<Utc>) -> DomainResult<Loan> {
        let _guard = self.lock_writes().await;

        let books_before = self.store.get(Collection::Books).await?;
        let mut books: Vec<Book> = books_before
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?;
        let mut loans: Vec<Loan> = load_records(self.store(), Collection::Loans).await?;

        let loan = loans
            .iter_mut()
            .find(|l| l.id == loan_id)
            .ok_or_else(|| DomainError::not_found("loan", loan_id))?;

        if loan.is_returned() {
            tracing::warn!("Return rejected: loan {} is already returned", loan_id);
            return Err(DomainError::AlreadyReturned(loan_id.to_string()));
        }

        loan.close(now);
        let returned = loan.clone();

        let book_exists = match books.iter_mut().find(|b| b.id == returned.book_id) {
            Some(book) if book.available >= book.stock => {
                tracing::warn!(
                    "Book {} already shows all {} copies available; not incrementing",
                    book.id,
                    book.stock
                );
                true
            }
            Some(book) => {
                book.available += 1;
                true
            }
            None => false,
        };

        if book_exists {
            self.commit(books_before, &books, &loans).await?;
        } else {
            tracing::info!(
                "Book {} no longer exists; closing loan {} without restocking",
                returned.book_id,
                loan_id
            );
            save_records(self.store(), Collection::Loans, &loans).await?;
        }

        tracing::info!("Loan {} returned", loan_id);
        Ok(returned)
    }

    /// Recompute every book's `available` as `stock` minus its outstanding
    /// loans, clamped to `[0, stock]`. Returns the books whose count changed.
    pub async fn reconcile_availability(&self) -> DomainResult<Vec<Book>> {
        let _guard = self.lock_writes().await;

        let mut books: Vec<Book> = load_records(self.store(), Collection::Books).await?;
        let loans: Vec<Loan> = load_records(self.store(), Collection::Loans).await?;

        let mut changed = Vec::new();
        for book in books.iter_mut() {
            let expected = book
                .stock
                .saturating_sub(outstanding_loans(&loans, &book.id));
            if book.available != expected {
                tracing::info!(
                    "Reconciled book {}: available {} -> {}",
                    book.id,
                    book.available,
                    expected
                );
                book.available = expected;
                changed.push(book.clone());
            }
        }

        if !changed.is_empty() {
            save_records(self.store(), Collection::Books, &books).await?;
        }
        Ok(changed)
    }

    /// Write books then loans. If the loan write fails the book collection
    /// is put back to `books_before`.
    async fn commit(
        &self,
        books_before: Vec<Value>,
        books: &[Book],
        loans: &[Loan],
    ) -> DomainResult<()> {
        save_records(self.store(), Collection::Books, books).await?;

        if let Err(err) = save_records(self.store(), Collection::Loans, loans).await {
            tracing::error!("Failed to write loans, restoring books: {}", err);
            if let Err(rollback) = self.store.put(Collection::Books, books_before).await {
                tracing::error!("Failed to restore books after loan write error: {}", rollback);
            }
            return Err(err);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryEntityStore;
    use crate::models::{Category, MemberType};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn book(id: &str, stock: u32, available: u32) -> Book {
        Book {
            id: id.to_string(),
            isbn: "978-0000000000".to_string(),
            title: format!("Book {}", id),
            author: "Author".to_string(),
            publisher: "Publisher".to_string(),
            year: 2020,
            category: Category::General,
            stock,
            available,
        }
    }

    fn member(id: &str) -> Member {
        Member {
            id: id.to_string(),
            name: format!("Member {}", id),
            member_type: MemberType::Student,
            email: "member@stt.ac.id".to_string(),
            phone: String::new(),
            join_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    async fn setup_engine(books: Vec<Book>) -> CirculationEngine {
        let store: Arc<dyn EntityStore> = Arc::new(MemoryEntityStore::new());
        save_records(&*store, Collection::Books, &books)
            .await
            .unwrap();
        save_records(&*store, Collection::Members, &[member("MHS001")])
            .await
            .unwrap();
        CirculationEngine::new(store)
    }

    async fn books_of(engine: &CirculationEngine) -> Vec<Book> {
        load_records(engine.store(), Collection::Books).await.unwrap()
    }

    async fn loans_of(engine: &CirculationEngine) -> Vec<Loan> {
        load_records(engine.store(), Collection::Loans).await.unwrap()
    }

    #[tokio::test]
    async fn test_checkout_last_copy_then_out_of_stock() {
        let engine = setup_engine(vec![book("1", 1, 1)]).await;
        let now = Utc::now();

        let loan = engine.checkout_at("1", "MHS001", now).await.unwrap();
        assert_eq!(classify(&loan, now), LoanStatus::Active);
        assert_eq!(loan.loan_date, now);
        assert_eq!(loan.due_date, now + Duration::days(7));
        assert!(loan.return_date.is_none());
        assert_eq!(books_of(&engine).await[0].available, 0);

        let books_before = engine.store().get(Collection::Books).await.unwrap();
        let loans_before = engine.store().get(Collection::Loans).await.unwrap();

        let err = engine.checkout_at("1", "MHS001", now).await.unwrap_err();
        assert!(matches!(err, DomainError::OutOfStock(_)));

        // Rejected checkout leaves both collections unchanged
        assert_eq!(engine.store().get(Collection::Books).await.unwrap(), books_before);
        assert_eq!(engine.store().get(Collection::Loans).await.unwrap(), loans_before);
    }

    #[tokio::test]
    async fn test_checkout_unknown_book_or_member() {
        let engine = setup_engine(vec![book("1", 2, 2)]).await;

        let err = engine.checkout("deleted", "MHS001").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "book", .. }));

        let err = engine.checkout("1", "nobody").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "member", .. }));

        assert!(loans_of(&engine).await.is_empty());
        assert_eq!(books_of(&engine).await[0].available, 2);
    }

    #[tokio::test]
    async fn test_return_twice_increments_once() {
        let engine = setup_engine(vec![book("1", 3, 3)]).await;
        let loan = engine.checkout("1", "MHS001").await.unwrap();
        assert_eq!(books_of(&engine).await[0].available, 2);

        let returned = engine.return_loan(&loan.id).await.unwrap();
        assert!(returned.is_returned());
        assert!(returned.return_date.is_some());
        assert_eq!(books_of(&engine).await[0].available, 3);

        let err = engine.return_loan(&loan.id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyReturned(_)));
        assert_eq!(books_of(&engine).await[0].available, 3);

        let loans = loans_of(&engine).await;
        assert_eq!(loans.len(), 1);
        assert!(loans[0].is_returned());
    }

    #[tokio::test]
    async fn test_return_unknown_loan() {
        let engine = setup_engine(vec![book("1", 1, 1)]).await;
        let err = engine.return_loan("L-missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "loan", .. }));
    }

    #[tokio::test]
    async fn test_return_after_book_deleted_closes_loan_only() {
        let engine = setup_engine(vec![book("1", 1, 1), book("2", 1, 1)]).await;
        let loan = engine.checkout("1", "MHS001").await.unwrap();

        // Catalog deletes book 1
        save_records(engine.store(), Collection::Books, &[book("2", 1, 1)])
            .await
            .unwrap();

        let returned = engine.return_loan(&loan.id).await.unwrap();
        assert!(returned.is_returned());

        let books = books_of(&engine).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "2");
        assert_eq!(books[0].available, 1);
    }

    #[tokio::test]
    async fn test_conservation_over_mixed_operations() {
        let engine = setup_engine(vec![book("1", 3, 3), book("2", 2, 2)]).await;

        let a = engine.checkout("1", "MHS001").await.unwrap();
        let _b = engine.checkout("1", "MHS001").await.unwrap();
        let _c = engine.checkout("2", "MHS001").await.unwrap();
        engine.return_loan(&a.id).await.unwrap();
        let _d = engine.checkout("1", "MHS001").await.unwrap();

        let books = books_of(&engine).await;
        let loans = loans_of(&engine).await;
        for book in &books {
            assert!(book.available <= book.stock);
            assert_eq!(book.on_loan(), outstanding_loans(&loans, &book.id));
        }
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_never_oversell() {
        let engine = Arc::new(setup_engine(vec![book("1", 3, 3)]).await);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.checkout("1", "MHS001").await })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 3);
        assert_eq!(books_of(&engine).await[0].available, 0);
        assert_eq!(loans_of(&engine).await.len(), 3);
    }

    #[test]
    fn test_classify_and_lateness() {
        let now = Utc::now();
        let mut loan =
            Loan::open("1", "MHS001", now - Duration::days(12), Duration::days(7)).unwrap();
        assert_eq!(loan.due_date, now - Duration::days(5));

        assert_eq!(classify(&loan, now), LoanStatus::Overdue);
        assert_eq!(lateness_days(&loan, now), Some(5));
        assert!(is_critical(&loan, now));

        // Partial days round up
        assert_eq!(lateness_days(&loan, now - Duration::hours(36)), Some(4));
        assert_eq!(lateness_days(&loan, loan.due_date), Some(0));
        assert_eq!(classify(&loan, loan.due_date), LoanStatus::Active);
        assert!(!is_critical(&loan, now - Duration::days(2)));

        loan.close(now);
        assert_eq!(classify(&loan, now), LoanStatus::Returned);
        assert_eq!(lateness_days(&loan, now), None);
        assert!(!is_critical(&loan, now));
    }

    #[tokio::test]
    async fn test_reconcile_availability() {
        let engine = setup_engine(vec![book("1", 5, 5), book("2", 2, 0)]).await;
        let _loan = engine.checkout("1", "MHS001").await.unwrap();

        // Simulate legacy data with a stale count on both books
        let mut books = books_of(&engine).await;
        books[0].available = 5;
        save_records(engine.store(), Collection::Books, &books)
            .await
            .unwrap();

        let changed = engine.reconcile_availability().await.unwrap();
        assert_eq!(changed.len(), 2);

        let books = books_of(&engine).await;
        assert_eq!(books[0].available, 4);
        assert_eq!(books[1].available, 2);

        assert!(engine.reconcile_availability().await.unwrap().is_empty());
    }

    /// Store whose loan writes can be made to fail
    struct FlakyStore {
        inner: MemoryEntityStore,
        fail_loans: AtomicBool,
    }

    #[async_trait]
    impl EntityStore for FlakyStore {
        async fn get(&self, collection: Collection) -> DomainResult<Vec<Value>> {
            self.inner.get(collection).await
        }

        async fn put(&self, collection: Collection, records: Vec<Value>) -> DomainResult<()> {
            if collection == Collection::Loans && self.fail_loans.load(Ordering::SeqCst) {
                return Err(DomainError::Storage("disk full".to_string()));
            }
            self.inner.put(collection, records).await
        }
    }

    #[tokio::test]
    async fn test_failed_loan_write_restores_books() {
        let store = Arc::new(FlakyStore {
            inner: MemoryEntityStore::new(),
            fail_loans: AtomicBool::new(false),
        });
        save_records(&*store, Collection::Books, &[book("1", 2, 2)])
            .await
            .unwrap();
        save_records(&*store, Collection::Members, &[member("MHS001")])
            .await
            .unwrap();
        let engine = CirculationEngine::new(store.clone());

        store.fail_loans.store(true, Ordering::SeqCst);
        let err = engine.checkout("1", "MHS001").await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));

        assert_eq!(books_of(&engine).await[0].available, 2);
        assert!(loans_of(&engine).await.is_empty());
    }

    #[tokio::test]
    async fn test_custom_loan_period() {
        let engine = setup_engine(vec![book("1", 1, 1)])
            .await
            .with_loan_period_days(14);
        let now = Utc::now();
        let loan = engine.checkout_at("1", "MHS001", now).await.unwrap();
        assert_eq!(loan.due_date, now + Duration::days(14));
    }

    #[tokio::test]
    async fn test_oversized_loan_period_is_clamped() {
        let engine = setup_engine(vec![book("1", 1, 1)])
            .await
            .with_loan_period_days(i64::MAX);
        assert_eq!(engine.loan_period(), Duration::days(MAX_LOAN_PERIOD_DAYS));

        let now = Utc::now();
        let loan = engine.checkout_at("1", "MHS001", now).await.unwrap();
        assert_eq!(loan.due_date, now + Duration::days(MAX_LOAN_PERIOD_DAYS));
    }

    #[tokio::test]
    async fn test_unrepresentable_due_date_rejects_checkout() {
        let engine = setup_engine(vec![book("1", 1, 1)]).await;

        let err = engine
            .checkout_at("1", "MHS001", DateTime::<Utc>::MAX_UTC)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(books_of(&engine).await[0].available, 1);
        assert!(loans_of(&engine).await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_matches_member_id_ignoring_case() {
        let engine = setup_engine(vec![book("1", 2, 2)]).await;

        let loan = engine.checkout("1", "mhs001").await.unwrap();
        assert_eq!(loan.member_id, "MHS001");
        assert_eq!(books_of(&engine).await[0].available, 1);
    }
}
