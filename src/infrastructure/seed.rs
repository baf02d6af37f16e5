use chrono::{Duration, NaiveDate, Utc};

use crate::domain::{Collection, DomainResult, EntityStore, save_records};
use crate::models::{Book, Category, Loan, Member, MemberType, StoredStatus};

/// Populate an empty store with a small demo library.
/// Does nothing if any book is already catalogued.
pub async fn seed_demo_data(store: &dyn EntityStore) -> DomainResult<bool> {
    if !store.get(Collection::Books).await?.is_empty() {
        tracing::info!("Store already has books, skipping demo seed");
        return Ok(false);
    }

    let now = Utc::now();

    // 1. Books (counts agree with the loans below)
    let books = vec![
        Book {
            id: "1".to_owned(),
            isbn: "978-0123456789".to_owned(),
            title: "Sistematika Teologi Vol 1".to_owned(),
            author: "Louis Berkhof".to_owned(),
            publisher: "Momentum".to_owned(),
            year: 2010,
            category: Category::Theology,
            stock: 5,
            available: 4,
        },
        Book {
            id: "2".to_owned(),
            isbn: "978-9876543210".to_owned(),
            title: "Tafsir Injil Matius".to_owned(),
            author: "Matthew Henry".to_owned(),
            publisher: "BPK Gunung Mulia".to_owned(),
            year: 2005,
            category: Category::BiblicalStudies,
            stock: 3,
            available: 3,
        },
        Book {
            id: "3".to_owned(),
            isbn: "978-1122334455".to_owned(),
            title: "Sejarah Gereja Asia".to_owned(),
            author: "Dr. Anne R".to_owned(),
            publisher: "Kanisius".to_owned(),
            year: 2018,
            category: Category::ChurchHistory,
            stock: 2,
            available: 1,
        },
    ];

    // 2. Members
    let members = vec![
        Member {
            id: "MHS2023001".to_owned(),
            name: "Yohanes Papare".to_owned(),
            member_type: MemberType::Student,
            email: "yohanes@stt.ac.id".to_owned(),
            phone: "08123456789".to_owned(),
            join_date: NaiveDate::from_ymd_opt(2023, 8, 1).unwrap_or(NaiveDate::MIN),
        },
        Member {
            id: "DSN001".to_owned(),
            name: "Dr. Paulus W".to_owned(),
            member_type: MemberType::Lecturer,
            email: "paulus@stt.ac.id".to_owned(),
            phone: "08129876543".to_owned(),
            join_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap_or(NaiveDate::MIN),
        },
    ];

    // 3. One loan on time, one well past due
    let overdue_since = now - Duration::days(12);
    let loans = vec![
        Loan {
            id: "L-1001".to_owned(),
            book_id: "1".to_owned(),
            member_id: "MHS2023001".to_owned(),
            loan_date: now,
            due_date: now + Duration::days(7),
            return_date: None,
            status: StoredStatus::Active,
        },
        Loan {
            id: "L-1002".to_owned(),
            book_id: "3".to_owned(),
            member_id: "DSN001".to_owned(),
            loan_date: overdue_since,
            due_date: overdue_since + Duration::days(7),
            return_date: None,
            status: StoredStatus::Active,
        },
    ];

    save_records(store, Collection::Books, &books).await?;
    save_records(store, Collection::Members, &members).await?;
    save_records(store, Collection::Loans, &loans).await?;

    tracing::info!(
        "Seeded {} books, {} members, {} loans",
        books.len(),
        members.len(),
        loans.len()
    );
    Ok(true)
}
