//! Report Service - read-only views over the three collections
//!
//! Nothing here writes to the store. Loan status is always classified at
//! read time, and a loan whose book or member was deleted shows "Unknown".

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{Collection, DomainResult, load_records};
use crate::models::{Book, Category, Loan, LoanStatus, Member};
use crate::services::loan_service::{CirculationEngine, classify, is_critical, lateness_days};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Sum of owned copies across the catalog
    pub total_books: u64,
    pub active_members: usize,
    /// Loans not yet returned, overdue included
    pub active_loans: usize,
    pub overdue_loans: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalOverdue {
    pub loan_id: String,
    pub member_name: String,
    pub book_title: String,
    pub days_late: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub categories: Vec<CategoryCount>,
    pub critical_overdues: Vec<CriticalOverdue>,
}

/// Enriched loan with related data
#[derive(Debug, Clone, Serialize)]
pub struct LoanWithDetails {
    #[serde(flatten)]
    pub loan: Loan,
    /// Classification at read time
    pub state: LoanStatus,
    pub days_late: Option<i64>,
    pub member_name: String,
    pub book_title: String,
    pub book_isbn: Option<String>,
}

/// Which side of the loan register to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanTab {
    /// Loans still out, overdue included
    #[default]
    Active,
    /// Returned loans
    History,
}

pub fn dashboard_stats(
    books: &[Book],
    members: &[Member],
    loans: &[Loan],
    now: DateTime<Utc>,
) -> DashboardStats {
    DashboardStats {
        total_books: books.iter().map(|b| u64::from(b.stock)).sum(),
        active_members: members.len(),
        active_loans: loans.iter().filter(|l| !l.is_returned()).count(),
        overdue_loans: loans
            .iter()
            .filter(|l| classify(l, now) == LoanStatus::Overdue)
            .count(),
    }
}

/// Titles per category in declaration order, empty categories omitted
pub fn category_distribution(books: &[Book]) -> Vec<CategoryCount> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            label: category.label(),
            count: books.iter().filter(|b| b.category == category).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

/// Loans more than three days late, most late first
pub fn critical_overdues(
    books: &[Book],
    members: &[Member],
    loans: &[Loan],
    now: DateTime<Utc>,
) -> Vec<CriticalOverdue> {
    let titles = title_index(books);
    let names = name_index(members);

    let mut critical: Vec<CriticalOverdue> = loans
        .iter()
        .filter(|l| is_critical(l, now))
        .map(|l| CriticalOverdue {
            loan_id: l.id.clone(),
            member_name: lookup_or_unknown(&names, &l.member_id),
            book_title: lookup_or_unknown(&titles, &l.book_id),
            days_late: lateness_days(l, now).unwrap_or_default(),
        })
        .collect();

    critical.sort_by(|a, b| b.days_late.cmp(&a.days_late));
    critical
}

pub fn loans_with_details(
    books: &[Book],
    members: &[Member],
    loans: Vec<Loan>,
    tab: LoanTab,
    now: DateTime<Utc>,
) -> Vec<LoanWithDetails> {
    let books_by_id: HashMap<&str, &Book> = books.iter().map(|b| (b.id.as_str(), b)).collect();
    let names = name_index(members);

    let mut result: Vec<LoanWithDetails> = loans
        .into_iter()
        .filter(|l| match tab {
            LoanTab::Active => !l.is_returned(),
            LoanTab::History => l.is_returned(),
        })
        .map(|loan| {
            let book = books_by_id.get(loan.book_id.as_str());
            LoanWithDetails {
                state: classify(&loan, now),
                days_late: lateness_days(&loan, now).filter(|d| *d > 0),
                member_name: lookup_or_unknown(&names, &loan.member_id),
                book_title: book
                    .map(|b| b.title.clone())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                book_isbn: book.map(|b| b.isbn.clone()),
                loan,
            }
        })
        .collect();

    result.sort_by(|a, b| b.loan.loan_date.cmp(&a.loan.loan_date));
    result
}

/// Build the full dashboard from the store
pub async fn dashboard(engine: &CirculationEngine, now: DateTime<Utc>) -> DomainResult<Dashboard> {
    let books: Vec<Book> = load_records(engine.store(), Collection::Books).await?;
    let members: Vec<Member> = load_records(engine.store(), Collection::Members).await?;
    let loans: Vec<Loan> = load_records(engine.store(), Collection::Loans).await?;

    Ok(Dashboard {
        stats: dashboard_stats(&books, &members, &loans, now),
        categories: category_distribution(&books),
        critical_overdues: critical_overdues(&books, &members, &loans, now),
    })
}

/// List loans with related member and book info
pub async fn list_loans(
    engine: &CirculationEngine,
    tab: LoanTab,
    now: DateTime<Utc>,
) -> DomainResult<Vec<LoanWithDetails>> {
    let books: Vec<Book> = load_records(engine.store(), Collection::Books).await?;
    let members: Vec<Member> = load_records(engine.store(), Collection::Members).await?;
    let loans: Vec<Loan> = load_records(engine.store(), Collection::Loans).await?;

    Ok(loans_with_details(&books, &members, loans, tab, now))
}

fn title_index(books: &[Book]) -> HashMap<&str, &str> {
    books
        .iter()
        .map(|b| (b.id.as_str(), b.title.as_str()))
        .collect()
}

fn name_index(members: &[Member]) -> HashMap<&str, &str> {
    members
        .iter()
        .map(|m| (m.id.as_str(), m.name.as_str()))
        .collect()
}

fn lookup_or_unknown(index: &HashMap<&str, &str>, id: &str) -> String {
    index.get(id).copied().unwrap_or(UNKNOWN).to_string()
}
