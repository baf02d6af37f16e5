use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Persisted loan state. Lateness is never stored; older records that
/// carry `"overdue"` decode as `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredStatus {
    #[serde(alias = "overdue")]
    Active,
    Returned,
}

/// Classification seen by every reader, derived from the stored status
/// and the current time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
}

/// One borrowing transaction. `book_id` and `member_id` are weak
/// references: the referent may have been deleted since checkout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub book_id: String,
    pub member_id: String,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: StoredStatus,
}

impl Loan {
    pub(crate) fn open(
        book_id: &str,
        member_id: &str,
        now: DateTime<Utc>,
        period: Duration,
    ) -> DomainResult<Self> {
        let due_date = now.checked_add_signed(period).ok_or_else(|| {
            DomainError::InvalidInput(format!(
                "loan period of {} days from {} is out of range",
                period.num_days(),
                now
            ))
        })?;

        Ok(Self {
            id: format!("L-{}", Uuid::new_v4().simple()),
            book_id: book_id.to_string(),
            member_id: member_id.to_string(),
            loan_date: now,
            due_date,
            return_date: None,
            status: StoredStatus::Active,
        })
    }

    pub fn is_returned(&self) -> bool {
        self.status == StoredStatus::Returned
    }

    pub(crate) fn close(&mut self, now: DateTime<Utc>) {
        self.status = StoredStatus::Returned;
        self.return_date = Some(now);
    }
}

// Checkout request payload
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanDto {
    pub book_id: String,
    pub member_id: String,
}
