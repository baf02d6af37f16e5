//! CSV export of whole collections
//!
//! The header row comes from the record field names and every value is
//! quoted. Embedded quotes are doubled by the writer.

use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;

use crate::domain::{Collection, DomainError, DomainResult, load_records};
use crate::models::{Book, Loan, Member};
use crate::services::loan_service::CirculationEngine;

/// Serialize uniform records to a CSV document. No records, no output.
pub fn to_csv<T: Serialize>(records: &[T]) -> DomainResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| DomainError::Storage(format!("CSV encoding failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::Storage(format!("CSV encoding failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| DomainError::Storage(e.to_string()))
}

/// Export one collection as CSV
pub async fn export_collection(
    engine: &CirculationEngine,
    collection: Collection,
) -> DomainResult<String> {
    let csv = match collection {
        Collection::Books => {
            let books: Vec<Book> = load_records(engine.store(), collection).await?;
            to_csv(&books)?
        }
        Collection::Members => {
            let members: Vec<Member> = load_records(engine.store(), collection).await?;
            to_csv(&members)?
        }
        Collection::Loans => {
            let loans: Vec<Loan> = load_records(engine.store(), collection).await?;
            to_csv(&loans)?
        }
    };

    tracing::info!("Exported {} as CSV ({} bytes)", collection, csv.len());
    Ok(csv)
}

/// Download name for an export, e.g. `books_report_2024-05-01.csv`
pub fn export_filename(collection: Collection, date: chrono::NaiveDate) -> String {
    format!("{}_report_{}.csv", collection, date.format("%Y-%m-%d"))
}
