//! Entity store contract
//!
//! The store persists three ordered collections (books, members, loans) and
//! only ever reads or replaces a collection as a whole. Implementations live
//! in the infrastructure layer.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::{DomainError, DomainResult};

/// The collections held by the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Books,
    Members,
    Loans,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Books, Collection::Members, Collection::Loans];

    /// Storage key of the collection
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Members => "members",
            Collection::Loans => "loans",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Collection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::not_found("collection", s))
    }
}

/// Whole-collection key-value persistence
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Read a collection; a collection never written reads as empty
    async fn get(&self, collection: Collection) -> DomainResult<Vec<Value>>;

    /// Replace a collection with the given ordered records
    async fn put(&self, collection: Collection, records: Vec<Value>) -> DomainResult<()>;
}

/// Read a collection and decode every record
pub async fn load_records<T: DeserializeOwned>(
    store: &dyn EntityStore,
    collection: Collection,
) -> DomainResult<Vec<T>> {
    store
        .get(collection)
        .await?
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(DomainError::from))
        .collect()
}

/// Encode every record and replace the collection
pub async fn save_records<T: Serialize>(
    store: &dyn EntityStore,
    collection: Collection,
    records: &[T],
) -> DomainResult<()> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    store.put(collection, values).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_parses_case_insensitively() {
        assert_eq!("Books".parse::<Collection>().unwrap(), Collection::Books);
        assert_eq!(" loans ".parse::<Collection>().unwrap(), Collection::Loans);
        assert!(matches!(
            "copies".parse::<Collection>(),
            Err(DomainError::NotFound { .. })
        ));
    }
}
