use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Membership classes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    Student,
    Lecturer,
    Staff,
}

/// A registered borrower. `id` is the institutional identifier, stored
/// trimmed and unique without regard to case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: MemberType,
    pub email: String,
    pub phone: String,
    pub join_date: NaiveDate,
}

impl Member {
    /// Ids are unique without regard to case, so lookups ignore it too
    pub fn has_id(&self, id: &str) -> bool {
        self.id.to_lowercase() == id.trim().to_lowercase()
    }

    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.id.to_lowercase().contains(&term)
    }
}

// Registration payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberInput {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_member_type")]
    pub member_type: MemberType,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub join_date: Option<NaiveDate>,
}

// Profile edit payload; the id is immutable
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: MemberType,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

fn default_member_type() -> MemberType {
    MemberType::Student
}
