use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of catalog categories, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Theology,
    BiblicalStudies,
    Ministry,
    ChurchHistory,
    General,
    Reference,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Theology,
        Category::BiblicalStudies,
        Category::Ministry,
        Category::ChurchHistory,
        Category::General,
        Category::Reference,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Theology => "Theology",
            Category::BiblicalStudies => "Biblical Studies",
            Category::Ministry => "Ministry",
            Category::ChurchHistory => "Church History",
            Category::General => "General",
            Category::Reference => "Reference",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog title and its copy counts.
///
/// `available` never exceeds `stock`; only the circulation engine and
/// availability reconciliation change it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: i32,
    pub category: Category,
    pub stock: u32,
    pub available: u32,
}

impl Book {
    /// Copies currently lent out
    pub fn on_loan(&self) -> u32 {
        self.stock.saturating_sub(self.available)
    }

    /// Case-insensitive match against title, author, category and ISBN
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.author.to_lowercase().contains(&term)
            || self.isbn.contains(&term)
            || self.category.label().to_lowercase().contains(&term)
    }
}

/// Catalog editor payload for create and update.
///
/// No `available` field: availability is derived from the loans.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookInput {
    #[serde(default)]
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    pub year: i32,
    #[serde(default = "default_category")]
    pub category: Category,
    #[serde(default = "default_stock")]
    pub stock: u32,
}

fn default_category() -> Category {
    Category::Theology
}

fn default_stock() -> u32 {
    1
}
