pub mod book;
pub mod entity_collection;
pub mod loan;
pub mod member;

pub use book::{Book, BookInput, Category};
pub use loan::{Loan, LoanDto, LoanStatus, StoredStatus};
pub use member::{Member, MemberInput, MemberType, MemberUpdate};
