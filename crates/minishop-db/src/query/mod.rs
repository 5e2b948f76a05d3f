pub mod condition;
pub mod page;

pub use condition::{MemberPredicate, MemberSearchCondition};
pub use page::{resolve_total, CountStrategy, Page, Pageable};
