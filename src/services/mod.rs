pub mod access;
pub mod journal_service;
pub mod resolver;
pub mod subsection_service;

pub use access::authorize;
pub use journal_service::JournalService;
pub use resolver::{ResolveError, SubsectionResolver};
pub use subsection_service::SubsectionService;
