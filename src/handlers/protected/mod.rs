// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware inserts the AuthUser extension
pub mod assistant;
pub mod journal;
pub mod subsection;

pub use journal::create as journal_create;
pub use journal::delete as journal_delete;
pub use journal::get as journal_get;
pub use journal::list as journal_list;
pub use journal::update as journal_update;

pub use subsection::create as subsection_create;
pub use subsection::delete as subsection_delete;
pub use subsection::get as subsection_get;
pub use subsection::list as subsection_list;
pub use subsection::update as subsection_update;

pub use assistant::chat as assistant_chat;
pub use assistant::chat_stream as assistant_chat_stream;
