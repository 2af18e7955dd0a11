pub mod messages;
pub mod requests;
pub mod views;

pub use requests::{
    ChatRequest, JournalCreateRequest, JournalUpdateRequest, SubsectionChanges, SubsectionCreateRequest,
    SubsectionUpdateRequest,
};
pub use views::{ChatReplyView, JournalBrief, JournalDetail, SubsectionBrief, SubsectionDetail};
