pub mod audit;
pub mod journal;
pub mod location;
pub mod subsection;

pub use audit::Audit;
pub use journal::Journal;
pub use location::Location;
pub use subsection::{ActivityType, Subsection, SubsectionKind, SubsectionType};
