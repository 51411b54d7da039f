pub mod actor;
pub mod payload;
pub mod query;

pub use actor::CurrentActor;
pub use payload::WritePayload;
pub use query::{ListArgs, SearchArgs};
