pub mod envelope;

pub use envelope::{CollectionEnvelope, OptionEntry};
