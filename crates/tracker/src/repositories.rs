mod alert;
mod mention;

pub use alert::AlertRepository;
pub use mention::{MentionRepository, DEDUP_PREFIX_CHARS};
