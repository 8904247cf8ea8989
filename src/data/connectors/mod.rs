mod jsonl;
mod types;
mod validator;

pub use jsonl::JsonLinesBackend;
pub use types::{MemoryBackend, RecordBackend};
pub use validator::RecordValidator;
