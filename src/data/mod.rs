pub mod connectors;
pub mod index;
pub mod store;

pub use connectors::{JsonLinesBackend, MemoryBackend, RecordBackend, RecordValidator};
pub use index::{FlatIndex, IndexCache};
pub use store::{EmbeddingStore, SearchHit, SharedStore};
