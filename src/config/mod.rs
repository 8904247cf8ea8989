pub mod traits;
pub mod generation;
pub mod store;
pub mod encoder;
pub mod logging;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use generation::GenerationConfig;
pub use store::{StoreConfig, StoreMode};
pub use encoder::EncoderConfig;
pub use logging::LoggingConfig;
pub use traits::ConfigSection;
