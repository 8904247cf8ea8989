pub mod composition;
pub mod timeout;
pub mod traits;

pub use composition::CompositionEncoder;
pub use timeout::TimeoutEncoder;
pub use traits::Encoder;
