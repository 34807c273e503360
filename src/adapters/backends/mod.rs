//! Generation backend implementations.

pub mod mock;
pub mod openai;
pub mod registry;
pub mod simulated;

pub use mock::MockBackend;
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use registry::BackendRegistry;
pub use simulated::SimulatedBackend;
