pub mod timeout;

pub use timeout::{TimeoutConfig, TimeoutExt};
