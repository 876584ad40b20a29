pub mod config;
pub mod error;
pub mod metrics;
pub mod narrative;

pub use config::Config;
pub use error::*;
pub use metrics::*;
pub use narrative::*;
