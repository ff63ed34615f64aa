pub mod activation;
pub mod config;
pub mod error;
pub mod mandala;
pub mod numeric;
pub mod traits;
pub mod types;
pub mod validation;

pub use activation::*;
pub use config::{EngineConfig, LoggingConfig, SolverConfig};
pub use error::*;
pub use mandala::*;
pub use numeric::*;
pub use traits::*;
pub use types::*;
pub use validation::*;
