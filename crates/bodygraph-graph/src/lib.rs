pub mod bodygraph;
pub mod center;
pub mod channel;
pub mod classification;
pub mod definition;
pub mod profile;

pub use bodygraph::*;
pub use center::*;
pub use channel::*;
pub use classification::*;
pub use definition::*;
pub use profile::*;
