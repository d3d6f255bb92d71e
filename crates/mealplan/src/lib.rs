mod assemble;
mod error;
mod generator;
mod normalize;
mod preferences;
mod prompt;
mod repair;
mod types;
mod validate;

pub use assemble::*;
pub use error::*;
pub use generator::*;
pub use normalize::*;
pub use preferences::*;
pub use prompt::*;
pub use repair::*;
pub use types::*;
pub use validate::*;
