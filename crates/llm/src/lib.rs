mod client;
mod error;
mod openrouter;

pub use client::*;
pub use error::*;
pub use openrouter::*;
