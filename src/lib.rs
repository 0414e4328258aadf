mod compose;
mod config;
mod error;
mod issuer;
mod payload;
mod token;
mod types;
mod validate;

pub use compose::*;
pub use config::*;
pub use error::*;
pub use issuer::*;
pub use payload::*;
pub use token::*;
pub use types::*;
pub use validate::*;
