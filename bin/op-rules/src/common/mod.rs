mod error;
mod hex;
mod logging;

pub use error::*;
pub use hex::*;
pub use logging::*;
