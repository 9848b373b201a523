pub mod error;

pub use error::{FyyurError, Result};
