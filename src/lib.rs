pub mod config;
pub mod error;
pub mod fileio;
pub mod query;
pub mod sample;
pub mod schema;
pub mod session;
pub mod table;
pub mod util;

pub use error::{Error, Result};
pub use schema::Column;
pub use session::Session;
