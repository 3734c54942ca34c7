pub mod diff;
pub mod record;
pub mod store;

pub use record::{Record, RecordId};
pub use store::RecordStore;
