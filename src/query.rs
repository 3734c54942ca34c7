pub mod pager;
pub mod pipeline;
pub mod sort;
pub mod state;

pub use pager::{PageWindow, Pager, DEFAULT_PAGE_SIZE};
pub use pipeline::{derive_view, View};
pub use state::{FilterColumn, QueryState, SortDirection};
