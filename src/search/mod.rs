//! Page search over many texts
//!
//! - `page_scanner`: partitions pages and runs the matcher over each
//! - `results`: per-partition and combined results, ranking
//! - `reference`: plain software matcher used as a second engine

pub mod page_scanner;
pub mod reference;
pub mod results;

pub use page_scanner::{Page, PageSearch};
pub use reference::count_matches;
pub use results::{PageMatch, PartialResults, SearchResults, MAX_PAGE_MATCH_RECORDS};
