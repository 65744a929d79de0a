//! The roster engine.
//!
//! `RecordList` owns the sorted roster and derives the filtered view and
//! search results from it. `search` holds the query expansion used for
//! partial matching.

pub mod record_list;
pub mod search;

pub use record_list::{Filter, RecordList};
pub use search::{expand_query, MIN_SEARCH_QUERY_LENGTH};
