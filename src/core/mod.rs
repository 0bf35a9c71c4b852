//! Core scene selection and retrieval orchestration

pub mod retrieve;
pub mod select;

pub use retrieve::{
    Retriever, COLLECTION, DEFAULT_DAYS_MARGIN, SEARCH_LIMIT, SEARCH_MARGIN_DEG,
};
pub use select::select_nearest;
