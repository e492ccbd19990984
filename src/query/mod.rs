pub mod filter;
pub mod stats;

pub use filter::{visible_subset, CategoryFilter, FilterParams, FilterUpdate, PriorityFilter};
pub use stats::Statistics;
