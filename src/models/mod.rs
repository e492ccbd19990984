pub mod category;
pub mod task;

pub use category::*;
pub use task::*;
