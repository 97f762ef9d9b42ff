mod chart;
pub mod hierarchy;
mod homepage;
pub(crate) mod types;
pub use chart::*;
pub use homepage::*;
pub use types::*;

pub use hierarchy::{LEVEL_COUNT, TitleHierarchy, display_title};
