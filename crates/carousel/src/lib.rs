pub mod carousel;
pub mod config;
pub mod drum;
pub mod info;
pub mod view;

pub use carousel::*;
pub use config::*;
pub use drum::{SLOT_COUNT, STEP_DEG};
pub use info::*;
pub use view::*;
