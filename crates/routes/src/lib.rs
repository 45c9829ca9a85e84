pub mod builder;
pub mod curated;
pub mod normalize;
pub mod query;
pub mod resolve;
pub mod segment;

pub use builder::*;
pub use curated::*;
pub use normalize::*;
pub use query::*;
pub use resolve::*;
pub use segment::*;
