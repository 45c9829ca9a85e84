pub mod camera_list;
pub mod route_defs;

pub use camera_list::*;
pub use route_defs::*;
