pub mod event_bus;
pub mod metrics;
pub mod settle;
pub mod timers;

pub use event_bus::*;
pub use metrics::*;
pub use settle::*;
pub use timers::*;
