#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{group_color, init_tracing, priority_color, Canvas};
