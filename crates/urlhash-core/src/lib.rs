pub mod config;
pub mod logging;

pub mod digest;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod pool;
pub mod sink;
pub mod task;
