pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod fence;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod sanitize;
pub mod tags;
