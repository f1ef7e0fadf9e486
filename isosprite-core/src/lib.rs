pub mod config;
pub mod error;
pub mod export;
pub mod framing;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod scene;

pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
