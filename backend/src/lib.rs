pub mod config;
pub mod error;
pub mod events;
pub mod fatal;
pub mod glutils;
pub mod render;
pub mod shaders;
pub mod window;

pub use error::{Error, Result};
