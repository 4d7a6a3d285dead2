pub mod assets;
pub mod canvas;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;

pub use error::{GameError, Result};
