pub mod build;
pub mod clear;
pub mod config;
pub mod info;

pub use build::*;
pub use clear::*;
pub use config::*;
pub use info::*;
