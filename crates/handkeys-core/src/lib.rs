pub mod action;
pub mod audit;
pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gesture;
pub mod io;
pub mod landmark;
pub mod paths;
pub mod pipeline;
pub mod source;
pub mod store;
pub mod trigger;

pub use error::{HandkeysError, Result};
