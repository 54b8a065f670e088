pub mod config;
pub mod gesture;
pub mod run;
