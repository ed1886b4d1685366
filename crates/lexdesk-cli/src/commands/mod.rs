pub mod checkpoint;
pub mod config;
pub mod draft;
pub mod jobs;
pub mod lawyers;
pub mod utils;
