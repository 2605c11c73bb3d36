pub mod artifacts;
pub mod config;
pub mod labels;
pub mod loader;
pub mod runner;
pub mod split;
