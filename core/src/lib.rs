pub mod api;
pub mod classifier;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod gate;
pub mod generator;
pub mod model;
pub mod provision;
pub mod types;
