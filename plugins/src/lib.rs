pub mod decision;
pub mod factory;
pub mod generator;
mod http;
pub mod provision;
pub mod services;
