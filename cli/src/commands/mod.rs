pub mod ask;
pub mod cli;
pub mod policy;
pub mod serve;
