mod command;

pub use command::CommandGenerator;
