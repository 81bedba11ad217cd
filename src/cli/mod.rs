pub mod commands;
pub mod context;
pub mod migrate;
pub mod prompt;
