pub mod backend;
pub mod cli;
pub mod config;
pub mod openai;
pub mod server;
