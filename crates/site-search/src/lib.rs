pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;
pub mod search;
pub mod server;
pub mod session;
pub mod update;
