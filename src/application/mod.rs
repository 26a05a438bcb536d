// Application layer: the ledger operations every client (CLI, tests) goes through.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
