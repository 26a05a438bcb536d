pub mod application;
pub mod cli;
pub mod domain;
pub mod io;

pub use application::{LedgerError, LedgerService};
pub use domain::*;
pub use io::{AccountLoader, LedgerPaths};
