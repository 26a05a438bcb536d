mod account;
mod money;
mod sort;

pub use account::*;
pub use money::*;
pub use sort::*;
