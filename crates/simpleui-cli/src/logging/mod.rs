//! Logger initialization for the `simpleui` binary. The library crates only
//! use the `log` facade.

mod init;

pub use init::init_logging;
