//! Command implementations for hudfix-cli

pub mod discard;
pub mod process;
pub mod revert;
pub mod status;
pub mod verify;

pub use discard::run_discard;
pub use process::run_process;
pub use revert::run_revert;
pub use status::run_status;
pub use verify::run_verify;
