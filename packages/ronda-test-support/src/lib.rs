//! Test support utilities shared by the Ronda backend test binaries.

pub mod logging;
