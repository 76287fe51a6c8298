//! User interfaces
//!
//! - `cli`: report / devices / config commands

pub mod cli;
