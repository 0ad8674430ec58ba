//! CLI commands

pub mod canonicalize;
pub mod images;
pub mod parse;
