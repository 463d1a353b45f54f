//! CLI command modules

pub mod detect;
pub mod discover;
pub mod info;
pub mod init;
pub mod resolve;
pub mod validate;
