//! Type-safe host command modules.
//!
//! Each struct here implements `HostCommand` and maps Rust fields to the exact
//! arguments expected by the corresponding system tool.

pub mod files;
pub mod http;
pub mod package;
pub mod selinux;
pub mod service;
