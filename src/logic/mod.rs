//! Logic modules: the pure parts of each provisioning step.
//!
//! Nothing here touches the host. The provisioner feeds these functions with
//! what it read or captured and acts on what they return.
//!
//! # Modules
//!
//! - `selinux`: persisted SELinux config rewrite
//! - `page`: index page rendering
//! - `verify`: response body check

pub mod page;
pub mod selinux;
pub mod verify;
