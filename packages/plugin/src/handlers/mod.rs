//! HTTP handlers behind the plugin's routes.
//!
//! Every handler is stateless apart from the immutable paths it was built
//! with, so the host may run any number of them concurrently.

pub mod assets;
pub mod probe;
pub mod redirect;
