pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Cli, Command};

pub use adapters::{LocalStorage, WebhookDispatcher};
pub use app::{ScriptChecker, Shell, UploadForm};
pub use config::CheckerConfig;
pub use utils::error::{CheckerError, Result};
