pub mod checker;
pub mod render;
pub mod shell;

pub use checker::{ScriptChecker, UploadForm};
pub use shell::{Flow, Shell};
