pub mod encoding;
pub mod endpoint;
pub mod gate;
pub mod ledger;
pub mod response;

pub use crate::domain::model::{
    DispatchFailure, Encoding, Environment, PingReport, Session, SubmissionOutcome,
    SubmissionRequest, SubmissionResult,
};
pub use crate::domain::ports::{ConfigProvider, Dispatcher, Storage};
pub use crate::utils::error::Result;
