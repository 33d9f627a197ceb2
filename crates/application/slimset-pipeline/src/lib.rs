mod error;
pub mod retention;
pub mod run;

pub use error::{PipelineError, PipelineErrorKind};
pub use run::{Pipeline, PipelineSettings, RunOutcome};
