//! Split selection and repackaging for APK Set archives.
//!
//! Bytes in, bytes out: the engine reads a multi-variant APK Set, keeps the
//! base module, the largest master split and the fixed device splits, and
//! writes a new archive with the kept entries copied verbatim.

mod engine;
mod error;
pub mod master;
pub mod plan;
pub mod policy;

pub use engine::{repackage, RepackReport, Repackaged, Repackager};
pub use error::RepackError;
pub use master::MasterCandidates;
pub use plan::{plan, EntryMeta, SelectionPlan};
pub use policy::{DropReason, KeepReason, SelectionPolicy, Verdict};
