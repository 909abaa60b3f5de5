//! Domain models for OldVRs

pub mod cdr;
pub mod folder;
pub mod settings;

pub use cdr::Cdr;
pub use folder::{Folder, RecordingPaths};
pub use settings::AppSettings;
