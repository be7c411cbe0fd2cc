//! Property resolution error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Failures encountered while resolving TeamCity properties.
///
/// Every variant is non-fatal: callers log a diagnostic, treat the property
/// as absent, and the process still terminates successfully. The variants
/// exist so the log text can distinguish what went wrong.
#[derive(Error, Debug)]
pub enum PropertyError {
    /// `TEAMCITY_BUILD_PROPERTIES_FILE` is unset or empty.
    #[error("Teamcity build properties file is not configured")]
    MissingEnvironment,

    /// The named key is absent from the properties-file chain.
    #[error("property '{0}' not found")]
    MissingProperty(String),

    /// A properties file could not be opened or read.
    #[error("cannot read properties file '{}'", .0.display())]
    UnreadableFile(PathBuf),
}

// Note: anyhow already has a blanket impl for thiserror::Error types
