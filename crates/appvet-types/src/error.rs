use thiserror::Error;

/// Errors loading or compiling the app-standard schema.
///
/// Any of these aborts the run before a single manifest is vetted; a run
/// without a working schema cannot classify anything.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema file not found: '{path}'")]
    NotFound { path: String },

    #[error("failed to read schema file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("schema file '{path}' is not valid JSON: {reason}")]
    Parse { path: String, reason: String },

    #[error("schema document did not compile: {reason}")]
    Compile { reason: String },
}

/// Errors walking the store root.
///
/// Per-app problems become rejection records instead; these fire when the
/// root or any directory under it cannot be read, which must never pass
/// as an empty store.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("store root not found: '{path}'")]
    RootNotFound { path: String },

    #[error("store root '{path}' is not a directory")]
    RootNotADirectory { path: String },

    #[error("failed to read directory '{path}': {reason}")]
    ReadDir { path: String, reason: String },
}
