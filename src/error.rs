use thiserror::Error;

/// Attachment failures. Everything else in the library always succeeds.
///
/// Neither case panics or tears the process down: callers get the error back
/// and decide whether to retry (e.g. with `overwrite = true`) or abandon.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachError {
    /// The target has no usable identifier. The widget that attempted the
    /// attach has destroyed itself as a side effect.
    #[error("target has no usable identifier")]
    InvalidTarget,

    /// The registry slot is already claimed and overwrite was not requested.
    /// Nothing was mutated.
    #[error("a status widget is already attached under {key:?}")]
    AlreadyAttached { key: String },
}
