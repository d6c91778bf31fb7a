/// Error types shared across the site crates.
///
/// These cover failures that are not specific to one crate (I/O on content
/// files, unknown item kinds). Crate-specific errors wrap
/// `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown item kind: {0}")]
    UnknownKind(String),
}
