//! Error taxonomy shared by the dispatcher and its node collaborators.

/// Outcome codes for structural operations.
///
/// A failure means the enclosing operation aborted with no partial
/// mutation; each client-visible operation is atomic from the dispatcher's
/// perspective, relying on the underlying node operation itself being
/// atomic.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Malformed path, forbidden "."/".." use, unresolvable token, or a
    /// malformed control payload.
    #[error("invalid argument")]
    InvalidArgument,

    /// A name segment exceeds the maximum length.
    #[error("bad path")]
    BadPath,

    /// Creation collided with an existing entry.
    #[error("already exists")]
    AlreadyExists,

    /// The backing node does not implement the operation.
    #[error("not supported")]
    NotSupported,

    /// A must-be-directory requirement was violated.
    #[error("directory mismatch")]
    DirectoryMismatch,

    /// The operation is meaningless here: renaming ".", waiting for a
    /// remote on a node that has none, a device without a handle.
    #[error("unavailable")]
    Unavailable,

    /// The remote end of a channel dropped.
    #[error("peer closed")]
    PeerClosed,

    /// Mount bookkeeping is in the wrong state for the request.
    #[error("bad state")]
    BadState,

    /// Name lookup missed, or the node is not in the mount list.
    #[error("not found")]
    NotFound,
}
