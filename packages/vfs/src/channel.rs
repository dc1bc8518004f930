//! The channel seam between the dispatcher and the wire layer.

use std::sync::Arc;
use std::time::Duration;

use crate::Status;

/// What a blocking readiness wait observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The remote signaled that it is serving.
    Ready,
    /// The peer dropped its end of the channel.
    PeerClosed,
}

/// One end of a channel to a remote filesystem or device server.
///
/// Implemented entirely by the wire layer. The dispatcher only waits on
/// the mount handshake, raises it when it serves a directory itself, and
/// asks for an orderly shutdown when unmounting.
pub trait Channel: Send + Sync {
    /// Block until the peer signals readiness or closes its end.
    ///
    /// There is no default timeout; a remote that never signals blocks the
    /// caller indefinitely.
    fn wait_ready(&self) -> Result<WaitOutcome, Status>;

    /// Raise the readiness signal toward the peer (the serving side of the
    /// mount handshake).
    fn signal_ready(&self) -> Result<(), Status>;

    /// Ask the remote to shut down, waiting at most `deadline` (`None`
    /// waits forever). Best effort: the channel is detached from its mount
    /// point whether or not this succeeds.
    fn shutdown(&self, deadline: Option<Duration>) -> Result<(), Status> {
        let _ = deadline;
        Ok(())
    }
}

impl std::fmt::Debug for dyn Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Channel")
    }
}

/// Shared handle to a channel endpoint.
pub type ChannelHandle = Arc<dyn Channel>;
