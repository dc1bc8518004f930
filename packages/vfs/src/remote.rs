//! Per-node remote-mount state.

use std::sync::Mutex;

use crate::channel::{ChannelHandle, WaitOutcome};
use crate::Status;

/// Remote-mount state embedded in a node that can host a mount.
///
/// Holds the channel to the remote filesystem root and a cached readiness
/// bit. The bit is set once, after the first successful readiness wait;
/// detaching the channel clears it.
#[derive(Default)]
pub struct RemoteContainer {
    inner: Mutex<RemoteState>,
}

#[derive(Default)]
struct RemoteState {
    remote: Option<ChannelHandle>,
    ready: bool,
}

impl RemoteContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a remote is currently installed.
    pub fn is_remote(&self) -> bool {
        self.lock().remote.is_some()
    }

    /// Install `remote`. Fails `BadState` if one is already installed.
    pub fn set_remote(&self, remote: ChannelHandle) -> Result<(), Status> {
        let mut state = self.lock();
        if state.remote.is_some() {
            return Err(Status::BadState);
        }
        state.remote = Some(remote);
        state.ready = false;
        Ok(())
    }

    /// Detach and return the installed remote, clearing the ready bit.
    pub fn detach_remote(&self) -> Option<ChannelHandle> {
        let mut state = self.lock();
        state.ready = false;
        state.remote.take()
    }

    /// The installed channel, if any, without waiting for readiness.
    /// Devices hand this out directly.
    pub fn get_remote(&self) -> Option<ChannelHandle> {
        self.lock().remote.clone()
    }

    /// Block until the mount is ready, then return its channel.
    ///
    /// Readiness is observed once and cached. Peer close surfaces as
    /// `PeerClosed` and leaves teardown to the caller; any other wait
    /// failure is `Unavailable`.
    pub fn wait_for_remote(&self) -> Result<ChannelHandle, Status> {
        let mut state = self.lock();
        let remote = state.remote.clone().ok_or(Status::Unavailable)?;
        if !state.ready {
            match remote.wait_ready() {
                Ok(WaitOutcome::PeerClosed) => return Err(Status::PeerClosed),
                Ok(WaitOutcome::Ready) => state.ready = true,
                Err(_) => return Err(Status::Unavailable),
            }
        }
        Ok(remote)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RemoteState> {
        self.inner.lock().expect("remote state poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::channel::Channel;

    struct ScriptedChannel {
        outcome: WaitOutcome,
        waits: AtomicUsize,
    }

    impl ScriptedChannel {
        fn new(outcome: WaitOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                waits: AtomicUsize::new(0),
            })
        }
    }

    impl Channel for ScriptedChannel {
        fn wait_ready(&self) -> Result<WaitOutcome, Status> {
            self.waits.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome)
        }

        fn signal_ready(&self) -> Result<(), Status> {
            Ok(())
        }
    }

    #[test]
    fn wait_without_remote_is_unavailable() {
        let container = RemoteContainer::new();
        assert!(!container.is_remote());
        assert_eq!(container.wait_for_remote().unwrap_err(), Status::Unavailable);
    }

    #[test]
    fn readiness_is_cached() {
        let container = RemoteContainer::new();
        let chan = ScriptedChannel::new(WaitOutcome::Ready);
        container.set_remote(chan.clone()).unwrap();

        container.wait_for_remote().unwrap();
        container.wait_for_remote().unwrap();
        assert_eq!(chan.waits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn double_install_is_bad_state() {
        let container = RemoteContainer::new();
        container
            .set_remote(ScriptedChannel::new(WaitOutcome::Ready))
            .unwrap();
        let err = container
            .set_remote(ScriptedChannel::new(WaitOutcome::Ready))
            .unwrap_err();
        assert_eq!(err, Status::BadState);
    }

    #[test]
    fn peer_close_surfaces_without_detaching() {
        let container = RemoteContainer::new();
        container
            .set_remote(ScriptedChannel::new(WaitOutcome::PeerClosed))
            .unwrap();
        assert_eq!(container.wait_for_remote().unwrap_err(), Status::PeerClosed);
        // teardown is the caller's job
        assert!(container.is_remote());
    }

    #[test]
    fn detach_clears_ready_bit() {
        let container = RemoteContainer::new();
        let chan = ScriptedChannel::new(WaitOutcome::Ready);
        container.set_remote(chan.clone()).unwrap();
        container.wait_for_remote().unwrap();

        assert!(container.detach_remote().is_some());
        assert!(!container.is_remote());

        // reinstalling waits again
        container.set_remote(chan.clone()).unwrap();
        container.wait_for_remote().unwrap();
        assert_eq!(chan.waits.load(Ordering::SeqCst), 2);
    }
}
