//! An in-process channel endpoint backed by a condition variable.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

use dispatchfs_vfs::{Channel, Status, WaitOutcome};

/// Channel endpoint for wiring filesystems together inside one process.
///
/// The serving side calls [`EventChannel::signal_ready`] (directly or via
/// the dispatcher's mount handshake); dropping the peer is modeled
/// explicitly with [`EventChannel::close_peer`].
#[derive(Default)]
pub struct EventChannel {
    state: Mutex<ChannelState>,
    cond: Condvar,
}

#[derive(Default)]
struct ChannelState {
    ready: bool,
    peer_closed: bool,
    shutdown_requests: u32,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model the peer dropping its end.
    pub fn close_peer(&self) {
        self.lock().peer_closed = true;
        self.cond.notify_all();
    }

    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    /// How many orderly shutdowns have been requested of this endpoint.
    pub fn shutdown_requests(&self) -> u32 {
        self.lock().shutdown_requests
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChannelState> {
        self.state.lock().expect("channel state poisoned")
    }
}

impl Channel for EventChannel {
    fn wait_ready(&self) -> Result<WaitOutcome, Status> {
        let mut state = self.lock();
        loop {
            // close wins over readiness when both are observable
            if state.peer_closed {
                return Ok(WaitOutcome::PeerClosed);
            }
            if state.ready {
                return Ok(WaitOutcome::Ready);
            }
            state = self
                .cond
                .wait(state)
                .map_err(|_| Status::BadState)?;
        }
    }

    fn signal_ready(&self) -> Result<(), Status> {
        let mut state = self.lock();
        if state.peer_closed {
            return Err(Status::PeerClosed);
        }
        state.ready = true;
        self.cond.notify_all();
        Ok(())
    }

    fn shutdown(&self, _deadline: Option<Duration>) -> Result<(), Status> {
        self.lock().shutdown_requests += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn ready_signal_wakes_waiter() {
        let chan = Arc::new(EventChannel::new());
        let waiter = {
            let chan = chan.clone();
            std::thread::spawn(move || chan.wait_ready())
        };
        chan.signal_ready().unwrap();
        assert_eq!(waiter.join().unwrap().unwrap(), WaitOutcome::Ready);
    }

    #[test]
    fn peer_close_beats_ready() {
        let chan = EventChannel::new();
        chan.signal_ready().unwrap();
        chan.close_peer();
        assert_eq!(chan.wait_ready().unwrap(), WaitOutcome::PeerClosed);
    }

    #[test]
    fn signal_after_close_fails() {
        let chan = EventChannel::new();
        chan.close_peer();
        assert_eq!(chan.signal_ready().unwrap_err(), Status::PeerClosed);
    }
}
