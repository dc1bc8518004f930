//! In-memory device node.

use std::any::Any;
use std::sync::Arc;

use dispatchfs_vfs::{ChannelHandle, OpenFlags, RemoteContainer, Status, Vnode};

/// A device entry: carries the channel to its server and hands it out on
/// open instead of opening locally. Never treated as a mount boundary
/// during resolution.
pub struct MemDevice {
    remote: RemoteContainer,
}

impl MemDevice {
    /// A device fronting `server`.
    pub fn new(server: ChannelHandle) -> Result<Arc<Self>, Status> {
        let remote = RemoteContainer::new();
        remote.set_remote(server)?;
        Ok(Arc::new(Self { remote }))
    }
}

impl Vnode for MemDevice {
    fn open(&self, _flags: OpenFlags) -> Result<(), Status> {
        Ok(())
    }

    fn lookup(&self, _name: &str) -> Result<Arc<dyn Vnode>, Status> {
        Err(Status::NotSupported)
    }

    fn remote(&self) -> Option<&RemoteContainer> {
        Some(&self.remote)
    }

    fn is_device(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
