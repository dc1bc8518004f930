//! The node capability interface consumed by the dispatcher.

use std::any::Any;
use std::sync::Arc;

use crate::channel::ChannelHandle;
use crate::ioctl::{IoctlRequest, IoctlResponse};
use crate::remote::RemoteContainer;
use crate::vfs::Vfs;
use crate::{OpenFlags, Status};

/// Type bits of a creation mode, as understood by [`Vnode::create`].
pub const MODE_TYPE_MASK: u32 = 0xF000;
/// The entry being created must be a directory.
pub const MODE_TYPE_DIR: u32 = 0x4000;
/// The entry being created is a regular file.
pub const MODE_TYPE_FILE: u32 = 0x8000;

/// Whether a creation mode names a directory.
pub fn mode_is_dir(mode: u32) -> bool {
    mode & MODE_TYPE_MASK == MODE_TYPE_DIR
}

/// Directory-watch events delivered through [`Vnode::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// An entry appeared under the watched directory.
    Added,
    /// An entry disappeared from the watched directory.
    Removed,
}

/// Resumption state for [`Vnode::readdir`]. Opaque to the dispatcher;
/// backing nodes stash whatever position they need in the two words.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReaddirCookie {
    pub pos: u64,
    pub aux: u64,
}

/// Payload of the WATCH_DIR control operation: the channel events are
/// delivered on, plus a mask/options pair the backing node interprets.
pub struct WatchDirRequest {
    pub channel: ChannelHandle,
    pub mask: u32,
    pub options: u32,
}

/// A virtual file or directory exposed by a backing filesystem.
///
/// Nodes are shared (`Arc<dyn Vnode>`) between the directory cache, open
/// connections, and in-flight walks; a node is destroyed only when its
/// last reference drops. The dispatcher never branches on a concrete node
/// kind: every behavioral difference flows through this trait. Operations
/// a backend does not support keep their default `NotSupported` bodies.
pub trait Vnode: Send + Sync {
    /// Open the node with validated flags.
    fn open(&self, flags: OpenFlags) -> Result<(), Status>;

    /// Resolve `name` to a child. `name` never contains '/' and is never
    /// "." (the dispatcher short-circuits that itself); ".." is passed
    /// through as an ordinary name.
    fn lookup(&self, name: &str) -> Result<Arc<dyn Vnode>, Status>;

    /// Create `name` under this directory.
    fn create(&self, name: &str, mode: u32) -> Result<Arc<dyn Vnode>, Status> {
        let _ = (name, mode);
        Err(Status::NotSupported)
    }

    /// Truncate the node to `len` bytes.
    fn truncate(&self, len: u64) -> Result<(), Status> {
        let _ = len;
        Err(Status::NotSupported)
    }

    /// Remove `name` from this directory.
    fn unlink(&self, name: &str, must_be_dir: bool) -> Result<(), Status> {
        let _ = (name, must_be_dir);
        Err(Status::NotSupported)
    }

    /// Move `old_name` from this directory to `new_name` under
    /// `new_parent`, honoring both directory requirements. `new_parent`
    /// belongs to the same backing filesystem.
    fn rename(
        &self,
        new_parent: Arc<dyn Vnode>,
        old_name: &str,
        new_name: &str,
        old_must_be_dir: bool,
        new_must_be_dir: bool,
    ) -> Result<(), Status> {
        let _ = (new_parent, old_name, new_name, old_must_be_dir, new_must_be_dir);
        Err(Status::NotSupported)
    }

    /// Link `target` into this directory as `name`.
    fn link(&self, name: &str, target: Arc<dyn Vnode>) -> Result<(), Status> {
        let _ = (name, target);
        Err(Status::NotSupported)
    }

    /// Read directory entries into `buf`, resuming from `cookie`. Returns
    /// the number of bytes written; the entry encoding is the backend's.
    fn readdir(&self, cookie: &mut ReaddirCookie, buf: &mut [u8]) -> Result<usize, Status> {
        let _ = (cookie, buf);
        Err(Status::NotSupported)
    }

    /// Deliver a watch event for `name` to any registered watchers.
    /// Best effort; never fails.
    fn notify(&self, name: &str, event: WatchEvent) {
        let _ = (name, event);
    }

    /// The node's remote-mount state, if this node can host a mount.
    fn remote(&self) -> Option<&RemoteContainer> {
        None
    }

    /// Whether this node fronts a device. Devices carry remote handles but
    /// are never traversed as mount boundaries during resolution.
    fn is_device(&self) -> bool {
        false
    }

    /// Serve this node over `channel`, registering the resulting
    /// connection with `vfs`.
    fn serve(self: Arc<Self>, vfs: &Vfs, channel: ChannelHandle, flags: OpenFlags) -> Result<(), Status> {
        let _ = (vfs, channel, flags);
        Err(Status::NotSupported)
    }

    /// Register a directory watcher described by `request`.
    fn watch_dir(&self, vfs: &Vfs, request: WatchDirRequest) -> Result<(), Status> {
        let _ = (vfs, request);
        Err(Status::NotSupported)
    }

    /// Handle a node-specific control operation. The dispatcher forwards
    /// every code it does not recognize here, unmodified.
    fn ioctl(&self, op: u32, request: IoctlRequest<'_>) -> Result<IoctlResponse, Status> {
        let _ = (op, request);
        Err(Status::NotSupported)
    }

    /// Concrete-type escape hatch for same-filesystem cooperation
    /// (rename/link destinations arrive as `Arc<dyn Vnode>`).
    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn Vnode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Vnode")
    }
}
