//! Filesystem-agnostic dispatch core: path resolution, open/create
//! orchestration, remote-mount traversal, and cross-connection
//! authorization tokens over an abstract node interface.
//!
//! The shape is three layers. At the bottom, [`Vnode`] is the capability
//! interface a backing filesystem implements; the dispatcher never knows a
//! concrete node type. In the middle, [`Vfs`] owns one structural lock and
//! drives walking, open/create, unlink/rename/link, directory reads, the
//! token registry, and the mount table under it. On top, the ioctl surface
//! maps a small set of mount-control operation codes onto those dispatcher
//! calls and forwards everything else to the node untouched.
//!
//! Transport is abstracted as [`Channel`]: anything that can report
//! readiness and peer closure can carry a mount. The crate takes no
//! position on the wire protocol spoken over a served connection; it
//! manages connection and token lifecycle and leaves message framing to
//! the embedder.

mod channel;
mod connection;
mod flags;
mod ioctl;
mod name;
mod node;
mod remote;
mod status;
mod token;
mod vfs;

pub use channel::{Channel, ChannelHandle, WaitOutcome};
pub use connection::{Connection, ConnectionId};
pub use flags::{access, OpenFlags};
pub use ioctl::{
    encode_mount_mkdir, IoctlRequest, IoctlResponse, MountMkdirFlags, IOCTL_VFS_MOUNT_FS,
    IOCTL_VFS_MOUNT_MKDIR_FS, IOCTL_VFS_UNMOUNT_FS, IOCTL_VFS_UNMOUNT_NODE, IOCTL_VFS_WATCH_DIR,
};
pub use name::{NAME_MAX, PATH_MAX};
pub use node::{
    mode_is_dir, ReaddirCookie, Vnode, WatchDirRequest, WatchEvent, MODE_TYPE_DIR, MODE_TYPE_FILE,
    MODE_TYPE_MASK,
};
pub use remote::RemoteContainer;
pub use status::Status;
pub use token::{Token, TokenRights, TokenSlot};
pub use vfs::{OpenOutcome, Vfs, WalkOutcome};
