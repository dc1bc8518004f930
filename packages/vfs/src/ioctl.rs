//! Mount control surface: operation-code dispatch layered over node ioctl.
//!
//! Five codes are handled here; everything else passes through unmodified
//! to the target node's own handler, so node-specific and mount-level
//! codes coexist on one dispatch path.

use bitflags::bitflags;
use bytes::Bytes;
use tracing::trace;

use crate::channel::ChannelHandle;
use crate::name::PATH_MAX;
use crate::node::{Vnode, WatchDirRequest};
use crate::vfs::Vfs;
use crate::Status;

/// Register a directory watcher on the node.
pub const IOCTL_VFS_WATCH_DIR: u32 = 0x5646_0001;
/// Mount the provided channel at the node.
pub const IOCTL_VFS_MOUNT_FS: u32 = 0x5646_0002;
/// Create a directory under the node, then mount the channel at it.
pub const IOCTL_VFS_MOUNT_MKDIR_FS: u32 = 0x5646_0003;
/// Detach and return the channel mounted at the node.
pub const IOCTL_VFS_UNMOUNT_NODE: u32 = 0x5646_0004;
/// Tear down every mount in the filesystem.
pub const IOCTL_VFS_UNMOUNT_FS: u32 = 0x5646_0005;

bitflags! {
    /// Options in the MOUNT_MKDIR_FS payload's flags word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MountMkdirFlags: u32 {
        /// Detach an existing mount on the target directory first.
        const REPLACE = 1 << 0;
    }
}

/// Input to a control operation.
///
/// Handle-carrying requests are explicit variants rather than raw handle
/// values smuggled through the byte payload.
pub enum IoctlRequest<'a> {
    None,
    Bytes(&'a [u8]),
    Channel(ChannelHandle),
    ChannelWithBytes {
        channel: ChannelHandle,
        bytes: &'a [u8],
    },
}

/// Output of a control operation.
#[derive(Debug)]
pub enum IoctlResponse {
    None,
    Bytes(Bytes),
    Channel(ChannelHandle),
}

/// Parsed MOUNT_MKDIR_FS payload: a little-endian flags word followed by
/// a NUL-terminated name.
#[derive(Debug)]
struct MountMkdirPayload<'a> {
    flags: MountMkdirFlags,
    name: &'a str,
}

fn parse_mount_mkdir(bytes: &[u8]) -> Result<MountMkdirPayload<'_>, Status> {
    if bytes.len() < 4 {
        return Err(Status::InvalidArgument);
    }
    let flags_word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let name_bytes = &bytes[4..];
    let (last, name_bytes) = name_bytes.split_last().ok_or(Status::InvalidArgument)?;
    if *last != 0 || name_bytes.is_empty() || name_bytes.len() > PATH_MAX {
        return Err(Status::InvalidArgument);
    }
    if name_bytes.contains(&0) {
        return Err(Status::InvalidArgument);
    }
    let name = std::str::from_utf8(name_bytes).map_err(|_| Status::InvalidArgument)?;
    Ok(MountMkdirPayload {
        flags: MountMkdirFlags::from_bits_retain(flags_word),
        name,
    })
}

/// Encode a MOUNT_MKDIR_FS payload. The inverse of what the dispatcher
/// parses; provided for wire layers and tests.
pub fn encode_mount_mkdir(flags: MountMkdirFlags, name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + name.len() + 1);
    out.extend_from_slice(&flags.bits().to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.push(0);
    out
}

impl Vfs {
    /// Dispatch a control operation against `vn`.
    pub fn ioctl(
        &self,
        vn: &std::sync::Arc<dyn Vnode>,
        op: u32,
        request: IoctlRequest<'_>,
    ) -> Result<IoctlResponse, Status> {
        trace!(op, "ioctl");
        match op {
            IOCTL_VFS_WATCH_DIR => {
                let IoctlRequest::ChannelWithBytes { channel, bytes } = request else {
                    return Err(Status::InvalidArgument);
                };
                if bytes.len() != 8 {
                    return Err(Status::InvalidArgument);
                }
                let mask = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                let options = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
                vn.watch_dir(
                    self,
                    WatchDirRequest {
                        channel,
                        mask,
                        options,
                    },
                )?;
                Ok(IoctlResponse::None)
            }
            IOCTL_VFS_MOUNT_FS => {
                let IoctlRequest::Channel(channel) = request else {
                    return Err(Status::InvalidArgument);
                };
                self.install_remote(vn.clone(), channel)?;
                Ok(IoctlResponse::None)
            }
            IOCTL_VFS_MOUNT_MKDIR_FS => {
                let IoctlRequest::ChannelWithBytes { channel, bytes } = request else {
                    return Err(Status::InvalidArgument);
                };
                let payload = parse_mount_mkdir(bytes)?;
                self.mount_mkdir(vn.clone(), channel, payload.name, payload.flags)?;
                Ok(IoctlResponse::None)
            }
            IOCTL_VFS_UNMOUNT_NODE => {
                match request {
                    IoctlRequest::None => {}
                    IoctlRequest::Bytes(bytes) if bytes.is_empty() => {}
                    _ => return Err(Status::InvalidArgument),
                }
                let channel = self.uninstall_remote(vn)?;
                Ok(IoctlResponse::Channel(channel))
            }
            IOCTL_VFS_UNMOUNT_FS => {
                self.unmount_all(None);
                // the node may have its own teardown for this code; its
                // result is not what the caller is waiting on
                let _ = vn.ioctl(op, request);
                Ok(IoctlResponse::None)
            }
            _ => vn.ioctl(op, request),
        }
    }
}
