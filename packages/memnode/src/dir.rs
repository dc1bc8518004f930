//! In-memory directory node.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use dispatchfs_vfs::{
    mode_is_dir, ChannelHandle, Connection, ConnectionId, IoctlRequest, IoctlResponse, OpenFlags,
    ReaddirCookie, RemoteContainer, Status, Vfs, Vnode, WatchDirRequest, WatchEvent,
};

use crate::file::MemFile;

/// Node-specific ioctl handled by [`MemDir`]: echoes the request bytes
/// back. Exists so passthrough of unrecognized codes can be observed.
pub const IOCTL_MEMDIR_ECHO: u32 = 0x4D44_0001;

struct MemEntry {
    node: Arc<dyn Vnode>,
    dir: bool,
}

/// A directory held entirely in memory.
///
/// Entries are ordered by name. Watch events are appended to a log the
/// caller drains; registered watcher requests are retained but delivery
/// is the embedder's concern.
#[derive(Default)]
pub struct MemDir {
    entries: Mutex<BTreeMap<String, MemEntry>>,
    remote: RemoteContainer,
    events: Mutex<Vec<(String, WatchEvent)>>,
    watchers: Mutex<Vec<WatchDirRequest>>,
    connections: Mutex<Vec<ConnectionId>>,
}

impl MemDir {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert `node` as `name`, replacing any previous entry.
    pub fn add(&self, name: &str, node: Arc<dyn Vnode>, dir: bool) {
        self.lock_entries()
            .insert(name.to_string(), MemEntry { node, dir });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock_entries().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Drain the accumulated watch-event log.
    pub fn take_events(&self) -> Vec<(String, WatchEvent)> {
        std::mem::take(&mut self.events.lock().expect("event log poisoned"))
    }

    /// Number of watcher registrations accepted so far.
    pub fn watcher_count(&self) -> usize {
        self.watchers.lock().expect("watcher list poisoned").len()
    }

    /// Connections registered through [`Vnode::serve`].
    pub fn served_connections(&self) -> Vec<ConnectionId> {
        self.connections
            .lock()
            .expect("connection log poisoned")
            .clone()
    }

    fn lock_entries(&self) -> MutexGuard<'_, BTreeMap<String, MemEntry>> {
        self.entries.lock().expect("directory entries poisoned")
    }
}

impl Vnode for MemDir {
    fn open(&self, _flags: OpenFlags) -> Result<(), Status> {
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn Vnode>, Status> {
        self.lock_entries()
            .get(name)
            .map(|entry| entry.node.clone())
            .ok_or(Status::NotFound)
    }

    fn create(&self, name: &str, mode: u32) -> Result<Arc<dyn Vnode>, Status> {
        let mut entries = self.lock_entries();
        if entries.contains_key(name) {
            return Err(Status::AlreadyExists);
        }
        let dir = mode_is_dir(mode);
        let node: Arc<dyn Vnode> = if dir {
            MemDir::new()
        } else {
            MemFile::new()
        };
        entries.insert(
            name.to_string(),
            MemEntry {
                node: node.clone(),
                dir,
            },
        );
        Ok(node)
    }

    fn unlink(&self, name: &str, must_be_dir: bool) -> Result<(), Status> {
        let mut entries = self.lock_entries();
        let entry = entries.get(name).ok_or(Status::NotFound)?;
        if must_be_dir && !entry.dir {
            return Err(Status::DirectoryMismatch);
        }
        entries.remove(name);
        Ok(())
    }

    fn rename(
        &self,
        new_parent: Arc<dyn Vnode>,
        old_name: &str,
        new_name: &str,
        old_must_be_dir: bool,
        new_must_be_dir: bool,
    ) -> Result<(), Status> {
        let new_parent = new_parent
            .as_any()
            .downcast_ref::<MemDir>()
            .ok_or(Status::InvalidArgument)?;

        let entry = {
            let mut entries = self.lock_entries();
            let entry = entries.get(old_name).ok_or(Status::NotFound)?;
            if (old_must_be_dir || new_must_be_dir) && !entry.dir {
                return Err(Status::DirectoryMismatch);
            }
            entries.remove(old_name).ok_or(Status::NotFound)?
        };
        new_parent
            .lock_entries()
            .insert(new_name.to_string(), entry);
        Ok(())
    }

    fn link(&self, name: &str, target: Arc<dyn Vnode>) -> Result<(), Status> {
        let mut entries = self.lock_entries();
        if entries.contains_key(name) {
            return Err(Status::AlreadyExists);
        }
        let dir = target.as_any().downcast_ref::<MemDir>().is_some();
        entries.insert(name.to_string(), MemEntry { node: target, dir });
        Ok(())
    }

    // Entries encode as a length byte followed by the name bytes. The
    // cookie position is the count of entries already emitted.
    fn readdir(&self, cookie: &mut ReaddirCookie, buf: &mut [u8]) -> Result<usize, Status> {
        let entries = self.lock_entries();
        let mut written = 0;
        for name in entries.keys().skip(cookie.pos as usize) {
            let needed = 1 + name.len();
            if written + needed > buf.len() {
                break;
            }
            buf[written] = name.len() as u8;
            buf[written + 1..written + needed].copy_from_slice(name.as_bytes());
            written += needed;
            cookie.pos += 1;
        }
        Ok(written)
    }

    fn notify(&self, name: &str, event: WatchEvent) {
        self.events
            .lock()
            .expect("event log poisoned")
            .push((name.to_string(), event));
    }

    fn remote(&self) -> Option<&RemoteContainer> {
        Some(&self.remote)
    }

    fn serve(
        self: Arc<Self>,
        vfs: &Vfs,
        channel: ChannelHandle,
        flags: OpenFlags,
    ) -> Result<(), Status> {
        let id = vfs.serve_connection(Connection::new(self.clone(), channel, flags))?;
        self.connections
            .lock()
            .expect("connection log poisoned")
            .push(id);
        Ok(())
    }

    fn watch_dir(&self, _vfs: &Vfs, request: WatchDirRequest) -> Result<(), Status> {
        self.watchers
            .lock()
            .expect("watcher list poisoned")
            .push(request);
        Ok(())
    }

    fn ioctl(&self, op: u32, request: IoctlRequest<'_>) -> Result<IoctlResponse, Status> {
        match op {
            IOCTL_MEMDIR_ECHO => match request {
                IoctlRequest::Bytes(bytes) => {
                    Ok(IoctlResponse::Bytes(bytes.to_vec().into()))
                }
                _ => Err(Status::InvalidArgument),
            },
            _ => Err(Status::NotSupported),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Build a directory tree from `(path-ish name, node, dir)` triples.
/// Convenience for tests.
pub fn dir_with<I>(entries: I) -> Arc<MemDir>
where
    I: IntoIterator<Item = (&'static str, Arc<dyn Vnode>, bool)>,
{
    let dir = MemDir::new();
    for (name, node, is_dir) in entries {
        dir.add(name, node, is_dir);
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatchfs_vfs::MODE_TYPE_FILE;

    #[test]
    fn create_then_lookup() {
        let dir = MemDir::new();
        let file = dir.create("notes", MODE_TYPE_FILE).unwrap();
        let found = dir.lookup("notes").unwrap();
        assert!(Arc::ptr_eq(&file, &found));
        assert_eq!(dir.create("notes", MODE_TYPE_FILE).unwrap_err(), Status::AlreadyExists);
    }

    #[test]
    fn unlink_respects_directory_requirement() {
        let dir = MemDir::new();
        dir.create("plain", MODE_TYPE_FILE).unwrap();
        assert_eq!(dir.unlink("plain", true).unwrap_err(), Status::DirectoryMismatch);
        dir.unlink("plain", false).unwrap();
        assert_eq!(dir.unlink("plain", false).unwrap_err(), Status::NotFound);
    }

    #[test]
    fn rename_moves_between_directories() {
        let src = MemDir::new();
        let dst = MemDir::new();
        src.create("a", MODE_TYPE_FILE).unwrap();

        src.rename(dst.clone(), "a", "b", false, false).unwrap();
        assert!(!src.contains("a"));
        assert!(dst.contains("b"));
    }

    #[test]
    fn rename_directory_requirement_checked() {
        let src = MemDir::new();
        let dst = MemDir::new();
        src.create("plain", MODE_TYPE_FILE).unwrap();
        assert_eq!(
            src.rename(dst, "plain", "moved", true, false).unwrap_err(),
            Status::DirectoryMismatch
        );
        assert!(src.contains("plain"));
    }

    #[test]
    fn readdir_resumes_from_cookie() {
        let dir = MemDir::new();
        dir.create("aa", MODE_TYPE_FILE).unwrap();
        dir.create("b", MODE_TYPE_FILE).unwrap();
        dir.create("ccc", MODE_TYPE_FILE).unwrap();

        let mut cookie = ReaddirCookie::default();
        // room for exactly the first two entries
        let mut buf = [0u8; 5];
        let n = dir.readdir(&mut cookie, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"\x02aa\x01b");

        let mut buf = [0u8; 16];
        let n = dir.readdir(&mut cookie, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"\x03ccc");

        let n = dir.readdir(&mut cookie, &mut buf).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn echo_ioctl_roundtrips() {
        let dir = MemDir::new();
        let response = dir
            .ioctl(IOCTL_MEMDIR_ECHO, IoctlRequest::Bytes(b"ping"))
            .unwrap();
        match response {
            IoctlResponse::Bytes(bytes) => assert_eq!(&bytes[..], b"ping"),
            _ => panic!("expected bytes"),
        }
    }
}
