//! The dispatcher: path walking, open/create orchestration, rename/link
//! authorization, and remote-mount lifecycle, all serialized by one
//! structural lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{info, trace, warn};

use crate::channel::ChannelHandle;
use crate::connection::{Connection, ConnectionId};
use crate::ioctl::MountMkdirFlags;
use crate::name::{check_path, is_dot, is_dot_dot, is_dot_or_dot_dot, trim_name, NAME_MAX};
use crate::node::{mode_is_dir, ReaddirCookie, Vnode, WatchEvent, MODE_TYPE_DIR};
use crate::token::{Token, TokenRegistry, TokenSlot};
use crate::{OpenFlags, Status};

/// Where a walk stopped.
///
/// Both variants are positive outcomes. `Remote` means "stop here, the
/// caller must re-dispatch the remaining path against the returned
/// handle" — it is never an error.
#[derive(Debug)]
pub enum WalkOutcome<'a> {
    /// The path was consumed down to its final segment; `leaf` is that
    /// segment, untrimmed (it may still carry trailing slashes).
    Local {
        node: Arc<dyn Vnode>,
        leaf: &'a str,
    },
    /// Resolution reached a remote-mount boundary with `remaining` still
    /// unconsumed. The mount was ready when this was returned.
    Remote {
        node: Arc<dyn Vnode>,
        handle: ChannelHandle,
        remaining: &'a str,
    },
}

/// Result of open/create.
#[derive(Debug)]
pub enum OpenOutcome<'a> {
    /// The node was resolved (and, on the lookup path, opened) locally.
    Local(Arc<dyn Vnode>),
    /// Resolution must continue elsewhere: re-dispatch `remaining` against
    /// `handle`. Yielded at mount boundaries and for device nodes.
    Remote {
        handle: ChannelHandle,
        remaining: &'a str,
    },
}

#[derive(Default)]
struct VfsState {
    tokens: TokenRegistry,
    mounts: Vec<Arc<dyn Vnode>>,
}

/// The dispatch core: one instance owns the structural lock for a tree of
/// nodes and the registries hanging off it.
#[derive(Default)]
pub struct Vfs {
    /// Serializes every structural operation: walk, open, create, unlink,
    /// rename, link, readdir, token mint/resolve/discard, mount/unmount.
    state: Mutex<VfsState>,
    /// Served connections. Deliberately outside the structural lock;
    /// teardown reaches into it only for the token discard.
    connections: Mutex<HashMap<u64, Connection>>,
    next_connection: AtomicU64,
}

impl Vfs {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> MutexGuard<'_, VfsState> {
        self.state.lock().expect("vfs state poisoned")
    }

    fn lock_connections(&self) -> MutexGuard<'_, HashMap<u64, Connection>> {
        self.connections.lock().expect("connection registry poisoned")
    }

    // ---- resolution ----

    /// Walk `path` from `vn` under the structural lock.
    pub fn walk<'a>(
        &self,
        vn: Arc<dyn Vnode>,
        path: &'a str,
    ) -> Result<WalkOutcome<'a>, Status> {
        let mut state = self.lock_state();
        self.walk_locked(&mut state, vn, path)
    }

    // Starting at `vn`, resolve segments until only the final one remains
    // or a remote-mount boundary is hit. The remote short-circuit has
    // priority over further segment splitting at every iteration. On
    // error there is no net change in node ownership.
    fn walk_locked<'a>(
        &self,
        state: &mut VfsState,
        mut vn: Arc<dyn Vnode>,
        mut path: &'a str,
    ) -> Result<WalkOutcome<'a>, Status> {
        check_path(path)?;
        loop {
            path = path.trim_start_matches('/');
            if path.is_empty() {
                // an exhausted string resolves as the current node
                path = ".";
            }

            if is_mount_point(vn.as_ref()) {
                match self.wait_for_remote_locked(state, &vn) {
                    Ok(handle) => {
                        return Ok(WalkOutcome::Remote {
                            node: vn,
                            handle,
                            remaining: path,
                        })
                    }
                    // mount torn down under us; resolve locally instead
                    Err(Status::PeerClosed) => continue,
                    Err(e) => return Err(e),
                }
            }

            match next_segment(path) {
                Some((name, rest)) => {
                    vn = lookup_node(vn, name)?;
                    path = rest;
                }
                None => {
                    return Ok(WalkOutcome::Local { node: vn, leaf: path });
                }
            }
        }
    }

    /// Open (or create) `path` relative to `vndir`.
    ///
    /// A remote or device short-circuit comes back as
    /// [`OpenOutcome::Remote`]; callers re-dispatch against the handle
    /// rather than treating it as failure.
    pub fn open<'a>(
        &self,
        vndir: Arc<dyn Vnode>,
        path: &'a str,
        flags: OpenFlags,
        mode: u32,
    ) -> Result<OpenOutcome<'a>, Status> {
        let mut state = self.lock_state();
        self.open_locked(&mut state, vndir, path, flags, mode)
    }

    fn open_locked<'a>(
        &self,
        state: &mut VfsState,
        vndir: Arc<dyn Vnode>,
        path: &'a str,
        flags: OpenFlags,
        mode: u32,
    ) -> Result<OpenOutcome<'a>, Status> {
        trace!(path, ?flags, "open");
        flags.validate()?;

        let (vndir, path) = match self.walk_locked(state, vndir, path)? {
            WalkOutcome::Local { node, leaf } => (node, leaf),
            WalkOutcome::Remote { handle, remaining, .. } => {
                // boundary mid-path: create/open happen on the other side
                return Ok(OpenOutcome::Remote { handle, remaining });
            }
        };

        let (name, must_be_dir) = trim_name(path)?;
        if is_dot_dot(name) {
            return Err(Status::InvalidArgument);
        }

        if flags.contains(OpenFlags::CREATE) {
            if must_be_dir && !mode_is_dir(mode) {
                return Err(Status::InvalidArgument);
            }
            if is_dot(name) {
                return Err(Status::InvalidArgument);
            }
            match vndir.create(name, mode) {
                Ok(vn) => {
                    vndir.notify(name, WatchEvent::Added);
                    // a freshly created node is handed back as-is; open
                    // and truncate apply only to the lookup path
                    return Ok(OpenOutcome::Local(vn));
                }
                Err(Status::AlreadyExists) if !flags.contains(OpenFlags::EXCLUSIVE) => {}
                // backends that cannot create (devfs-style) still get a
                // plain open attempt
                Err(Status::NotSupported) => {}
                Err(e) => return Err(e),
            }
        }

        let vn = lookup_node(vndir, name)?;

        if !flags.contains(OpenFlags::NO_REMOTE) && is_mount_point(vn.as_ref()) {
            // opening a mount point traverses across the remote
            match self.wait_for_remote_locked(state, &vn) {
                Ok(handle) => {
                    return Ok(OpenOutcome::Remote {
                        handle,
                        remaining: ".",
                    })
                }
                // mount torn down under us; open the local node
                Err(Status::PeerClosed) => {}
                Err(e) => return Err(e),
            }
        }

        let mut open_flags = flags;
        if must_be_dir {
            open_flags |= OpenFlags::DIRECTORY;
        }

        if vn.is_device() && !open_flags.contains(OpenFlags::DIRECTORY) {
            // devices hand out their own channel instead of a local open
            let handle = vn
                .remote()
                .and_then(|r| r.get_remote())
                .ok_or(Status::Unavailable)?;
            return Ok(OpenOutcome::Remote {
                handle,
                remaining: ".",
            });
        }

        vn.open(open_flags)?;
        if open_flags.contains(OpenFlags::TRUNCATE) {
            vn.truncate(0)?;
        }
        Ok(OpenOutcome::Local(vn))
    }

    // ---- structural mutation ----

    /// Remove `path`'s leaf from `vndir`, then notify watchers.
    pub fn unlink(&self, vndir: Arc<dyn Vnode>, path: &str) -> Result<(), Status> {
        let (name, must_be_dir) = trim_name(path)?;
        if is_dot(name) {
            return Err(Status::Unavailable);
        }
        if is_dot_dot(name) {
            return Err(Status::InvalidArgument);
        }
        {
            let _state = self.lock_state();
            vndir.unlink(name, must_be_dir)?;
        }
        vndir.notify(name, WatchEvent::Removed);
        Ok(())
    }

    /// Move `old_name` under `old_parent` to `new_name` under the
    /// directory `token` authorizes. Watchers on both parents are
    /// notified after the lock protecting the move is released.
    pub fn rename(
        &self,
        token: &Token,
        old_parent: Arc<dyn Vnode>,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), Status> {
        let (old_name, old_must_be_dir) = trim_name(old_name)?;
        if is_dot(old_name) {
            return Err(Status::Unavailable);
        }
        if is_dot_dot(old_name) {
            return Err(Status::InvalidArgument);
        }
        let (new_name, new_must_be_dir) = trim_name(new_name)?;
        if is_dot_or_dot_dot(new_name) {
            return Err(Status::InvalidArgument);
        }

        let new_parent = {
            let state = self.lock_state();
            let new_parent = state.tokens.resolve(token)?;
            old_parent.rename(
                new_parent.clone(),
                old_name,
                new_name,
                old_must_be_dir,
                new_must_be_dir,
            )?;
            new_parent
        };
        old_parent.notify(old_name, WatchEvent::Removed);
        new_parent.notify(new_name, WatchEvent::Added);
        Ok(())
    }

    /// Link `old_name` under `old_parent` as `new_name` under the
    /// directory `token` authorizes. Directories cannot be linked, so a
    /// trailing slash on either name is a mismatch.
    pub fn link(
        &self,
        token: &Token,
        old_parent: Arc<dyn Vnode>,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), Status> {
        let state = self.lock_state();
        let new_parent = state.tokens.resolve(token)?;

        let (old_name, old_must_be_dir) = trim_name(old_name)?;
        if old_must_be_dir {
            return Err(Status::DirectoryMismatch);
        }
        if is_dot(old_name) {
            return Err(Status::Unavailable);
        }
        if is_dot_dot(old_name) {
            return Err(Status::InvalidArgument);
        }
        let (new_name, new_must_be_dir) = trim_name(new_name)?;
        if new_must_be_dir {
            return Err(Status::DirectoryMismatch);
        }
        if is_dot_or_dot_dot(new_name) {
            return Err(Status::InvalidArgument);
        }

        let target = old_parent.lookup(old_name)?;
        new_parent.link(new_name, target)?;
        new_parent.notify(new_name, WatchEvent::Added);
        Ok(())
    }

    /// Read directory entries under the structural lock.
    pub fn readdir(
        &self,
        vn: &Arc<dyn Vnode>,
        cookie: &mut ReaddirCookie,
        buf: &mut [u8],
    ) -> Result<usize, Status> {
        let _state = self.lock_state();
        vn.readdir(cookie, buf)
    }

    // ---- tokens ----

    /// Mint (or re-duplicate) the token authorizing `vn` for `slot`.
    pub fn vnode_to_token(
        &self,
        vn: &Arc<dyn Vnode>,
        slot: &mut TokenSlot,
    ) -> Result<Token, Status> {
        self.lock_state().tokens.mint(vn, slot)
    }

    /// Resolve a token back to the node it authorizes.
    pub fn token_to_vnode(&self, token: &Token) -> Result<Arc<dyn Vnode>, Status> {
        self.lock_state().tokens.resolve(token)
    }

    /// Invalidate `slot`'s token. Runs at connection teardown, before the
    /// referenced node's ordinary lifecycle can drop it.
    pub fn token_discard(&self, slot: &mut TokenSlot) {
        self.lock_state().tokens.discard(slot);
    }

    // ---- connections ----

    /// Register `connection` as served. The returned id goes to the wire
    /// layer, which echoes it back exactly once when the peer closes.
    pub fn serve_connection(&self, connection: Connection) -> Result<ConnectionId, Status> {
        let id = self.next_connection.fetch_add(1, Ordering::Relaxed);
        self.lock_connections().insert(id, connection);
        Ok(ConnectionId(id))
    }

    /// Tear down the connection the wire layer reported closed. Destroys
    /// it exactly once; its token is discarded before the connection's
    /// node reference drops.
    pub fn on_connection_closed(&self, id: ConnectionId) {
        let connection = self.lock_connections().remove(&id.0);
        if let Some(mut connection) = connection {
            self.token_discard(&mut connection.token);
        }
    }

    /// Mint a token for the node served by connection `id`.
    pub fn connection_token(&self, id: ConnectionId) -> Result<Token, Status> {
        let mut connections = self.lock_connections();
        let connection = connections.get_mut(&id.0).ok_or(Status::NotFound)?;
        let vn = connection.vnode().clone();
        self.lock_state().tokens.mint(&vn, &mut connection.token)
    }

    /// Serve `vn` as a directory over `channel`: verify it opens as a
    /// directory, complete the mount handshake toward the peer, then hand
    /// the channel to the node with admin rights.
    pub fn serve_directory(&self, vn: Arc<dyn Vnode>, channel: ChannelHandle) -> Result<(), Status> {
        vn.open(OpenFlags::DIRECTORY)?;
        channel.signal_ready()?;
        vn.serve(self, channel, OpenFlags::ADMIN)
    }

    // ---- remote mounts ----

    /// Bind `channel` at `vn`; afterward the node reports itself remote.
    pub fn install_remote(&self, vn: Arc<dyn Vnode>, channel: ChannelHandle) -> Result<(), Status> {
        let mut state = self.lock_state();
        Self::install_remote_locked(&mut state, vn, channel)
    }

    fn install_remote_locked(
        state: &mut VfsState,
        vn: Arc<dyn Vnode>,
        channel: ChannelHandle,
    ) -> Result<(), Status> {
        let container = vn.remote().ok_or(Status::NotSupported)?;
        container.set_remote(channel)?;
        state.mounts.push(vn);
        Ok(())
    }

    /// Detach the remote mounted at `vn`, returning its channel.
    pub fn uninstall_remote(&self, vn: &Arc<dyn Vnode>) -> Result<ChannelHandle, Status> {
        let mut state = self.lock_state();
        Self::uninstall_remote_locked(&mut state, vn)
    }

    fn uninstall_remote_locked(
        state: &mut VfsState,
        vn: &Arc<dyn Vnode>,
    ) -> Result<ChannelHandle, Status> {
        let position = state
            .mounts
            .iter()
            .position(|mount| Arc::ptr_eq(mount, vn))
            .ok_or(Status::NotFound)?;
        let mount = state.mounts.swap_remove(position);
        let container = mount.remote().ok_or(Status::NotFound)?;
        container.detach_remote().ok_or(Status::NotFound)
    }

    // Blocks with the structural lock held, stalling every other
    // structural operation until the remote signals or closes. That bound
    // is inherent to the single-lock design and is kept on purpose.
    fn wait_for_remote_locked(
        &self,
        state: &mut VfsState,
        vn: &Arc<dyn Vnode>,
    ) -> Result<ChannelHandle, Status> {
        let container = vn.remote().ok_or(Status::Unavailable)?;
        match container.wait_for_remote() {
            Err(Status::PeerClosed) => {
                info!("remote filesystem channel closed, unmounting");
                Self::uninstall_remote_locked(state, vn)?;
                Err(Status::PeerClosed)
            }
            other => other,
        }
    }

    /// Create (or reuse) directory `name` under `vn`, then mount
    /// `channel` at it. With [`MountMkdirFlags::REPLACE`] an existing
    /// mount on that directory is detached first; without it the call
    /// fails `BadState`.
    pub fn mount_mkdir(
        &self,
        vn: Arc<dyn Vnode>,
        channel: ChannelHandle,
        name: &str,
        flags: MountMkdirFlags,
    ) -> Result<(), Status> {
        let mut state = self.lock_state();
        let outcome = self.open_locked(
            &mut state,
            vn,
            name,
            OpenFlags::CREATE | OpenFlags::DIRECTORY | OpenFlags::NO_REMOTE,
            MODE_TYPE_DIR,
        )?;
        let vn = match outcome {
            OpenOutcome::Local(vn) => vn,
            // NO_REMOTE keeps the leaf local; a boundary can only appear
            // mid-path, where this mount request cannot be satisfied
            OpenOutcome::Remote { .. } => return Err(Status::NotSupported),
        };
        if vn.remote().is_some_and(|r| r.is_remote()) {
            if !flags.contains(MountMkdirFlags::REPLACE) {
                return Err(Status::BadState);
            }
            Self::uninstall_remote_locked(&mut state, &vn)?;
        }
        Self::install_remote_locked(&mut state, vn, channel)
    }

    /// Tear down every mount, asking each remote for an orderly shutdown
    /// within `deadline` (`None` waits forever), and return the detached
    /// channels.
    pub fn unmount_all(&self, deadline: Option<Duration>) -> Vec<ChannelHandle> {
        // Containers detach in the same critical section that empties the
        // mount table: a node never answers is_remote() after it has left
        // the table. Only the blocking shutdown calls run unlocked.
        let channels: Vec<ChannelHandle> = {
            let mut state = self.lock_state();
            let mounts = std::mem::take(&mut state.mounts);
            mounts
                .iter()
                .filter_map(|vn| vn.remote().and_then(|container| container.detach_remote()))
                .collect()
        };
        for channel in &channels {
            if let Err(error) = channel.shutdown(deadline) {
                warn!(%error, "remote refused orderly shutdown");
            }
        }
        channels
    }
}

// A node is a traversal boundary when it hosts a remote and is not a
// device; devices keep their handles to themselves until open.
fn is_mount_point(vn: &dyn Vnode) -> bool {
    vn.remote().is_some_and(|r| r.is_remote()) && !vn.is_device()
}

// "." resolves to the current node without delegating; everything else,
// ".." included, goes to the node as an ordinary name.
fn lookup_node(vn: Arc<dyn Vnode>, name: &str) -> Result<Arc<dyn Vnode>, Status> {
    if name.len() > NAME_MAX {
        return Err(Status::BadPath);
    }
    if is_dot(name) {
        return Ok(vn);
    }
    vn.lookup(name)
}

// Split off the first segment if at least one full segment (a '/'
// followed by non-slash content) comes after it.
fn next_segment(path: &str) -> Option<(&str, &str)> {
    let idx = path.find('/')?;
    let rest = &path[idx + 1..];
    if rest.trim_start_matches('/').is_empty() {
        // only slashes follow: the whole thing is the leaf
        return None;
    }
    Some((&path[..idx], rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::collections::HashMap as Map;
    use std::sync::Mutex as StdMutex;

    struct TestDir {
        children: StdMutex<Map<String, Arc<dyn Vnode>>>,
    }

    impl TestDir {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                children: StdMutex::new(Map::new()),
            })
        }

        fn add(self: &Arc<Self>, name: &str, child: Arc<dyn Vnode>) {
            self.children
                .lock()
                .unwrap()
                .insert(name.to_string(), child);
        }
    }

    impl Vnode for TestDir {
        fn open(&self, _flags: OpenFlags) -> Result<(), Status> {
            Ok(())
        }

        fn lookup(&self, name: &str) -> Result<Arc<dyn Vnode>, Status> {
            self.children
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .ok_or(Status::NotFound)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// A node that fails the test if the dispatcher touches it at all.
    struct UntouchableNode;

    impl Vnode for UntouchableNode {
        fn open(&self, _flags: OpenFlags) -> Result<(), Status> {
            panic!("open reached the node");
        }

        fn lookup(&self, _name: &str) -> Result<Arc<dyn Vnode>, Status> {
            panic!("lookup reached the node");
        }

        fn create(&self, _name: &str, _mode: u32) -> Result<Arc<dyn Vnode>, Status> {
            panic!("create reached the node");
        }

        fn truncate(&self, _len: u64) -> Result<(), Status> {
            panic!("truncate reached the node");
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn next_segment_splits_only_with_content_after_slash() {
        assert_eq!(next_segment("a/b"), Some(("a", "b")));
        assert_eq!(next_segment("a//b"), Some(("a", "/b")));
        assert_eq!(next_segment("a/"), None);
        assert_eq!(next_segment("a///"), None);
        assert_eq!(next_segment("a"), None);
    }

    #[test]
    fn dot_paths_walk_to_the_starting_node() {
        let vfs = Vfs::new();
        let dir = TestDir::new();
        for path in ["", ".", "./", "././.", ".///."] {
            let start: Arc<dyn Vnode> = dir.clone();
            match vfs.walk(start, path).unwrap() {
                WalkOutcome::Local { node, leaf } => {
                    assert!(Arc::ptr_eq(&node, &(dir.clone() as Arc<dyn Vnode>)));
                    assert!(leaf.trim_end_matches('/') == "." || leaf == ".");
                }
                WalkOutcome::Remote { .. } => panic!("unexpected remote outcome"),
            }
        }
    }

    #[test]
    fn walk_descends_intermediate_segments() {
        let vfs = Vfs::new();
        let root = TestDir::new();
        let sub = TestDir::new();
        root.add("sub", sub.clone());

        match vfs.walk(root.clone(), "sub/leaf").unwrap() {
            WalkOutcome::Local { node, leaf } => {
                assert!(Arc::ptr_eq(&node, &(sub as Arc<dyn Vnode>)));
                assert_eq!(leaf, "leaf");
            }
            WalkOutcome::Remote { .. } => panic!("unexpected remote outcome"),
        }
    }

    #[test]
    fn walk_does_not_leak_references() {
        let vfs = Vfs::new();
        let root = TestDir::new();
        let sub = TestDir::new();
        root.add("sub", sub.clone());
        let baseline = Arc::strong_count(&sub);

        let outcome = vfs.walk(root.clone(), "sub/leaf").unwrap();
        match &outcome {
            WalkOutcome::Local { .. } => {}
            WalkOutcome::Remote { .. } => panic!("unexpected remote outcome"),
        }
        drop(outcome);
        assert_eq!(Arc::strong_count(&sub), baseline);
    }

    #[test]
    fn walk_failure_leaves_no_net_ownership_change() {
        let vfs = Vfs::new();
        let root = TestDir::new();
        let baseline = Arc::strong_count(&root);
        let err = vfs.walk(root.clone(), "missing/leaf").unwrap_err();
        assert_eq!(err, Status::NotFound);
        assert_eq!(Arc::strong_count(&root), baseline);
    }

    #[test]
    fn readonly_truncate_rejected_before_any_node_operation() {
        let vfs = Vfs::new();
        let node: Arc<dyn Vnode> = Arc::new(UntouchableNode);
        let err = vfs
            .open(node, "anything", OpenFlags::RDONLY | OpenFlags::TRUNCATE, 0)
            .unwrap_err();
        assert_eq!(err, Status::InvalidArgument);
    }

    #[test]
    fn bad_access_mode_rejected_before_any_node_operation() {
        let vfs = Vfs::new();
        let node: Arc<dyn Vnode> = Arc::new(UntouchableNode);
        let err = vfs
            .open(node, "anything", OpenFlags::WRONLY | OpenFlags::RDWR, 0)
            .unwrap_err();
        assert_eq!(err, Status::InvalidArgument);
    }

    #[test]
    fn open_rejects_dot_dot_leaf() {
        let vfs = Vfs::new();
        let dir = TestDir::new();
        let err = vfs
            .open(dir.clone(), "..", OpenFlags::RDONLY, 0)
            .unwrap_err();
        assert_eq!(err, Status::InvalidArgument);
    }

    #[test]
    fn open_dot_resolves_parent_without_lookup() {
        let vfs = Vfs::new();
        let dir = TestDir::new();
        match vfs.open(dir.clone(), ".", OpenFlags::RDONLY, 0).unwrap() {
            OpenOutcome::Local(node) => {
                assert!(Arc::ptr_eq(&node, &(dir as Arc<dyn Vnode>)));
            }
            OpenOutcome::Remote { .. } => panic!("unexpected remote outcome"),
        }
    }

    #[test]
    fn create_dot_rejected() {
        let vfs = Vfs::new();
        let dir = TestDir::new();
        let err = vfs
            .open(dir, ".", OpenFlags::RDONLY | OpenFlags::CREATE, 0)
            .unwrap_err();
        assert_eq!(err, Status::InvalidArgument);
    }

    #[test]
    fn create_with_trailing_slash_requires_directory_mode() {
        let vfs = Vfs::new();
        let dir = TestDir::new();
        let err = vfs
            .open(
                dir,
                "newfile/",
                OpenFlags::RDONLY | OpenFlags::CREATE,
                crate::node::MODE_TYPE_FILE,
            )
            .unwrap_err();
        assert_eq!(err, Status::InvalidArgument);
    }

    #[test]
    fn unlink_dot_rules() {
        let vfs = Vfs::new();
        let dir = TestDir::new();
        assert_eq!(
            vfs.unlink(dir.clone(), ".").unwrap_err(),
            Status::Unavailable
        );
        assert_eq!(
            vfs.unlink(dir.clone(), "..").unwrap_err(),
            Status::InvalidArgument
        );
        assert_eq!(vfs.unlink(dir, "///").unwrap_err(), Status::InvalidArgument);
    }
}
