//! In-memory file node.

use std::any::Any;
use std::sync::{Arc, Mutex};

use dispatchfs_vfs::{OpenFlags, Status, Vnode};

/// A regular file backed by a byte vector.
#[derive(Default)]
pub struct MemFile {
    data: Mutex<Vec<u8>>,
}

impl MemFile {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_contents(contents: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            data: Mutex::new(contents.to_vec()),
        })
    }

    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    pub fn write(&self, contents: &[u8]) {
        *self.lock() = contents.to_vec();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        self.data.lock().expect("file contents poisoned")
    }
}

impl Vnode for MemFile {
    fn open(&self, flags: OpenFlags) -> Result<(), Status> {
        if flags.contains(OpenFlags::DIRECTORY) {
            return Err(Status::DirectoryMismatch);
        }
        Ok(())
    }

    fn lookup(&self, _name: &str) -> Result<Arc<dyn Vnode>, Status> {
        Err(Status::NotSupported)
    }

    fn truncate(&self, len: u64) -> Result<(), Status> {
        self.lock().resize(len as usize, 0);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
