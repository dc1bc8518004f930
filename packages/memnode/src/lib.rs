//! In-memory node and channel implementations for exercising the
//! dispatch core: a directory, a file, a device, and a condition-variable
//! channel endpoint. Useful as test fixtures and as a template for real
//! backends.

mod channel;
mod device;
mod dir;
mod file;

pub use channel::EventChannel;
pub use device::MemDevice;
pub use dir::{dir_with, MemDir, IOCTL_MEMDIR_ECHO};
pub use file::MemFile;
