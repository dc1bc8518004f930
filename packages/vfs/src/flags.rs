//! Open flags as a wire-shaped word.

use bitflags::bitflags;

use crate::Status;

/// Access-mode values carried in the low two bits of [`OpenFlags`].
///
/// The mode is a two-bit field, not a set of independent bits: 0 is
/// read-only, 1 write-only, 2 read-write, 3 invalid.
pub mod access {
    pub const RDONLY: u32 = 0;
    pub const WRONLY: u32 = 1;
    pub const RDWR: u32 = 2;
}

bitflags! {
    /// Flags accepted by open/create.
    ///
    /// Bits 0-1 are the access mode (see [`access`]); everything above is
    /// an ordinary option bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const WRONLY = 1 << 0;
        const RDWR = 1 << 1;
        /// Create the leaf if it does not exist.
        const CREATE = 1 << 8;
        /// With CREATE: fail rather than reuse an existing entry.
        const EXCLUSIVE = 1 << 9;
        /// Truncate to zero length after opening.
        const TRUNCATE = 1 << 10;
        /// The resolved node must be a directory.
        const DIRECTORY = 1 << 11;
        /// Do not traverse a remote mount at the leaf.
        const NO_REMOTE = 1 << 12;
        /// Administrative connection (serving a mount point).
        const ADMIN = 1 << 13;
    }
}

impl OpenFlags {
    /// Read-only access, no options: the all-zero word.
    pub const RDONLY: OpenFlags = OpenFlags::empty();

    const ACCESS_MODE_MASK: u32 = 0b11;

    /// The two-bit access-mode field.
    pub fn access_mode(self) -> u32 {
        self.bits() & Self::ACCESS_MODE_MASK
    }

    /// Validate the flag word as far as it can be validated independently
    /// of the target node. Runs before any node operation.
    pub fn validate(self) -> Result<(), Status> {
        match self.access_mode() {
            access::RDONLY if self.contains(OpenFlags::TRUNCATE) => Err(Status::InvalidArgument),
            access::RDONLY | access::WRONLY | access::RDWR => Ok(()),
            _ => Err(Status::InvalidArgument),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_modes_are_valid() {
        assert_eq!(OpenFlags::RDONLY.validate(), Ok(()));
        assert_eq!(OpenFlags::WRONLY.validate(), Ok(()));
        assert_eq!(OpenFlags::RDWR.validate(), Ok(()));
        assert_eq!((OpenFlags::RDWR | OpenFlags::CREATE).validate(), Ok(()));
    }

    #[test]
    fn both_mode_bits_rejected() {
        let flags = OpenFlags::WRONLY | OpenFlags::RDWR;
        assert_eq!(flags.validate(), Err(Status::InvalidArgument));
    }

    #[test]
    fn readonly_truncate_rejected() {
        let flags = OpenFlags::RDONLY | OpenFlags::TRUNCATE;
        assert_eq!(flags.validate(), Err(Status::InvalidArgument));
    }

    #[test]
    fn writable_truncate_allowed() {
        assert_eq!((OpenFlags::WRONLY | OpenFlags::TRUNCATE).validate(), Ok(()));
        assert_eq!((OpenFlags::RDWR | OpenFlags::TRUNCATE).validate(), Ok(()));
    }

    #[test]
    fn access_mode_field() {
        assert_eq!(OpenFlags::RDONLY.access_mode(), access::RDONLY);
        assert_eq!(OpenFlags::WRONLY.access_mode(), access::WRONLY);
        assert_eq!((OpenFlags::RDWR | OpenFlags::CREATE).access_mode(), access::RDWR);
    }
}
