//! Leaf trimming and dot rules shared by open, unlink, rename, and link.

use crate::Status;

/// Maximum length of a single name segment, in bytes.
pub const NAME_MAX: usize = 255;

/// Maximum length of a full path, in bytes.
pub const PATH_MAX: usize = 4096;

pub(crate) fn is_dot(name: &str) -> bool {
    name == "."
}

pub(crate) fn is_dot_dot(name: &str) -> bool {
    name == ".."
}

pub(crate) fn is_dot_or_dot_dot(name: &str) -> bool {
    is_dot(name) || is_dot_dot(name)
}

/// Trim a name before handing it to a backing node.
///
/// Trailing '/' characters are dropped and recorded as a must-be-directory
/// requirement. A name consisting exclusively of '/' characters or
/// containing a NUL is invalid; one longer than [`NAME_MAX`] is a bad
/// path. Every name-taking entry point trims through here, so backing
/// nodes never see a NUL.
pub(crate) fn trim_name(name: &str) -> Result<(&str, bool), Status> {
    if name.as_bytes().contains(&0) {
        return Err(Status::InvalidArgument);
    }
    let trimmed = name.trim_end_matches('/');
    let must_be_dir = trimmed.len() != name.len();
    if trimmed.is_empty() {
        return Err(Status::InvalidArgument);
    }
    if trimmed.len() > NAME_MAX {
        return Err(Status::BadPath);
    }
    Ok((trimmed, must_be_dir))
}

/// Up-front path checks. The wire contract is a NUL-terminated byte
/// string, so an interior NUL cannot be meant.
pub(crate) fn check_path(path: &str) -> Result<(), Status> {
    if path.len() > PATH_MAX {
        return Err(Status::BadPath);
    }
    if path.as_bytes().contains(&0) {
        return Err(Status::InvalidArgument);
    }
    Ok(())
}
