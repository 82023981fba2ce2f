//! Platform-specific module for ownership, permissions and privileges.

use crate::error::Result;
use std::path::Path;

/// Numeric owner and group of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub uid: u32,
    pub gid: u32,
}

/// Check if the current process has administrator privileges.
#[cfg(unix)]
pub fn has_admin_privileges() -> bool {
    // On Unix, check if EUID is 0 (root)
    nix::unistd::geteuid().is_root()
}

/// Check if the current process has administrator privileges.
#[cfg(not(unix))]
pub fn has_admin_privileges() -> bool {
    false
}

/// Read the owner of a file.
#[cfg(unix)]
pub fn file_owner(path: &Path) -> Result<Owner> {
    use std::os::unix::fs::MetadataExt;

    let metadata = std::fs::metadata(path)?;
    Ok(Owner {
        uid: metadata.uid(),
        gid: metadata.gid(),
    })
}

#[cfg(not(unix))]
pub fn file_owner(path: &Path) -> Result<Owner> {
    std::fs::metadata(path)?;
    Ok(Owner { uid: 0, gid: 0 })
}

/// Give a file back to a previously recorded owner.
#[cfg(unix)]
pub fn restore_owner(path: &Path, owner: Owner) -> Result<()> {
    use crate::error::Error;
    use nix::unistd::{Gid, Uid, chown};

    chown(
        path,
        Some(Uid::from_raw(owner.uid)),
        Some(Gid::from_raw(owner.gid)),
    )
    .map_err(|e| Error::Ownership {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(not(unix))]
pub fn restore_owner(_path: &Path, _owner: Owner) -> Result<()> {
    Ok(())
}

/// Set the permission bits of a file.
#[cfg(unix)]
pub fn set_file_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    Ok(())
}

/// Set the permission bits of a file. Only the owner write bit maps to
/// anything here.
#[cfg(not(unix))]
pub fn set_file_mode(path: &Path, mode: u32) -> Result<()> {
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o200 == 0);
    std::fs::set_permissions(path, permissions)?;
    Ok(())
}
