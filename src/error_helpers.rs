//! Error helper functions for creating actionable error messages

use std::io;
use std::path::Path;

/// Check if an IO error is a permission denied error
pub fn is_permission_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

/// Check if an IO error is a "not found" error
pub fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// Message for a file that could not be opened for read-write.
pub fn open_error(path: &Path, err: &io::Error) -> String {
    if is_permission_denied(err) {
        format!(
            "failed to open file '{}': permission denied\n\n\
             Possible fixes:\n\
             1. Check file permissions: ls -l '{}'\n\
             2. Grant write access with: chmod u+w '{}'\n\
             3. Preview the changes without writing: revar --dry-run ...",
            path.display(),
            path.display(),
            path.display()
        )
    } else if is_not_found(err) {
        format!(
            "failed to open file '{}': file not found\n\n\
             Possible fixes:\n\
             1. Check the path is correct\n\
             2. The file may have been removed while the directory was being processed",
            path.display()
        )
    } else {
        format!("failed to open file '{}': {}", path.display(), err)
    }
}
