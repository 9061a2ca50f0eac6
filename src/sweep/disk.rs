//! Free-space probe for the volume being cleaned.

use std::path::Path;

use crate::error::{CleanupError, Result};

/// Bytes available to unprivileged users on the volume holding `volume`.
#[cfg(unix)]
pub fn available_space(volume: &Path) -> Result<u64> {
    use std::ffi::CString;
    use std::io;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let stat_error = |source: io::Error| CleanupError::DiskStat {
        path: volume.to_path_buf(),
        source,
    };

    let c_path = CString::new(volume.as_os_str().as_bytes())
        .map_err(|err| stat_error(io::Error::new(io::ErrorKind::InvalidInput, err)))?;

    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: `c_path` is NUL-terminated and `stat` points to storage sized
    // for a `statvfs` record.
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if ret != 0 {
        return Err(stat_error(io::Error::last_os_error()));
    }
    // SAFETY: statvfs returned 0, so the record is initialized.
    let stat = unsafe { stat.assume_init() };

    #[allow(clippy::unnecessary_cast)]
    let available = (stat.f_bavail as u64).saturating_mul(stat.f_frsize as u64);
    Ok(available)
}

#[cfg(not(unix))]
pub fn available_space(volume: &Path) -> Result<u64> {
    Err(CleanupError::DiskStat {
        path: volume.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "free-space measurement requires a Unix system",
        ),
    })
}
