use std::path::PathBuf;

/// Entry names travel as raw bytes; on Unix they map 1:1 onto paths.
#[cfg(unix)]
pub fn path_from_bytes(name: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(name))
}

#[cfg(not(unix))]
pub fn path_from_bytes(name: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(name).into_owned())
}

pub fn display_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}
