//! Output naming for the fast-start remux.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const PROCESSING_SUFFIX: &str = ".processing";

/// `{input}.processing`, next to the input.
pub fn processing_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(PROCESSING_SUFFIX);
    PathBuf::from(name)
}
