pub mod cg;

use std::fs;
use std::io;
use std::path::Path;

/// Write generated source to `path`, creating parent directories as needed.
pub fn emit(source: &str, path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, source)
}
