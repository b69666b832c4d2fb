use std::io;
use std::path::Path;

pub fn file_size(path: &Path) -> io::Result<u64> {
    let metadata = path.metadata()?;
    if !metadata.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "不是普通文件"));
    }
    Ok(metadata.len())
}
