use serde::{de::DeserializeOwned, Serialize};
use std::{fs, io::{self, Write}, path::Path};
use tempfile::NamedTempFile;

/// Reads a JSON document, treating a missing file as `T::default()`.
pub fn read_json_or_default<T>(path: &Path) -> io::Result<T>
where
    T: DeserializeOwned + Default,
{
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e),
    }
}

/// Writes `value` as pretty JSON next to `path` and renames it into place,
/// so readers see either the old document or the new one.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    file.write_all(b"\n")?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::trace!("Wrote {}", path.display());
    Ok(())
}
