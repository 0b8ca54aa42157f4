use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Collects everything in the given directory that isn't a directory itself, does not
/// walk it recursively. Symlinks are kept without being resolved, so a dangling one is
/// up to the reader to reject. Only failing to open `folder` is an error, entries that
/// can't be inspected are skipped.
pub fn all_files<R>(folder: impl AsRef<Path>) -> io::Result<R>
where
    R: FromIterator<PathBuf>,
{
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping an unreadable directory entry: {e}");
                continue;
            }
        };
        match entry.file_type() {
            Ok(kind) if kind.is_dir() => (),
            Ok(_) => files.push(entry.path()),
            Err(e) => log::debug!("Skipping '{}': {e}", entry.path().display()),
        }
    }
    Ok(files.into_iter().collect())
}

/// Whether the extension of `path` is any of `extensions`, ignoring ASCII case.
/// `extensions` should not contain the leading dot.
pub fn has_extension<S: AsRef<str>>(path: impl AsRef<Path>, extensions: &[S]) -> bool {
    let Some(ext) = path.as_ref().extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext))
}

/// Try to read the file, return None if it doesn't exist
pub fn read_optional_file(path: impl AsRef<Path>) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
        Ok(s) => Ok(Some(s)),
    }
}
