//! Filesystem helpers built on `cap-std` and `camino`.

use std::io::{self, Write};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Open a file for reading using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Replace the contents of `path` with `contents`, creating parent directories.
pub fn write_utf8_file(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs_utf8::Dir::create_ambient_dir_all(parent, ambient_authority())?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    let mut file = dir.create(file_name)?;
    file.write_all(contents.as_bytes())?;
    file.flush()
}
