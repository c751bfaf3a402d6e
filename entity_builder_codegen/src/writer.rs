//! Writes generated units below the output directory.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::Write;

/// What happened to a unit on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteOutcome {
    /// The file was created or its contents replaced.
    Written,
    /// The file already held identical contents and was left alone.
    Unchanged,
}

/// A failed write and the location it targeted.
pub(crate) struct WriteFailure {
    pub path: Utf8PathBuf,
    pub source: std::io::Error,
}

impl WriteFailure {
    fn at(path: impl Into<Utf8PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let target = path.into();
        move |source| Self {
            path: target,
            source,
        }
    }
}

/// Writes `contents` to `<out_dir>/<module...>/<file_name>`.
///
/// Unchanged files are not rewritten, so their timestamps do not trigger a
/// rebuild of the including crate.
pub(crate) fn write_unit(
    out_dir: &Utf8Path,
    module: &[String],
    file_name: &str,
    contents: &str,
) -> Result<(Utf8PathBuf, WriteOutcome), WriteFailure> {
    let root = ensure_dir(out_dir)?;
    let relative: Utf8PathBuf = module.iter().collect();
    let dir = if relative.as_str().is_empty() {
        root
    } else {
        root.create_dir_all(&relative)
            .map_err(WriteFailure::at(out_dir.join(&relative)))?;
        root.open_dir(&relative)
            .map_err(WriteFailure::at(out_dir.join(&relative)))?
    };
    let path = out_dir.join(&relative).join(file_name);

    if dir
        .read_to_string(file_name)
        .is_ok_and(|existing| existing == contents)
    {
        return Ok((path, WriteOutcome::Unchanged));
    }

    let mut file = dir
        .open_with(
            file_name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(WriteFailure::at(&path))?;
    file.write_all(contents.as_bytes())
        .map_err(WriteFailure::at(&path))?;
    Ok((path, WriteOutcome::Written))
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, WriteFailure> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority()).map_err(WriteFailure::at(path))?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(WriteFailure::at(path))
        }
        Err(open_err) => Err(WriteFailure {
            path: path.to_path_buf(),
            source: open_err,
        }),
    }
}
