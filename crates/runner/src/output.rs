//! Plain-text output files
//!
//! Series files hold one value per line; estimator files hold two
//! space-separated columns per line. Lines are separated by `\n` and the
//! last line has no terminator.

use crate::error::{Result, RunError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `<stem>.<suffix>`
pub fn output_path(stem: &str, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{stem}.{suffix}"))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let io_error = |source| RunError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    File::create(path).map(BufWriter::new).map_err(io_error)
}

fn finish(path: &Path, result: std::io::Result<()>) -> Result<()> {
    result.map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_lines<T>(
    path: &Path,
    items: &[T],
    mut line: impl FnMut(&mut BufWriter<File>, &T) -> std::io::Result<()>,
) -> Result<()> {
    let mut writer = create(path)?;
    let result = items
        .iter()
        .enumerate()
        .try_for_each(|(i, item)| {
            if i > 0 {
                writer.write_all(b"\n")?;
            }
            line(&mut writer, item)
        })
        .and_then(|_| writer.flush());
    finish(path, result)
}

/// Write one value per line
pub fn write_series(path: &Path, values: &[f64]) -> Result<()> {
    write_lines(path, values, |w, v| write!(w, "{v}"))
}

/// Write `x y` pairs, one per line
pub fn write_columns(path: &Path, rows: &[[f64; 2]]) -> Result<()> {
    write_lines(path, rows, |w, [x, y]| write!(w, "{x} {y}"))
}
