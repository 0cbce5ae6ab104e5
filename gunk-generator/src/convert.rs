use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::Diagnostic;
use crate::error::Error;

/// Settings for converting files on disk.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Replace an existing `.gunk` file instead of failing.
    pub overwrite: bool,
}

/// A file that was written by [`convert_file`].
#[derive(Debug)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert every path given. Directories are scanned for `.proto` files one
/// level deep. Stops at the first file that fails.
pub fn run<P: AsRef<Path>>(
    paths: &[P],
    options: &ConvertOptions,
) -> Result<Vec<ConvertedFile>, Error> {
    let mut converted = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        if !meta.is_dir() {
            converted.push(convert_file(path, options)?);
            continue;
        }
        if is_proto(path) {
            return Err(Error::ProtoDirectory(path.to_path_buf()));
        }
        for file in proto_files(path)? {
            converted.push(convert_file(&file, options)?);
        }
    }
    Ok(converted)
}

/// Convert one `.proto` file, writing the result next to it with a `.gunk`
/// extension.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<ConvertedFile, Error> {
    if !is_proto(path) {
        return Err(Error::NotProtoFile(path.to_path_buf()));
    }
    let destination = path.with_extension("gunk");
    if !options.overwrite && destination.exists() {
        return Err(Error::AlreadyExists(destination));
    }

    debug!(path = %path.display(), "converting");
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let proto = parser::parse_proto_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let conversion = crate::convert_proto(&filename, &proto)?;

    fs::write(&destination, conversion.text).map_err(|e| Error::io(&destination, e))?;
    info!(
        source = %path.display(),
        destination = %destination.display(),
        diagnostics = conversion.diagnostics.len(),
        "wrote gunk file"
    );
    Ok(ConvertedFile {
        source: path.to_path_buf(),
        destination,
        diagnostics: conversion.diagnostics,
    })
}

fn is_proto(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "proto")
}

fn proto_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && is_proto(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
