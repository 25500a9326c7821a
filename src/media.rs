//! File inputs and the URLs they turn into.
//!
//! Employee and task images are embedded as `data:` URLs. Project logos get a
//! `blob:` object URL that only resolves within the current process.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::fields::ImageKind;

const OBJECT_URL_PREFIX: &str = "blob:teamboard/";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{0}' is not a PNG, JPEG or GIF image")]
    UnsupportedType(PathBuf),
}

/// A file picked in a form, with the MIME type derived from its extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub path: PathBuf,
    pub mime: Option<&'static str>,
}

impl FileInput {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageKind::from_extension)
            .map(ImageKind::mime);
        FileInput { path, mime }
    }

    /// Image kind, when the file is one of the accepted formats.
    pub fn image_kind(&self) -> Option<ImageKind> {
        self.mime.and_then(ImageKind::from_mime)
    }
}

/// Read the file and encode it as `data:<mime>;base64,<payload>`.
pub fn to_data_url(file: &FileInput) -> Result<String, MediaError> {
    let mime = file.mime.ok_or_else(|| MediaError::UnsupportedType(file.path.clone()))?;
    let bytes = fs::read(&file.path)
        .map_err(|source| MediaError::Read { path: file.path.clone(), source })?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Session registry of object URLs. Starts empty in every process, so URLs
/// persisted by an earlier run no longer resolve.
#[derive(Debug, Default)]
pub struct ObjectUrls {
    next: u64,
    entries: HashMap<String, PathBuf>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `file` and return its object URL.
    pub fn create(&mut self, file: &FileInput) -> String {
        self.next += 1;
        let url = format!("{OBJECT_URL_PREFIX}{}", self.next);
        self.entries.insert(url.clone(), file.path.clone());
        url
    }

    /// Source path of an object URL created in this session.
    pub fn resolve(&self, url: &str) -> Option<&Path> {
        self.entries.get(url).map(PathBuf::as_path)
    }

    pub fn revoke(&mut self, url: &str) {
        self.entries.remove(url);
    }
}
