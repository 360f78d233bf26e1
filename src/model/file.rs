// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::ids::FileId;

/// Where the bytes of an attachment live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileHandle {
    /// A file on the local filesystem, read when it is sent.
    Local(PathBuf),
    /// Bytes already held in memory.
    Inline(Arc<[u8]>),
    /// A remote resource; never uploaded.
    Remote(String),
}

/// A file the user picked, before it is tracked or sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    name: String,
    handle: FileHandle,
    mime: Option<String>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, handle: FileHandle) -> Self {
        Self {
            name: name.into(),
            handle,
            mime: None,
        }
    }

    /// An attachment for a local path, named after its file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let mime = mime_for_path(&path).map(ToOwned::to_owned);
        Self {
            name,
            handle: FileHandle::Local(path),
            mime,
        }
    }

    pub fn inline(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(name, FileHandle::Inline(bytes.into()))
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    /// A URL for material records: `file://` for local paths (made absolute first), the remote
    /// URL as given, nothing for inline bytes.
    pub fn location(&self) -> Option<String> {
        match &self.handle {
            FileHandle::Local(path) => {
                let absolute = std::fs::canonicalize(path)
                    .or_else(|_| std::path::absolute(path))
                    .ok()?;
                reqwest::Url::from_file_path(absolute).ok().map(String::from)
            }
            FileHandle::Remote(url) => Some(url.clone()),
            FileHandle::Inline(_) => None,
        }
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "txt" | "md" => Some("text/plain"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        _ => None,
    }
}

/// Which panel a tracked file was attached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileSource {
    Chat,
    Materials,
}

impl FileSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Materials => "materials",
        }
    }
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An upload record, independent of the subject tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    id: FileId,
    name: String,
    handle: FileHandle,
    uploaded_at: DateTime<Utc>,
    source: FileSource,
}

impl TrackedFile {
    pub fn new(
        id: FileId,
        attachment: &Attachment,
        uploaded_at: DateTime<Utc>,
        source: FileSource,
    ) -> Self {
        Self {
            id,
            name: attachment.name().to_owned(),
            handle: attachment.handle().clone(),
            uploaded_at,
            source,
        }
    }

    pub fn id(&self) -> &FileId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// ISO-8601 upload timestamp as shown to the user.
    pub fn uploaded_at_iso(&self) -> String {
        self.uploaded_at
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }

    pub fn source(&self) -> FileSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::{Attachment, FileHandle, FileSource};

    #[test]
    fn attachment_from_path_uses_file_name_and_guesses_mime() {
        let attachment = Attachment::from_path("/tmp/notes/Cells.PDF");
        assert_eq!(attachment.name(), "Cells.PDF");
        assert_eq!(attachment.mime(), Some("application/pdf"));
        assert!(matches!(attachment.handle(), FileHandle::Local(_)));
        assert_eq!(
            attachment.location().as_deref(),
            Some("file:///tmp/notes/Cells.PDF")
        );
    }

    #[test]
    fn file_source_names() {
        assert_eq!(FileSource::Chat.to_string(), "chat");
        assert_eq!(FileSource::Materials.as_str(), "materials");
    }

    #[test]
    fn location_is_a_valid_file_url_for_spaces() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("my notes.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let location = Attachment::from_path(&path).location().unwrap();
        let url = reqwest::Url::parse(&location).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(location.ends_with("/my%20notes.pdf"), "got {location}");
        assert_eq!(
            url.to_file_path().unwrap(),
            std::fs::canonicalize(&path).unwrap()
        );
    }

    #[test]
    fn relative_location_is_made_absolute() {
        let location = Attachment::from_path("notes/a b.txt").location().unwrap();
        let expected = std::env::current_dir().unwrap().join("notes/a b.txt");
        assert_eq!(
            reqwest::Url::parse(&location).unwrap().to_file_path().unwrap(),
            expected
        );
    }
}
