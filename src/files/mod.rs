// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session-scoped record of uploaded files.
//!
//! Independent of the subject tree and never persisted.

use chrono::{DateTime, Utc};

use crate::model::{Attachment, FileId, FileSource, TrackedFile};

#[derive(Debug, Clone, Default)]
pub struct FileTracker {
    files: Vec<TrackedFile>,
}

impl FileTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[TrackedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Tracks every attachment in order, each under a fresh id, and returns the new records.
    pub fn add_files(&mut self, attachments: &[Attachment], source: FileSource) -> Vec<TrackedFile> {
        self.add_files_at(attachments, source, Utc::now())
    }

    pub(crate) fn add_files_at(
        &mut self,
        attachments: &[Attachment],
        source: FileSource,
        uploaded_at: DateTime<Utc>,
    ) -> Vec<TrackedFile> {
        let added: Vec<TrackedFile> = attachments
            .iter()
            .map(|attachment| TrackedFile::new(FileId::random(), attachment, uploaded_at, source))
            .collect();
        tracing::debug!(count = added.len(), source = %source, "tracked files");
        self.files.extend(added.iter().cloned());
        added
    }

    /// Returns `false` when no file has that id.
    pub fn remove_file(&mut self, file_id: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|file| file.id() != file_id);
        self.files.len() != before
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn files_from(&self, source: FileSource) -> impl Iterator<Item = &TrackedFile> + '_ {
        self.files.iter().filter(move |file| file.source() == source)
    }
}
