// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use super::StoreError;

/// A string key-value store; a missing key reads as `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries, mostly useful in tests.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Also syncs the value file and its directory. Exact guarantees are
    /// platform/filesystem-dependent.
    Durable,
}

/// Directory-backed store: one `<key>.json` file per key.
///
/// Keys are fixed identifiers chosen by the caller; they must be plain file-name segments.
#[derive(Debug, Clone)]
pub struct StorageDir {
    root: PathBuf,
    durability: WriteDurability,
}

impl StorageDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
            || key.chars().any(char::is_control)
        {
            return Err(StoreError::InvalidKey {
                key: key.to_owned(),
            });
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for StorageDir {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        write_atomic(&self.root, &path, value.as_bytes(), self.durability)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = root.join(format!(
        ".tutorgpt.tmp.{}.{}.{nanos}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(root).map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{KeyValueStore, MemoryStorage, StorageDir, WriteDurability};
    use crate::store::StoreError;

    struct DirCtx {
        _tmp: tempfile::TempDir,
        storage: StorageDir,
    }

    #[fixture]
    fn ctx() -> DirCtx {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageDir::new(tmp.path().join("storage"));
        DirCtx { _tmp: tmp, storage }
    }

    #[rstest]
    fn storage_dir_reads_missing_key_as_none(ctx: DirCtx) {
        assert_eq!(ctx.storage.get("tutorgpt_subjects").unwrap(), None);
    }

    #[rstest]
    fn storage_dir_set_creates_root_and_overwrites(ctx: DirCtx) {
        ctx.storage.set("k", "one").unwrap();
        ctx.storage.set("k", "two").unwrap();
        assert_eq!(ctx.storage.get("k").unwrap().as_deref(), Some("two"));
        assert!(ctx.storage.root().join("k.json").is_file());

        let leftovers = std::fs::read_dir(ctx.storage.root())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".tutorgpt.tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[rstest]
    fn storage_dir_remove_is_idempotent(ctx: DirCtx) {
        ctx.storage.set("k", "v").unwrap();
        ctx.storage.remove("k").unwrap();
        ctx.storage.remove("k").unwrap();
        assert_eq!(ctx.storage.get("k").unwrap(), None);
    }

    #[rstest]
    fn storage_dir_durable_writes_round_trip(ctx: DirCtx) {
        let storage = ctx.storage.clone().with_durability(WriteDurability::Durable);
        storage.set("k", "durable").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("durable"));
    }

    #[rstest]
    #[case("")]
    #[case("../escape")]
    #[case(".hidden")]
    #[case("a\\b")]
    fn storage_dir_rejects_unsafe_keys(ctx: DirCtx, #[case] key: &str) {
        let err = ctx.storage.set(key, "v").unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }), "got {err:?}");
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.set("a", "1").unwrap();
        assert_eq!(handle.get("a").unwrap().as_deref(), Some("1"));
        handle.remove("a").unwrap();
        assert!(storage.entries().is_empty());
    }
}
