// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kv::KeyValueStore;
use super::StoreError;
use crate::model::{
    ConversationId, IdError, Material, MaterialId, Selection, Subject, SubjectId, Topic, TopicId,
};

pub const SUBJECTS_KEY: &str = "tutorgpt_subjects";
pub const SELECTED_SUBJECT_KEY: &str = "tutorgpt_selected_subject";
pub const SELECTED_TOPIC_KEY: &str = "tutorgpt_selected_topic";

/// Everything hydrated at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedState {
    pub subjects: Vec<Subject>,
    pub selection: Selection,
}

/// Persistence port for the subject store.
///
/// `load` never fails: unreadable or malformed values degrade to defaults.
pub trait StatePort {
    fn load(&self) -> PersistedState;
    fn save_subjects(&self, subjects: &[Subject]) -> Result<(), StoreError>;
    fn save_selected_subject(&self, subject_id: Option<&SubjectId>) -> Result<(), StoreError>;
    fn save_selected_topic(&self, topic_id: Option<&TopicId>) -> Result<(), StoreError>;
}

/// Seed subjects used when nothing (valid) is stored.
pub fn default_subjects() -> Vec<Subject> {
    [("biology", "Biology"), ("math", "Math")]
        .into_iter()
        .map(|(id, name)| {
            let id = SubjectId::new(id).expect("hard-coded seed subject id is valid");
            Subject::new(id, name)
        })
        .collect()
}

/// [`StatePort`] over a [`KeyValueStore`] using the fixed `tutorgpt_*` keys.
#[derive(Debug, Clone)]
pub struct LocalPersistence<S> {
    storage: S,
}

impl<S: KeyValueStore> LocalPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn load_subjects(&self) -> Vec<Subject> {
        let raw = match self.storage.get(SUBJECTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default_subjects(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored subjects; using defaults");
                return default_subjects();
            }
        };

        match decode_subjects(&raw) {
            Ok(subjects) => subjects,
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse stored subjects; using defaults");
                default_subjects()
            }
        }
    }

    fn load_scalar(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read stored selection");
                None
            }
        }
    }

    fn save_scalar(&self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        }
    }
}

impl<S: KeyValueStore> StatePort for LocalPersistence<S> {
    fn load(&self) -> PersistedState {
        let subjects = self.load_subjects();
        let subject_id = self
            .load_scalar(SELECTED_SUBJECT_KEY)
            .and_then(|raw| SubjectId::new(raw).ok());
        let topic_id = self
            .load_scalar(SELECTED_TOPIC_KEY)
            .and_then(|raw| TopicId::new(raw).ok());

        PersistedState {
            subjects,
            selection: Selection::new(subject_id, topic_id),
        }
    }

    fn save_subjects(&self, subjects: &[Subject]) -> Result<(), StoreError> {
        let raw = encode_subjects(subjects)?;
        self.storage.set(SUBJECTS_KEY, &raw)
    }

    fn save_selected_subject(&self, subject_id: Option<&SubjectId>) -> Result<(), StoreError> {
        self.save_scalar(SELECTED_SUBJECT_KEY, subject_id.map(SubjectId::as_str))
    }

    fn save_selected_topic(&self, topic_id: Option<&TopicId>) -> Result<(), StoreError> {
        self.save_scalar(SELECTED_TOPIC_KEY, topic_id.map(TopicId::as_str))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubjectJson {
    id: String,
    name: String,
    #[serde(default)]
    topics: Vec<TopicJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicJson {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conversation_id: Option<String>,
    #[serde(default)]
    materials: Vec<MaterialJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaterialJson {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_url: Option<String>,
    uploaded_at: DateTime<Utc>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

/// Serializes the subject tree into the stored JSON layout.
pub fn encode_subjects(subjects: &[Subject]) -> Result<String, StoreError> {
    let json: Vec<SubjectJson> = subjects.iter().map(subject_to_json).collect();
    serde_json::to_string(&json).map_err(|source| StoreError::Json {
        key: SUBJECTS_KEY.to_owned(),
        source,
    })
}

/// Parses the stored JSON layout back into a subject tree.
pub fn decode_subjects(raw: &str) -> Result<Vec<Subject>, StoreError> {
    let json: Vec<SubjectJson> =
        serde_json::from_str(raw).map_err(|source| StoreError::Json {
            key: SUBJECTS_KEY.to_owned(),
            source,
        })?;
    json.into_iter().map(subject_from_json).collect()
}

fn subject_to_json(subject: &Subject) -> SubjectJson {
    SubjectJson {
        id: subject.id().to_string(),
        name: subject.name().to_owned(),
        topics: subject
            .topics()
            .iter()
            .map(|topic| TopicJson {
                id: topic.id().to_string(),
                name: topic.name().to_owned(),
                conversation_id: Some(topic.conversation_id().to_string()),
                materials: topic
                    .materials()
                    .iter()
                    .map(|material| MaterialJson {
                        id: material.id().to_string(),
                        name: material.name().to_owned(),
                        file_url: material.file_url().map(ToOwned::to_owned),
                        uploaded_at: material.uploaded_at(),
                        kind: material.kind().map(ToOwned::to_owned),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn parse_id<T>(field: &'static str, value: String) -> Result<crate::model::Id<T>, StoreError> {
    crate::model::Id::new(value.clone()).map_err(|source: IdError| StoreError::InvalidId {
        field,
        value,
        source,
    })
}

fn subject_from_json(json: SubjectJson) -> Result<Subject, StoreError> {
    let subject_id: SubjectId = parse_id("subject.id", json.id)?;

    let topics = json
        .topics
        .into_iter()
        .map(|topic| {
            let topic_id: TopicId = parse_id("topic.id", topic.id)?;
            let conversation_id = match topic.conversation_id {
                Some(raw) if !raw.is_empty() => ConversationId::from_persisted(raw),
                _ => ConversationId::for_topic(&subject_id, &topic_id),
            };
            let materials = topic
                .materials
                .into_iter()
                .map(|material| {
                    let material_id: MaterialId = parse_id("material.id", material.id)?;
                    let mut out = Material::new(material_id, material.name, material.uploaded_at);
                    if let Some(file_url) = material.file_url {
                        out = out.with_file_url(file_url);
                    }
                    if let Some(kind) = material.kind {
                        out = out.with_kind(kind);
                    }
                    Ok(out)
                })
                .collect::<Result<Vec<_>, StoreError>>()?;
            Ok(Topic::from_parts(topic_id, topic.name, conversation_id, materials))
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(Subject::from_parts(subject_id, json.name, topics))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::store::MemoryStorage;

    fn sample_tree() -> Vec<Subject> {
        let mut subjects = default_subjects();
        let subject_id = SubjectId::new("world_history").unwrap();
        let mut history = Subject::new(subject_id.clone(), "World History");
        let mut wars = Topic::new(&subject_id, TopicId::new("wars").unwrap(), "Wars");
        let uploaded_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        wars.materials_mut().push(
            Material::new(MaterialId::new("m-1").unwrap(), "ww1.pdf", uploaded_at)
                .with_file_url("file:///tmp/ww1.pdf")
                .with_kind("application/pdf"),
        );
        wars.materials_mut()
            .push(Material::new(MaterialId::new("m-2").unwrap(), "notes", uploaded_at));
        history.topics_mut().push(wars);
        subjects.push(history);
        subjects
    }

    #[test]
    fn encode_uses_camel_case_layout() {
        let raw = encode_subjects(&sample_tree()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value[0]["id"], "biology");
        assert_eq!(value[0]["topics"][0]["conversationId"], "biology_general");
        let material = &value[2]["topics"][1]["materials"][0];
        assert_eq!(material["fileUrl"], "file:///tmp/ww1.pdf");
        assert_eq!(material["type"], "application/pdf");
        assert!(material["uploadedAt"].as_str().unwrap().starts_with("2024-05-01T12:30:00"));
        assert!(value[2]["topics"][1]["materials"][1].get("fileUrl").is_none());
    }

    #[test]
    fn subject_tree_survives_save_and_reload() {
        let storage = MemoryStorage::new();
        let persistence = LocalPersistence::new(storage.clone());
        let tree = sample_tree();
        persistence.save_subjects(&tree).unwrap();

        let reloaded = LocalPersistence::new(storage).load();
        assert_eq!(reloaded.subjects, tree);
    }

    #[test]
    fn decodes_browser_written_timestamps() {
        let raw = r#"[{"id":"math","name":"Math","topics":[{"id":"general","name":"General","conversationId":"math_general","materials":[{"id":"x","name":"a.pdf","uploadedAt":"2024-01-02T03:04:05.678Z"}]}]}]"#;
        let subjects = decode_subjects(raw).unwrap();
        let material = &subjects[0].topics()[0].materials()[0];
        assert_eq!(material.name(), "a.pdf");
        assert_eq!(material.uploaded_at().timestamp_subsec_millis(), 678);
    }

    #[test]
    fn missing_key_loads_seed_subjects() {
        let state = LocalPersistence::new(MemoryStorage::new()).load();
        let names: Vec<&str> = state.subjects.iter().map(Subject::name).collect();
        assert_eq!(names, vec!["Biology", "Math"]);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn malformed_json_falls_back_without_rewriting() {
        let storage = MemoryStorage::new();
        storage.set(SUBJECTS_KEY, "{not json").unwrap();

        let state = LocalPersistence::new(storage.clone()).load();
        assert_eq!(state.subjects, default_subjects());
        assert_eq!(
            storage.entries().get(SUBJECTS_KEY).map(String::as_str),
            Some("{not json")
        );
    }

    #[test]
    fn empty_ids_are_treated_as_malformed() {
        let storage = MemoryStorage::new();
        storage
            .set(SUBJECTS_KEY, r#"[{"id":"","name":"Ghost","topics":[]}]"#)
            .unwrap();
        assert_eq!(LocalPersistence::new(storage).load().subjects, default_subjects());
    }

    #[test]
    fn missing_conversation_id_is_derived() {
        let raw = r#"[{"id":"math","name":"Math","topics":[{"id":"algebra","name":"Algebra"}]}]"#;
        let subjects = decode_subjects(raw).unwrap();
        let algebra = subjects[0].topic("algebra").unwrap();
        assert_eq!(algebra.conversation_id().as_str(), "math_algebra");
        assert!(subjects[0].general_topic().is_some());
    }

    #[test]
    fn selection_halves_are_written_and_removed_independently() {
        let storage = MemoryStorage::new();
        let persistence = LocalPersistence::new(storage.clone());
        let subject_id = SubjectId::new("math").unwrap();
        let topic_id = TopicId::new("general").unwrap();

        persistence.save_selected_subject(Some(&subject_id)).unwrap();
        persistence.save_selected_topic(Some(&topic_id)).unwrap();
        let state = persistence.load();
        assert_eq!(state.selection.subject_id(), Some(&subject_id));
        assert_eq!(state.selection.topic_id(), Some(&topic_id));

        persistence.save_selected_topic(None).unwrap();
        let entries = storage.entries();
        assert_eq!(entries.get(SELECTED_SUBJECT_KEY).map(String::as_str), Some("math"));
        assert!(!entries.contains_key(SELECTED_TOPIC_KEY));
    }
}
