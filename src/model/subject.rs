// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Utc};

use super::ids::{ConversationId, MaterialId, SubjectId, TopicId};

/// Reserved topic id present in every subject.
pub const GENERAL_TOPIC_ID: &str = "general";
pub const GENERAL_TOPIC_NAME: &str = "General";

/// A top-level study category (e.g. "Biology") holding an ordered list of topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: SubjectId,
    name: String,
    topics: Vec<Topic>,
}

impl Subject {
    /// A new subject containing only the `general` topic.
    pub fn new(id: SubjectId, name: impl Into<String>) -> Self {
        let general = Topic::general(&id);
        Self {
            id,
            name: name.into(),
            topics: vec![general],
        }
    }

    /// Rebuilds a subject from stored parts.
    ///
    /// A missing `general` topic is re-inserted at the front so the fallback topic always exists.
    pub fn from_parts(id: SubjectId, name: impl Into<String>, mut topics: Vec<Topic>) -> Self {
        if !topics.iter().any(Topic::is_general) {
            topics.insert(0, Topic::general(&id));
        }
        Self {
            id,
            name: name.into(),
            topics,
        }
    }

    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub(crate) fn topics_mut(&mut self) -> &mut Vec<Topic> {
        &mut self.topics
    }

    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id == *topic_id)
    }

    pub(crate) fn topic_mut(&mut self, topic_id: &str) -> Option<&mut Topic> {
        self.topics.iter_mut().find(|topic| topic.id == *topic_id)
    }

    pub fn general_topic(&self) -> Option<&Topic> {
        self.topic(GENERAL_TOPIC_ID)
    }
}

/// A subdivision of a subject with its own conversation and materials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    name: String,
    conversation_id: ConversationId,
    materials: Vec<Material>,
}

impl Topic {
    pub fn new(subject_id: &SubjectId, id: TopicId, name: impl Into<String>) -> Self {
        let conversation_id = ConversationId::for_topic(subject_id, &id);
        Self {
            id,
            name: name.into(),
            conversation_id,
            materials: Vec::new(),
        }
    }

    pub fn general(subject_id: &SubjectId) -> Self {
        let id = TopicId::new(GENERAL_TOPIC_ID).expect("hard-coded general topic id is valid");
        Self::new(subject_id, id, GENERAL_TOPIC_NAME)
    }

    /// Rebuilds a topic from stored parts; the stored conversation id is kept as-is.
    pub fn from_parts(
        id: TopicId,
        name: impl Into<String>,
        conversation_id: ConversationId,
        materials: Vec<Material>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            conversation_id,
            materials,
        }
    }

    pub fn id(&self) -> &TopicId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub(crate) fn materials_mut(&mut self) -> &mut Vec<Material> {
        &mut self.materials
    }

    pub fn is_general(&self) -> bool {
        self.id == GENERAL_TOPIC_ID
    }

    pub fn has_material(&self, material_id: &str) -> bool {
        self.materials.iter().any(|m| m.id == *material_id)
    }
}

/// A file resource attached to a topic's conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    id: MaterialId,
    name: String,
    file_url: Option<String>,
    uploaded_at: DateTime<Utc>,
    kind: Option<String>,
}

impl Material {
    pub fn new(id: MaterialId, name: impl Into<String>, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            file_url: None,
            uploaded_at,
            kind: None,
        }
    }

    pub fn with_file_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn id(&self) -> &MaterialId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_url(&self) -> Option<&str> {
        self.file_url.as_deref()
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// MIME type or other free-form kind label.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

/// The active subject/topic pair. Both halves are independently nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    subject_id: Option<SubjectId>,
    topic_id: Option<TopicId>,
}

impl Selection {
    pub fn new(subject_id: Option<SubjectId>, topic_id: Option<TopicId>) -> Self {
        Self {
            subject_id,
            topic_id,
        }
    }

    pub fn subject_id(&self) -> Option<&SubjectId> {
        self.subject_id.as_ref()
    }

    pub fn topic_id(&self) -> Option<&TopicId> {
        self.topic_id.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.subject_id.is_none() && self.topic_id.is_none()
    }

    pub(crate) fn set(&mut self, subject_id: Option<SubjectId>, topic_id: Option<TopicId>) {
        self.subject_id = subject_id;
        self.topic_id = topic_id;
    }

    pub(crate) fn clear_topic(&mut self) {
        self.topic_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_subject_has_general_topic_with_derived_conversation() {
        let subject = Subject::new(SubjectId::new("biology").unwrap(), "Biology");
        assert_eq!(subject.topics().len(), 1);
        let general = subject.general_topic().expect("general topic");
        assert_eq!(general.name(), "General");
        assert_eq!(general.conversation_id().as_str(), "biology_general");
    }

    #[test]
    fn from_parts_restores_missing_general_topic() {
        let subject_id = SubjectId::new("math").unwrap();
        let algebra = Topic::new(&subject_id, TopicId::new("algebra").unwrap(), "Algebra");
        let subject = Subject::from_parts(subject_id, "Math", vec![algebra]);

        let ids: Vec<&str> = subject.topics().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["general", "algebra"]);
    }

    #[test]
    fn from_parts_keeps_persisted_conversation_id() {
        let topic = Topic::from_parts(
            TopicId::new("wars").unwrap(),
            "Wars",
            ConversationId::from_persisted("legacy_key"),
            Vec::new(),
        );
        assert_eq!(topic.conversation_id().as_str(), "legacy_key");
    }
}
