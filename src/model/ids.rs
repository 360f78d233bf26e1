// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// A typed identifier for subjects, topics, materials, files and messages.
///
/// Ids are plain strings; the only enforced rule is that they are non-empty. Subject and topic ids
/// are slugs (see [`slugify`]), material/file/message ids are usually UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Derives an id from a display name (lowercase, whitespace runs become `_`).
    pub fn from_name(name: &str) -> Result<Self, IdError> {
        Self::new(slugify(name))
    }

    /// A fresh random (UUIDv4) id.
    pub fn random() -> Self {
        Self {
            value: uuid::Uuid::new_v4().to_string(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> PartialEq<str> for Id<T> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl<T> PartialEq<&str> for Id<T> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
}

fn whitespace_runs() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("hard-coded regex is valid"))
}

/// Lowercases `name` and collapses every whitespace run into a single `_`.
///
/// Leading and trailing whitespace is not trimmed: `" Math"` becomes `"_math"`.
pub fn slugify(name: &str) -> String {
    whitespace_runs()
        .replace_all(&name.to_lowercase(), "_")
        .into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubjectIdTag {}
pub type SubjectId = Id<SubjectIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TopicIdTag {}
pub type TopicId = Id<TopicIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialIdTag {}
pub type MaterialId = Id<MaterialIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileIdTag {}
pub type FileId = Id<FileIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageIdTag {}
pub type MessageId = Id<MessageIdTag>;

/// External key correlating a subject/topic pair with a remote tutor conversation.
///
/// Always `{subject_id}_{topic_id}`; computed once when the topic is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn for_topic(subject_id: &SubjectId, topic_id: &TopicId) -> Self {
        Self(format!("{subject_id}_{topic_id}"))
    }

    /// Wraps a persisted value verbatim.
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{slugify, ConversationId, Id, IdError, SubjectId, TopicId};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn slugify_lowercases_and_collapses_whitespace() {
        assert_eq!(slugify("World History"), "world_history");
        assert_eq!(slugify("Organic   Chemistry\tII"), "organic_chemistry_ii");
        assert_eq!(slugify(" Math"), "_math");
        assert_eq!(slugify("Wars"), "wars");
    }

    #[test]
    fn from_name_rejects_empty_names() {
        assert_eq!(SubjectId::from_name(""), Err(IdError::Empty));
    }

    #[test]
    fn random_ids_are_distinct() {
        let a: Id<()> = Id::random();
        let b: Id<()> = Id::random();
        assert_ne!(a, b);
    }

    #[test]
    fn conversation_id_joins_subject_and_topic() {
        let subject = SubjectId::new("world_history").unwrap();
        let topic = TopicId::new("wars").unwrap();
        assert_eq!(
            ConversationId::for_topic(&subject, &topic).as_str(),
            "world_history_wars"
        );
    }
}
