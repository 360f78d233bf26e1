// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Subject/topic/material store.
//!
//! Holds the subject tree and the active selection. Every mutation is written through to a
//! [`StatePort`] before the call returns; the in-memory change stays applied even if that write
//! fails, and the write error is handed back to the caller.

use thiserror::Error;

use crate::model::{
    ConversationId, Material, Selection, Subject, SubjectId, Topic, TopicId, GENERAL_TOPIC_ID,
};
use crate::store::{StatePort, StoreError};

/// Whether a store call changed anything.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Duplicate id, unknown id, reserved topic, or an empty name.
    Ignored,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("unknown subject {subject_id:?}")]
    UnknownSubject { subject_id: String },
    #[error("unknown topic {topic_id:?} in subject {subject_id:?}")]
    UnknownTopic {
        subject_id: String,
        topic_id: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A resolved selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedTopic<'a> {
    pub subject: &'a Subject,
    pub topic: &'a Topic,
}

#[derive(Debug)]
pub struct SubjectStore<P> {
    subjects: Vec<Subject>,
    selection: Selection,
    port: P,
}

impl<P: StatePort> SubjectStore<P> {
    /// Hydrates from `port` (falling back to the seed subjects) without writing anything back.
    pub fn open(port: P) -> Self {
        let state = port.load();
        tracing::debug!(
            subjects = state.subjects.len(),
            selected_subject = ?state.selection.subject_id().map(SubjectId::as_str),
            selected_topic = ?state.selection.topic_id().map(TopicId::as_str),
            "subject store hydrated"
        );
        Self {
            subjects: state.subjects,
            selection: state.selection,
            port,
        }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject(&self, subject_id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id() == subject_id)
    }

    fn subject_mut(&mut self, subject_id: &str) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|s| s.id() == subject_id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn add_subject(&mut self, name: &str) -> Result<Outcome, StoreError> {
        let Ok(subject_id) = SubjectId::from_name(name) else {
            tracing::debug!(name, "empty subject name; ignoring add");
            return Ok(Outcome::Ignored);
        };
        if self.subject(subject_id.as_str()).is_some() {
            tracing::debug!(subject_id = %subject_id, "subject already exists; ignoring add");
            return Ok(Outcome::Ignored);
        }

        self.subjects.push(Subject::new(subject_id, name));
        self.persist_subjects()?;
        Ok(Outcome::Applied)
    }

    pub fn remove_subject(&mut self, subject_id: &str) -> Result<Outcome, StoreError> {
        let before = self.subjects.len();
        self.subjects.retain(|s| s.id() != subject_id);
        if self.subjects.len() == before {
            tracing::debug!(subject_id, "unknown subject; ignoring remove");
            return Ok(Outcome::Ignored);
        }

        let persisted = self.persist_subjects();
        let selection = if self
            .selection
            .subject_id()
            .is_some_and(|selected| selected == subject_id)
        {
            self.update_selection(None, None)
        } else {
            Ok(())
        };
        persisted.and(selection)?;
        Ok(Outcome::Applied)
    }

    pub fn add_topic(&mut self, subject_id: &str, name: &str) -> Result<Outcome, StoreError> {
        let Ok(topic_id) = TopicId::from_name(name) else {
            tracing::debug!(subject_id, name, "empty topic name; ignoring add");
            return Ok(Outcome::Ignored);
        };
        let Some(subject) = self.subject_mut(subject_id) else {
            tracing::debug!(subject_id, "unknown subject; ignoring topic add");
            return Ok(Outcome::Ignored);
        };
        if subject.topic(topic_id.as_str()).is_some() {
            tracing::debug!(subject_id, topic_id = %topic_id, "topic already exists; ignoring add");
            return Ok(Outcome::Ignored);
        }

        let topic = Topic::new(subject.id(), topic_id, name);
        subject.topics_mut().push(topic);
        self.persist_subjects()?;
        Ok(Outcome::Applied)
    }

    /// Removes a topic. The reserved `general` topic is never removed.
    pub fn remove_topic(&mut self, subject_id: &str, topic_id: &str) -> Result<Outcome, StoreError> {
        if topic_id == GENERAL_TOPIC_ID {
            tracing::debug!(subject_id, "general topic is reserved; ignoring remove");
            return Ok(Outcome::Ignored);
        }
        let Some(subject) = self.subject_mut(subject_id) else {
            return Ok(Outcome::Ignored);
        };
        let topics = subject.topics_mut();
        let before = topics.len();
        topics.retain(|t| t.id() != topic_id);
        if topics.len() == before {
            tracing::debug!(subject_id, topic_id, "unknown topic; ignoring remove");
            return Ok(Outcome::Ignored);
        }

        let persisted = self.persist_subjects();
        let was_selected = self
            .selection
            .subject_id()
            .is_some_and(|selected| selected == subject_id)
            && self
                .selection
                .topic_id()
                .is_some_and(|selected| selected == topic_id);
        let selection = if was_selected {
            let subject = self.selection.subject_id().cloned();
            self.update_selection(subject, None)
        } else {
            Ok(())
        };
        persisted.and(selection)?;
        Ok(Outcome::Applied)
    }

    /// Sets the selection without checking that the pair exists.
    ///
    /// Lookups tolerate a dangling selection; see [`Self::select_existing_topic`] for the
    /// validating variant. Empty ids cannot be represented and are ignored.
    pub fn select_topic(&mut self, subject_id: &str, topic_id: &str) -> Result<Outcome, StoreError> {
        let (Ok(subject_id), Ok(topic_id)) = (SubjectId::new(subject_id), TopicId::new(topic_id))
        else {
            return Ok(Outcome::Ignored);
        };
        self.update_selection(Some(subject_id), Some(topic_id))?;
        Ok(Outcome::Applied)
    }

    /// Selects a pair only if both the subject and the topic exist.
    pub fn select_existing_topic(
        &mut self,
        subject_id: &str,
        topic_id: &str,
    ) -> Result<Outcome, SelectionError> {
        let Some(subject) = self.subject(subject_id) else {
            return Err(SelectionError::UnknownSubject {
                subject_id: subject_id.to_owned(),
            });
        };
        if subject.topic(topic_id).is_none() {
            return Err(SelectionError::UnknownTopic {
                subject_id: subject_id.to_owned(),
                topic_id: topic_id.to_owned(),
            });
        }
        Ok(self.select_topic(subject_id, topic_id)?)
    }

    pub fn clear_selection(&mut self) -> Result<Outcome, StoreError> {
        if self.selection.is_empty() {
            return Ok(Outcome::Ignored);
        }
        self.update_selection(None, None)?;
        Ok(Outcome::Applied)
    }

    /// Attaches `material` to a topic and, unless that topic is `general`, to the subject's
    /// `general` topic as well. Both lists are deduplicated by material id.
    pub fn add_material(
        &mut self,
        subject_id: &str,
        topic_id: &str,
        material: Material,
    ) -> Result<Outcome, StoreError> {
        let Some(subject) = self.subject_mut(subject_id) else {
            tracing::debug!(subject_id, "unknown subject; ignoring material add");
            return Ok(Outcome::Ignored);
        };
        if subject.topic(topic_id).is_none() {
            tracing::debug!(subject_id, topic_id, "unknown topic; ignoring material add");
            return Ok(Outcome::Ignored);
        }

        let mut targets = vec![topic_id];
        if topic_id != GENERAL_TOPIC_ID {
            targets.push(GENERAL_TOPIC_ID);
        }

        let mut applied = false;
        for target in targets {
            let Some(topic) = subject.topic_mut(target) else {
                continue;
            };
            if topic.has_material(material.id().as_str()) {
                continue;
            }
            topic.materials_mut().push(material.clone());
            applied = true;
        }

        if !applied {
            tracing::debug!(
                subject_id,
                topic_id,
                material_id = %material.id(),
                "material already attached; ignoring add"
            );
            return Ok(Outcome::Ignored);
        }
        self.persist_subjects()?;
        Ok(Outcome::Applied)
    }

    /// Detaches a material from exactly one topic; `general` keeps its copy.
    pub fn remove_material(
        &mut self,
        subject_id: &str,
        topic_id: &str,
        material_id: &str,
    ) -> Result<Outcome, StoreError> {
        let Some(topic) = self
            .subject_mut(subject_id)
            .and_then(|subject| subject.topic_mut(topic_id))
        else {
            return Ok(Outcome::Ignored);
        };
        let materials = topic.materials_mut();
        let before = materials.len();
        materials.retain(|m| m.id() != material_id);
        if materials.len() == before {
            return Ok(Outcome::Ignored);
        }

        self.persist_subjects()?;
        Ok(Outcome::Applied)
    }

    /// The selected subject, or `None` when nothing is selected or it no longer exists.
    pub fn selected_subject_data(&self) -> Option<&Subject> {
        let subject_id = self.selection.subject_id()?;
        self.subject(subject_id.as_str())
    }

    /// The selected subject/topic pair, or `None` when either half is missing or stale.
    pub fn selected_topic_data(&self) -> Option<SelectedTopic<'_>> {
        let subject = self.selected_subject_data()?;
        let topic_id = self.selection.topic_id()?;
        let topic = subject.topic(topic_id.as_str())?;
        Some(SelectedTopic { subject, topic })
    }

    pub fn active_conversation_id(&self) -> Option<&ConversationId> {
        self.selected_topic_data()
            .map(|selected| selected.topic.conversation_id())
    }

    fn persist_subjects(&self) -> Result<(), StoreError> {
        self.port.save_subjects(&self.subjects).inspect_err(|err| {
            tracing::warn!(error = %err, "failed to persist subjects");
        })
    }

    fn update_selection(
        &mut self,
        subject_id: Option<SubjectId>,
        topic_id: Option<TopicId>,
    ) -> Result<(), StoreError> {
        let subject_changed = self.selection.subject_id() != subject_id.as_ref();
        let topic_changed = self.selection.topic_id() != topic_id.as_ref();
        self.selection.set(subject_id, topic_id);

        let mut result = Ok(());
        if subject_changed {
            result = self.port.save_selected_subject(self.selection.subject_id());
        }
        if topic_changed {
            let saved = self.port.save_selected_topic(self.selection.topic_id());
            if result.is_ok() {
                result = saved;
            }
        }
        result.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to persist selection");
        })
    }
}

#[cfg(test)]
mod tests;
