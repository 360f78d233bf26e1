// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Subjects contain topics, topics contain materials. Tracked files, chat messages, flashcards
//! and error entries live outside that tree.

pub mod chat;
pub mod file;
pub mod ids;
pub mod review;
pub mod subject;

pub use chat::{ChatMessage, MessageRole};
pub use file::{Attachment, FileHandle, FileSource, TrackedFile};
pub use ids::{
    slugify, ConversationId, FileId, Id, IdError, MaterialId, MessageId, SubjectId, TopicId,
};
pub use review::{ErrorEntry, Flashcard, Severity};
pub use subject::{
    Material, Selection, Subject, Topic, GENERAL_TOPIC_ID, GENERAL_TOPIC_NAME,
};
