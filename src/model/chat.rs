// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::file::Attachment;
use super::ids::MessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Bot,
}

/// One bubble in the chat transcript. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: MessageId,
    text: Option<String>,
    file: Option<Attachment>,
    role: MessageRole,
}

impl ChatMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::random(),
            text: Some(text.into()),
            file: None,
            role: MessageRole::User,
        }
    }

    pub fn user_file(file: Attachment) -> Self {
        Self {
            id: MessageId::random(),
            text: None,
            file: Some(file),
            role: MessageRole::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::random(),
            text: Some(text.into()),
            file: None,
            role: MessageRole::Bot,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn file(&self) -> Option<&Attachment> {
        self.file.as_ref()
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn is_bot(&self) -> bool {
        self.role == MessageRole::Bot
    }
}
