// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Chat session controller.
//!
//! A send runs in three phases so the UI thread never blocks on the network:
//! [`ChatSession::begin_send`] records the user's messages and plans one request,
//! [`TutorBackend::dispatch`] performs it (on any task), and [`ChatSession::complete`] appends
//! the bot reply. [`ChatSession::send`] chains all three.
//!
//! Each request is tagged with the conversation generation it was planned for. Switching the
//! active conversation discards the transcript and bumps the generation, so replies for the old
//! conversation are dropped.

use crate::api::{ApiError, TutorBackend, TutorRequest, TutorResponse};
use crate::files::FileTracker;
use crate::model::{Attachment, ChatMessage, ConversationId, FileSource, Flashcard};

pub const DEFAULT_STUDENT_ID: &str = "student123";
pub const NO_CONVERSATION_WARNING: &str =
    "⚠️ Please select a subject and topic from the settings sidebar to start chatting.";
pub const TRANSPORT_ERROR_REPLY: &str = "⚠️ Error communicating with the tutor.";
pub const NO_RESPONSE_REPLY: &str = "No response received.";
pub const FLASHCARDS_FAILED_REPLY: &str = "Could not generate flashcards.";

fn flashcards_generated_reply(count: usize) -> String {
    format!("📘 Flashcards generated ({count} items)!")
}

/// A request planned by [`ChatSession::begin_send`], waiting to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    generation: u64,
    request: TutorRequest,
}

impl PendingRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &TutorRequest {
        &self.request
    }

    fn subject(&self) -> Option<&str> {
        match &self.request {
            TutorRequest::Flashcards { subject, .. } => subject.as_deref(),
            TutorRequest::Chat { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendPlan {
    /// Blank text and no files; nothing happened.
    Empty,
    /// No active conversation; a warning was appended.
    NoConversation,
    /// A request is already in flight; nothing happened.
    Busy,
    Dispatch(PendingRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Empty,
    NoConversation,
    Busy,
    /// A bot reply was appended; `flashcards` holds any cards the tutor generated.
    Completed { flashcards: Vec<Flashcard> },
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    student_id: String,
    conversation_id: Option<ConversationId>,
    generation: u64,
    pending: bool,
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_STUDENT_ID)
    }
}

impl ChatSession {
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            conversation_id: None,
            generation: 0,
            pending: false,
            messages: Vec::new(),
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Follows the active conversation. A change clears the transcript and orphans any request
    /// still in flight. Returns whether the conversation changed.
    pub fn sync_conversation(&mut self, conversation_id: Option<&ConversationId>) -> bool {
        if self.conversation_id.as_ref() == conversation_id {
            return false;
        }
        tracing::debug!(
            from = ?self.conversation_id.as_ref().map(ConversationId::as_str),
            to = ?conversation_id.map(ConversationId::as_str),
            "conversation changed; clearing transcript"
        );
        self.conversation_id = conversation_id.cloned();
        self.generation += 1;
        self.pending = false;
        self.messages.clear();
        true
    }

    /// Records the user's side of a send and plans the request for it.
    ///
    /// Files are tracked with source `chat`. With files present only the first one is uploaded
    /// (for flashcard generation, tagged with `subject_name`); the text is then shown but not
    /// sent. Without files the text goes to the chat endpoint.
    pub fn begin_send(
        &mut self,
        text: &str,
        files: &[Attachment],
        tracker: &mut FileTracker,
        subject_name: Option<&str>,
    ) -> SendPlan {
        let has_text = !text.trim().is_empty();
        if !has_text && files.is_empty() {
            return SendPlan::Empty;
        }
        let Some(conversation_id) = self.conversation_id.clone() else {
            self.messages.push(ChatMessage::bot(NO_CONVERSATION_WARNING));
            return SendPlan::NoConversation;
        };
        if self.pending {
            tracing::debug!("chat request already pending; ignoring send");
            return SendPlan::Busy;
        }

        tracker.add_files(files, FileSource::Chat);
        self.messages
            .extend(files.iter().cloned().map(ChatMessage::user_file));
        if has_text {
            self.messages.push(ChatMessage::user_text(text));
        }

        let request = match files.first() {
            Some(file) => {
                if files.len() > 1 {
                    tracing::debug!(
                        skipped = files.len() - 1,
                        "only the first attachment is uploaded"
                    );
                }
                TutorRequest::Flashcards {
                    file: file.clone(),
                    subject: subject_name.map(ToOwned::to_owned),
                }
            }
            None => TutorRequest::Chat {
                student_id: self.student_id.clone(),
                conversation_id,
                message: text.to_owned(),
            },
        };

        self.pending = true;
        SendPlan::Dispatch(PendingRequest {
            generation: self.generation,
            request,
        })
    }

    /// Appends the bot reply for `request`.
    ///
    /// Returns the generated flashcards, or `None` when the conversation changed since the
    /// request was planned (the reply is dropped).
    pub fn complete(
        &mut self,
        request: &PendingRequest,
        result: Result<TutorResponse, ApiError>,
    ) -> Option<Vec<Flashcard>> {
        if request.generation != self.generation {
            tracing::debug!(
                request_generation = request.generation,
                generation = self.generation,
                "dropping reply for a previous conversation"
            );
            return None;
        }
        self.pending = false;

        let (reply, flashcards) = match result {
            Ok(TutorResponse::Chat(response)) => (
                response
                    .reply
                    .unwrap_or_else(|| NO_RESPONSE_REPLY.to_owned()),
                Vec::new(),
            ),
            Ok(TutorResponse::Flashcards(response)) if response.is_ok() => (
                flashcards_generated_reply(response.flashcards.len()),
                response.cards(request.subject()),
            ),
            Ok(TutorResponse::Flashcards(_)) => (FLASHCARDS_FAILED_REPLY.to_owned(), Vec::new()),
            Err(err) => {
                tracing::warn!(error = %err, "tutor request failed");
                (TRANSPORT_ERROR_REPLY.to_owned(), Vec::new())
            }
        };
        self.messages.push(ChatMessage::bot(reply));
        Some(flashcards)
    }

    /// Plans, dispatches and completes a send in one go.
    pub async fn send<B>(
        &mut self,
        backend: &B,
        text: &str,
        files: &[Attachment],
        tracker: &mut FileTracker,
        subject_name: Option<&str>,
    ) -> SendOutcome
    where
        B: TutorBackend + ?Sized,
    {
        let pending = match self.begin_send(text, files, tracker, subject_name) {
            SendPlan::Empty => return SendOutcome::Empty,
            SendPlan::NoConversation => return SendOutcome::NoConversation,
            SendPlan::Busy => return SendOutcome::Busy,
            SendPlan::Dispatch(pending) => pending,
        };
        let result = backend.dispatch(pending.request()).await;
        SendOutcome::Completed {
            flashcards: self.complete(&pending, result).unwrap_or_default(),
        }
    }
}
