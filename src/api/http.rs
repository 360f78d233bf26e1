// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::{
    ApiError, ChatResponse, ErrorsResponse, FlashcardsResponse, TutorBackend, CHAT_PATH,
    ERRORS_PATH, FLASHCARDS_PATH,
};
use crate::model::{Attachment, ConversationId, FileHandle};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// [`TutorBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTutorClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTutorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn file_part(file: &Attachment) -> Result<Part, ApiError> {
        let bytes = match file.handle() {
            FileHandle::Local(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| ApiError::Attachment {
                        path: path.clone(),
                        source,
                    })?
            }
            FileHandle::Inline(bytes) => bytes.to_vec(),
            FileHandle::Remote(_) => {
                return Err(ApiError::RemoteAttachment {
                    name: file.name().to_owned(),
                })
            }
        };

        let part = Part::bytes(bytes).file_name(file.name().to_owned());
        match file.mime() {
            Some(mime) => part.mime_str(mime).map_err(|source| ApiError::Mime {
                mime: mime.to_owned(),
                source,
            }),
            None => Ok(part),
        }
    }

    /// Decodes the body whatever the status; a non-2xx status only fails when the body does
    /// not decode.
    async fn read_json<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_owned(),
                source,
            })?;
        match serde_json::from_slice(&body) {
            Ok(value) => {
                if !status.is_success() {
                    tracing::warn!(
                        %url,
                        status = status.as_u16(),
                        "tutor answered with an error status"
                    );
                }
                Ok(value)
            }
            Err(_) if !status.is_success() => Err(ApiError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            }),
            Err(source) => Err(ApiError::Decode {
                url: url.to_owned(),
                source,
            }),
        }
    }
}

#[async_trait]
impl TutorBackend for HttpTutorClient {
    async fn chat(
        &self,
        student_id: &str,
        conversation_id: &ConversationId,
        message: &str,
    ) -> Result<ChatResponse, ApiError> {
        let url = self.url(CHAT_PATH);
        tracing::info!(%url, conversation_id = %conversation_id, "sending chat message");
        let form = Form::new()
            .text("student_id", student_id.to_owned())
            .text("conversation_id", conversation_id.to_string())
            .text("message", message.to_owned());
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::read_json(&url, response).await
    }

    async fn generate_flashcards(
        &self,
        file: &Attachment,
        subject: Option<&str>,
    ) -> Result<FlashcardsResponse, ApiError> {
        let url = self.url(FLASHCARDS_PATH);
        tracing::info!(%url, file = file.name(), subject, "requesting flashcards");
        let mut form = Form::new().part("file", Self::file_part(file).await?);
        if let Some(subject) = subject {
            form = form.text("subject", subject.to_owned());
        }
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::read_json(&url, response).await
    }

    async fn fetch_errors(&self) -> Result<ErrorsResponse, ApiError> {
        let url = self.url(ERRORS_PATH);
        tracing::info!(%url, "fetching error log");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::read_json(&url, response).await
    }
}
