// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tutor backend client.
//!
//! [`TutorBackend`] is the seam between the chat controller and the network; [`HttpTutorClient`]
//! is the real implementation speaking multipart forms to the tutor service.

use std::path::PathBuf;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Attachment, ConversationId, ErrorEntry, Flashcard, Severity};

mod http;

pub use http::{HttpTutorClient, DEFAULT_TIMEOUT};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const CHAT_PATH: &str = "/api/tutor/chat";
pub const FLASHCARDS_PATH: &str = "/api/flashcards/generate";
pub const ERRORS_PATH: &str = "/api/errors";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
    #[error("could not read attachment {path:?}: {source}")]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("attachment {name:?} is remote and cannot be uploaded")]
    RemoteAttachment { name: String },
    #[error("invalid mime type {mime:?}: {source}")]
    Mime { mime: String, source: reqwest::Error },
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
}

/// `POST /api/tutor/chat` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
}

/// `POST /api/flashcards/generate` response.
///
/// Only `status` and the number of cards matter for the chat reply; cards with a recognised
/// shape are parsed for review. An `ok` response must carry a `flashcards` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawFlashcardsResponse")]
pub struct FlashcardsResponse {
    pub status: String,
    pub flashcards: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawFlashcardsResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    flashcards: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Error)]
#[error("flashcards response has status \"ok\" but no flashcards array")]
pub struct MissingFlashcardsError;

impl TryFrom<RawFlashcardsResponse> for FlashcardsResponse {
    type Error = MissingFlashcardsError;

    fn try_from(raw: RawFlashcardsResponse) -> Result<Self, Self::Error> {
        match (raw.status.as_str(), raw.flashcards) {
            ("ok", None) => Err(MissingFlashcardsError),
            (_, flashcards) => Ok(Self {
                status: raw.status,
                flashcards: flashcards.unwrap_or_default(),
            }),
        }
    }
}

impl FlashcardsResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Cards shaped `{term, definition}` (or `{question, answer}`); anything else is skipped.
    pub fn cards(&self, subject: Option<&str>) -> Vec<Flashcard> {
        self.flashcards
            .iter()
            .filter_map(|value| {
                let question = value
                    .get("term")
                    .or_else(|| value.get("question"))?
                    .as_str()?;
                let answer = value
                    .get("definition")
                    .or_else(|| value.get("answer"))?
                    .as_str()?;
                let card = Flashcard::new(question, answer);
                Some(match subject {
                    Some(subject) => card.with_subject(subject),
                    None => card,
                })
            })
            .collect()
    }
}

/// `GET /api/errors` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub errors: Vec<ErrorRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub topic: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub answer: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub feedback: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
}

/// Accepts null, strings, and scalars (rendered as text) for columns the service may omit.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

impl ErrorsResponse {
    /// Maps rows to entries; any status other than `ok` yields nothing.
    pub fn into_entries(self) -> Vec<ErrorEntry> {
        if self.status != "ok" {
            return Vec::new();
        }
        self.errors
            .into_iter()
            .enumerate()
            .map(|(index, row)| ErrorEntry {
                id: index + 1,
                subject: String::new(),
                topic: row.topic,
                question: row.question,
                mistake: row.answer,
                suggestion: row.feedback,
                date: row.date,
                severity: Severity::default(),
            })
            .collect()
    }
}

/// A single outbound call planned by the chat controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorRequest {
    Chat {
        student_id: String,
        conversation_id: ConversationId,
        message: String,
    },
    Flashcards {
        file: Attachment,
        subject: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TutorResponse {
    Chat(ChatResponse),
    Flashcards(FlashcardsResponse),
}

#[async_trait]
pub trait TutorBackend: Send + Sync {
    async fn chat(
        &self,
        student_id: &str,
        conversation_id: &ConversationId,
        message: &str,
    ) -> Result<ChatResponse, ApiError>;

    async fn generate_flashcards(
        &self,
        file: &Attachment,
        subject: Option<&str>,
    ) -> Result<FlashcardsResponse, ApiError>;

    async fn fetch_errors(&self) -> Result<ErrorsResponse, ApiError>;

    /// Runs whichever call `request` describes.
    async fn dispatch(&self, request: &TutorRequest) -> Result<TutorResponse, ApiError> {
        match request {
            TutorRequest::Chat {
                student_id,
                conversation_id,
                message,
            } => self
                .chat(student_id, conversation_id, message)
                .await
                .map(TutorResponse::Chat),
            TutorRequest::Flashcards { file, subject } => self
                .generate_flashcards(file, subject.as_deref())
                .await
                .map(TutorResponse::Flashcards),
        }
    }
}

/// Inputs for picking the service base URL; see [`resolve_base_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrlSource<'a> {
    pub explicit: Option<&'a str>,
    pub origin: Option<&'a str>,
}

/// Resolves the service base URL.
///
/// An explicit URL wins. Otherwise a `github.dev` origin is mapped to the forwarded port 5000 by
/// rewriting the first `-8080.` in its host. Everything else falls back to
/// [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(source: BaseUrlSource<'_>) -> String {
    if let Some(explicit) = source.explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return explicit.trim_end_matches('/').to_owned();
    }
    source
        .origin
        .and_then(codespace_base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
}

fn codespace_base_url(origin: &str) -> Option<String> {
    static PORT_SEGMENT: OnceLock<Regex> = OnceLock::new();

    let url = reqwest::Url::parse(origin.trim()).ok()?;
    let host = url.host_str()?;
    if !host.contains("github.dev") {
        return None;
    }
    let port_segment =
        PORT_SEGMENT.get_or_init(|| Regex::new(r"-8080\.").expect("port segment regex is valid"));
    let host = port_segment.replace(host, "-5000.");
    Some(format!("{}://{host}", url.scheme()))
}

/// Builds the forwarded-port origin a codespace exposes for port 8080, if the environment
/// describes one.
pub fn codespace_origin(name: Option<&str>, forwarding_domain: Option<&str>) -> Option<String> {
    let name = name.map(str::trim).filter(|s| !s.is_empty())?;
    let domain = forwarding_domain.map(str::trim).filter(|s| !s.is_empty())?;
    Some(format!("https://{name}-8080.{domain}"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{
        codespace_origin, resolve_base_url, BaseUrlSource, ErrorsResponse, FlashcardsResponse,
        DEFAULT_BASE_URL,
    };
    use crate::model::Severity;

    #[rstest]
    #[case(None, None, DEFAULT_BASE_URL)]
    #[case(Some("http://tutor.local:9000/"), None, "http://tutor.local:9000")]
    #[case(
        Some("http://explicit"),
        Some("https://x-8080.app.github.dev"),
        "http://explicit"
    )]
    #[case(
        None,
        Some("https://fluffy-8080.app.github.dev/chat?x=1"),
        "https://fluffy-5000.app.github.dev"
    )]
    #[case(None, Some("https://a-8080.b-8080.github.dev"), "https://a-5000.b-8080.github.dev")]
    #[case(None, Some("https://fluffy-3000.app.github.dev"), "https://fluffy-3000.app.github.dev")]
    #[case(None, Some("http://localhost:8080"), DEFAULT_BASE_URL)]
    #[case(None, Some("not a url"), DEFAULT_BASE_URL)]
    #[case(Some("  "), None, DEFAULT_BASE_URL)]
    fn resolves_base_url(
        #[case] explicit: Option<&str>,
        #[case] origin: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(
            resolve_base_url(BaseUrlSource { explicit, origin }),
            expected
        );
    }

    #[test]
    fn codespace_origin_needs_both_parts() {
        assert_eq!(
            codespace_origin(Some("fluffy"), Some("app.github.dev")).as_deref(),
            Some("https://fluffy-8080.app.github.dev")
        );
        assert_eq!(codespace_origin(Some("fluffy"), None), None);
        assert_eq!(codespace_origin(Some(""), Some("app.github.dev")), None);
    }

    #[test]
    fn flashcard_cards_parse_known_shapes_and_skip_others() {
        let response: FlashcardsResponse = serde_json::from_value(json!({
            "status": "ok",
            "flashcards": [
                {"term": "Mitosis", "definition": "Cell division", "page": 3},
                {"question": "2+2", "answer": "4"},
                {"unexpected": true},
                "just text"
            ]
        }))
        .unwrap();

        assert!(response.is_ok());
        assert_eq!(response.flashcards.len(), 4);
        let cards = response.cards(Some("Biology"));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question(), "Mitosis");
        assert_eq!(cards[0].answer(), "Cell division");
        assert_eq!(cards[0].subject(), Some("Biology"));
        assert_eq!(cards[1].question(), "2+2");
    }

    #[rstest]
    #[case(json!({"status": "ok"}), false)]
    #[case(json!({"status": "ok", "flashcards": []}), true)]
    #[case(json!({"status": "failed"}), true)]
    #[case(json!({"detail": "subject missing"}), true)]
    fn ok_flashcards_response_needs_an_array(
        #[case] body: serde_json::Value,
        #[case] decodes: bool,
    ) {
        let result = serde_json::from_value::<FlashcardsResponse>(body);
        assert_eq!(result.is_ok(), decodes, "got {result:?}");
    }

    #[test]
    fn error_rows_map_with_defaults() {
        let response: ErrorsResponse = serde_json::from_value(json!({
            "status": "ok",
            "errors": [
                {"topic": "Cells", "question": "What is ATP?", "answer": "A protein",
                 "feedback": "ATP is a nucleotide", "date": "2025-01-01", "score": 0.2},
                {"topic": null, "question": "Q2"}
            ]
        }))
        .unwrap();

        let entries = response.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].subject, "");
        assert_eq!(entries[0].mistake, "A protein");
        assert_eq!(entries[0].suggestion, "ATP is a nucleotide");
        assert_eq!(entries[0].severity, Severity::Medium);
        assert_eq!(entries[1].id, 2);
        assert_eq!(entries[1].topic, "");
        assert_eq!(entries[1].date, "");
    }

    #[test]
    fn non_ok_error_status_yields_nothing() {
        let response: ErrorsResponse = serde_json::from_value(json!({
            "status": "no_db",
            "errors": [{"topic": "Cells"}]
        }))
        .unwrap();
        assert!(response.into_entries().is_empty());
    }
}
