// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! TutorGPT terminal client.
//!
//! Subjects and topics are stored locally; chat, flashcard generation and the error log talk to
//! the remote tutor service over HTTP.

pub mod api;
pub mod chat;
pub mod config;
pub mod errors;
pub mod files;
pub mod flashcards;
pub mod logging;
pub mod model;
pub mod store;
pub mod subjects;
pub mod tui;
