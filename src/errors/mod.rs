// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Error log view: entries fetched from the tutor service, filtered for review.

use std::fmt;

use crate::api::{ApiError, ErrorsResponse, TutorBackend};
use crate::model::{ErrorEntry, Severity};

/// Number of entries the `Recent` filter shows.
pub const RECENT_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorFilter {
    #[default]
    All,
    High,
    Recent,
}

impl ErrorFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::High, Self::Recent];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::High => "High",
            Self::Recent => "Recent",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::High,
            Self::High => Self::Recent,
            Self::Recent => Self::All,
        }
    }
}

impl fmt::Display for ErrorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorStats {
    pub total: usize,
    pub high_severity: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
    loading: bool,
    filter: ErrorFilter,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter(&self) -> ErrorFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: ErrorFilter) {
        self.filter = filter;
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Applies a fetch result. Failures and non-`ok` statuses both leave the log empty.
    pub fn finish_load(&mut self, result: Result<ErrorsResponse, ApiError>) {
        self.loading = false;
        self.entries = match result {
            Ok(response) => response.into_entries(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load error log");
                Vec::new()
            }
        };
    }

    pub async fn reload<B>(&mut self, backend: &B)
    where
        B: TutorBackend + ?Sized,
    {
        self.begin_load();
        let result = backend.fetch_errors().await;
        self.finish_load(result);
    }

    pub fn visible(&self) -> Vec<&ErrorEntry> {
        match self.filter {
            ErrorFilter::All => self.entries.iter().collect(),
            ErrorFilter::High => self
                .entries
                .iter()
                .filter(|entry| entry.severity == Severity::High)
                .collect(),
            ErrorFilter::Recent => self.entries.iter().take(RECENT_LIMIT).collect(),
        }
    }

    pub fn stats(&self) -> ErrorStats {
        ErrorStats {
            total: self.entries.len(),
            high_severity: self
                .entries
                .iter()
                .filter(|entry| entry.severity == Severity::High)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{ErrorFilter, ErrorLog, ErrorStats};
    use crate::api::{ApiError, ErrorsResponse};
    use crate::model::Severity;

    fn response(rows: usize) -> ErrorsResponse {
        let errors: Vec<_> = (0..rows)
            .map(|i| json!({"topic": format!("t{i}"), "question": format!("q{i}")}))
            .collect();
        serde_json::from_value(json!({"status": "ok", "errors": errors})).unwrap()
    }

    fn loaded(rows: usize) -> ErrorLog {
        let mut log = ErrorLog::new();
        log.begin_load();
        log.finish_load(Ok(response(rows)));
        log
    }

    #[test]
    fn loading_flag_tracks_fetch() {
        let mut log = ErrorLog::new();
        log.begin_load();
        assert!(log.is_loading());
        log.finish_load(Ok(response(1)));
        assert!(!log.is_loading());
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn failure_empties_the_log() {
        let mut log = loaded(3);
        log.finish_load(Err(ApiError::Status {
            url: "http://tutor.test/api/errors".to_owned(),
            status: 503,
        }));
        assert!(log.entries().is_empty());
        assert_eq!(log.stats(), ErrorStats::default());
    }

    #[rstest]
    #[case(ErrorFilter::All, 3)]
    #[case(ErrorFilter::High, 0)]
    #[case(ErrorFilter::Recent, 2)]
    fn filters_select_expected_rows(#[case] filter: ErrorFilter, #[case] expected: usize) {
        let mut log = loaded(3);
        log.set_filter(filter);
        assert_eq!(log.visible().len(), expected);
    }

    #[test]
    fn recent_keeps_service_order() {
        let mut log = loaded(4);
        log.set_filter(ErrorFilter::Recent);
        let ids: Vec<usize> = log.visible().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn stats_count_high_severity() {
        let log = loaded(2);
        assert_eq!(
            log.stats(),
            ErrorStats {
                total: 2,
                high_severity: 0
            }
        );
        assert!(log.entries().iter().all(|e| e.severity == Severity::Medium));
    }

    #[test]
    fn filter_cycles_through_all_variants() {
        let mut log = ErrorLog::new();
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(log.filter());
            log.cycle_filter();
        }
        assert_eq!(seen, ErrorFilter::ALL.to_vec());
        assert_eq!(log.filter(), ErrorFilter::All);
    }
}
