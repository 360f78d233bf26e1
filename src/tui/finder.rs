// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fuzzy topic finder.

use crate::model::{Subject, SubjectId, TopicId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TopicCandidate {
    pub(crate) subject_id: SubjectId,
    pub(crate) topic_id: TopicId,
    pub(crate) label: String,
    haystack: String,
}

pub(crate) fn topic_candidates(subjects: &[Subject]) -> Vec<TopicCandidate> {
    let mut candidates = Vec::new();
    for subject in subjects {
        for topic in subject.topics() {
            let label = format!("{} / {}", subject.name(), topic.name());
            let haystack = format!("{} {} {}", label, subject.id(), topic.id()).to_lowercase();
            candidates.push(TopicCandidate {
                subject_id: subject.id().clone(),
                topic_id: topic.id().clone(),
                label,
                haystack,
            });
        }
    }
    candidates
}

/// Candidate indices ordered best match first. An empty query keeps tree order.
pub(crate) fn ranked_topics(candidates: &[TopicCandidate], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return (0..candidates.len()).collect();
    }

    let mut scored: Vec<(i64, usize)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(idx, candidate)| {
            fuzzy_score(&needle, &candidate.haystack).map(|score| (score, idx))
        })
        .collect();
    scored.sort_by(|(score_a, idx_a), (score_b, idx_b)| {
        score_b
            .cmp(score_a)
            .then_with(|| candidates[*idx_a].label.cmp(&candidates[*idx_b].label))
    });
    scored.into_iter().map(|(_, idx)| idx).collect()
}

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());

    let mut score = (ratio * 1000.0).round() as i64;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    }
    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last = 0usize;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0usize;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | '_' | ' ' | '-')
}
