// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::Cell;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::{Outcome, SelectionError, SubjectStore};
use crate::model::{Material, MaterialId, Selection, Subject, SubjectId, TopicId};
use crate::store::{
    default_subjects, KeyValueStore, LocalPersistence, MemoryStorage, PersistedState, StatePort,
    StoreError, SELECTED_SUBJECT_KEY, SELECTED_TOPIC_KEY, SUBJECTS_KEY,
};

struct Ctx {
    storage: MemoryStorage,
    store: SubjectStore<LocalPersistence<MemoryStorage>>,
}

impl Ctx {
    fn reopen(&self) -> SubjectStore<LocalPersistence<MemoryStorage>> {
        SubjectStore::open(LocalPersistence::new(self.storage.clone()))
    }
}

#[fixture]
fn ctx() -> Ctx {
    let storage = MemoryStorage::new();
    let store = SubjectStore::open(LocalPersistence::new(storage.clone()));
    Ctx { storage, store }
}

fn material(id: &str) -> Material {
    Material::new(MaterialId::new(id).unwrap(), format!("{id}.pdf"), Utc::now())
}

fn topic_ids(store: &SubjectStore<LocalPersistence<MemoryStorage>>, subject_id: &str) -> Vec<String> {
    store
        .subject(subject_id)
        .expect("subject")
        .topics()
        .iter()
        .map(|t| t.id().to_string())
        .collect()
}

fn material_ids(
    store: &SubjectStore<LocalPersistence<MemoryStorage>>,
    subject_id: &str,
    topic_id: &str,
) -> Vec<String> {
    store
        .subject(subject_id)
        .and_then(|s| s.topic(topic_id))
        .expect("topic")
        .materials()
        .iter()
        .map(|m| m.id().to_string())
        .collect()
}

#[rstest]
fn opens_with_seed_subjects_and_writes_nothing(ctx: Ctx) {
    let names: Vec<&str> = ctx.store.subjects().iter().map(Subject::name).collect();
    assert_eq!(names, vec!["Biology", "Math"]);
    for subject in ctx.store.subjects() {
        assert_eq!(topic_ids(&ctx.store, subject.id().as_str()), vec!["general"]);
    }
    assert!(ctx.storage.entries().is_empty());
}

#[rstest]
fn world_history_scenario(mut ctx: Ctx) {
    assert_eq!(ctx.store.add_subject("World History").unwrap(), Outcome::Applied);
    assert_eq!(ctx.store.subjects().len(), 3);

    assert_eq!(
        ctx.store.add_topic("world_history", "Wars").unwrap(),
        Outcome::Applied
    );
    let subject = ctx.store.subject("world_history").expect("subject");
    assert_eq!(subject.name(), "World History");
    let wars = subject.topic("wars").expect("wars topic");
    assert_eq!(wars.name(), "Wars");
    assert_eq!(wars.conversation_id().as_str(), "world_history_wars");
    assert!(wars.materials().is_empty());
}

#[rstest]
fn add_subject_is_idempotent_by_slug(mut ctx: Ctx) {
    assert!(ctx.store.add_subject("Organic Chemistry").unwrap().is_applied());
    assert_eq!(
        ctx.store.add_subject("organic   chemistry").unwrap(),
        Outcome::Ignored
    );
    let matching = ctx
        .store
        .subjects()
        .iter()
        .filter(|s| s.id() == "organic_chemistry")
        .count();
    assert_eq!(matching, 1);
    assert_eq!(
        ctx.store.subject("organic_chemistry").unwrap().name(),
        "Organic Chemistry"
    );
}

#[rstest]
fn add_subject_ignores_empty_name(mut ctx: Ctx) {
    assert_eq!(ctx.store.add_subject("").unwrap(), Outcome::Ignored);
    assert_eq!(ctx.store.subjects().len(), 2);
}

#[rstest]
fn add_topic_ignores_unknown_subject_and_duplicates(mut ctx: Ctx) {
    assert_eq!(ctx.store.add_topic("chemistry", "Acids").unwrap(), Outcome::Ignored);
    assert!(ctx.store.add_topic("math", "Linear Algebra").unwrap().is_applied());
    assert_eq!(
        ctx.store.add_topic("math", "linear algebra").unwrap(),
        Outcome::Ignored
    );
    assert_eq!(ctx.store.add_topic("math", "General").unwrap(), Outcome::Ignored);
    assert_eq!(topic_ids(&ctx.store, "math"), vec!["general", "linear_algebra"]);
}

#[rstest]
fn remove_general_topic_is_always_refused(mut ctx: Ctx) {
    ctx.store.add_topic("math", "Calculus").unwrap();
    ctx.store.select_topic("math", "general").unwrap();

    assert_eq!(ctx.store.remove_topic("math", "general").unwrap(), Outcome::Ignored);
    assert_eq!(ctx.store.remove_topic("nope", "general").unwrap(), Outcome::Ignored);
    assert_eq!(topic_ids(&ctx.store, "math"), vec!["general", "calculus"]);
    assert!(ctx.store.selected_topic_data().is_some());
}

#[rstest]
fn remove_selected_topic_clears_only_topic_half(mut ctx: Ctx) {
    ctx.store.add_topic("math", "Calculus").unwrap();
    ctx.store.select_topic("math", "calculus").unwrap();

    assert!(ctx.store.remove_topic("math", "calculus").unwrap().is_applied());
    assert_eq!(ctx.store.selection().subject_id().map(|s| s.as_str()), Some("math"));
    assert_eq!(ctx.store.selection().topic_id(), None);

    let entries = ctx.storage.entries();
    assert_eq!(entries.get(SELECTED_SUBJECT_KEY).map(String::as_str), Some("math"));
    assert!(!entries.contains_key(SELECTED_TOPIC_KEY));
}

#[rstest]
fn remove_unselected_topic_keeps_selection(mut ctx: Ctx) {
    ctx.store.add_topic("math", "Calculus").unwrap();
    ctx.store.add_topic("math", "Geometry").unwrap();
    ctx.store.select_topic("math", "geometry").unwrap();

    ctx.store.remove_topic("math", "calculus").unwrap();
    let selected = ctx.store.selected_topic_data().expect("still selected");
    assert_eq!(selected.topic.id().as_str(), "geometry");
}

#[rstest]
fn remove_selected_subject_clears_both_halves(mut ctx: Ctx) {
    ctx.store.add_topic("biology", "Cells").unwrap();
    ctx.store.add_material("biology", "cells", material("m1")).unwrap();
    ctx.store.select_topic("biology", "cells").unwrap();

    assert!(ctx.store.remove_subject("biology").unwrap().is_applied());
    assert!(ctx.store.subject("biology").is_none());
    assert!(ctx.store.selection().is_empty());

    let entries = ctx.storage.entries();
    assert!(!entries.contains_key(SELECTED_SUBJECT_KEY));
    assert!(!entries.contains_key(SELECTED_TOPIC_KEY));
    assert!(!entries[SUBJECTS_KEY].contains("biology"));
}

#[rstest]
fn remove_other_subject_keeps_selection(mut ctx: Ctx) {
    ctx.store.select_topic("math", "general").unwrap();
    ctx.store.remove_subject("biology").unwrap();
    assert_eq!(
        ctx.store.selection(),
        &Selection::new(
            Some(SubjectId::new("math").unwrap()),
            Some(TopicId::new("general").unwrap())
        )
    );
    assert_eq!(ctx.store.remove_subject("biology").unwrap(), Outcome::Ignored);
}

#[rstest]
fn add_material_mirrors_into_general(mut ctx: Ctx) {
    ctx.store.add_topic("biology", "Cells").unwrap();
    let m = material("m1");

    assert!(ctx.store.add_material("biology", "cells", m.clone()).unwrap().is_applied());
    assert_eq!(material_ids(&ctx.store, "biology", "cells"), vec!["m1"]);
    assert_eq!(material_ids(&ctx.store, "biology", "general"), vec!["m1"]);

    assert!(ctx.store.remove_material("biology", "cells", "m1").unwrap().is_applied());
    assert!(material_ids(&ctx.store, "biology", "cells").is_empty());
    assert_eq!(material_ids(&ctx.store, "biology", "general"), vec!["m1"]);

    // Re-adding only lands in the topic; general already has it.
    assert!(ctx.store.add_material("biology", "cells", m).unwrap().is_applied());
    assert_eq!(material_ids(&ctx.store, "biology", "general"), vec!["m1"]);
}

#[rstest]
fn add_material_to_general_does_not_duplicate(mut ctx: Ctx) {
    assert!(ctx.store.add_material("math", "general", material("m1")).unwrap().is_applied());
    assert_eq!(
        ctx.store.add_material("math", "general", material("m1")).unwrap(),
        Outcome::Ignored
    );
    assert_eq!(material_ids(&ctx.store, "math", "general"), vec!["m1"]);
}

#[rstest]
fn add_material_ignores_unknown_targets(mut ctx: Ctx) {
    assert_eq!(
        ctx.store.add_material("chemistry", "general", material("m1")).unwrap(),
        Outcome::Ignored
    );
    assert_eq!(
        ctx.store.add_material("math", "calculus", material("m1")).unwrap(),
        Outcome::Ignored
    );
    assert!(material_ids(&ctx.store, "math", "general").is_empty());
}

#[rstest]
fn remove_material_from_general_leaves_topic_copy(mut ctx: Ctx) {
    ctx.store.add_topic("math", "Calculus").unwrap();
    ctx.store.add_material("math", "calculus", material("m1")).unwrap();
    ctx.store.remove_material("math", "general", "m1").unwrap();
    assert_eq!(material_ids(&ctx.store, "math", "calculus"), vec!["m1"]);
    assert!(material_ids(&ctx.store, "math", "general").is_empty());
    assert_eq!(
        ctx.store.remove_material("math", "general", "m1").unwrap(),
        Outcome::Ignored
    );
}

#[rstest]
fn select_topic_does_not_validate_and_lookups_tolerate_staleness(mut ctx: Ctx) {
    assert!(ctx.store.select_topic("physics", "optics").unwrap().is_applied());
    assert_eq!(
        ctx.store.selection().subject_id().map(|s| s.as_str()),
        Some("physics")
    );
    assert!(ctx.store.selected_subject_data().is_none());
    assert!(ctx.store.selected_topic_data().is_none());
    assert!(ctx.store.active_conversation_id().is_none());
}

#[rstest]
fn selected_topic_data_resolves_live_pair(mut ctx: Ctx) {
    ctx.store.add_topic("math", "Calculus").unwrap();
    ctx.store.select_topic("math", "calculus").unwrap();

    let selected = ctx.store.selected_topic_data().expect("selected");
    assert_eq!(selected.subject.id().as_str(), "math");
    assert_eq!(selected.topic.id().as_str(), "calculus");
    assert_eq!(
        ctx.store.active_conversation_id().map(|c| c.as_str()),
        Some("math_calculus")
    );
}

#[rstest]
fn selected_topic_data_goes_stale_when_subject_removed_elsewhere(mut ctx: Ctx) {
    ctx.store.select_topic("math", "general").unwrap();
    ctx.store.select_topic("biology", "general").unwrap();
    ctx.store.remove_subject("math").unwrap();
    assert!(ctx.store.selected_topic_data().is_some());

    ctx.store.remove_subject("biology").unwrap();
    assert!(ctx.store.selected_topic_data().is_none());
}

#[rstest]
fn select_existing_topic_rejects_unknown_pairs(mut ctx: Ctx) {
    ctx.store.select_topic("math", "general").unwrap();

    let err = ctx.store.select_existing_topic("physics", "general").unwrap_err();
    assert!(matches!(err, SelectionError::UnknownSubject { .. }));
    let err = ctx.store.select_existing_topic("math", "calculus").unwrap_err();
    assert!(matches!(err, SelectionError::UnknownTopic { .. }));
    assert_eq!(
        ctx.store.selection().subject_id().map(|s| s.as_str()),
        Some("math")
    );

    assert!(ctx
        .store
        .select_existing_topic("biology", "general")
        .unwrap()
        .is_applied());
}

#[rstest]
fn clear_selection_removes_both_keys(mut ctx: Ctx) {
    assert_eq!(ctx.store.clear_selection().unwrap(), Outcome::Ignored);
    ctx.store.select_topic("math", "general").unwrap();
    assert!(ctx.store.clear_selection().unwrap().is_applied());
    assert!(ctx.storage.entries().is_empty());
}

#[rstest]
fn state_survives_reopen(mut ctx: Ctx) {
    ctx.store.add_subject("World History").unwrap();
    ctx.store.add_topic("world_history", "Wars").unwrap();
    ctx.store.add_material("world_history", "wars", material("m1")).unwrap();
    ctx.store.select_topic("world_history", "wars").unwrap();

    let reopened = ctx.reopen();
    assert_eq!(reopened.subjects(), ctx.store.subjects());
    assert_eq!(reopened.selection(), ctx.store.selection());
    assert_eq!(
        reopened.active_conversation_id().map(|c| c.as_str()),
        Some("world_history_wars")
    );
}

#[rstest]
fn malformed_storage_is_not_rewritten_until_next_mutation(ctx: Ctx) {
    ctx.storage.set(SUBJECTS_KEY, "[{").unwrap();
    let mut store = ctx.reopen();
    assert_eq!(store.subjects(), default_subjects().as_slice());
    assert_eq!(ctx.storage.entries()[SUBJECTS_KEY], "[{");

    store.add_subject("Art").unwrap();
    assert!(ctx.storage.entries()[SUBJECTS_KEY].contains("\"art\""));
}

struct FailingPort {
    subject_writes: Cell<usize>,
}

impl StatePort for FailingPort {
    fn load(&self) -> PersistedState {
        PersistedState {
            subjects: default_subjects(),
            selection: Selection::default(),
        }
    }

    fn save_subjects(&self, _subjects: &[Subject]) -> Result<(), StoreError> {
        self.subject_writes.set(self.subject_writes.get() + 1);
        Err(StoreError::InvalidKey {
            key: "read-only".to_owned(),
        })
    }

    fn save_selected_subject(&self, _subject_id: Option<&SubjectId>) -> Result<(), StoreError> {
        Ok(())
    }

    fn save_selected_topic(&self, _topic_id: Option<&TopicId>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[test]
fn failed_write_through_keeps_in_memory_change() {
    let mut store = SubjectStore::open(FailingPort {
        subject_writes: Cell::new(0),
    });

    let err = store.add_subject("Art").unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey { .. }));
    assert!(store.subject("art").is_some());
    assert_eq!(store.port().subject_writes.get(), 1);
}
