// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! A single-threaded event loop owns every store. Network calls are spawned on the tokio runtime
//! and their results come back over a channel that is drained once per tick.

use std::{
    error::Error,
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use tokio::{runtime::Handle, sync::mpsc};

use crate::api::{ApiError, ErrorsResponse, TutorBackend, TutorResponse};
use crate::chat::{ChatSession, PendingRequest, SendPlan};
use crate::errors::ErrorLog;
use crate::files::FileTracker;
use crate::flashcards::FlashcardDeck;
use crate::model::{
    Attachment, FileSource, Material, MaterialId, MessageRole, SubjectId, TopicId,
    GENERAL_TOPIC_ID,
};
use crate::store::{StatePort, StoreError};
use crate::subjects::{Outcome, SubjectStore};

mod finder;
mod theme;

pub use theme::ThemeError;

use finder::{ranked_topics, topic_candidates, TopicCandidate};
use theme::TuiTheme;

const TICK: Duration = Duration::from_millis(250);
const TOAST_TTL: Duration = Duration::from_secs(3);
const FOOTER_BRAND: &str = "TutorGPT";
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Runs the interactive terminal UI until the user quits.
pub fn run<P: StatePort>(
    subjects: SubjectStore<P>,
    chat: ChatSession,
    backend: Arc<dyn TutorBackend>,
    runtime: Handle,
) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(subjects, chat, theme);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<JobResult>();

    while !app.should_quit {
        while let Ok(done) = done_rx.try_recv() {
            app.apply_job_result(done);
        }
        for job in app.take_jobs() {
            spawn_job(&runtime, Arc::clone(&backend), done_tx.clone(), job);
        }
        app.expire_toast(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
        app.tick = app.tick.wrapping_add(1);
    }

    Ok(())
}

fn spawn_job(
    runtime: &Handle,
    backend: Arc<dyn TutorBackend>,
    done_tx: mpsc::UnboundedSender<JobResult>,
    job: Job,
) {
    runtime.spawn(async move {
        let done = match job {
            Job::Tutor(pending) => {
                let result = backend.dispatch(pending.request()).await;
                JobResult::Tutor { pending, result }
            }
            Job::LoadErrors => JobResult::Errors(backend.fetch_errors().await),
        };
        // The receiver is gone only once the UI has quit.
        let _ = done_tx.send(done);
    });
}

/// Work for the runtime, queued by key handlers.
#[derive(Debug)]
enum Job {
    Tutor(PendingRequest),
    LoadErrors,
}

#[derive(Debug)]
enum JobResult {
    Tutor {
        pending: PendingRequest,
        result: Result<TutorResponse, ApiError>,
    },
    Errors(Result<ErrorsResponse, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Tutor,
    Flashcards,
    Errors,
}

impl Tab {
    const ALL: [Self; 3] = [Self::Tutor, Self::Flashcards, Self::Errors];

    fn title(self) -> &'static str {
        match self {
            Self::Tutor => "Tutor",
            Self::Flashcards => "Flashcards",
            Self::Errors => "Error Log",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Tutor => 0,
            Self::Flashcards => 1,
            Self::Errors => 2,
        }
    }

    fn cycle(self) -> Self {
        match self {
            Self::Tutor => Self::Flashcards,
            Self::Flashcards => Self::Errors,
            Self::Errors => Self::Tutor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Sidebar,
    Materials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptKind {
    AddSubject,
    AddTopic { subject_id: SubjectId },
    AttachMaterial,
}

impl PromptKind {
    fn label(&self) -> &'static str {
        match self {
            Self::AddSubject => "New subject",
            Self::AddTopic { .. } => "New topic",
            Self::AttachMaterial => "Attach file",
        }
    }
}

#[derive(Debug, Clone)]
struct Finder {
    query: String,
    candidates: Vec<TopicCandidate>,
    results: Vec<usize>,
    index: usize,
}

impl Finder {
    fn refresh(&mut self) {
        self.results = ranked_topics(&self.candidates, &self.query);
        self.index = 0;
    }

    fn selected(&self) -> Option<&TopicCandidate> {
        self.results
            .get(self.index)
            .and_then(|idx| self.candidates.get(*idx))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    Normal,
    Chat,
    Prompt(PromptKind),
    Finder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SidebarRow {
    Subject(SubjectId),
    Topic(SubjectId, TopicId),
}

impl SidebarRow {
    fn subject_id(&self) -> &SubjectId {
        match self {
            Self::Subject(subject_id) | Self::Topic(subject_id, _) => subject_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MaterialRow {
    Material(MaterialId),
    Tracked(String),
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

struct App<P> {
    subjects: SubjectStore<P>,
    files: FileTracker,
    chat: ChatSession,
    deck: FlashcardDeck,
    error_log: ErrorLog,
    errors_requested: bool,
    theme: TuiTheme,
    tab: Tab,
    focus: Focus,
    mode: InputMode,
    input: String,
    finder: Option<Finder>,
    sidebar_state: ListState,
    materials_visible: bool,
    materials_state: ListState,
    toast: Option<Toast>,
    jobs: Vec<Job>,
    tick: usize,
    should_quit: bool,
}

impl<P: StatePort> App<P> {
    fn new(subjects: SubjectStore<P>, chat: ChatSession, theme: TuiTheme) -> Self {
        let mut app = Self {
            subjects,
            files: FileTracker::new(),
            chat,
            deck: FlashcardDeck::default(),
            error_log: ErrorLog::new(),
            errors_requested: false,
            theme,
            tab: Tab::Tutor,
            focus: Focus::Sidebar,
            mode: InputMode::Normal,
            input: String::new(),
            finder: None,
            sidebar_state: ListState::default(),
            materials_visible: false,
            materials_state: ListState::default(),
            toast: None,
            jobs: Vec::new(),
            tick: 0,
            should_quit: false,
        };
        app.sync_chat();
        app.place_sidebar_cursor_on_selection();
        app
    }

    fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.jobs)
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    /// Surfaces a failed write-through; the in-memory change already happened.
    fn report(&mut self, result: Result<Outcome, StoreError>) -> Outcome {
        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.set_toast(format!("Could not save: {err}"));
                Outcome::Applied
            }
        }
    }

    fn sync_chat(&mut self) {
        let conversation_id = self.subjects.active_conversation_id().cloned();
        self.chat.sync_conversation(conversation_id.as_ref());
    }

    fn apply_job_result(&mut self, done: JobResult) {
        match done {
            JobResult::Tutor { pending, result } => {
                let Some(cards) = self.chat.complete(&pending, result) else {
                    return;
                };
                let count = cards.len();
                if self.deck.replace_cards(cards) {
                    self.set_toast(format!("{count} flashcards ready for review"));
                }
            }
            JobResult::Errors(result) => self.error_log.finish_load(result),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        match self.mode.clone() {
            InputMode::Chat => {
                self.handle_chat_input(code);
                return false;
            }
            InputMode::Prompt(kind) => {
                self.handle_prompt_input(kind, code);
                return false;
            }
            InputMode::Finder => {
                self.handle_finder_input(code);
                return false;
            }
            InputMode::Normal => {}
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('1') => self.switch_tab(Tab::Tutor),
            KeyCode::Char('2') => self.switch_tab(Tab::Flashcards),
            KeyCode::Char('3') => self.switch_tab(Tab::Errors),
            KeyCode::Tab => self.switch_tab(self.tab.cycle()),
            _ => match self.tab {
                Tab::Tutor => self.handle_tutor_key(code),
                Tab::Flashcards => self.handle_flashcards_key(code),
                Tab::Errors => self.handle_errors_key(code),
            },
        }
        false
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if tab == Tab::Errors && !self.errors_requested {
            self.request_error_log();
        }
    }

    fn request_error_log(&mut self) {
        self.errors_requested = true;
        self.error_log.begin_load();
        self.jobs.push(Job::LoadErrors);
    }

    fn handle_tutor_key(&mut self, code: KeyCode) {
        if self.focus == Focus::Materials {
            match code {
                KeyCode::Up => return self.move_materials_cursor(-1),
                KeyCode::Down => return self.move_materials_cursor(1),
                KeyCode::Char('+') => return self.open_attach_prompt(),
                KeyCode::Char('x') => return self.remove_highlighted_material(),
                KeyCode::Esc => {
                    self.focus = Focus::Sidebar;
                    return;
                }
                _ => {}
            }
        }

        match code {
            KeyCode::Up => self.move_sidebar_cursor(-1),
            KeyCode::Down => self.move_sidebar_cursor(1),
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Char('a') => self.mode = InputMode::Prompt(PromptKind::AddSubject),
            KeyCode::Char('t') => self.open_add_topic_prompt(),
            KeyCode::Char('d') => self.delete_highlighted(),
            KeyCode::Char('/') => self.open_finder(),
            KeyCode::Char('i') => self.mode = InputMode::Chat,
            KeyCode::Char('m') => self.toggle_materials(),
            _ => {}
        }
    }

    fn handle_flashcards_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(' ') => self.deck.flip(),
            KeyCode::Left => self.deck.previous(),
            KeyCode::Right => self.deck.next(),
            KeyCode::Char('k') => self.deck.mark_mastered(),
            KeyCode::Char('j') => self.deck.mark_difficult(),
            _ => {}
        }
    }

    fn handle_errors_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('f') => self.error_log.cycle_filter(),
            KeyCode::Char('r') => self.request_error_log(),
            _ => {}
        }
    }

    fn handle_text_edit(buffer: &mut String, code: KeyCode) {
        match code {
            KeyCode::Char(ch) => buffer.push(ch),
            KeyCode::Backspace => {
                buffer.pop();
            }
            _ => {}
        }
    }

    fn handle_chat_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Enter => self.submit_chat(),
            other => Self::handle_text_edit(&mut self.input, other),
        }
    }

    fn handle_prompt_input(&mut self, kind: PromptKind, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input.clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let value = std::mem::take(&mut self.input);
                self.mode = InputMode::Normal;
                self.submit_prompt(kind, value.trim());
            }
            other => Self::handle_text_edit(&mut self.input, other),
        }
    }

    fn handle_finder_input(&mut self, code: KeyCode) {
        let Some(finder) = self.finder.as_mut() else {
            self.mode = InputMode::Normal;
            return;
        };
        match code {
            KeyCode::Esc => {
                self.finder = None;
                self.mode = InputMode::Normal;
            }
            KeyCode::Up => finder.index = finder.index.saturating_sub(1),
            KeyCode::Down => {
                if finder.index + 1 < finder.results.len() {
                    finder.index += 1;
                }
            }
            KeyCode::Enter => {
                let picked = finder
                    .selected()
                    .map(|c| (c.subject_id.clone(), c.topic_id.clone()));
                self.finder = None;
                self.mode = InputMode::Normal;
                if let Some((subject_id, topic_id)) = picked {
                    self.select_topic(&subject_id, &topic_id);
                    self.place_sidebar_cursor_on_selection();
                }
            }
            KeyCode::Backspace => {
                finder.query.pop();
                finder.refresh();
            }
            KeyCode::Char(ch) => {
                finder.query.push(ch);
                finder.refresh();
            }
            _ => {}
        }
    }

    fn open_finder(&mut self) {
        let mut finder = Finder {
            query: String::new(),
            candidates: topic_candidates(self.subjects.subjects()),
            results: Vec::new(),
            index: 0,
        };
        finder.refresh();
        self.finder = Some(finder);
        self.mode = InputMode::Finder;
    }

    fn open_add_topic_prompt(&mut self) {
        let Some(row) = self.highlighted_row() else {
            self.set_toast("Add a subject first");
            return;
        };
        self.mode = InputMode::Prompt(PromptKind::AddTopic {
            subject_id: row.subject_id().clone(),
        });
    }

    fn open_attach_prompt(&mut self) {
        if self.subjects.selected_topic_data().is_none() {
            self.set_toast("Select a topic first");
            return;
        }
        self.mode = InputMode::Prompt(PromptKind::AttachMaterial);
    }

    fn submit_prompt(&mut self, kind: PromptKind, value: &str) {
        if value.is_empty() {
            return;
        }
        match kind {
            PromptKind::AddSubject => {
                let result = self.subjects.add_subject(value);
                if self.report(result) == Outcome::Ignored {
                    self.set_toast(format!("Subject {value:?} already exists"));
                }
            }
            PromptKind::AddTopic { subject_id } => {
                let result = self.subjects.add_topic(subject_id.as_str(), value);
                if self.report(result) == Outcome::Ignored {
                    self.set_toast(format!("Topic {value:?} already exists"));
                }
            }
            PromptKind::AttachMaterial => self.attach_material(PathBuf::from(value)),
        }
    }

    fn attach_material(&mut self, path: PathBuf) {
        if !path.is_file() {
            self.set_toast(format!("File not found: {}", path.display()));
            return;
        }
        let Some(selected) = self.subjects.selected_topic_data() else {
            self.set_toast("Select a topic first");
            return;
        };
        let subject_id = selected.subject.id().clone();
        let topic_id = selected.topic.id().clone();

        let attachment = Attachment::from_path(path);
        let mut material = Material::new(MaterialId::random(), attachment.name(), Utc::now());
        if let Some(location) = attachment.location() {
            material = material.with_file_url(location);
        }
        if let Some(mime) = attachment.mime() {
            material = material.with_kind(mime);
        }

        self.files
            .add_files(std::slice::from_ref(&attachment), FileSource::Materials);
        let result = self
            .subjects
            .add_material(subject_id.as_str(), topic_id.as_str(), material);
        if self.report(result).is_applied() {
            self.set_toast(format!("Attached {}", attachment.name()));
        }
        self.clamp_materials_cursor();
    }

    fn submit_chat(&mut self) {
        let (text, paths) = split_attachments(&self.input);
        if let Some(missing) = paths.iter().find(|path| !path.is_file()) {
            self.set_toast(format!("File not found: {}", missing.display()));
            return;
        }
        let attachments: Vec<Attachment> = paths.into_iter().map(Attachment::from_path).collect();
        let subject_name = self
            .subjects
            .selected_subject_data()
            .map(|subject| subject.name().to_owned());

        match self
            .chat
            .begin_send(&text, &attachments, &mut self.files, subject_name.as_deref())
        {
            SendPlan::Empty => {}
            SendPlan::Busy => self.set_toast("Still waiting for the tutor"),
            SendPlan::NoConversation => self.input.clear(),
            SendPlan::Dispatch(pending) => {
                self.input.clear();
                self.jobs.push(Job::Tutor(pending));
            }
        }
        self.clamp_materials_cursor();
    }

    fn toggle_materials(&mut self) {
        self.materials_visible = !self.materials_visible;
        self.focus = if self.materials_visible {
            Focus::Materials
        } else {
            Focus::Sidebar
        };
        self.clamp_materials_cursor();
    }

    fn sidebar_rows(&self) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for subject in self.subjects.subjects() {
            rows.push(SidebarRow::Subject(subject.id().clone()));
            for topic in subject.topics() {
                rows.push(SidebarRow::Topic(subject.id().clone(), topic.id().clone()));
            }
        }
        rows
    }

    fn highlighted_row(&self) -> Option<SidebarRow> {
        let rows = self.sidebar_rows();
        let idx = self.sidebar_state.selected()?;
        rows.get(idx.min(rows.len().saturating_sub(1))).cloned()
    }

    fn move_sidebar_cursor(&mut self, delta: isize) {
        let len = self.sidebar_rows().len();
        move_cursor(&mut self.sidebar_state, len, delta);
    }

    fn place_sidebar_cursor_on_selection(&mut self) {
        let rows = self.sidebar_rows();
        let selection = self.subjects.selection();
        let target = match (selection.subject_id(), selection.topic_id()) {
            (Some(subject_id), Some(topic_id)) => rows.iter().position(|row| {
                row == &SidebarRow::Topic(subject_id.clone(), topic_id.clone())
            }),
            _ => None,
        };
        let fallback = if rows.is_empty() { None } else { Some(0) };
        self.sidebar_state.select(target.or(fallback));
    }

    fn clamp_sidebar_cursor(&mut self) {
        let len = self.sidebar_rows().len();
        let selected = match self.sidebar_state.selected() {
            _ if len == 0 => None,
            Some(idx) => Some(idx.min(len - 1)),
            None => Some(0),
        };
        self.sidebar_state.select(selected);
    }

    fn select_topic(&mut self, subject_id: &SubjectId, topic_id: &TopicId) {
        if let Err(err) = self
            .subjects
            .select_existing_topic(subject_id.as_str(), topic_id.as_str())
        {
            self.set_toast(err.to_string());
        }
        self.sync_chat();
        self.clamp_materials_cursor();
    }

    fn select_highlighted(&mut self) {
        let Some(row) = self.highlighted_row() else {
            return;
        };
        match row {
            SidebarRow::Subject(subject_id) => {
                let general = TopicId::new(GENERAL_TOPIC_ID).ok();
                if let Some(topic_id) = general {
                    self.select_topic(&subject_id, &topic_id);
                }
            }
            SidebarRow::Topic(subject_id, topic_id) => self.select_topic(&subject_id, &topic_id),
        }
    }

    fn delete_highlighted(&mut self) {
        let Some(row) = self.highlighted_row() else {
            return;
        };
        let result = match &row {
            SidebarRow::Subject(subject_id) => self.subjects.remove_subject(subject_id.as_str()),
            SidebarRow::Topic(subject_id, topic_id) => {
                if topic_id.as_str() == GENERAL_TOPIC_ID {
                    self.set_toast("The General topic cannot be removed");
                    return;
                }
                self.subjects
                    .remove_topic(subject_id.as_str(), topic_id.as_str())
            }
        };
        let _ = self.report(result);
        self.sync_chat();
        self.clamp_sidebar_cursor();
        self.clamp_materials_cursor();
    }

    fn material_rows(&self) -> Vec<MaterialRow> {
        let mut rows: Vec<MaterialRow> = self
            .subjects
            .selected_topic_data()
            .map(|selected| {
                selected
                    .topic
                    .materials()
                    .iter()
                    .map(|m| MaterialRow::Material(m.id().clone()))
                    .collect()
            })
            .unwrap_or_default();
        rows.extend(
            self.files
                .files()
                .iter()
                .map(|file| MaterialRow::Tracked(file.id().to_string())),
        );
        rows
    }

    fn move_materials_cursor(&mut self, delta: isize) {
        let len = self.material_rows().len();
        move_cursor(&mut self.materials_state, len, delta);
    }

    fn clamp_materials_cursor(&mut self) {
        let len = self.material_rows().len();
        let selected = match self.materials_state.selected() {
            _ if len == 0 => None,
            Some(idx) => Some(idx.min(len - 1)),
            None => Some(0),
        };
        self.materials_state.select(selected);
    }

    fn remove_highlighted_material(&mut self) {
        let rows = self.material_rows();
        let Some(row) = self.materials_state.selected().and_then(|idx| rows.get(idx)) else {
            return;
        };
        match row {
            MaterialRow::Material(material_id) => {
                let Some(selected) = self.subjects.selected_topic_data() else {
                    return;
                };
                let subject_id = selected.subject.id().clone();
                let topic_id = selected.topic.id().clone();
                let result = self.subjects.remove_material(
                    subject_id.as_str(),
                    topic_id.as_str(),
                    material_id.as_str(),
                );
                let _ = self.report(result);
            }
            MaterialRow::Tracked(file_id) => {
                self.files.remove_file(file_id);
            }
        }
        self.clamp_materials_cursor();
    }
}

fn move_cursor(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, len as isize - 1);
    state.select(Some(next as usize));
}

/// Splits chat input into message text and `@path` attachments.
///
/// Each `@path` token is removed with the whitespace before it; the rest of the text is kept as
/// typed.
fn split_attachments(input: &str) -> (String, Vec<PathBuf>) {
    let mut text = String::with_capacity(input.len());
    let mut paths = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        let word_start = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        let (gap, tail) = rest.split_at(word_start);
        let word_end = tail.find(char::is_whitespace).unwrap_or(tail.len());
        let (word, after) = tail.split_at(word_end);
        match word.strip_prefix('@') {
            Some(path) if !path.is_empty() => paths.push(PathBuf::from(path)),
            _ => {
                // Leading attachments leave no gap in front of the text.
                if !text.is_empty() || paths.is_empty() {
                    text.push_str(gap);
                }
                text.push_str(word);
            }
        }
        rest = after;
    }
    (text, paths)
}

include!("chrome.rs");

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
