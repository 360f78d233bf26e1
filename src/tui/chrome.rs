// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, footer, and panel rendering used by the TUI.
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::LightGreen;
const SIDEBAR_WIDTH: u16 = 30;

fn draw<P: StatePort>(frame: &mut Frame<'_>, app: &mut App<P>) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.base_style()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(frame, app, rows[0]);
    match app.tab {
        Tab::Tutor => render_tutor(frame, app, rows[1]),
        Tab::Flashcards => render_flashcards(frame, app, rows[1]),
        Tab::Errors => render_errors(frame, app, rows[1]),
    }
    render_footer(frame, app, rows[2]);

    match &app.mode {
        InputMode::Prompt(kind) => render_prompt(frame, app, kind.label(), rows[1]),
        InputMode::Finder => render_finder(frame, app, rows[1]),
        InputMode::Normal | InputMode::Chat => {}
    }
}

fn view_title(label: &str, key: char, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn render_tabs<P: StatePort>(frame: &mut Frame<'_>, app: &App<P>, area: Rect) {
    let titles: Vec<Line<'static>> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(idx, tab)| Line::from(format!("{} {}", idx + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(app.theme.muted_style())
        .highlight_style(app.theme.active_style());
    frame.render_widget(tabs, area);
}

fn selected_label<P: StatePort>(app: &App<P>) -> Option<String> {
    app.subjects
        .selected_topic_data()
        .map(|selected| format!("{} / {}", selected.subject.name(), selected.topic.name()))
}

fn render_tutor<P: StatePort>(frame: &mut Frame<'_>, app: &mut App<P>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);
    render_sidebar(frame, app, columns[0]);

    if app.materials_visible {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);
        render_chat(frame, app, split[0]);
        render_materials(frame, app, split[1]);
    } else {
        render_chat(frame, app, columns[1]);
    }
}

fn render_sidebar<P: StatePort>(frame: &mut Frame<'_>, app: &mut App<P>, area: Rect) {
    let selection = app.subjects.selection();
    let mut items = Vec::new();
    for subject in app.subjects.subjects() {
        items.push(ListItem::new(Line::from(Span::styled(
            subject.name().to_owned(),
            app.theme.base_style().add_modifier(Modifier::BOLD),
        ))));
        for topic in subject.topics() {
            let active = selection.subject_id() == Some(subject.id())
                && selection.topic_id() == Some(topic.id());
            let (marker, style) = if active {
                ("● ", app.theme.active_style())
            } else {
                ("  ", app.theme.base_style())
            };
            items.push(ListItem::new(Line::from(vec![
                Span::raw("  "),
                Span::styled(marker, style),
                Span::styled(topic.name().to_owned(), style),
            ])));
        }
    }

    let focused = app.focus == Focus::Sidebar && app.mode == InputMode::Normal;
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Subjects", '1', None))
                .border_style(app.theme.panel_border_style(focused)),
        )
        .highlight_style(app.theme.selection_style());
    frame.render_stateful_widget(list, area, &mut app.sidebar_state);
}

fn message_lines<P: StatePort>(app: &App<P>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in app.chat.messages() {
        let (who, style) = match message.role() {
            MessageRole::User => ("You", app.theme.user_style()),
            MessageRole::Bot => ("Tutor", app.theme.bot_style()),
        };
        let body = match (message.text(), message.file()) {
            (Some(text), _) => text.to_owned(),
            (None, Some(file)) => format!("📎 {}", file.name()),
            (None, None) => String::new(),
        };
        for (idx, text) in body.lines().enumerate() {
            let prefix = if idx == 0 {
                format!("{who}: ")
            } else {
                " ".repeat(who.len() + 2)
            };
            lines.push(Line::from(vec![
                Span::styled(prefix, style.add_modifier(Modifier::BOLD)),
                Span::styled(text.to_owned(), style),
            ]));
        }
    }
    if app.chat.is_pending() {
        let spinner = SPINNER[app.tick % SPINNER.len()];
        lines.push(Line::from(Span::styled(
            format!("{spinner} Tutor is thinking…"),
            app.theme.muted_style(),
        )));
    }
    lines
}

fn render_chat<P: StatePort>(frame: &mut Frame<'_>, app: &App<P>, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let title = selected_label(app);
    let lines = message_lines(app);
    let inner_height = parts[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(inner_height) as u16;
    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Chat", 'i', title.as_deref()))
                .border_style(app.theme.panel_border_style(false)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(transcript, parts[0]);

    let typing = app.mode == InputMode::Chat;
    let input = if typing {
        format!("{}▏", app.input)
    } else if app.input.is_empty() {
        "press i to type, @path attaches a file".to_owned()
    } else {
        app.input.clone()
    };
    let input_style = if typing {
        app.theme.base_style()
    } else {
        app.theme.muted_style()
    };
    let input_box = Paragraph::new(Line::from(Span::styled(input, input_style))).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Message ")
            .border_style(app.theme.panel_border_style(typing)),
    );
    frame.render_widget(input_box, parts[1]);
}

fn render_materials<P: StatePort>(frame: &mut Frame<'_>, app: &mut App<P>, area: Rect) {
    let mut items = Vec::new();
    if let Some(selected) = app.subjects.selected_topic_data() {
        for material in selected.topic.materials() {
            let date = material.uploaded_at().format("%Y-%m-%d").to_string();
            items.push(ListItem::new(Line::from(vec![
                Span::styled(material.name().to_owned(), app.theme.base_style()),
                Span::raw(" "),
                Span::styled(date, app.theme.muted_style()),
            ])));
        }
    }
    for file in app.files.files() {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("[{}] ", file.source()), app.theme.muted_style()),
            Span::styled(file.name().to_owned(), app.theme.base_style()),
        ])));
    }
    if items.is_empty() {
        items.push(ListItem::new(Span::styled(
            "No materials yet",
            app.theme.muted_style(),
        )));
    }

    let focused = app.focus == Focus::Materials && app.mode == InputMode::Normal;
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Materials", 'm', None))
                .border_style(app.theme.panel_border_style(focused)),
        )
        .highlight_style(app.theme.selection_style());
    frame.render_stateful_widget(list, area, &mut app.materials_state);
}

fn render_flashcards<P: StatePort>(frame: &mut Frame<'_>, app: &App<P>, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let deck = &app.deck;
    let position = if deck.is_empty() {
        "0/0".to_owned()
    } else {
        format!("{}/{}", deck.index() + 1, deck.len())
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Progress", '2', Some(&position))),
        )
        .gauge_style(app.theme.active_style())
        .percent(deck.progress())
        .label(format!("{}%", deck.progress()));
    frame.render_widget(gauge, parts[0]);

    let mut lines = Vec::new();
    match deck.current() {
        Some(card) => {
            if let Some(subject) = card.subject() {
                lines.push(Line::from(Span::styled(
                    subject.to_owned(),
                    app.theme.muted_style(),
                )));
                lines.push(Line::default());
            }
            let (label, text) = if deck.is_flipped() {
                ("Answer", card.answer())
            } else {
                ("Question", card.question())
            };
            lines.push(Line::from(Span::styled(
                format!("{label}:"),
                app.theme.key_style(),
            )));
            lines.push(Line::from(Span::styled(
                text.to_owned(),
                app.theme.bot_style(),
            )));
            let mut marks = Vec::new();
            if deck.is_mastered(deck.index()) {
                marks.push(Span::styled("✓ mastered ", app.theme.active_style()));
            }
            if deck.is_difficult(deck.index()) {
                marks.push(Span::styled("! difficult", app.theme.error_style()));
            }
            if !marks.is_empty() {
                lines.push(Line::default());
                lines.push(Line::from(marks));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No flashcards yet",
            app.theme.muted_style(),
        ))),
    }
    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Card "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(card, parts[1]);

    let summary = Line::from(vec![
        Span::styled("Mastered ", app.theme.muted_style()),
        Span::styled(deck.mastered_count().to_string(), app.theme.active_style()),
        Span::styled("  Difficult ", app.theme.muted_style()),
        Span::styled(deck.difficult_count().to_string(), app.theme.error_style()),
    ]);
    frame.render_widget(Paragraph::new(summary), parts[2]);
}

fn render_errors<P: StatePort>(frame: &mut Frame<'_>, app: &App<P>, area: Rect) {
    let log = &app.error_log;
    let stats = log.stats();
    let tail = format!(
        "[{}] total {} high {}",
        log.filter().label(),
        stats.total,
        stats.high_severity
    );

    let mut lines = Vec::new();
    if log.is_loading() {
        let spinner = SPINNER[app.tick % SPINNER.len()];
        lines.push(Line::from(Span::styled(
            format!("{spinner} Loading error log…"),
            app.theme.muted_style(),
        )));
    } else {
        let visible = log.visible();
        if visible.is_empty() {
            lines.push(Line::from(Span::styled(
                "No mistakes recorded",
                app.theme.muted_style(),
            )));
        }
        for entry in visible {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.severity),
                    app.theme.severity_style(entry.severity),
                ),
                Span::styled(entry.topic.clone(), app.theme.key_style()),
                Span::styled(format!("  {}", entry.date), app.theme.muted_style()),
            ]));
            lines.push(help_kv("Q", &entry.question, 3, app.theme.muted_style()));
            lines.push(help_kv("A", &entry.mistake, 3, app.theme.error_style()));
            lines.push(help_kv("Tip", &entry.suggestion, 3, app.theme.active_style()));
            lines.push(Line::default());
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Error Log", '3', Some(&tail))),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_prompt<P: StatePort>(frame: &mut Frame<'_>, app: &App<P>, label: &str, main_area: Rect) {
    let area = centered_rect(60, 20, main_area);
    frame.render_widget(Clear, area);
    let text = Line::from(vec![
        Span::styled(format!("{}▏", app.input), app.theme.base_style()),
    ]);
    let prompt = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {label} "))
            .border_style(app.theme.panel_border_style(true)),
    );
    frame.render_widget(prompt, area);
}

fn render_finder<P: StatePort>(frame: &mut Frame<'_>, app: &App<P>, main_area: Rect) {
    let Some(finder) = app.finder.as_ref() else {
        return;
    };
    let area = centered_rect(60, 60, main_area);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("/", app.theme.key_style()),
            Span::styled(format!("{}▏", finder.query), app.theme.base_style()),
        ]),
        Line::default(),
    ];
    if finder.results.is_empty() {
        lines.push(Line::from(Span::styled("No match", app.theme.muted_style())));
    }
    for (pos, idx) in finder.results.iter().enumerate() {
        let Some(candidate) = finder.candidates.get(*idx) else {
            continue;
        };
        let style = if pos == finder.index {
            app.theme.selection_style()
        } else {
            app.theme.base_style()
        };
        lines.push(Line::from(Span::styled(candidate.label.clone(), style)));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Find topic ")
            .border_style(app.theme.panel_border_style(true)),
    );
    frame.render_widget(paragraph, area);
}

fn render_footer<P: StatePort>(frame: &mut Frame<'_>, app: &App<P>, area: Rect) {
    let brand_width = FOOTER_BRAND.chars().count() as u16 + 1;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(brand_width)])
        .split(area);
    frame.render_widget(Paragraph::new(footer_help_line(app)), columns[0]);
    frame.render_widget(
        Paragraph::new(footer_brand_line()).alignment(Alignment::Right),
        columns[1],
    );
}

fn footer_help_line<P: StatePort>(app: &App<P>) -> Line<'static> {
    let mut spans = Vec::new();
    match (&app.mode, app.tab) {
        (InputMode::Chat, _) => {
            push_footer_entry(&mut spans, "send", "Enter");
            push_footer_entry(&mut spans, "attach", "@path");
            push_footer_entry(&mut spans, "leave", "Esc");
        }
        (InputMode::Prompt(_), _) => {
            push_footer_entry(&mut spans, "confirm", "Enter");
            push_footer_entry(&mut spans, "cancel", "Esc");
        }
        (InputMode::Finder, _) => {
            push_footer_entry(&mut spans, "open", "Enter");
            push_footer_entry(&mut spans, "move", "↑/↓");
            push_footer_entry(&mut spans, "cancel", "Esc");
        }
        (InputMode::Normal, Tab::Tutor) if app.focus == Focus::Materials => {
            push_footer_entry(&mut spans, "attach", "+");
            push_footer_entry(&mut spans, "remove", "x");
            push_footer_entry(&mut spans, "back", "Esc");
            push_footer_entry(&mut spans, "hide", "m");
        }
        (InputMode::Normal, Tab::Tutor) => {
            push_footer_entry(&mut spans, "select", "Enter");
            push_footer_entry(&mut spans, "subject", "a");
            push_footer_entry(&mut spans, "topic", "t");
            push_footer_entry(&mut spans, "delete", "d");
            push_footer_entry(&mut spans, "find", "/");
            push_footer_entry(&mut spans, "chat", "i");
            push_footer_entry(&mut spans, "materials", "m");
        }
        (InputMode::Normal, Tab::Flashcards) => {
            push_footer_entry(&mut spans, "flip", "Space");
            push_footer_entry(&mut spans, "move", "←/→");
            push_footer_entry(&mut spans, "mastered", "k");
            push_footer_entry(&mut spans, "difficult", "j");
        }
        (InputMode::Normal, Tab::Errors) => {
            push_footer_entry(&mut spans, "filter", "f");
            push_footer_entry(&mut spans, "reload", "r");
        }
    }
    if app.mode == InputMode::Normal {
        push_footer_entry(&mut spans, "tabs", "1-3");
        push_footer_entry(&mut spans, "quit", "q");
    }

    if let Some(toast) = app.toast.as_ref() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::styled(
            "Toast:".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
        spans.push(Span::raw(toast.message.clone()));
    }

    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default()
            .fg(FOOTER_KEY_COLOR)
            .add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
