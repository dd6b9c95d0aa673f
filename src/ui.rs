use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};

use crate::app::{App, ChatRole, FocusPane, InputMode, NavLevel};

/// Render `**bold**` markers in assistant answers as styled spans. Unmatched
/// markers are left as literal text.
fn styled_answer_line(text: &str) -> Line<'static> {
    let pieces: Vec<&str> = text.split("**").collect();
    if pieces.len() % 2 == 0 {
        return Line::from(text.to_string());
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    for (i, piece) in pieces.iter().enumerate() {
        if piece.is_empty() {
            continue;
        }
        if i % 2 == 1 {
            spans.push(Span::styled(
                piece.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(piece.to_string()));
        }
    }
    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    if app.chat_open {
        let [portfolio_area, chat_area] = Layout::horizontal([
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ])
        .areas(body_area);
        render_portfolio(app, frame, portfolio_area);
        render_chat(app, frame, chat_area);
    } else {
        app.chat_pane_area = None;
        render_portfolio(app, frame, body_area);
    }

    render_footer(app, frame, footer_area);

    if app.show_key_input {
        render_key_input(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let assistant_status = if app.in_flight() > 0 {
        " [assistant thinking]"
    } else if app.chat_open {
        " [assistant open]"
    } else {
        ""
    };

    let title = Line::from(vec![
        Span::styled(" Portfolio ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(assistant_status, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = if app.chat_open { " CHAT " } else { " BROWSE " };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.input_mode {
        InputMode::Normal => {
            let mut hints = match app.focus {
                FocusPane::Navigation => vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled(" nav ", label_style),
                    Span::styled(" Enter ", key_style),
                    Span::styled(" select ", label_style),
                    Span::styled(" h ", key_style),
                    Span::styled(" back ", label_style),
                ],
                FocusPane::Content => vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled(" scroll ", label_style),
                    Span::styled(" h ", key_style),
                    Span::styled(" back ", label_style),
                ],
                FocusPane::ChatInput => vec![],
            };
            hints.extend(vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" focus ", label_style),
                Span::styled(" a ", key_style),
                Span::styled(
                    if app.chat_open { " close chat " } else { " chat " },
                    label_style,
                ),
                Span::styled(" K ", key_style),
                Span::styled(" API key ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ]);
            hints
        }
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
        ],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_portfolio(app: &mut App, frame: &mut Frame, area: Rect) {
    // Split into navigation (left) and project detail (right)
    let [nav_area, content_area] = Layout::horizontal([
        Constraint::Length(30),
        Constraint::Min(0),
    ])
    .areas(area);

    // Store areas for mouse hit-testing
    app.nav_area = Some(nav_area);
    app.content_area = Some(content_area);

    render_navigation(app, frame, nav_area);
    render_content(app, frame, content_area);
}

fn render_navigation(app: &mut App, frame: &mut Frame, area: Rect) {
    let nav_focused = app.focus == FocusPane::Navigation;
    let border_color = if nav_focused { Color::Cyan } else { Color::DarkGray };

    let title = app.current_nav_title();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title));

    let items: Vec<ListItem> = match app.nav_level {
        NavLevel::Category => app
            .cached_categories
            .iter()
            .map(|category| ListItem::new(format!(" {} ", category)))
            .collect(),
        NavLevel::Project => app
            .cached_projects
            .iter()
            .map(|project| {
                let label = match &project.icon {
                    Some(icon) => format!(" {} {} ", icon, project.title),
                    None => format!(" {} ", project.title),
                };
                ListItem::new(label)
            })
            .collect(),
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let state = match app.nav_level {
        NavLevel::Category => &mut app.category_state,
        NavLevel::Project => &mut app.project_state,
    };

    frame.render_stateful_widget(list, area, state);
}

fn render_content(app: &mut App, frame: &mut Frame, area: Rect) {
    let content_focused = app.focus == FocusPane::Content;
    let border_color = if content_focused { Color::Cyan } else { Color::DarkGray };

    let title = app.content_title();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title));

    let inner_area = block.inner(area);
    app.content_height = inner_area.height;

    let Some(project) = app.selected_project().cloned() else {
        let hint = match app.nav_level {
            NavLevel::Category => "Pick a category to list its projects",
            NavLevel::Project => "Select a project to view details",
        };
        let placeholder = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();

    let heading = match &project.icon {
        Some(icon) => format!("{} {}", icon, project.title),
        None => project.title.clone(),
    };
    lines.push(Line::from(Span::styled(
        heading,
        Style::default().fg(Color::Yellow).bold(),
    )));
    lines.push(Line::from(Span::styled(
        project.category.clone(),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::default());

    for line in project.description.lines() {
        lines.push(Line::from(line.to_string()));
    }

    if !project.tags.is_empty() {
        lines.push(Line::default());
        let mut spans = vec![Span::styled("Tags: ", Style::default().fg(Color::DarkGray))];
        spans.push(Span::styled(
            project.tags.join(", "),
            Style::default().fg(Color::Green),
        ));
        lines.push(Line::from(spans));
    }

    if let Some(url) = &project.url {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Link: ", Style::default().fg(Color::DarkGray)),
            Span::styled(url.clone(), Style::default().fg(Color::Cyan).underlined()),
        ]));
    }

    app.total_content_lines = lines.len() as u16;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.content_scroll, 0));

    frame.render_widget(paragraph, area);

    if app.total_content_lines > app.content_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(app.total_content_lines as usize)
            .position(app.content_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Transcript on top, input at the bottom
    let [transcript_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    app.chat_pane_area = Some(transcript_area);
    app.chat_height = transcript_area.height.saturating_sub(2);
    app.chat_width = transcript_area.width.saturating_sub(2);

    let chat_focused = app.focus == FocusPane::ChatInput;
    let chat_border_color = if chat_focused { Color::Cyan } else { Color::DarkGray };

    let chat_title = if app.assistant.has_credential() {
        format!(" Assistant: {} ", app.assistant.model())
    } else {
        " Assistant (local answers) ".to_string()
    };
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(chat_border_color))
        .title(chat_title);

    let chat_text = if app.transcript.is_empty() {
        Text::from(Span::styled(
            "Ask about projects, skills, or how to get in touch...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for (index, msg) in app.transcript.iter().enumerate() {
            match msg.role {
                ChatRole::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(msg.content.as_str()));
                }
                ChatRole::Assistant => {
                    lines.push(Line::from(Span::styled(
                        "AI:",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                    if app.is_thinking(index) {
                        // Animated ellipsis: cycles through ".", "..", "..."
                        let dots = ".".repeat((app.animation_frame as usize) + 1);
                        lines.push(Line::from(Span::styled(
                            format!("{}{}", msg.content, dots),
                            Style::default()
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::ITALIC),
                        )));
                    } else {
                        for line in msg.content.lines() {
                            lines.push(styled_answer_line(line));
                        }
                    }
                }
            }
            lines.push(Line::default());
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, transcript_area);

    // Input box
    let input_border_color = if app.input_mode == InputMode::Editing {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color))
        .title(" Ask (Tab to focus) ");

    // Horizontal scrolling keeps the cursor visible in long input
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat_cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .chat_input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, input_area);

    if app.input_mode == InputMode::Editing && chat_focused {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}

fn render_key_input(app: &App, frame: &mut Frame, area: Rect) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Enter API Key ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let instructions =
        Paragraph::new("Paste your key below. Enter to apply for this session, Esc to cancel.")
            .style(Style::default().fg(Color::DarkGray));
    let instructions_area = Rect::new(inner.x, inner.y, inner.width, 1);
    frame.render_widget(instructions, instructions_area);

    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);

    // Masked except the last four characters
    let display_text = if app.key_input.is_empty() {
        String::new()
    } else if app.key_input.chars().count() <= 4 {
        "*".repeat(app.key_input.chars().count())
    } else {
        let char_count = app.key_input.chars().count();
        let masked_len = char_count - 4;
        let last_four: String = app.key_input.chars().skip(masked_len).collect();
        format!("{}...{}", "*".repeat(masked_len.min(20)), last_four)
    };

    let input = Paragraph::new(display_text).style(Style::default().fg(Color::Cyan));
    frame.render_widget(input, input_area);

    let cursor_x = app.key_cursor.min(input_area.width as usize) as u16;
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));

    let status = Paragraph::new(format!("{} characters", app.key_input.chars().count()))
        .style(Style::default().fg(Color::DarkGray));
    let status_area = Rect::new(inner.x, inner.y + 4, inner.width, 1);
    frame.render_widget(status, status_area);
}
