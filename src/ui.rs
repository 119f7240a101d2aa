use crate::app::{App, Outcome};
use crate::task_list::{Choice, TaskList};
use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const ACCENT: Color = Color::Indexed(63);
const MUTED: Color = Color::DarkGray;

pub const PLACEHOLDER: &str = "What needs to be done?";
pub const EMPTY_TITLE: &str = "No tasks yet!";
pub const EMPTY_HINT: &str = "Add your first task to get started";

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_restore();
        terminal.draw(|f| render(f, &app.list))?;

        // short poll so a late startup load still shows up without input
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if app.handle_key(key) == Outcome::Quit {
                return Ok(());
            }
        }
    }
}

pub fn render(f: &mut Frame, list: &TaskList) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, list, chunks[0]);
    render_input(f, list, chunks[1]);
    render_tasks(f, list, chunks[2]);
    render_help(f, list, chunks[3]);

    if list.pending_delete.is_some() {
        render_confirm(f, list, f.area());
    }
}

fn render_header(f: &mut Frame, list: &TaskList, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "My Tasks",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(list.count_label(), Style::default().fg(MUTED))),
    ]);
    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, list: &TaskList, area: Rect) {
    let draft = if list.draft.text.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(MUTED))
    } else {
        Span::raw(list.draft.text.as_str())
    };
    let add = if list.can_add() {
        Span::styled(
            " [+] ",
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" [+] ", Style::default().fg(MUTED))
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Min(1), Constraint::Length(5)])
        .split(Block::default().borders(Borders::ALL).inner(area));

    // scroll so the end of a long draft and the cursor stay in view
    let field = chunks[0];
    let typed = u16::try_from(list.draft.text.width()).unwrap_or(u16::MAX);
    let offset = typed.saturating_sub(field.width.saturating_sub(1));

    f.render_widget(Block::default().borders(Borders::ALL), area);
    f.render_widget(Paragraph::new(Line::from(draft)).scroll((0, offset)), field);
    f.render_widget(Paragraph::new(Line::from(add)), chunks[1]);

    if list.pending_delete.is_none() {
        f.set_cursor_position((field.x + typed - offset, field.y));
    }
}

fn render_tasks(f: &mut Frame, list: &TaskList, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    if list.tasks.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                EMPTY_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(EMPTY_HINT, Style::default().fg(MUTED))),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = list
        .tasks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", i + 1),
                    Style::default().fg(Color::White).bg(ACCENT),
                ),
                Span::raw(" "),
                Span::styled(&t.text, Style::default().fg(Color::White)),
                Span::styled("  ✕", Style::default().fg(Color::Red)),
            ]))
        })
        .collect();

    let tasks = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(list.selected));
    f.render_stateful_widget(tasks, area, &mut state);
}

fn render_help(f: &mut Frame, list: &TaskList, area: Rect) {
    let help = if list.pending_delete.is_some() {
        "←/→ choose · Enter confirm · y delete · n/Esc cancel"
    } else {
        "Enter add · ↑/↓ select · Del delete · Esc quit"
    };
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(MUTED))),
        area,
    );
}

fn render_confirm(f: &mut Frame, list: &TaskList, area: Rect) {
    let Some(pending) = list.pending_delete.as_ref() else {
        return;
    };
    let button = |label: &'static str, choice: Choice| {
        let style = if pending.choice == choice {
            let bg = if choice == Choice::Delete {
                Color::Red
            } else {
                ACCENT
            };
            Style::default()
                .fg(Color::White)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        Span::styled(label, style)
    };

    let popup = centered(area, 50, 7);
    let body = Paragraph::new(vec![
        Line::from("Are you sure you want to delete this task?"),
        Line::from(Span::styled(
            pending.text.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(vec![
            button("[ Cancel ]", Choice::Cancel),
            Span::raw("  "),
            button("[ Delete ]", Choice::Delete),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Delete Task")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(body, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
