use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Details, DetailsView, FormField, Mode, TaskForm};
use crate::board::{columns, Column};
use crate::models::{Task, TaskStatus};
use crate::store::BoardSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub danger: Color,
}

impl Theme {
    pub fn toggle(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Reset,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                danger: Color::LightRed,
            },
            Theme::Light => Palette {
                background: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                danger: Color::Red,
            },
        }
    }
}

/// Column (and card row, if any) under a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub column: usize,
    pub row: Option<usize>,
}

/// Header, board and status bar.
fn screen_areas(area: Rect) -> [Rect; 3] {
    Layout::vertical([Constraint::Length(1), Constraint::Min(5), Constraint::Length(1)]).areas(area)
}

fn column_areas(area: Rect) -> [Rect; 3] {
    let [_, board, _] = screen_areas(area);
    Layout::horizontal([
        Constraint::Percentage(33),
        Constraint::Percentage(33),
        Constraint::Percentage(34),
    ])
    .areas(board)
}

fn card_height(task: &Task) -> u16 {
    if task.description.is_empty() {
        1
    } else {
        2
    }
}

/// Map a screen cell to what `draw` put there. Assumes the column lists are
/// not scrolled.
pub fn hit_test(area: Rect, columns: &[Column; 3], x: u16, y: u16) -> Option<Hit> {
    let position = Position::new(x, y);
    let (column, rect) = column_areas(area)
        .into_iter()
        .enumerate()
        .find(|(_, rect)| rect.contains(position))?;

    let inner = Block::default().borders(Borders::ALL).inner(rect);
    if !inner.contains(position) {
        return Some(Hit { column, row: None });
    }
    let mut top = inner.y;
    for (row, task) in columns[column].tasks.iter().enumerate() {
        top += card_height(task);
        if y < top {
            return Some(Hit { column, row: Some(row) });
        }
    }
    Some(Hit { column, row: None })
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Blue,
        TaskStatus::InProgress => Color::Yellow,
        TaskStatus::Done => Color::Green,
    }
}

pub fn draw(f: &mut Frame, app: &App, board: &BoardSnapshot) {
    let palette = app.theme.palette();
    let base = Style::default().bg(palette.background).fg(palette.text);
    f.render_widget(Block::default().style(base), f.area());

    let [header, _, status] = screen_areas(f.area());
    draw_header(f, header, &palette);
    let cols = columns(&board.tasks);
    draw_columns(f, column_areas(f.area()), app, &cols, &palette);
    draw_status_bar(f, status, app, board, &palette);

    match &app.mode {
        Mode::Details(details) => draw_details(f, details, board, &palette),
        Mode::Adding(form) => draw_form(f, "Add New Task", form, &palette),
        Mode::Board | Mode::Carrying(_) => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect, palette: &Palette) {
    let header = Line::from(vec![
        Span::styled(
            "Task Management Dashboard",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "   a: add  t: theme  r: refresh  esc: dismiss error  q: quit",
            Style::default().fg(palette.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_columns(f: &mut Frame, chunks: [Rect; 3], app: &App, cols: &[Column; 3], palette: &Palette) {
    // A pointer press is drawn as a plain selection until it becomes a drag.
    let carry = match &app.mode {
        Mode::Carrying(carry) if carry.session.is_active() => Some(carry),
        _ => None,
    };

    for (i, column) in cols.iter().enumerate() {
        let is_drop_target = carry.is_some_and(|c| c.over_column == i);
        let border_style = if is_drop_target {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else if carry.is_none() && app.selected_column == i {
            Style::default().fg(status_color(column.status)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(status_color(column.status))
        };

        let block = Block::default()
            .title(format!("{} ({})", column.title(), column.tasks.len()))
            .borders(Borders::ALL)
            .border_type(if is_drop_target { BorderType::Thick } else { BorderType::Plain })
            .border_style(border_style);

        if column.tasks.is_empty() {
            let empty = Paragraph::new(Span::styled("No tasks yet", Style::default().fg(palette.muted))).block(block);
            f.render_widget(empty, chunks[i]);
            continue;
        }

        let carried = carry.map(|c| c.session.task().id.clone());
        let items: Vec<ListItem> = column
            .tasks
            .iter()
            .map(|task| {
                let is_carried = carried.as_ref() == Some(&task.id);
                let title_style = if is_carried {
                    Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC)
                } else {
                    Style::default().fg(palette.text).add_modifier(Modifier::BOLD)
                };
                let mut lines = vec![Line::from(vec![
                    Span::raw(if is_carried { "↕ " } else { "" }),
                    Span::styled(task.title.clone(), title_style),
                ])];
                if !task.description.is_empty() {
                    lines.push(Line::from(Span::styled(
                        task.description.clone(),
                        Style::default().fg(palette.muted),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        let highlighted = match carry {
            Some(c) if c.over_column == i => c.over_row,
            Some(_) => None,
            None if app.selected_column == i => Some(app.selected_rows[i]),
            None => None,
        };

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");
        let mut state = ListState::default().with_selected(highlighted);
        f.render_stateful_widget(list, chunks[i], &mut state);
    }
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App, board: &BoardSnapshot, palette: &Palette) {
    let line = if let Some(error) = &board.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(palette.danger).add_modifier(Modifier::BOLD)))
    } else if board.is_loading {
        Line::from(Span::styled("Loading…", Style::default().fg(palette.accent)))
    } else {
        let hint = match &app.mode {
            Mode::Board => "←→↑↓ select  enter: details  space or drag: pick up",
            Mode::Carrying(_) => "←→ column  ↑↓ position  space: drop  esc: cancel",
            Mode::Details(_) => "e: edit  d: delete  esc: close",
            Mode::Adding(_) => "tab: next field  enter: save  esc: cancel",
        };
        Line::from(Span::styled(hint, Style::default().fg(palette.muted)))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_details(f: &mut Frame, details: &Details, board: &BoardSnapshot, palette: &Palette) {
    if let DetailsView::Editing(form) = &details.view {
        draw_form(f, "Edit Task", form, palette);
        return;
    }

    let area = centered_rect(60, 50, f.area());
    let block = Block::default()
        .title("Task Details")
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.background).fg(palette.text));

    let Some(task) = board.find(&details.task_id) else {
        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new("This task no longer exists.").block(block), area);
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(task.title.clone(), bold)),
        Line::from(Span::raw(task.description.clone())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Status: ", bold),
            Span::styled(task.status.label(), Style::default().fg(status_color(task.status))),
        ]),
        Line::from(""),
    ];
    if details.view == DetailsView::ConfirmDelete {
        lines.push(Line::from(vec![
            Span::styled("Are you sure? ", Style::default().fg(palette.danger).add_modifier(Modifier::BOLD)),
            Span::raw("y: yes  n: cancel"),
        ]));
    } else {
        lines.push(Line::from(Span::styled("e: edit  d: delete  esc: close", Style::default().fg(palette.muted))));
    }

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_form(f: &mut Frame, title: &str, form: &TaskForm, palette: &Palette) {
    let area = centered_rect(60, 50, f.area());
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.background).fg(palette.text));

    let label = |field: FormField, text: &'static str| {
        if form.focus == field {
            Span::styled(text, Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
        }
    };

    let mut lines = vec![
        Line::from(vec![label(FormField::Title, "Title *: "), Span::raw(form.title.clone())]),
        Line::from(vec![
            label(FormField::Description, "Description: "),
            Span::raw(form.description.clone()),
        ]),
        Line::from(vec![
            label(FormField::Status, "Status: "),
            Span::styled(
                format!("< {} >", form.status.label()),
                Style::default().fg(status_color(form.status)),
            ),
        ]),
        Line::from(""),
    ];
    if let Some(error) = form.error {
        lines.push(Line::from(Span::styled(error, Style::default().fg(palette.danger))));
    }

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
