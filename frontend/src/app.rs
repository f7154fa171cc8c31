use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::api::TaskApi;
use crate::board::{columns, Column, DragEffect, DragSession, DropTarget, Point};
use crate::models::{CreateTaskPayload, DragEndData, Task, TaskId, TaskStatus, UpdateTaskPayload};
use crate::store::{BoardSnapshot, TaskStore};
use crate::ui::{self, Hit, Theme};

/// Store call requested by a key press or pointer gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Refresh,
    DismissError,
    Add(CreateTaskPayload),
    Update(UpdateTaskPayload),
    Delete(TaskId),
    Move(DragEndData),
    Reorder { status: TaskStatus, new_order: Vec<Task> },
}

/// Run an action against the store. Network-bound calls are spawned so the
/// UI keeps drawing (and shows optimistic moves) while they are in flight;
/// reorders and error dismissal are local and applied at once.
pub fn dispatch<A>(store: &Arc<TaskStore<A>>, action: Action)
where
    A: TaskApi + 'static,
{
    match action {
        Action::Reorder { status, new_order } => return store.reorder_tasks(status, new_order),
        Action::DismissError => return store.clear_error(),
        _ => {}
    }

    let store = Arc::clone(store);
    tokio::spawn(async move {
        match action {
            Action::Refresh => store.fetch_tasks().await,
            Action::Add(payload) => store.add_task(payload).await,
            Action::Update(payload) => store.update_task(payload).await,
            Action::Delete(id) => store.delete_task(&id).await,
            Action::Move(drag) => store.move_task(drag).await,
            Action::Reorder { .. } | Action::DismissError => {}
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
}

/// Shared by the add-task form and in-place editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub focus: FormField,
    pub error: Option<&'static str>,
}

pub enum FormOutcome {
    Editing,
    Cancelled,
    Submitted,
}

impl TaskForm {
    pub fn blank() -> Self {
        TaskForm {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Todo,
            focus: FormField::Title,
            error: None,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        TaskForm {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            focus: FormField::Title,
            error: None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => {
                if self.title.trim().is_empty() {
                    self.error = Some("Title is required");
                    self.focus = FormField::Title;
                    return FormOutcome::Editing;
                }
                return FormOutcome::Submitted;
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.previous_focus(),
            _ => self.edit_field(key.code),
        }
        FormOutcome::Editing
    }

    fn edit_field(&mut self, code: KeyCode) {
        match (self.focus, code) {
            (FormField::Status, KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l')) => {
                self.status = self.status.cycle_forward()
            }
            (FormField::Status, KeyCode::Left | KeyCode::Char('h')) => self.status = self.status.cycle_backward(),
            (FormField::Title, KeyCode::Char(c)) => {
                self.title.push(c);
                self.error = None;
            }
            (FormField::Title, KeyCode::Backspace) => {
                self.title.pop();
            }
            (FormField::Description, KeyCode::Char(c)) => self.description.push(c),
            (FormField::Description, KeyCode::Backspace) => {
                self.description.pop();
            }
            _ => {}
        }
    }

    fn next_focus(&self) -> FormField {
        match self.focus {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Status,
            FormField::Status => FormField::Title,
        }
    }

    fn previous_focus(&self) -> FormField {
        match self.focus {
            FormField::Title => FormField::Status,
            FormField::Description => FormField::Title,
            FormField::Status => FormField::Description,
        }
    }

    fn create_payload(&self) -> CreateTaskPayload {
        CreateTaskPayload {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            status: self.status,
        }
    }

    fn update_payload(&self, id: TaskId) -> UpdateTaskPayload {
        UpdateTaskPayload {
            id,
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.clone()),
            status: Some(self.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Carry {
    pub session: DragSession,
    pub over_column: usize,
    pub over_row: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsView {
    Viewing,
    ConfirmDelete,
    Editing(TaskForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    pub task_id: TaskId,
    pub view: DetailsView,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Board,
    Carrying(Carry),
    Details(Details),
    Adding(TaskForm),
}

pub struct App {
    pub mode: Mode,
    pub selected_column: usize,
    pub selected_rows: [usize; 3],
    pub theme: Theme,
    pub should_quit: bool,
    /// Card just dropped on another column, selected once it shows up there.
    follow: Option<(TaskId, TaskStatus)>,
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

impl App {
    pub fn new() -> App {
        App {
            mode: Mode::Board,
            selected_column: 0,
            selected_rows: [0; 3],
            theme: Theme::default(),
            should_quit: false,
            follow: None,
        }
    }

    pub fn selected_task<'a>(&self, columns: &'a [Column; 3]) -> Option<&'a Task> {
        let column = columns.get(self.selected_column)?;
        column.tasks.get(self.selected_rows.get(self.selected_column).copied().unwrap_or(0))
    }

    /// Bring the selection in line with the latest board. Call before
    /// drawing.
    pub fn sync(&mut self, board: &BoardSnapshot) {
        self.sync_columns(&columns(&board.tasks));
    }

    pub fn handle_key(&mut self, key: KeyEvent, board: &BoardSnapshot) -> Option<Action> {
        let columns = columns(&board.tasks);
        self.sync_columns(&columns);
        self.follow = None;

        let mode = std::mem::replace(&mut self.mode, Mode::Board);
        let (mode, action) = match mode {
            Mode::Board => self.on_board_key(key, &columns),
            Mode::Carrying(carry) => self.on_carry_key(key, carry, &columns),
            Mode::Details(details) => self.on_details_key(key, details, board),
            Mode::Adding(mut form) => match form.handle_key(key) {
                FormOutcome::Editing => (Mode::Adding(form), None),
                FormOutcome::Cancelled => (Mode::Board, None),
                FormOutcome::Submitted => (Mode::Board, Some(Action::Add(form.create_payload()))),
            },
        };
        self.mode = mode;
        action
    }

    fn sync_columns(&mut self, columns: &[Column; 3]) {
        if let Some((id, destination)) = self.follow.clone() {
            let landed = columns.iter().enumerate().find_map(|(i, column)| {
                let row = column.tasks.iter().position(|t| t.id == id)?;
                Some((i, column.status, row))
            });
            match landed {
                Some((i, status, row)) if status == destination => {
                    self.selected_column = i;
                    self.selected_rows[i] = row;
                    self.follow = None;
                }
                // Not applied yet; keep waiting.
                Some(_) => {}
                None => self.follow = None,
            }
        }
        for (row, column) in self.selected_rows.iter_mut().zip(columns.iter()) {
            *row = (*row).min(column.tasks.len().saturating_sub(1));
        }
    }

    fn on_board_key(&mut self, key: KeyEvent, columns: &[Column; 3]) -> (Mode, Option<Action>) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => return (Mode::Board, Some(Action::DismissError)),
            KeyCode::Left | KeyCode::Char('h') => self.selected_column = self.selected_column.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column = (self.selected_column + 1).min(columns.len() - 1)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let row = &mut self.selected_rows[self.selected_column];
                *row = row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = columns[self.selected_column].tasks.len();
                let row = &mut self.selected_rows[self.selected_column];
                *row = (*row + 1).min(len.saturating_sub(1));
            }
            KeyCode::Char('a') => return (Mode::Adding(TaskForm::blank()), None),
            KeyCode::Char('t') => self.theme = self.theme.toggle(),
            KeyCode::Char('r') => return (Mode::Board, Some(Action::Refresh)),
            KeyCode::Enter => {
                if let Some(task) = self.selected_task(columns) {
                    let details = Details {
                        task_id: task.id.clone(),
                        view: DetailsView::Viewing,
                    };
                    return (Mode::Details(details), None);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(task) = self.selected_task(columns) {
                    let carry = Carry {
                        session: DragSession::pick_up(task.clone()),
                        over_column: self.selected_column,
                        over_row: Some(self.selected_rows[self.selected_column]),
                    };
                    return (Mode::Carrying(carry), None);
                }
            }
            _ => {}
        }
        (Mode::Board, None)
    }

    fn on_carry_key(&mut self, key: KeyEvent, mut carry: Carry, columns: &[Column; 3]) -> (Mode, Option<Action>) {
        let origin = carry.session.task().status.index();
        match key.code {
            KeyCode::Esc => return (Mode::Board, None),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Right | KeyCode::Char('l') => {
                let target = if matches!(key.code, KeyCode::Left | KeyCode::Char('h')) {
                    carry.over_column.saturating_sub(1)
                } else {
                    (carry.over_column + 1).min(columns.len() - 1)
                };
                carry.over_column = target;
                carry.over_row = if target == origin {
                    columns[origin].position(carry.session.task())
                } else {
                    None
                };
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Down | KeyCode::Char('j') => {
                let column = &columns[carry.over_column];
                if column.tasks.is_empty() {
                    return (Mode::Carrying(carry), None);
                }
                let up = matches!(key.code, KeyCode::Up | KeyCode::Char('k'));
                let next_row = match (carry.over_row, up) {
                    (None, true) => column.tasks.len() - 1,
                    (None, false) => 0,
                    (Some(row), true) => row.saturating_sub(1),
                    (Some(row), false) => (row + 1).min(column.tasks.len() - 1),
                };
                carry.over_row = Some(next_row);

                if carry.over_column == origin {
                    let over = DropTarget::Card(column.tasks[next_row].clone());
                    if let Some(DragEffect::Reorder { status, new_order }) = carry.session.drag_over(&over, columns) {
                        self.selected_rows[origin] = next_row;
                        return (Mode::Carrying(carry), Some(Action::Reorder { status, new_order }));
                    }
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let column = &columns[carry.over_column];
                let target = match carry.over_row.and_then(|row| column.tasks.get(row)) {
                    Some(task) => DropTarget::Card(task.clone()),
                    None => DropTarget::Column(column.status),
                };
                self.selected_column = carry.over_column;
                return self.finish_drop(carry.session.drop_on(Some(&target)));
            }
            _ => {}
        }
        (Mode::Carrying(carry), None)
    }

    fn finish_drop(&mut self, effect: Option<DragEffect>) -> (Mode, Option<Action>) {
        match effect {
            Some(DragEffect::Move(drag)) => {
                self.selected_column = drag.destination.index();
                self.follow = Some((drag.task.id.clone(), drag.destination));
                (Mode::Board, Some(Action::Move(drag)))
            }
            _ => (Mode::Board, None),
        }
    }

    /// Left-button press, drag and release over the board drawn in `area`.
    /// A press only becomes a drag after it travels far enough; a short
    /// press and release just selects the card.
    pub fn handle_mouse(&mut self, event: MouseEvent, area: Rect, board: &BoardSnapshot) -> Option<Action> {
        let columns = columns(&board.tasks);
        self.sync_columns(&columns);
        self.follow = None;

        let point = Point::new(f64::from(event.column), f64::from(event.row));
        let hit = ui::hit_test(area, &columns, event.column, event.row);

        let mode = std::mem::replace(&mut self.mode, Mode::Board);
        let (mode, action) = match (mode, event.kind) {
            (Mode::Board, MouseEventKind::Down(MouseButton::Left)) => self.on_press(point, hit, &columns),
            (Mode::Carrying(carry), MouseEventKind::Drag(MouseButton::Left)) => {
                self.on_pointer_drag(carry, point, hit, &columns)
            }
            (Mode::Carrying(carry), MouseEventKind::Up(MouseButton::Left)) => {
                let target = hit.map(|hit| match hit.row {
                    Some(row) => DropTarget::Card(columns[hit.column].tasks[row].clone()),
                    None => DropTarget::Column(columns[hit.column].status),
                });
                self.finish_drop(carry.session.drop_on(target.as_ref()))
            }
            (mode, _) => (mode, None),
        };
        self.mode = mode;
        action
    }

    fn on_press(&mut self, point: Point, hit: Option<Hit>, columns: &[Column; 3]) -> (Mode, Option<Action>) {
        let Some(hit) = hit else {
            return (Mode::Board, None);
        };
        self.selected_column = hit.column;
        let Some(row) = hit.row else {
            return (Mode::Board, None);
        };
        self.selected_rows[hit.column] = row;
        let carry = Carry {
            session: DragSession::press(columns[hit.column].tasks[row].clone(), point),
            over_column: hit.column,
            over_row: Some(row),
        };
        (Mode::Carrying(carry), None)
    }

    fn on_pointer_drag(
        &mut self,
        mut carry: Carry,
        point: Point,
        hit: Option<Hit>,
        columns: &[Column; 3],
    ) -> (Mode, Option<Action>) {
        if !carry.session.pointer_moved(point) {
            return (Mode::Carrying(carry), None);
        }
        let Some(hit) = hit else {
            return (Mode::Carrying(carry), None);
        };
        carry.over_column = hit.column;
        carry.over_row = hit.row;

        let Some(row) = hit.row else {
            return (Mode::Carrying(carry), None);
        };
        let over = DropTarget::Card(columns[hit.column].tasks[row].clone());
        match carry.session.drag_over(&over, columns) {
            Some(DragEffect::Reorder { status, new_order }) => {
                self.selected_rows[hit.column] = row;
                (Mode::Carrying(carry), Some(Action::Reorder { status, new_order }))
            }
            _ => (Mode::Carrying(carry), None),
        }
    }

    fn on_details_key(&mut self, key: KeyEvent, mut details: Details, board: &BoardSnapshot) -> (Mode, Option<Action>) {
        let Some(task) = board.find(&details.task_id) else {
            // Deleted or never loaded; any key closes the overlay.
            return (Mode::Board, None);
        };

        match details.view {
            DetailsView::Viewing => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return (Mode::Board, None),
                KeyCode::Char('e') => details.view = DetailsView::Editing(TaskForm::from_task(task)),
                KeyCode::Char('d') => details.view = DetailsView::ConfirmDelete,
                _ => {}
            },
            DetailsView::ConfirmDelete => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    return (Mode::Board, Some(Action::Delete(details.task_id)));
                }
                KeyCode::Char('n') | KeyCode::Esc => details.view = DetailsView::Viewing,
                _ => {}
            },
            DetailsView::Editing(mut form) => match form.handle_key(key) {
                FormOutcome::Editing => details.view = DetailsView::Editing(form),
                FormOutcome::Cancelled => details.view = DetailsView::Viewing,
                FormOutcome::Submitted => {
                    let payload = form.update_payload(details.task_id.clone());
                    details.view = DetailsView::Viewing;
                    return (Mode::Details(details), Some(Action::Update(payload)));
                }
            },
        }
        (Mode::Details(details), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {id}"),
            description: "details".into(),
            status,
        }
    }

    fn board() -> BoardSnapshot {
        BoardSnapshot {
            tasks: vec![
                task("t1", TaskStatus::Todo),
                task("t2", TaskStatus::Todo),
                task("p1", TaskStatus::InProgress),
            ],
            is_loading: false,
            error: None,
        }
    }

    fn type_text(app: &mut App, board: &BoardSnapshot, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_key(key(KeyCode::Char(c)), board), None);
        }
    }

    #[test]
    fn navigation_is_clamped() {
        let mut app = App::new();
        let board = board();
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Down), &board);
            app.handle_key(key(KeyCode::Right), &board);
        }
        assert_eq!(app.selected_column, 2);
        assert_eq!(app.selected_rows, [1, 0, 0]);
    }

    #[test]
    fn carry_right_and_drop_moves_task() {
        let mut app = App::new();
        let board = board();

        assert_eq!(app.handle_key(key(KeyCode::Char(' ')), &board), None);
        assert!(matches!(app.mode, Mode::Carrying(_)));
        assert_eq!(app.handle_key(key(KeyCode::Right), &board), None);

        let action = app.handle_key(key(KeyCode::Char(' ')), &board);
        assert_eq!(
            action,
            Some(Action::Move(DragEndData {
                task: task("t1", TaskStatus::Todo),
                destination: TaskStatus::InProgress,
            }))
        );
        assert_eq!(app.mode, Mode::Board);
        assert_eq!(app.selected_column, 1);
    }

    #[test]
    fn carry_down_within_column_reorders() {
        let mut app = App::new();
        let board = board();

        app.handle_key(key(KeyCode::Char(' ')), &board);
        let action = app.handle_key(key(KeyCode::Down), &board);
        assert_eq!(
            action,
            Some(Action::Reorder {
                status: TaskStatus::Todo,
                new_order: vec![task("t2", TaskStatus::Todo), task("t1", TaskStatus::Todo)],
            })
        );
        assert_eq!(app.selected_rows[0], 1);
    }

    #[test]
    fn dropping_back_home_or_cancelling_does_nothing() {
        let mut app = App::new();
        let board = board();

        app.handle_key(key(KeyCode::Char(' ')), &board);
        app.handle_key(key(KeyCode::Right), &board);
        app.handle_key(key(KeyCode::Left), &board);
        assert_eq!(app.handle_key(key(KeyCode::Enter), &board), None);

        app.handle_key(key(KeyCode::Char(' ')), &board);
        app.handle_key(key(KeyCode::Right), &board);
        assert_eq!(app.handle_key(key(KeyCode::Esc), &board), None);
        assert_eq!(app.mode, Mode::Board);
        assert!(!app.should_quit);
    }

    #[test]
    fn dropped_card_stays_selected_in_its_new_column() {
        let mut app = App::new();
        let before = BoardSnapshot {
            tasks: vec![task("t1", TaskStatus::Todo), task("p1", TaskStatus::InProgress)],
            ..Default::default()
        };

        app.handle_key(key(KeyCode::Char(' ')), &before);
        app.handle_key(key(KeyCode::Right), &before);
        assert!(matches!(app.handle_key(key(KeyCode::Char(' ')), &before), Some(Action::Move(_))));

        // Optimistic move: t1 keeps its list slot, ahead of p1.
        let after = BoardSnapshot {
            tasks: vec![task("t1", TaskStatus::InProgress), task("p1", TaskStatus::InProgress)],
            is_loading: true,
            error: None,
        };
        app.sync(&after);
        let cols = columns(&after.tasks);
        assert_eq!(app.selected_task(&cols).map(|t| t.id.as_str()), Some("t1"));

        app.handle_key(key(KeyCode::Enter), &after);
        match &app.mode {
            Mode::Details(details) => assert_eq!(details.task_id, TaskId::from("t1")),
            other => panic!("expected details, got {other:?}"),
        }
    }

    #[test]
    fn esc_on_board_dismisses_error() {
        let mut app = App::new();
        assert_eq!(app.handle_key(key(KeyCode::Esc), &board()), Some(Action::DismissError));
        assert!(!app.should_quit);
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 120,
        height: 24,
    };

    // With `board()` on a 120x24 screen, t1 is drawn on rows 2-3 and t2 on
    // rows 4-5 of the first column; p1 on rows 2-3 of the second.
    const LEFT: MouseButton = MouseButton::Left;

    #[test]
    fn pointer_press_needs_travel_to_drag() {
        let mut app = App::new();
        let board = board();

        assert_eq!(app.handle_mouse(mouse(MouseEventKind::Down(LEFT), 5, 4), SCREEN, &board), None);
        assert_eq!(app.selected_rows[0], 1);
        assert_eq!(app.handle_mouse(mouse(MouseEventKind::Drag(LEFT), 8, 4), SCREEN, &board), None);
        assert_eq!(app.handle_mouse(mouse(MouseEventKind::Drag(LEFT), 60, 4), SCREEN, &board), None);
        // Travel past the threshold activated it; releasing on itself does nothing.
        assert_eq!(app.handle_mouse(mouse(MouseEventKind::Up(LEFT), 5, 4), SCREEN, &board), None);
        assert_eq!(app.mode, Mode::Board);

        app.handle_mouse(mouse(MouseEventKind::Down(LEFT), 5, 2), SCREEN, &board);
        assert_eq!(app.handle_mouse(mouse(MouseEventKind::Drag(LEFT), 9, 2), SCREEN, &board), None);
        assert_eq!(app.handle_mouse(mouse(MouseEventKind::Up(LEFT), 60, 10), SCREEN, &board), None);
        assert_eq!(app.mode, Mode::Board);
        assert_eq!((app.selected_column, app.selected_rows[0]), (0, 0));
    }

    #[test]
    fn pointer_drag_to_other_column_moves() {
        let mut app = App::new();
        let board = board();

        app.handle_mouse(mouse(MouseEventKind::Down(LEFT), 5, 2), SCREEN, &board);
        assert_eq!(app.handle_mouse(mouse(MouseEventKind::Drag(LEFT), 60, 10), SCREEN, &board), None);
        let action = app.handle_mouse(mouse(MouseEventKind::Up(LEFT), 60, 10), SCREEN, &board);
        assert_eq!(
            action,
            Some(Action::Move(DragEndData {
                task: task("t1", TaskStatus::Todo),
                destination: TaskStatus::InProgress,
            }))
        );
        assert_eq!(app.mode, Mode::Board);
        assert_eq!(app.selected_column, 1);
    }

    #[test]
    fn pointer_drag_over_sibling_reorders() {
        let mut app = App::new();
        let board = board();

        app.handle_mouse(mouse(MouseEventKind::Down(LEFT), 5, 2), SCREEN, &board);
        // Activates over itself: nothing to reorder yet.
        assert_eq!(app.handle_mouse(mouse(MouseEventKind::Drag(LEFT), 15, 2), SCREEN, &board), None);
        let action = app.handle_mouse(mouse(MouseEventKind::Drag(LEFT), 15, 4), SCREEN, &board);
        assert_eq!(
            action,
            Some(Action::Reorder {
                status: TaskStatus::Todo,
                new_order: vec![task("t2", TaskStatus::Todo), task("t1", TaskStatus::Todo)],
            })
        );
    }

    #[test]
    fn add_form_requires_title() {
        let mut app = App::new();
        let board = board();

        app.handle_key(key(KeyCode::Char('a')), &board);
        assert_eq!(app.handle_key(key(KeyCode::Enter), &board), None);
        match &app.mode {
            Mode::Adding(form) => assert_eq!(form.error, Some("Title is required")),
            other => panic!("expected add form, got {other:?}"),
        }

        type_text(&mut app, &board, "Write tests");
        app.handle_key(key(KeyCode::Tab), &board);
        type_text(&mut app, &board, "soon");
        app.handle_key(key(KeyCode::Tab), &board);
        app.handle_key(key(KeyCode::Right), &board);

        let action = app.handle_key(key(KeyCode::Enter), &board);
        assert_eq!(
            action,
            Some(Action::Add(CreateTaskPayload {
                title: "Write tests".into(),
                description: "soon".into(),
                status: TaskStatus::InProgress,
            }))
        );
        assert_eq!(app.mode, Mode::Board);
    }

    #[test]
    fn details_edit_submits_full_update() {
        let mut app = App::new();
        let board = board();

        app.handle_key(key(KeyCode::Enter), &board);
        app.handle_key(key(KeyCode::Char('e')), &board);
        app.handle_key(key(KeyCode::Backspace), &board);
        type_text(&mut app, &board, "X");

        let action = app.handle_key(key(KeyCode::Enter), &board);
        assert_eq!(
            action,
            Some(Action::Update(UpdateTaskPayload {
                id: "t1".into(),
                title: Some("Task tX".into()),
                description: Some("details".into()),
                status: Some(TaskStatus::Todo),
            }))
        );
        assert!(matches!(
            &app.mode,
            Mode::Details(Details { view: DetailsView::Viewing, .. })
        ));
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = App::new();
        let board = board();

        app.handle_key(key(KeyCode::Enter), &board);
        assert_eq!(app.handle_key(key(KeyCode::Char('d')), &board), None);
        assert_eq!(app.handle_key(key(KeyCode::Char('n')), &board), None);
        app.handle_key(key(KeyCode::Char('d')), &board);

        let action = app.handle_key(key(KeyCode::Char('y')), &board);
        assert_eq!(action, Some(Action::Delete("t1".into())));
        assert_eq!(app.mode, Mode::Board);
    }

    #[test]
    fn details_close_when_task_disappears() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Enter), &board());
        let empty = BoardSnapshot::default();
        app.handle_key(key(KeyCode::Char('e')), &empty);
        assert_eq!(app.mode, Mode::Board);
    }

    #[test]
    fn theme_toggles_and_q_quits() {
        let mut app = App::new();
        let board = board();
        let initial = app.theme;
        app.handle_key(key(KeyCode::Char('t')), &board);
        assert_ne!(app.theme, initial);
        assert_eq!(app.handle_key(key(KeyCode::Char('r')), &board), Some(Action::Refresh));
        app.handle_key(key(KeyCode::Char('q')), &board);
        assert!(app.should_quit);
    }
}
