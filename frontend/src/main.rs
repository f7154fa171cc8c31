use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use taskboard_client::{
    api::{HttpTaskApi, TaskApi},
    app::{dispatch, App},
    config::ClientConfig,
    store::TaskStore,
    ui,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::load()?;
    let _log_guard = init_tracing(&config)?;

    let store = Arc::new(TaskStore::new(HttpTaskApi::new(config.api_url.clone())));
    tracing::info!(api_url = %config.api_url, "starting task board");
    {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.init().await });
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run_app(&mut terminal, &store);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    store.dispose();

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }
    Ok(())
}

fn run_app<B, A>(terminal: &mut Terminal<B>, store: &Arc<TaskStore<A>>) -> io::Result<()>
where
    B: Backend,
    A: TaskApi + 'static,
{
    let mut app = App::new();
    loop {
        let board = store.snapshot();
        app.sync(&board);
        terminal.draw(|f| ui::draw(f, &app, &board))?;

        if event::poll(Duration::from_millis(100))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key, &board),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    app.handle_mouse(mouse, Rect::new(0, 0, size.width, size.height), &board)
                }
                _ => None,
            };
            if let Some(action) = action {
                dispatch(store, action);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn init_tracing(config: &ClientConfig) -> io::Result<WorkerGuard> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,taskboard_client=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(guard)
}
