use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tasklist::{
    app::App, config::Config, error::TaskListError, logging, store::FileStore,
    task_list::TaskList, ui,
};
use tracing::{error, info};

fn main() -> Result<(), TaskListError> {
    let config = Config::from_env();
    let _log_guard = logging::init(&config.log_path)?;
    info!(store = %config.store_path.display(), "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let store = Arc::new(FileStore::new(config.store_path.clone()));
    let mut app = App::start(runtime.handle(), store, TaskList::new());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    runtime.block_on(app.shutdown());

    if let Err(err) = result {
        error!(error = %err, "ui loop failed");
        eprintln!("{:?}", err);
    }
    info!("stopped");
    Ok(())
}
