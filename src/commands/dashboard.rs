//! Dashboard command implementation
//!
//! Runs the interactive terminal dashboard. Loads are spawned on the tokio
//! runtime and report back over a channel, so the stats and requests tracks
//! proceed independently while the UI keeps drawing.

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{future::Future, io, sync::Arc, time::Duration};
use tokio::sync::mpsc::{self, UnboundedSender};

use timeglass_dashboard::{
    api::ApiClient,
    config::Config,
    dashboard::{Action, Dashboard, DashboardApp, RequestsQuery},
    error::{ApiError, ApiResult},
    models::{RequestRecord, StatsSummary},
    ErrorReporter,
};

/// Result of a spawned load, applied on the UI task
enum LoadEvent {
    Stats(ApiResult<StatsSummary>),
    Requests(RequestsQuery, ApiResult<Vec<RequestRecord>>),
    /// A failure reported through the error reporter, shown in the footer
    Unexpected(String),
}

/// Execute the dashboard command
///
/// # Arguments
/// * `cfg` - Effective configuration (base URL, page size)
/// * `reporter` - Receives failures no dashboard region can show
pub async fn execute(cfg: &Config, reporter: ErrorReporter) -> Result<()> {
    let api = ApiClient::new(cfg.api.base_url.clone());
    let dashboard = Dashboard::new(cfg.dashboard.page_size);
    let mut app = DashboardApp::new(dashboard, api.base_url().to_string());

    tracing::info!(base_url = %api.base_url(), page_size = cfg.dashboard.page_size, "Starting dashboard");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_dashboard(&mut terminal, &mut app, &api, &reporter).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        reporter(e);
    }
    result
}

async fn run_dashboard(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut DashboardApp,
    api: &ApiClient,
    reporter: &ErrorReporter,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ui_reporter = forward_to_notice(reporter.clone(), tx.clone());
    let reporter = &ui_reporter;

    // Initial load
    start_refresh(app, api, &tx, reporter);

    loop {
        while let Ok(load) = rx.try_recv() {
            apply_load(app, load);
        }

        terminal.draw(|f| app.render(f))?;

        // Handle events with timeout
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::Quit => return Ok(()),
            Action::Refresh => start_refresh(app, api, &tx, reporter),
            Action::LoadMore => {
                if let Some(query) = app.dashboard.begin_load_more() {
                    spawn_requests(api, query, &tx, reporter);
                }
            }
            Action::ApplyFilters(inputs) => {
                if let Some(query) = app.dashboard.begin_apply_filters(&inputs) {
                    spawn_requests(api, query, &tx, reporter);
                }
            }
            Action::None => {}
        }
    }
}

/// Kick off a stats load and a reset requests load
fn start_refresh(
    app: &mut DashboardApp,
    api: &ApiClient,
    tx: &UnboundedSender<LoadEvent>,
    reporter: &ErrorReporter,
) {
    if app.dashboard.begin_stats() {
        let api = api.clone();
        spawn_load(
            async move { LoadEvent::Stats(api.get_stats().await) },
            |reason| LoadEvent::Stats(Err(ApiError::Aborted(reason))),
            tx,
            reporter,
        );
    }
    if let Some(query) = app.dashboard.begin_requests(true) {
        spawn_requests(api, query, tx, reporter);
    }
}

fn spawn_requests(
    api: &ApiClient,
    query: RequestsQuery,
    tx: &UnboundedSender<LoadEvent>,
    reporter: &ErrorReporter,
) {
    let api = api.clone();
    let fallback_query = query.clone();
    spawn_load(
        async move {
            let result = api.get_requests(&query.to_params()).await;
            LoadEvent::Requests(query, result)
        },
        move |reason| LoadEvent::Requests(fallback_query, Err(ApiError::Aborted(reason))),
        tx,
        reporter,
    );
}

/// Run a load on the runtime. If the task dies, the reporter hears about it
/// and the track still gets a (failed) result so it leaves the loading state.
fn spawn_load<F, A>(load: F, on_abort: A, tx: &UnboundedSender<LoadEvent>, reporter: &ErrorReporter)
where
    F: Future<Output = LoadEvent> + Send + 'static,
    A: FnOnce(String) -> LoadEvent + Send + 'static,
{
    let handle = tokio::spawn(load);
    let tx = tx.clone();
    let reporter = reporter.clone();

    tokio::spawn(async move {
        let event = match handle.await {
            Ok(event) => event,
            Err(e) => {
                let _ = tx.send(on_abort(e.to_string()));
                reporter(&anyhow::Error::new(e).context("Dashboard load task failed"));
                return;
            }
        };
        // The receiver is gone only after the UI has quit
        let _ = tx.send(event);
    });
}

/// Wrap `reporter` so every report also reaches the footer notice
fn forward_to_notice(reporter: ErrorReporter, tx: UnboundedSender<LoadEvent>) -> ErrorReporter {
    Arc::new(move |err: &anyhow::Error| {
        reporter(err);
        let _ = tx.send(LoadEvent::Unexpected(format!("{:#}", err)));
    })
}

fn apply_load(app: &mut DashboardApp, load: LoadEvent) {
    match load {
        LoadEvent::Stats(result) => app.dashboard.finish_stats(result),
        LoadEvent::Requests(query, result) => {
            app.dashboard.finish_requests(&query, result);
            app.clamp_selection();
        }
        LoadEvent::Unexpected(message) => {
            app.dashboard.report_unexpected(&message);
            return;
        }
    }
    app.last_update = Some(Local::now());
}
