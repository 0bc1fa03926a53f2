use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::Notify;

use epscope_engine::{
    EngineCallbacks, EngineRunner, ProcessEngine, StartOutcome, validate_input_type,
};
use epscope_logs::{ChannelRx, ERR_FILE_NAME, channel};
use epscope_tui::{
    AboutScreen, Action, AppState, DiagnosticsScreen, Event, EventHandler, HelpOverlay,
    KeyBindings, KeyContext, ModalChoice, ReloadModal, ReportScreen, RunOutputScreen, Section, Tui,
};
use epscope_types::{DiagnosticRecord, RunOutcome};

/// HTML table report the engine writes next to the other artifacts.
const HTML_TABLE_FILE: &str = "eplustbl.htm";

/// Epscope - an interactive console around the EnergyPlus engine
#[derive(Parser, Debug)]
#[command(name = "epscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// EnergyPlus input file (.idf, .imf, .epJSON or .json)
    #[arg(value_name = "INPUT", default_value = "in.idf")]
    input: PathBuf,

    /// Directory the engine writes its outputs into
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    output_directory: PathBuf,

    /// EnergyPlus executable to invoke
    #[arg(long, value_name = "PATH", default_value = "energyplus")]
    engine: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Run the application
    let result = run_app(args).await;

    // Handle any errors
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run_app(args: Args) -> Result<()> {
    let mut input = args.input;
    if !validate_input_type(&input) {
        input = PathBuf::from("in.idf");
    }
    if !input.is_file() {
        anyhow::bail!("Input file does not exist at '{}'", input.display());
    }

    // The only state shared with the worker: two channels plus this cell.
    let wake = Arc::new(Notify::new());
    let progress = Arc::new(AtomicI32::new(0));

    // Replaced with fresh pairs every time a run starts
    let (_, mut raw_rx) = channel::<String>(Arc::clone(&wake));
    let (_, mut diag_rx) = channel::<DiagnosticRecord>(Arc::clone(&wake));

    let mut state = AppState::new(input, args.output_directory);
    if state.output_directory.join(ERR_FILE_NAME).is_file() {
        state.modal_visible = true;
    }

    let mut runner = EngineRunner::new(
        Arc::new(ProcessEngine::new(&args.engine)),
        Arc::clone(&progress),
    );

    // Initialize TUI
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(250));
    let keybindings = KeyBindings::new();

    // Initial render
    render(&mut tui, &mut state, progress.load(Ordering::Relaxed))?;

    // Main event loop: every input event or channel wake drains both
    // channels before redrawing.
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let context = if state.modal_visible {
                            KeyContext::Modal
                        } else {
                            match state.section {
                                Section::RunOutput => KeyContext::Viewer,
                                Section::Diagnostics => KeyContext::Diagnostics,
                                Section::Reports | Section::About => KeyContext::Global,
                            }
                        };
                        if let Some(action) = keybindings.get_action(context, &key) {
                            handle_action(
                                &mut state, &mut runner, &wake, &progress,
                                &mut raw_rx, &mut diag_rx, action,
                            );
                        }
                    }
                    Event::Mouse(mouse) => {
                        if !state.modal_visible
                            && let Some(action) = state.mouse_action(&mouse)
                        {
                            handle_action(
                                &mut state, &mut runner, &wake, &progress,
                                &mut raw_rx, &mut diag_rx, action,
                            );
                        }
                    }
                    Event::Tick | Event::Resize(_, _) => {}
                    Event::Error(e) => {
                        tracing::warn!(error = %e, "terminal event error");
                    }
                }
            }

            _ = wake.notified() => {}
        }

        drain_channels(&mut state, &mut raw_rx, &mut diag_rx);
        state
            .run_log
            .outcome
            .update(RunOutcome::from_progress(progress.load(Ordering::Relaxed)));

        if state.should_quit {
            break;
        }

        render(&mut tui, &mut state, progress.load(Ordering::Relaxed))?;
    }

    events.shutdown();
    tui.restore()?;

    // Quitting waits for the worker; the engine has no cancellation hook.
    runner.join().await;

    Ok(())
}

/// Drain both worker channels into the application state. The channels have
/// no cross-ordering guarantee, so each is consumed independently.
fn drain_channels(
    state: &mut AppState,
    raw_rx: &mut ChannelRx<String>,
    diag_rx: &mut ChannelRx<DiagnosticRecord>,
) {
    for line in raw_rx.drain() {
        state.append_stdout_line(line);
    }
    for record in diag_rx.drain() {
        state.append_record(record);
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_action(
    state: &mut AppState,
    runner: &mut EngineRunner,
    wake: &Arc<Notify>,
    progress: &Arc<AtomicI32>,
    raw_rx: &mut ChannelRx<String>,
    diag_rx: &mut ChannelRx<DiagnosticRecord>,
    action: Action,
) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::ToggleHelp => {
            state.help_visible = !state.help_visible;
        }

        // Section switching
        Action::SelectSection(section) => {
            state.section = section;
        }
        Action::NextSection => {
            state.section = state.section.next();
        }
        Action::PrevSection => {
            state.section = state.section.prev();
        }

        // Viewer navigation
        Action::LineUp => {
            if let Some(selection) = state.visible_selection_mut() {
                selection.up();
            }
        }
        Action::LineDown => {
            if let Some(selection) = state.visible_selection_mut() {
                selection.down();
            }
        }
        Action::PageUp => {
            let viewport = state.viewport_height;
            if let Some(selection) = state.visible_selection_mut() {
                selection.page_up(viewport);
            }
        }
        Action::PageDown => {
            let viewport = state.viewport_height;
            if let Some(selection) = state.visible_selection_mut() {
                selection.page_down(viewport);
            }
        }
        Action::Home => {
            if let Some(selection) = state.visible_selection_mut() {
                selection.home();
            }
        }
        Action::End => {
            if let Some(selection) = state.visible_selection_mut() {
                selection.end();
            }
        }
        Action::FastForward => {
            if let Some(selection) = state.visible_selection_mut() {
                selection.fast_forward();
            }
        }
        Action::FastBackward => {
            if let Some(selection) = state.visible_selection_mut() {
                selection.fast_backward();
            }
        }
        Action::FocusLog(focused) => {
            state.log_focused = focused;
        }

        Action::ToggleLevel(index) => {
            state.registry.toggle_at(index);
        }

        // Run lifecycle
        Action::StartRun => {
            start_run(state, runner, wake, progress, raw_rx, diag_rx);
        }
        Action::ClearResults => {
            if runner.is_active() {
                state
                    .run_log
                    .push_raw("Cannot clear results while a simulation is running");
            } else {
                state.clear_results();
                progress.store(0, Ordering::Relaxed);
            }
        }
        Action::ReloadResults => {
            if runner.is_active() {
                state
                    .run_log
                    .push_raw("Cannot reload results while a simulation is running");
            } else {
                reload_results(state, progress);
            }
        }
        Action::OpenHtmlReport => {
            open_html_report(state, progress);
        }

        // Startup reload modal
        Action::ModalLeft | Action::ModalRight => {
            state.modal_choice = state.modal_choice.other();
        }
        Action::ModalConfirm => {
            state.modal_visible = false;
            if state.modal_choice == ModalChoice::Reload {
                reload_results(state, progress);
            }
        }
        Action::ModalDismiss => {
            state.modal_visible = false;
        }

        Action::Render => {}
    }
}

fn start_run(
    state: &mut AppState,
    runner: &mut EngineRunner,
    wake: &Arc<Notify>,
    progress: &Arc<AtomicI32>,
    raw_rx: &mut ChannelRx<String>,
    diag_rx: &mut ChannelRx<DiagnosticRecord>,
) {
    if runner.is_active() {
        state.run_log.push_raw("A simulation is already running");
        return;
    }

    let guard_unchanged = state.run_log.has_completed_run;

    let (raw_tx, new_raw_rx) = channel(Arc::clone(wake));
    let (diag_tx, new_diag_rx) = channel(Arc::clone(wake));
    let callbacks = EngineCallbacks::new(raw_tx, diag_tx, Arc::clone(progress), Arc::clone(wake));

    match runner.start(
        state.input_file.clone(),
        state.output_directory.clone(),
        callbacks,
        guard_unchanged,
    ) {
        StartOutcome::Started => {
            if guard_unchanged {
                state.clear_results();
            }
            *raw_rx = new_raw_rx;
            *diag_rx = new_diag_rx;
        }
        StartOutcome::AlreadyRunning => {
            state.run_log.push_raw("A simulation is already running");
        }
        StartOutcome::InputUnchanged { modified } => {
            let modified: chrono::DateTime<chrono::Local> = modified.into();
            state.run_log.push_raw("-".repeat(74));
            state.run_log.push_raw(format!(
                "Refusing to rerun {}, it was not modified since the last run. Last modified time: {}",
                state.input_file.display(),
                modified.format("%Y-%m-%d %H:%M:%S"),
            ));
        }
    }
}

fn reload_results(state: &mut AppState, progress: &Arc<AtomicI32>) {
    state.reload_results();
    let reloaded = match state.run_log.outcome {
        RunOutcome::Success => 100,
        RunOutcome::Failed => -1,
        RunOutcome::Pending => 0,
    };
    progress.store(reloaded, Ordering::Relaxed);
}

fn open_html_report(state: &mut AppState, progress: &Arc<AtomicI32>) {
    if progress.load(Ordering::Relaxed) < 100 {
        return;
    }

    let path = state.output_directory.join(HTML_TABLE_FILE);
    if !path.is_file() {
        state
            .run_log
            .push_raw(format!("No HTML table report at {}", path.display()));
        return;
    }

    let spawned = if cfg!(target_os = "windows") {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(&path)
            .spawn()
    } else if cfg!(target_os = "macos") {
        std::process::Command::new("open").arg(&path).spawn()
    } else {
        std::process::Command::new("xdg-open").arg(&path).spawn()
    };

    if let Err(err) = spawned {
        state
            .run_log
            .push_raw(format!("Could not open {}: {err}", path.display()));
    }
}

fn render(tui: &mut Tui, state: &mut AppState, progress: i32) -> Result<()> {
    tui.terminal().draw(|frame| {
        match state.section {
            Section::RunOutput => RunOutputScreen::render(frame, state, progress),
            Section::Diagnostics => DiagnosticsScreen::render(frame, state),
            Section::Reports => ReportScreen::render(frame, state, progress),
            Section::About => AboutScreen::render(frame, state),
        }

        // Render the reload modal if visible
        if state.modal_visible {
            ReloadModal::render(frame, &state.output_directory, state.modal_choice);
        }

        // Render help overlay if visible
        if state.help_visible {
            HelpOverlay::render(frame);
        }
    })?;

    Ok(())
}
