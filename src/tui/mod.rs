pub mod components;

pub mod action;
pub mod component;
pub mod effects;
pub mod keys;
pub mod reducer;
pub mod reducers;
pub mod renderer;
pub mod runtime;
pub mod state;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use action::Action;
pub use component::{Component, Effect, Element};
pub use effects::DataEffects;
pub use keys::key_to_action;
pub use reducer::reduce;
pub use renderer::Renderer;
pub use runtime::Runtime;
pub use state::AppState;
pub use types::SubView;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

use crate::adapter::AdapterProvider;
use crate::data_provider::RecordSource;
use crate::tracker::{PageView, Tracker};

/// Main entry point for TUI mode
///
/// `initial_state` carries the config, translator, preferences and the
/// model built from the command line.
pub async fn run(
    source: Arc<dyn RecordSource>,
    initial_state: AppState,
    mut tracker: Tracker,
) -> Result<(), io::Error> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let page_size = initial_state.system.config.page_size;
    let prefs = initial_state.system.prefs.clone();
    let mut runtime = Runtime::new(initial_state, move |listener| {
        let provider = AdapterProvider::new(source, Handle::current(), page_size, listener);
        DataEffects::new(provider, prefs)
    });

    // Trigger initial data load
    runtime.dispatch(Action::ReloadAdapter { fresh: false });

    let mut renderer = Renderer::new();

    // Main loop
    loop {
        // Process any actions from effects FIRST (so data loads trigger re-render)
        let actions_processed = runtime.process_actions();
        if actions_processed > 0 {
            tracing::debug!("LOOP: Processed {} actions", actions_processed);
        }

        draw_frame(&mut terminal, &runtime, &mut renderer, &mut tracker)?;

        // If actions were processed, continue loop immediately to check for more
        if actions_processed > 0 {
            continue;
        }

        // Poll for keyboard events; the timeout also keeps the spinner moving
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let Some(action) = key_to_action(key, runtime.state()) else {
                    continue;
                };
                if matches!(action, Action::Quit) {
                    tracing::debug!("ACTION: Quitting application");
                    break;
                }
                runtime.dispatch(action);
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Render one frame
///
/// The page path is recorded before drawing, so a changed page is reported
/// only after the frame that shows it.
fn draw_frame<B: Backend>(
    terminal: &mut Terminal<B>,
    runtime: &Runtime,
    renderer: &mut Renderer,
    tracker: &mut Tracker,
) -> Result<Option<PageView>, io::Error> {
    let state = runtime.state();
    tracker.location_changed(&state.page_path());

    terminal.draw(|f| {
        let element = runtime.build();
        let config = &state.system.config.display;
        renderer.render(element, f.area(), f.buffer_mut(), config);
    })?;

    Ok(tracker.on_frame(&state.page_context(), &state.page_title()))
}
