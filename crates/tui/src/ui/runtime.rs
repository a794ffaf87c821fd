//! Runtime: event loop and input routing for the wizard.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over terminal input, animation ticks and the
//!   outstanding registration request.
//! - Route keys through [`MainView`] and execute the returned `Effect`s.
//!
//! The registration request is the loop's only long-running work. It runs on
//! its own task so the throbber keeps animating, and its result is fed back
//! as `Msg::SubmissionCompleted` on the loop thread.
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use enroll_api::{ApiError, RegistrationService};
use enroll_types::RegistrationResponse;
use enroll_util::ClientConfig;
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::app::{App, Effect, Msg};
use crate::ui::main_component::MainView;

type PendingSubmission = JoinHandle<Result<RegistrationResponse, ApiError>>;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(100);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn is_ctrl_c(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Translate a raw terminal event into app updates. Resizes only need the
/// redraw the loop performs after every event.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => main_view.handle_key_events(app, key_event),
        _ => Vec::new(),
    }
}

fn process_effects(effects: Vec<Effect>, app: &App, pending: &mut FuturesUnordered<PendingSubmission>) {
    for effect in effects {
        match effect {
            Effect::SubmitRegistration(payload) => {
                let service = app.coordinator.service();
                pending.push(tokio::spawn(async move { service.register(&payload).await }));
            }
        }
    }
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop, and restores the terminal on exit.
pub async fn run_app(config: ClientConfig, service: Arc<dyn RegistrationService>) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let mut app = App::new(&config.user_type, service);
    let mut terminal = setup_terminal()?;
    info!(url = %config.register_url(), "registration wizard started");

    let mut pending: FuturesUnordered<PendingSubmission> = FuturesUnordered::new();

    // Ticking strategy: fast while the wait modal animates, slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    loop {
        let needs_animation = app.notifications.is_blocking();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if is_ctrl_c(&event) {
                    break;
                }
                let effects = handle_input_event(&mut app, &mut main_view, event);
                process_effects(effects, &app, &mut pending);
                needs_render = true;
            }

            _ = ticker.tick() => {
                app.update(Msg::Tick);
                needs_render = needs_animation;
            }

            Some(joined) = pending.next(), if !pending.is_empty() => {
                let result = joined.unwrap_or_else(|error| Err(ApiError::Interrupted(error.to_string())));
                let effects = app.update(Msg::SubmissionCompleted(result));
                process_effects(effects, &app, &mut pending);
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use enroll_types::SubmissionPayload;

    #[tokio::test]
    async fn submit_effect_runs_through_the_app_service() {
        let app = test_app();
        let mut pending: FuturesUnordered<PendingSubmission> = FuturesUnordered::new();
        process_effects(
            vec![Effect::SubmitRegistration(SubmissionPayload::default())],
            &app,
            &mut pending,
        );
        assert_eq!(pending.len(), 1);

        let joined = pending.next().await.expect("one pending submission");
        let result = joined.expect("task completes");
        assert!(matches!(result, Err(ApiError::Interrupted(_))));
        assert!(pending.is_empty());
    }
}
