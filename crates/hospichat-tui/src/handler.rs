use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use hospichat_core::{Action, Effect};
use tokio::sync::mpsc::UnboundedSender;
use crate::app::App;
use crate::tui::AppEvent;

/// Lines moved per mouse wheel notch
const WHEEL_STEP: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Settled(result) => dispatch(app, Action::Settled(result), tx),
    }
}

/// Apply an action and run whatever effect it asks for.
fn dispatch(app: &mut App, action: Action, tx: &UnboundedSender<AppEvent>) {
    if let Some(effect) = app.dispatch(action) {
        run_effect(app, effect, tx);
    }
}

fn run_effect(app: &App, effect: Effect, tx: &UnboundedSender<AppEvent>) {
    match effect {
        Effect::SendChat { message } => {
            let client = app.client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = client.send(&message).await;
                // The UI may already be gone; a late reply is simply dropped
                if tx.send(AppEvent::Settled(result)).is_err() {
                    tracing::debug!("reply arrived after shutdown");
                }
            });
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    let picking_example = app.state.shows_examples() && app.state.input().is_empty();

    match key.code {
        // Esc dismisses a notice first, then quits
        KeyCode::Esc => {
            if app.state.notice().is_some() {
                app.dispatch(Action::DismissNotice);
            } else {
                app.should_quit = true;
            }
        }

        KeyCode::Enter => {
            let action = match app.selected_example() {
                Some(i) if picking_example => Action::SubmitExample(i),
                _ => Action::Submit,
            };
            dispatch(app, action, tx);
        }

        // Up/Down pick an example question until the first message, then scroll
        KeyCode::Down => {
            if picking_example {
                app.example_nav_down();
            } else {
                app.scroll_down(1);
            }
        }
        KeyCode::Up => {
            if picking_example {
                app.example_nav_up();
            } else {
                app.scroll_up(1);
            }
        }
        KeyCode::PageDown => {
            let page = app.page_size();
            app.scroll_down(page);
        }
        KeyCode::PageUp => {
            let page = app.page_size();
            app.scroll_up(page);
        }

        // Input editing
        KeyCode::Backspace => {
            app.dispatch(Action::Backspace);
        }
        KeyCode::Delete => {
            app.dispatch(Action::Delete);
        }
        KeyCode::Left => {
            app.dispatch(Action::CursorLeft);
        }
        KeyCode::Right => {
            app.dispatch(Action::CursorRight);
        }
        KeyCode::Home => {
            app.dispatch(Action::CursorHome);
        }
        KeyCode::End => {
            app.dispatch(Action::CursorEnd);
        }
        // Ctrl/Alt chords are not text
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
            app.dispatch(Action::InsertChar(c));
        }

        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let over_chat = app.chat_area.map_or(true, |area| {
        mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height
    });
    if !over_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(WHEEL_STEP),
        MouseEventKind::ScrollDown => app.scroll_down(WHEEL_STEP),
        _ => {}
    }
}
