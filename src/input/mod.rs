use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::AppState;
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            if !event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                continue;
            }
            let ev = match event::read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                _ => continue,
            };
            if tx.blocking_send(Event::Input(ev)).is_err() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Key(k) => map_key(state, k),
    }
}

fn map_key(state: &AppState, k: crossterm::event::KeyEvent) -> Option<Action> {
    if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    // The help overlay swallows everything except its own toggles.
    if state.show_help {
        return match k.code {
            KeyCode::Char('?') | KeyCode::Esc => Some(Action::ToggleHelp),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    match k.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::TogglePreview),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::PreviewVolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::PreviewVolumeDown),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('s') => Some(Action::OpenSpotify),
        KeyCode::Char('y') => Some(Action::OpenYoutube),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_normal_keys() {
        let state = AppState::default();
        assert_eq!(map_input_to_action(&state, key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(
            map_input_to_action(&state, key(KeyCode::Char(' '))),
            Some(Action::TogglePreview)
        );
        assert_eq!(
            map_input_to_action(&state, key(KeyCode::Char('+'))),
            Some(Action::PreviewVolumeUp)
        );
        assert_eq!(map_input_to_action(&state, key(KeyCode::Char('r'))), Some(Action::Refresh));
        assert_eq!(
            map_input_to_action(&state, key(KeyCode::Char('s'))),
            Some(Action::OpenSpotify)
        );
        assert_eq!(
            map_input_to_action(&state, key(KeyCode::Char('y'))),
            Some(Action::OpenYoutube)
        );
        assert_eq!(map_input_to_action(&state, key(KeyCode::Char('x'))), None);
        assert_eq!(map_input_to_action(&state, InputEvent::Resize), Some(Action::Resize));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut state = AppState::default();
        state.show_help = true;
        let ev = InputEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_input_to_action(&state, ev), Some(Action::Quit));
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut state = AppState::default();
        state.show_help = true;
        assert_eq!(map_input_to_action(&state, key(KeyCode::Char('p'))), None);
        assert_eq!(map_input_to_action(&state, key(KeyCode::Char('s'))), None);
        assert_eq!(map_input_to_action(&state, key(KeyCode::Esc)), Some(Action::ToggleHelp));
    }
}
