use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::drill::DrillEvent;

pub enum AppEvent {
    Key(KeyEvent),
    /// Nothing happened for one tick; redraw the timer.
    Tick,
    Resize,
}

/// Polls the terminal on a background thread so the draw loop can wake on ticks.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                let next = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => AppEvent::Key(key),
                        Ok(Event::Resize(_, _)) => AppEvent::Resize,
                        _ => continue,
                    }
                } else {
                    AppEvent::Tick
                };
                if tx.send(next).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Map a key press to a drill event. Releases, repeats and unbound keys map to `None`.
pub fn drill_event(key: KeyEvent) -> Option<DrillEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(DrillEvent::Quit),
            KeyCode::Char('j') | KeyCode::Char('m') => Some(DrillEvent::Enter),
            KeyCode::Char('h') => Some(DrillEvent::Backspace),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(DrillEvent::Quit),
        KeyCode::Enter => Some(DrillEvent::Enter),
        KeyCode::Backspace => Some(DrillEvent::Backspace),
        KeyCode::Tab => Some(DrillEvent::Char('\t')),
        KeyCode::Char(ch) => Some(DrillEvent::Char(ch)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn printable_keys_become_chars() {
        assert_eq!(
            drill_event(press(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(DrillEvent::Char('a'))
        );
        assert_eq!(
            drill_event(press(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(DrillEvent::Char('A'))
        );
    }

    #[test]
    fn control_keys() {
        assert_eq!(
            drill_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(DrillEvent::Quit)
        );
        assert_eq!(
            drill_event(press(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(DrillEvent::Enter)
        );
        assert_eq!(drill_event(press(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
        assert_eq!(
            drill_event(press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(DrillEvent::Quit)
        );
        assert_eq!(
            drill_event(press(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(DrillEvent::Backspace)
        );
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(drill_event(release), None);
    }
}
