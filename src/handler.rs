use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::remote::client::RemoteFs;

/// Handle a key event.
///
/// Remote intents (expand, open, move) are awaited inline: the event loop
/// is single-threaded and the model mutates only when the fetch resolves.
pub async fn handle_key_event<R: RemoteFs>(app: &mut App<R>, key: KeyEvent) {
    // The error screen is terminal: only quitting works there.
    if app.fatal_error.is_some() {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            app.quit();
        }
        return;
    }

    // An open preview swallows the next key press.
    if app.preview.is_some() {
        app.dismiss_preview();
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.activate_selected().await,
        KeyCode::Right | KeyCode::Char('l') => app.expand_selected().await,
        KeyCode::Left | KeyCode::Char('h') => app.collapse_selected(),
        KeyCode::Char('m') => app.start_move(),
        KeyCode::Esc => app.cancel_move(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::remote::protocol::{DirEntry, EntryKind};

    struct StubRemote;

    impl RemoteFs for StubRemote {
        async fn list_dir(&self, _path: &str) -> Result<Vec<DirEntry>> {
            Ok(vec![
                DirEntry {
                    name: "dir".into(),
                    kind: EntryKind::Directory,
                    last_modified_time: String::new(),
                },
                DirEntry {
                    name: "file.txt".into(),
                    kind: EntryKind::File,
                    last_modified_time: String::new(),
                },
            ])
        }

        async fn read_file(&self, _path: &str) -> Result<String> {
            Ok("contents".into())
        }

        async fn move_entry(&self, _source: &str, _destination: &str) -> Result<()> {
            Ok(())
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[tokio::test]
    async fn q_quits() {
        let mut app = App::new(StubRemote);
        app.init().await;
        handle_key_event(&mut app, key(KeyCode::Char('q'))).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn navigation_keys_move_selection() {
        let mut app = App::new(StubRemote);
        app.init().await;
        handle_key_event(&mut app, key(KeyCode::Down)).await;
        assert_eq!(app.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Char('k'))).await;
        assert_eq!(app.selected_index, 0);
    }

    #[tokio::test]
    async fn enter_on_file_opens_and_any_key_dismisses() {
        let mut app = App::new(StubRemote);
        app.init().await;
        app.select_last();
        handle_key_event(&mut app, key(KeyCode::Enter)).await;
        assert!(app.preview.is_some());
        handle_key_event(&mut app, key(KeyCode::Char('x'))).await;
        assert!(app.preview.is_none());
    }

    #[tokio::test]
    async fn fatal_error_only_quit_works() {
        let mut app = App::new(StubRemote);
        app.fatal_error = Some("boom".into());
        handle_key_event(&mut app, key(KeyCode::Down)).await;
        assert_eq!(app.selected_index, 0);
        assert!(!app.should_quit);
        handle_key_event(&mut app, key(KeyCode::Char('q'))).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn esc_cancels_move_gesture() {
        let mut app = App::new(StubRemote);
        app.init().await;
        handle_key_event(&mut app, key(KeyCode::Char('m'))).await;
        assert!(app.move_gesture.is_active());
        handle_key_event(&mut app, key(KeyCode::Esc)).await;
        assert!(!app.move_gesture.is_active());
    }
}
