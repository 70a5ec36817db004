use std::time::Instant;

use tracing::warn;

use crate::model::tree::{LoadState, TreeNode};
use crate::remote::client::RemoteFs;
use crate::remote::protocol::EntryKind;
use crate::sync::{MoveGesture, MoveStep, TreeSync};

/// One row of the rendered tree: everything the presentation layer needs
/// for a materialized node (disclosure, icon, label, timestamp) plus the
/// path to re-enter the tree on the next intent.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub icon_type: String,
    pub last_modified: String,
    pub load_state: LoadState,
    pub depth: usize,
    pub is_last_sibling: bool,
}

/// Raw text of an opened remote file, shown in an overlay.
#[derive(Debug, Clone)]
pub struct FilePreview {
    pub path: String,
    pub contents: String,
}

/// Main application state.
pub struct App<R: RemoteFs> {
    pub sync: TreeSync<R>,
    pub move_gesture: MoveGesture,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub preview: Option<FilePreview>,
    pub status_message: Option<(String, Instant)>,
    /// Root-load failure is fatal to the display: set once, never cleared.
    pub fatal_error: Option<String>,
    pub should_quit: bool,
}

impl<R: RemoteFs> App<R> {
    pub fn new(remote: R) -> Self {
        Self {
            sync: TreeSync::new(remote),
            move_gesture: MoveGesture::default(),
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            preview: None,
            status_message: None,
            fatal_error: None,
            should_quit: false,
        }
    }

    /// One-shot initial load. A failure leaves the model empty and puts
    /// the app into the persistent error state — no retry.
    pub async fn init(&mut self) {
        if let Err(e) = self.sync.load_root().await {
            warn!(error = %e, "initial root load failed");
            self.fatal_error = Some(e.to_string());
            return;
        }
        self.refresh_flat();
    }

    /// Rebuild the flat row list from the materialized tree.
    ///
    /// The synthetic root is not rendered; its children appear at depth 0.
    /// A directory's children are shown only when it is `Loaded` — the
    /// disclosure follows confirmed state, not the click that asked for it.
    pub fn refresh_flat(&mut self) {
        self.flat_items.clear();
        Self::flatten_children(&self.sync.root, 0, &mut self.flat_items);
        if !self.flat_items.is_empty() && self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    fn flatten_children(node: &TreeNode, depth: usize, items: &mut Vec<FlatItem>) {
        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            items.push(FlatItem {
                name: child.name.clone(),
                path: child.full_path().to_string(),
                kind: child.kind,
                icon_type: child.icon_type_name(),
                last_modified: child.last_modified.clone(),
                load_state: child.load_state,
                depth,
                is_last_sibling: i == count - 1,
            });
            if child.load_state == LoadState::Loaded {
                Self::flatten_children(child, depth + 1, items);
            }
        }
    }

    pub fn selected(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.flat_items.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        let len = self.flat_items.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Update the scroll offset to keep the selected item visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Activate the selected entry: a move-gesture step when the gesture
    /// is live, otherwise expand/collapse for directories and open for
    /// files.
    pub async fn activate_selected(&mut self) {
        let Some(item) = self.selected().cloned() else {
            return;
        };
        match self.move_gesture.activate(&item.path, item.kind) {
            MoveStep::Inactive => self.activate_entry(&item).await,
            MoveStep::SourceStaged => {
                self.set_status_message(format!(
                    "Moving {} — select a destination directory",
                    item.path
                ));
            }
            MoveStep::Abandoned => {
                self.set_status_message("Move cancelled: destination must be a directory".into());
            }
            MoveStep::Request {
                source,
                destination,
            } => self.perform_move(&source, &destination).await,
        }
    }

    async fn activate_entry(&mut self, item: &FlatItem) {
        match item.kind {
            EntryKind::Directory => match item.load_state {
                LoadState::Unloaded => self.expand_path(&item.path).await,
                LoadState::Loaded => self.collapse_path(&item.path),
                LoadState::Loading => {}
            },
            EntryKind::File => self.open_path(&item.path).await,
        }
    }

    /// Expand the selected directory (no-op on files and loaded dirs).
    pub async fn expand_selected(&mut self) {
        if let Some(item) = self.selected().cloned() {
            if item.kind.is_directory() && item.load_state == LoadState::Unloaded {
                self.expand_path(&item.path).await;
            }
        }
    }

    /// Collapse the selected directory (no-op unless loaded).
    pub fn collapse_selected(&mut self) {
        if let Some(item) = self.selected().cloned() {
            if item.kind.is_directory() && item.load_state == LoadState::Loaded {
                self.collapse_path(&item.path);
            }
        }
    }

    async fn expand_path(&mut self, path: &str) {
        if let Err(e) = self.sync.expand(path).await {
            self.set_status_message(format!("Expand failed: {}", e));
        }
        self.refresh_flat();
    }

    fn collapse_path(&mut self, path: &str) {
        self.sync.collapse(path);
        self.refresh_flat();
    }

    async fn open_path(&mut self, path: &str) {
        match self.sync.open_file(path).await {
            Ok(contents) => {
                self.preview = Some(FilePreview {
                    path: path.to_string(),
                    contents,
                });
            }
            Err(e) => self.set_status_message(format!("Open failed: {}", e)),
        }
    }

    async fn perform_move(&mut self, source: &str, destination: &str) {
        if let Err(e) = self.sync.move_entry(source, destination).await {
            self.set_status_message(format!("Move failed: {}", e));
            return;
        }
        // Full reset and fresh root fetch; no incremental patching.
        self.sync.reset();
        self.selected_index = 0;
        self.scroll_offset = 0;
        match self.sync.load_root().await {
            Ok(()) => {
                self.refresh_flat();
                self.set_status_message(format!("Moved {} into {}", source, destination));
            }
            Err(e) => {
                // Same failure class as the initial load, same treatment.
                self.fatal_error = Some(e.to_string());
                self.flat_items.clear();
            }
        }
    }

    /// Enter moving mode: the next activation stages the source.
    pub fn start_move(&mut self) {
        self.move_gesture.start();
        if self.move_gesture.is_active() {
            self.set_status_message("Move: select the entry to move".into());
        }
    }

    /// Abandon the move gesture without sending anything.
    pub fn cancel_move(&mut self) {
        if self.move_gesture.is_active() {
            self.move_gesture.cancel();
            self.set_status_message("Move cancelled".into());
        }
    }

    pub fn dismiss_preview(&mut self) {
        self.preview = None;
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 5 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 5 {
                self.status_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use crate::remote::protocol::DirEntry;
    use std::collections::HashMap;

    struct FakeRemote {
        listings: HashMap<String, Vec<DirEntry>>,
        files: HashMap<String, String>,
        fail_move: bool,
        fail_root: bool,
    }

    impl FakeRemote {
        fn sample() -> Self {
            let mut listings = HashMap::new();
            listings.insert(
                "/".to_string(),
                vec![
                    entry("docs", EntryKind::Directory),
                    entry("readme.md", EntryKind::File),
                ],
            );
            listings.insert(
                "/docs".to_string(),
                vec![entry("guide.txt", EntryKind::File)],
            );
            let mut files = HashMap::new();
            files.insert("/readme.md".to_string(), "# hi".to_string());
            Self {
                listings,
                files,
                fail_move: false,
                fail_root: false,
            }
        }

        fn err(path: &str) -> AppError {
            AppError::Status {
                status: 500,
                path: path.to_string(),
            }
        }
    }

    fn entry(name: &str, kind: EntryKind) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            kind,
            last_modified_time: "2024-05-01".to_string(),
        }
    }

    impl RemoteFs for FakeRemote {
        async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
            if path == "/" && self.fail_root {
                return Err(Self::err(path));
            }
            self.listings
                .get(path)
                .cloned()
                .ok_or_else(|| Self::err(path))
        }

        async fn read_file(&self, path: &str) -> Result<String> {
            self.files.get(path).cloned().ok_or_else(|| Self::err(path))
        }

        async fn move_entry(&self, source: &str, _destination: &str) -> Result<()> {
            if self.fail_move {
                return Err(Self::err(source));
            }
            Ok(())
        }
    }

    async fn setup_app() -> App<FakeRemote> {
        let mut app = App::new(FakeRemote::sample());
        app.init().await;
        app
    }

    #[tokio::test]
    async fn init_flattens_root_children() {
        let app = setup_app().await;
        assert!(app.fatal_error.is_none());
        let names: Vec<&str> = app.flat_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["docs", "readme.md"]);
        assert_eq!(app.flat_items[0].depth, 0);
        assert!(app.flat_items[1].is_last_sibling);
    }

    #[tokio::test]
    async fn init_failure_sets_fatal_error() {
        let mut remote = FakeRemote::sample();
        remote.fail_root = true;
        let mut app = App::new(remote);
        app.init().await;
        assert!(app.fatal_error.is_some());
        assert!(app.flat_items.is_empty());
    }

    #[tokio::test]
    async fn activate_directory_expands_then_collapses() {
        let mut app = setup_app().await;
        app.activate_selected().await;
        let names: Vec<&str> = app.flat_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["docs", "guide.txt", "readme.md"]);
        assert_eq!(app.flat_items[1].depth, 1);
        assert_eq!(app.flat_items[1].path, "/docs/guide.txt");

        app.activate_selected().await;
        let names: Vec<&str> = app.flat_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["docs", "readme.md"]);
    }

    #[tokio::test]
    async fn activate_file_opens_preview() {
        let mut app = setup_app().await;
        app.select_last();
        app.activate_selected().await;
        let preview = app.preview.as_ref().unwrap();
        assert_eq!(preview.path, "/readme.md");
        assert_eq!(preview.contents, "# hi");
        app.dismiss_preview();
        assert!(app.preview.is_none());
    }

    #[tokio::test]
    async fn failed_open_reports_status_and_keeps_tree() {
        let mut app = setup_app().await;
        let before = app.flat_items.len();
        app.open_path("/nope.txt").await;
        assert!(app.preview.is_none());
        assert!(app.status_message.is_some());
        assert_eq!(app.flat_items.len(), before);
    }

    #[tokio::test]
    async fn move_gesture_full_flow_resets_tree() {
        let mut app = setup_app().await;
        app.start_move();
        app.select_last(); // readme.md as source
        app.activate_selected().await;
        assert!(matches!(
            app.move_gesture,
            MoveGesture::AwaitingDestination { .. }
        ));
        app.select_first(); // docs as destination
        app.activate_selected().await;
        assert_eq!(app.move_gesture, MoveGesture::Idle);
        assert_eq!(app.selected_index, 0);
        // Tree was rebuilt from a fresh root fetch.
        assert_eq!(app.flat_items.len(), 2);
    }

    #[tokio::test]
    async fn move_gesture_file_destination_abandons_without_reset() {
        let mut app = setup_app().await;
        app.activate_selected().await; // expand /docs
        app.start_move();
        app.select_first();
        app.activate_selected().await; // stage /docs
        app.select_last();
        app.activate_selected().await; // readme.md — invalid destination
        assert_eq!(app.move_gesture, MoveGesture::Idle);
        // No reset happened: /docs is still expanded.
        assert!(app.flat_items.iter().any(|i| i.path == "/docs/guide.txt"));
    }

    #[tokio::test]
    async fn failed_move_keeps_model_unchanged() {
        let mut remote = FakeRemote::sample();
        remote.fail_move = true;
        let mut app = App::new(remote);
        app.init().await;
        app.start_move();
        app.activate_selected().await; // stage /docs
        app.activate_selected().await; // /docs again as destination
        assert!(app.status_message.as_ref().unwrap().0.contains("Move failed"));
        assert_eq!(app.flat_items.len(), 2);
    }

    #[tokio::test]
    async fn selection_clamps_at_boundaries() {
        let mut app = setup_app().await;
        app.select_previous();
        assert_eq!(app.selected_index, 0);
        app.select_last();
        let last = app.selected_index;
        app.select_next();
        assert_eq!(app.selected_index, last);
    }

    #[tokio::test]
    async fn collapse_clamps_selection() {
        let mut app = setup_app().await;
        app.activate_selected().await; // expand /docs -> 3 rows
        app.select_last();
        app.select_first();
        app.activate_selected().await; // collapse -> 2 rows
        assert!(app.selected_index < app.flat_items.len());
    }

    #[tokio::test]
    async fn expand_selected_ignores_files() {
        let mut app = setup_app().await;
        app.select_last();
        app.expand_selected().await;
        assert!(app.preview.is_none());
        assert_eq!(app.flat_items.len(), 2);
    }

    #[tokio::test]
    async fn update_scroll_follows_selection() {
        let mut app = setup_app().await;
        app.activate_selected().await;
        app.select_last();
        app.update_scroll(1);
        assert_eq!(app.scroll_offset, app.selected_index);
        app.select_first();
        app.update_scroll(1);
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn status_message_expires() {
        let mut app = setup_app().await;
        app.set_status_message("hello".into());
        app.clear_expired_status();
        assert!(app.status_message.is_some());
        app.status_message = Some((
            "old".into(),
            Instant::now() - std::time::Duration::from_secs(6),
        ));
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }
}
