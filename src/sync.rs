//! Lazy synchronization between the client-side tree and the remote server.
//!
//! User intents arrive addressed by path. Each one is resolved against the
//! model, the remote call is made, and the model is mutated only in the
//! completion handler — never speculatively. Handling is single-threaded
//! and cooperative; per-node generation counters invalidate a fetch whose
//! node was collapsed while the request was in flight.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::model::tree::{LoadState, TreeNode};
use crate::remote::client::RemoteFs;
use crate::remote::protocol::{DirEntry, EntryKind};

/// The two-step source-then-destination move interaction.
///
/// Held explicitly (no ambient flags) so it can be tested without a
/// rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MoveGesture {
    #[default]
    Idle,
    /// Moving mode entered, no source staged yet.
    Armed,
    /// A source is staged; the next directory activation is the destination.
    AwaitingDestination { source: String },
}

/// What a single entry activation did to the move gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveStep {
    /// Gesture idle; the activation should be handled normally.
    Inactive,
    /// The entry was staged as the move source.
    SourceStaged,
    /// A directory was chosen as destination; issue the move request.
    Request { source: String, destination: String },
    /// A file was activated as destination; gesture abandoned, no request.
    Abandoned,
}

impl MoveGesture {
    /// Enter moving mode. Only one source may be staged at a time, so this
    /// is a no-op unless the gesture is idle.
    pub fn start(&mut self) {
        if *self == MoveGesture::Idle {
            *self = MoveGesture::Armed;
        }
    }

    /// Abandon the gesture, dropping any staged source.
    pub fn cancel(&mut self) {
        *self = MoveGesture::Idle;
    }

    pub fn is_active(&self) -> bool {
        *self != MoveGesture::Idle
    }

    /// Feed one entry activation through the gesture. The first activation
    /// stages the source (files and directories both eligible); the second
    /// completes against a directory or abandons against a file. Either
    /// way the gesture returns to idle after the second step.
    pub fn activate(&mut self, path: &str, kind: EntryKind) -> MoveStep {
        match std::mem::take(self) {
            MoveGesture::Idle => MoveStep::Inactive,
            MoveGesture::Armed => {
                *self = MoveGesture::AwaitingDestination {
                    source: path.to_string(),
                };
                MoveStep::SourceStaged
            }
            MoveGesture::AwaitingDestination { source } => {
                if kind.is_directory() {
                    MoveStep::Request {
                        source,
                        destination: path.to_string(),
                    }
                } else {
                    MoveStep::Abandoned
                }
            }
        }
    }
}

/// Orchestrates on-demand fetches that populate the tree, teardown on
/// collapse, and move requests, keeping the materialized subtree
/// consistent with the last listing the server returned for it.
pub struct TreeSync<R: RemoteFs> {
    remote: R,
    pub root: TreeNode,
}

impl<R: RemoteFs> TreeSync<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            root: TreeNode::root(),
        }
    }

    /// Fetch the root listing and populate the root's children.
    ///
    /// Exactly one attempt is made per call; the caller decides whether a
    /// failure is fatal (initial load) or recoverable (reload after move).
    pub async fn load_root(&mut self) -> Result<()> {
        let entries = self.remote.list_dir("/").await?;
        info!(count = entries.len(), "root listing loaded");
        attach_listing(&mut self.root, entries);
        self.root.load_state = LoadState::Loaded;
        Ok(())
    }

    /// Throw away the whole tree. Used after a successful move, which
    /// rebuilds from a fresh root fetch instead of patching incrementally.
    pub fn reset(&mut self) {
        self.root = TreeNode::root();
    }

    /// Expand the directory at `path`: fetch its listing and attach one
    /// child per entry.
    ///
    /// No-op (`Ok(false)`) when the path no longer resolves, the node is
    /// not a directory, or it is already loading/loaded. On fetch failure
    /// the node reverts to unloaded and nothing else changes.
    pub async fn expand(&mut self, path: &str) -> Result<bool> {
        let Some(generation) = self.begin_expand(path) else {
            return Ok(false);
        };
        let outcome = self.remote.list_dir(path).await;
        self.finish_expand(path, generation, outcome)
    }

    /// First phase: flip the directory to `Loading` and record the
    /// generation the completion handler must present.
    fn begin_expand(&mut self, path: &str) -> Option<u64> {
        let node = self.root.find_mut(path)?;
        if !node.is_dir() || node.load_state != LoadState::Unloaded {
            return None;
        }
        node.load_state = LoadState::Loading;
        Some(node.generation())
    }

    /// Completion handler: apply a fetched listing unless the node vanished
    /// or was collapsed while the fetch was in flight.
    fn finish_expand(
        &mut self,
        path: &str,
        generation: u64,
        outcome: Result<Vec<DirEntry>>,
    ) -> Result<bool> {
        let Some(node) = self.root.find_mut(path) else {
            debug!(path, "expand result dropped: node gone");
            return Ok(false);
        };
        if node.generation() != generation {
            debug!(path, "expand result dropped: collapsed mid-flight");
            return Ok(false);
        }
        match outcome {
            Ok(entries) => {
                attach_listing(node, entries);
                node.load_state = LoadState::Loaded;
                Ok(true)
            }
            Err(e) => {
                warn!(path, error = %e, "expand failed");
                node.load_state = LoadState::Unloaded;
                Err(e)
            }
        }
    }

    /// Collapse the node at `path`, discarding all descendant state.
    /// Purely local — no request is sent. Returns false for stale paths.
    pub fn collapse(&mut self, path: &str) -> bool {
        match self.root.find_mut(path) {
            Some(node) => {
                node.clear();
                true
            }
            None => false,
        }
    }

    /// Fetch the raw text contents of the file at `path`.
    pub async fn open_file(&self, path: &str) -> Result<String> {
        self.remote.read_file(path).await
    }

    /// Ask the server to move `source` under the directory `destination`.
    ///
    /// The model is not touched here; on success the caller resets the
    /// tree and refetches the root.
    pub async fn move_entry(&self, source: &str, destination: &str) -> Result<()> {
        info!(source, destination, "moving entry");
        self.remote.move_entry(source, destination).await
    }
}

fn attach_listing(node: &mut TreeNode, entries: Vec<DirEntry>) {
    for entry in entries {
        node.add_child(TreeNode::from_entry(entry));
    }
}
