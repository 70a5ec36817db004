//! Wire types for the remote file server's JSON listing API.

use serde::Deserialize;

/// Kind of a remote filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn is_directory(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// One entry of a directory listing as returned by `GET /api/path{path}`.
///
/// `lastModifiedTime` is an opaque display string; the client imposes no
/// ordering semantics on it.
#[derive(Debug, Clone, Deserialize)]
pub struct DirEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(rename = "lastModifiedTime", default)]
    pub last_modified_time: String,
}
