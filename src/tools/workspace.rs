//! Workspace root and path containment
//!
//! All file/shell tools resolve paths against one fixed workspace root.
//! Containment is decided on lexically normalized paths with a component-wise
//! prefix check, so a sibling directory whose name merely starts with the
//! root's name (e.g. `/work/ws-old` next to root `/work/ws`) does not pass.

use std::io;
use std::path::{Component, Path, PathBuf};

/// The filesystem directory all tool paths are resolved and constrained against
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open (creating if needed) and canonicalize the workspace root
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    /// The canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a tool-supplied path inside the workspace
    ///
    /// Relative paths are joined onto the root; absolute paths are accepted
    /// only when they already point inside it. Returns `None` when the
    /// normalized result escapes the root.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let supplied = Path::new(path);
        let joined = if supplied.is_absolute() {
            supplied.to_path_buf()
        } else {
            self.root.join(supplied)
        };

        let normalized = normalize(&joined);
        if normalized.starts_with(&self.root) {
            Some(normalized)
        } else {
            None
        }
    }

    /// Render a contained absolute path relative to the root, for payloads
    pub fn relative(&self, abs: &Path) -> String {
        abs.strip_prefix(&self.root)
            .unwrap_or(abs)
            .to_string_lossy()
            .into_owned()
    }
}

/// Lexically normalize a path: drop `.`, fold `..` into its parent
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();
        (dir, ws)
    }

    #[test]
    fn test_relative_path_resolves_inside_root() {
        let (_dir, ws) = workspace();
        let resolved = ws.resolve("sub/file.txt").unwrap();
        assert!(resolved.starts_with(ws.root()));
        assert!(resolved.ends_with("sub/file.txt"));
    }

    #[test]
    fn test_parent_traversal_is_rejected() {
        let (_dir, ws) = workspace();
        assert!(ws.resolve("../../etc/passwd").is_none());
        assert!(ws.resolve("sub/../../outside").is_none());
    }

    #[test]
    fn test_dotdot_within_root_is_allowed() {
        let (_dir, ws) = workspace();
        let resolved = ws.resolve("sub/../file.txt").unwrap();
        assert_eq!(resolved, ws.root().join("file.txt"));
    }

    #[test]
    fn test_sibling_name_prefix_does_not_pass() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("ws");
        let sibling = parent.path().join("ws-old");
        std::fs::create_dir_all(&sibling).unwrap();
        let ws = Workspace::open(&root).unwrap();

        // String-prefix matching would accept this; component matching must not.
        let escape = format!("../{}/secret.txt", sibling.file_name().unwrap().to_str().unwrap());
        assert!(ws.resolve(&escape).is_none());
    }

    #[test]
    fn test_absolute_path_inside_root_is_accepted() {
        let (_dir, ws) = workspace();
        let inside = ws.root().join("a.txt");
        assert_eq!(ws.resolve(inside.to_str().unwrap()).unwrap(), inside);
        assert!(ws.resolve("/etc/passwd").is_none());
    }
}
