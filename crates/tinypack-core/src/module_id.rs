//! Module identifiers
//!
//! A [`ModuleId`] is a root-relative, `/`-separated path that always starts with `./`.
//! Every way of spelling a reference to the same file normalizes to the same id, so the
//! id can be used directly as the key of the module registry and of the emitted module map.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Wrap an already normalized id without touching it.
    pub fn from_normalized(id: impl Into<String>) -> Self {
        ModuleId(id.into())
    }

    /// Compute the id of `path` relative to `root`.
    ///
    /// Both paths are normalized lexically; symlinks are not followed.
    pub fn from_path(root: &Path, path: &Path) -> Self {
        let root = lexical_components(root);
        let path = lexical_components(path);

        let common = root
            .iter()
            .zip(path.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<&str> = vec![".."; root.len() - common];
        segments.extend(path[common..].iter().map(String::as_str));
        Self::from_segments(&segments)
    }

    /// Resolve a `require` reference found in a module living in `dir`.
    ///
    /// `dir` is the directory part of the referencing module's id (see [`ModuleId::dir`]).
    /// A reference without an extension gets `default_extension` appended.
    pub fn resolve(dir: &str, request: &str, default_extension: &str) -> Self {
        let mut request = request.to_string();
        if Path::new(&request).extension().is_none() {
            request.push_str(default_extension);
        }

        let segments = normalize_segments(
            dir.split('/')
                .chain(request.split(|c: char| c == '/' || c == '\\')),
        );
        Self::from_segments(&segments)
    }

    fn from_segments(segments: &[&str]) -> Self {
        ModuleId(format!("./{}", segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory part of the id: `./src` for `./src/a.js`, `.` for `./a.js`.
    pub fn dir(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => ".",
        }
    }

    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.0).extension().and_then(|ext| ext.to_str())
    }

    /// Absolute location of this module under `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|segment| *segment != ".")
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

fn normalize_segments<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for part in parts {
        match part {
            "" | "." => {}
            ".." => {
                if matches!(out.last(), Some(last) if *last != "..") {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            _ => out.push(part),
        }
    }
    out
}

fn lexical_components(path: &Path) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                out.push(prefix.as_os_str().to_string_lossy().into_owned())
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.last(), Some(last) if last != "..") {
                    out.pop();
                } else {
                    out.push("..".to_string());
                }
            }
            Component::Normal(part) => out.push(part.to_string_lossy().into_owned()),
        }
    }
    out
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
