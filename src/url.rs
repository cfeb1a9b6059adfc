//! Mapping between public URLs and filesystem paths.
//!
//! Callers may pass either a plain path (`img/beach.jpg`) or the public URL of
//! the same file (`https://example.com/img/beach.jpg`). The configured base
//! URL is stripped from inputs and prepended to results, so the renderer only
//! ever works with paths.

use std::path::{Component, Path};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicUrl {
    base: String,
}

impl PublicUrl {
    /// `base` is used verbatim as a prefix. An empty base makes URLs plain
    /// relative paths.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Remove the base URL prefix from `input` if present.
    pub fn strip<'a>(&self, input: &'a str) -> &'a str {
        if self.base.is_empty() {
            return input;
        }
        input.strip_prefix(self.base.as_str()).unwrap_or(input)
    }

    /// Public URL of a filesystem path, always with `/` separators.
    ///
    /// Without a base URL an absolute path stays absolute.
    pub fn to_url(&self, path: &Path) -> String {
        let relative = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        if self.base.is_empty() && path.has_root() {
            format!("/{relative}")
        } else if self.base.is_empty() || self.base.ends_with('/') {
            format!("{}{}", self.base, relative)
        } else {
            format!("{}/{}", self.base, relative)
        }
    }
}
