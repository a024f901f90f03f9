//! Per-run resolution state: the loaded project, the set of files the user
//! asked to document, and output options.

use crate::reflect::LabelStyle;
use apidoc_ts_syntax::{FileId, LoadError, Project};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub label_style: LabelStyle,
    /// Drop entries whose path was already emitted for the same tag.
    pub dedupe_paths: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            label_style: LabelStyle::Capitalized,
            dedupe_paths: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Context {
    project: Project,
    user_files: HashSet<FileId>,
    /// Files whose imports were already followed.
    resolved: HashSet<FileId>,
    options: Options,
}

impl Context {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Load a declaration file and everything it imports, marking all of them
    /// as user-declared. Registering the same path again is cheap.
    pub fn register(&mut self, path: &Path) -> Result<FileId, LoadError> {
        let id = self.project.add_source_file(path)?;
        self.track(id);
        Ok(id)
    }

    /// Like [`Context::register`] for text that is not read from disk.
    pub fn register_text(&mut self, path: &Path, text: &str) -> FileId {
        let id = self.project.add_source_text(path, text);
        self.track(id);
        id
    }

    /// Load a file whose declarations are global but never documented.
    pub fn add_ambient(&mut self, path: &Path) -> Result<FileId, LoadError> {
        self.project.add_ambient_file(path)
    }

    fn track(&mut self, id: FileId) {
        if self.user_files.insert(id) {
            debug!(path = %self.project.path(id).display(), "registered user file");
        }
        if !self.resolved.insert(id) {
            return;
        }
        // Resolution is transitive, so every dependency is done as well
        for dep in self.project.resolve_dependencies(id) {
            self.resolved.insert(dep);
            if !self.project.is_ambient(dep) {
                self.user_files.insert(dep);
            }
        }
    }

    pub fn is_user_declared(&self, file: FileId) -> bool {
        self.user_files.contains(&file)
    }
}
