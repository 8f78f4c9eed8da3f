//! Output rendering and writing.
//!
//! A [`GeneratedTree`] is rendered completely in memory before the first
//! byte reaches the disk. Writing keeps an undo log; when a write fails,
//! every file and directory touched by the run is restored and the error
//! names the offending path.

use crate::error::CodegenError;
use crate::format::{parse_file, render_file};
use crate::generator::ModuleNode;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the module file of every directory.
pub const MODULE_FILE: &str = "mod.rs";

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the output root.
    pub path: PathBuf,
    /// Complete file contents.
    pub contents: String,
}

/// The generated module tree, ready to render.
pub struct GeneratedTree {
    root: ModuleNode,
}

impl GeneratedTree {
    pub(crate) fn new(root: ModuleNode) -> Self {
        Self { root }
    }

    /// Returns the root node; its children are the top-level segments.
    #[must_use]
    pub fn root(&self) -> &ModuleNode {
        &self.root
    }

    /// Renders every file of the tree, directories first, in sorted order.
    #[must_use]
    pub fn render_files(&self) -> Vec<RenderedFile> {
        let mut files = Vec::new();
        render_node(&self.root, Path::new(""), &mut files);
        files
    }

    /// Renders the whole tree as one file of nested inline modules.
    ///
    /// # Errors
    /// Returns `CodegenError::Emission` if the combined tree does not parse.
    pub fn render_bundle(&self) -> Result<String, CodegenError> {
        let file = parse_file("bundle", self.root.inline_items())?;
        Ok(render_file(&file, &[]))
    }

    /// Writes the tree under `dir`, creating directories as needed.
    ///
    /// Existing files are overwritten. On failure, files created by this call
    /// are removed, overwritten files get their previous contents back and
    /// created directories are removed.
    ///
    /// # Returns
    /// The paths of all written files.
    ///
    /// # Errors
    /// Returns `CodegenError::Write` with the path that could not be written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        let files = self.render_files();
        let mut transaction = Transaction::default();
        let mut written = Vec::with_capacity(files.len());

        for file in &files {
            let path = dir.join(&file.path);
            if let Err((path, source)) = transaction.write(&path, &file.contents) {
                warn!("Failed to write {}: {}; rolling back", path.display(), source);
                transaction.rollback();
                return Err(CodegenError::Write { path, source });
            }
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        info!("Wrote {} files to {}", written.len(), dir.display());
        Ok(written)
    }
}

fn render_node(node: &ModuleNode, dir: &Path, files: &mut Vec<RenderedFile>) {
    if let Some(module_file) = node.module_file() {
        files.push(RenderedFile {
            path: dir.join(MODULE_FILE),
            contents: render_file(module_file, &[]),
        });
    }
    for file in node.files() {
        let guard = file.kind().guard_comment();
        let guard: Vec<&str> = guard.iter().map(String::as_str).collect();
        files.push(RenderedFile {
            path: dir.join(format!("{}.rs", file.kind().stem())),
            contents: render_file(file.ast(), &guard),
        });
    }
    for (name, child) in node.children() {
        render_node(child, &dir.join(name), files);
    }
}

enum Undo {
    Created(PathBuf),
    Replaced(PathBuf, Vec<u8>),
}

#[derive(Default)]
struct Transaction {
    directories: Vec<PathBuf>,
    files: Vec<Undo>,
}

impl Transaction {
    fn write(&mut self, path: &Path, contents: &str) -> Result<(), (PathBuf, io::Error)> {
        if let Some(parent) = path.parent() {
            self.create_dirs(parent)?;
        }
        let undo = match fs::read(path) {
            Ok(previous) => Undo::Replaced(path.to_path_buf(), previous),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Undo::Created(path.to_path_buf()),
            Err(e) => return Err((path.to_path_buf(), e)),
        };
        fs::write(path, contents).map_err(|e| (path.to_path_buf(), e))?;
        self.files.push(undo);
        Ok(())
    }

    fn create_dirs(&mut self, dir: &Path) -> Result<(), (PathBuf, io::Error)> {
        let missing: Vec<&Path> = dir
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
            .collect();
        for dir in missing.into_iter().rev() {
            fs::create_dir(dir).map_err(|e| (dir.to_path_buf(), e))?;
            self.directories.push(dir.to_path_buf());
        }
        Ok(())
    }

    fn rollback(self) {
        for undo in self.files.into_iter().rev() {
            let (path, result) = match undo {
                Undo::Created(path) => {
                    let result = fs::remove_file(&path);
                    (path, result)
                }
                Undo::Replaced(path, previous) => {
                    let result = fs::write(&path, previous);
                    (path, result)
                }
            };
            if let Err(e) = result {
                warn!("Rollback failed for {}: {}", path.display(), e);
            }
        }
        for dir in self.directories.into_iter().rev() {
            if let Err(e) = fs::remove_dir(&dir) {
                warn!("Rollback failed for {}: {}", dir.display(), e);
            }
        }
    }
}
