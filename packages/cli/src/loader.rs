//! Project loading: find the source files a rewrite run operates on and
//! collect per-file diagnostics up front. Warnings are reported and the
//! run continues; a failure stops the run before anything is rewritten.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Failure,
}

#[derive(Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Failure,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Project {
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Project {
    pub fn has_failures(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Failure)
    }
}

/// Walk `root` and collect every `.cs` file, in path order so runs are
/// reproducible.
pub fn load_project(root: &Path) -> Project {
    let mut project = Project::default();

    if !root.is_dir() {
        project.diagnostics.push(Diagnostic::failure(format!(
            "project path is not a directory: {}",
            root.display()
        )));
        return project;
    }

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                project
                    .diagnostics
                    .push(Diagnostic::warning(format!("unreadable entry: {}", error)));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("cs") {
            continue;
        }

        match std::fs::metadata(path) {
            Ok(meta) if meta.len() == 0 => {
                project.diagnostics.push(Diagnostic::warning(format!(
                    "skipping empty file: {}",
                    path.display()
                )));
            }
            Ok(_) => project.files.push(path.to_path_buf()),
            Err(error) => {
                project.diagnostics.push(Diagnostic::warning(format!(
                    "cannot stat {}: {}",
                    path.display(),
                    error
                )));
            }
        }
    }

    // An empty project halts the run, same as an unreadable one.
    if project.files.is_empty() && !project.has_failures() {
        project.diagnostics.push(Diagnostic::failure(format!(
            "no .cs files found under {}",
            root.display()
        )));
    }

    project
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_nested_source_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.cs"), "class B { }").unwrap();
        std::fs::write(dir.path().join("sub/a.cs"), "class A { }").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let project = load_project(dir.path());
        assert!(!project.has_failures());
        assert_eq!(
            project.files,
            vec![dir.path().join("b.cs"), dir.path().join("sub/a.cs")]
        );
    }

    #[test]
    fn test_missing_root_is_a_failure() {
        let project = load_project(Path::new("/definitely/not/here"));
        assert!(project.has_failures());
        assert!(project.files.is_empty());
    }

    #[test]
    fn test_empty_file_is_a_warning_when_others_remain() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.cs"), "").unwrap();
        std::fs::write(dir.path().join("real.cs"), "class C { }").unwrap();

        let project = load_project(dir.path());
        assert!(!project.has_failures());
        assert_eq!(project.files, vec![dir.path().join("real.cs")]);
        assert!(project
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("empty")));
    }

    #[test]
    fn test_project_without_source_files_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "no sources here").unwrap();

        let project = load_project(dir.path());
        assert!(project.has_failures());
        assert!(project.files.is_empty());
    }

    #[test]
    fn test_only_empty_files_still_fails_the_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.cs"), "").unwrap();

        let project = load_project(dir.path());
        assert!(project.has_failures());
        assert!(project.files.is_empty());
    }
}
