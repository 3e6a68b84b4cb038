//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use smartmv::{BatchPlanner, MoveClassifier, RepoProbe, RepoResolver};

/// In-memory filesystem: directories, files and the directories that are repository roots.
#[derive(Debug, Default)]
pub struct FakeTree {
    dirs: HashSet<PathBuf>,
    files: HashSet<PathBuf>,
    roots: HashSet<PathBuf>,
}

impl FakeTree {
    pub fn new() -> Self {
        Self::default().dir("/")
    }

    /// Add a directory and all of its ancestors.
    pub fn dir(mut self, path: &str) -> Self {
        for anc in Path::new(path).ancestors() {
            self.dirs.insert(anc.to_path_buf());
        }
        self
    }

    /// Add a file; its parent directories are created too.
    pub fn file(mut self, path: &str) -> Self {
        let p = PathBuf::from(path);
        if let Some(parent) = p.parent().and_then(Path::to_str) {
            self = self.dir(parent);
        }
        self.files.insert(p);
        self
    }

    /// Add a directory carrying repository metadata.
    pub fn repo(mut self, path: &str) -> Self {
        self = self.dir(path);
        self.roots.insert(PathBuf::from(path));
        self
    }
}

impl RepoProbe for FakeTree {
    fn is_repo_root(&self, dir: &Path) -> io::Result<bool> {
        Ok(self.roots.contains(dir))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains(path)
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        self.exists(path).then(|| path.to_path_buf())
    }
}

/// Planner over `tree`, with `/work` as the working directory.
pub fn planner(tree: FakeTree) -> BatchPlanner<FakeTree> {
    BatchPlanner::new(MoveClassifier::new(RepoResolver::with_probe(tree, "/work")))
}

pub fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

/// True when a working `git` is on PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "smartmv")
        .env("GIT_AUTHOR_EMAIL", "smartmv@example.invalid")
        .env("GIT_COMMITTER_NAME", "smartmv")
        .env("GIT_COMMITTER_EMAIL", "smartmv@example.invalid")
        .output()
        .expect("spawn git");
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).into_owned()
}

/// Create a repository at `dir` with the given files committed.
pub fn init_repo(dir: &Path, files: &[&str]) {
    std::fs::create_dir_all(dir).expect("create repo dir");
    git(dir, &["init", "-q"]);
    for f in files {
        let p = dir.join(f);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&p, f.as_bytes()).expect("write file");
    }
    if !files.is_empty() {
        git(dir, &["add", "--all"]);
        git(dir, &["-c", "commit.gpgsign=false", "commit", "-q", "-m", "init"]);
    }
}
