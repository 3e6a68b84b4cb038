//! End-to-end runs against a real `git`; each test skips itself when git is missing.

mod common;

use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

use common::{git, git_available, init_repo};
use smartmv::{
    aggregate, fs_planner, Decision, Executor, FsProbe, GitCli, GitMover, PlainMover, RepoResolver,
    SmartmvError, TrackingOracle,
};

fn cli() -> GitCli {
    GitCli::new("git", Duration::from_secs(30))
}

fn run(cwd: &Path, sources: &[PathBuf], dest: &Path, tracked_only: bool) -> (Vec<Decision>, Result<(), SmartmvError>) {
    let tracking = tracked_only.then(|| Box::new(cli()) as Box<dyn TrackingOracle>);
    let plan = fs_planner(RepoResolver::with_probe(FsProbe, cwd), tracking)
        .plan(sources, dest)
        .unwrap();
    let decisions = plan.groups().iter().map(|g| g.decision).collect();
    let vcs = GitMover::new(cli(), cwd);
    let plain = PlainMover::default();
    let results = Executor::new(&vcs, &plain).execute(&plan);
    (decisions, aggregate(results))
}

#[test]
fn tracked_files_are_moved_with_git() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let td = tempdir().unwrap();
    let repo = dunce::canonicalize(td.path()).unwrap().join("repo");
    init_repo(&repo, &["a.txt", "b.txt", "sub/keep.txt"]);

    let (decisions, outcome) = run(
        &repo,
        &[repo.join("a.txt"), repo.join("b.txt")],
        &repo.join("sub"),
        false,
    );

    assert_eq!(decisions, vec![Decision::VersionControlled]);
    outcome.unwrap();
    assert!(repo.join("sub/a.txt").exists() && repo.join("sub/b.txt").exists());
    let status = git(&repo, &["status", "--porcelain"]);
    assert!(status.contains("R  a.txt -> sub/a.txt"), "{status}");
    assert!(status.contains("R  b.txt -> sub/b.txt"), "{status}");
}

#[test]
fn moving_between_repositories_is_plain() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let (r1, r2) = (base.join("r1"), base.join("r2"));
    init_repo(&r1, &["a.txt"]);
    init_repo(&r2, &["other.txt"]);

    let (decisions, outcome) = run(&base, &[r1.join("a.txt")], &r2, false);

    assert_eq!(decisions, vec![Decision::Plain]);
    outcome.unwrap();
    assert!(r2.join("a.txt").exists());
    assert!(!r1.join("a.txt").exists());
}

#[test]
fn untracked_source_is_demoted_when_tracked_only() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let td = tempdir().unwrap();
    let repo = dunce::canonicalize(td.path()).unwrap().join("repo");
    init_repo(&repo, &["tracked.txt", "sub/keep.txt"]);
    std::fs::write(repo.join("scratch.txt"), b"tmp").unwrap();

    let (decisions, outcome) = run(
        &repo,
        &[repo.join("tracked.txt"), repo.join("scratch.txt")],
        &repo.join("sub"),
        true,
    );

    assert_eq!(decisions, vec![Decision::VersionControlled, Decision::Plain]);
    outcome.unwrap();
    assert!(repo.join("sub/scratch.txt").exists());
}

#[test]
fn git_failure_is_reported_and_later_groups_still_run() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let repo = base.join("repo");
    init_repo(&repo, &["sub/keep.txt"]);
    std::fs::write(repo.join("untracked.txt"), b"u").unwrap();
    let out = base.join("out");
    std::fs::create_dir(&out).unwrap();
    std::fs::write(base.join("loose.txt"), b"l").unwrap();

    let tracking: Option<Box<dyn TrackingOracle>> = None;
    let mut planner = fs_planner(RepoResolver::with_probe(FsProbe, &base), tracking);
    let plan = planner
        .plan_pairs(vec![
            (repo.join("untracked.txt"), repo.join("sub")),
            (base.join("loose.txt"), out.clone()),
        ])
        .unwrap();
    let vcs = GitMover::new(cli(), &base);
    let plain = PlainMover::default();
    let results = Executor::new(&vcs, &plain).execute(&plan);

    assert!(!results[0].succeeded(), "git refuses to move untracked files");
    assert!(results[1].succeeded());
    assert!(out.join("loose.txt").exists());
    assert!(matches!(
        aggregate(results),
        Err(SmartmvError::ExternalCommandFailure { group: 1, .. })
    ));
}
