// Login, listing, removal and the missing-token path.

mod common;

use common::{repository, FakeRemote, Harness, GOOD_TOKEN};
use gitup::commands::{copy, login, ls, rm, send};
use gitup::credentials::{CredentialProvider, FileCredentialStore};
use gitup::GitupError;
use tempfile::tempdir;

#[test]
fn rm_deletes_file_with_current_sha() {
    let mut h = Harness::new(FakeRemote::new().with_file("docs/old.md", b"bye"));
    h.run(|ctx| rm::execute(ctx, "octo/hello:docs/old.md")).unwrap();

    assert_eq!(h.remote().calls(), vec!["delete docs/old.md"]);
    assert!(h.remote().file("docs/old.md").is_none());
    assert!(h.output().contains("Removed docs/old.md from octo/hello"));
}

#[test]
fn rm_refuses_directories() {
    let mut h = Harness::new(FakeRemote::new().with_file("docs/a.md", b"a"));
    let err = h.run(|ctx| rm::execute(ctx, "octo/hello:docs")).unwrap_err();

    assert!(matches!(err, GitupError::InvalidTarget { ref path } if path == "docs"));
    assert!(h.remote().calls().is_empty());
    assert!(h.remote().file("docs/a.md").is_some());
}

#[test]
fn rm_requires_a_path() {
    let mut h = Harness::new(FakeRemote::new());
    let err = h.run(|ctx| rm::execute(ctx, "octo/hello")).unwrap_err();
    assert!(matches!(err, GitupError::UserInput { ref message, .. } if message == "File path not specified"));
    assert_eq!(h.connector.connections(), 0);
}

#[test]
fn rm_missing_file_is_not_found() {
    let mut h = Harness::new(FakeRemote::new());
    let err = h.run(|ctx| rm::execute(ctx, "octo/hello:gone.txt")).unwrap_err();
    assert!(matches!(err, GitupError::NotFound { ref what } if what == "file gone.txt"));
}

#[test]
fn ls_lists_repositories_with_visibility() {
    let mut remote = FakeRemote::new();
    remote.repos = vec![
        repository("octo/hello", false),
        repository("octo/secret", true),
    ];
    let mut h = Harness::new(remote);
    h.run(|ctx| ls::execute(ctx, None)).unwrap();

    let out = h.output();
    assert!(out.contains("Repositories for octocat:"));
    assert!(out.contains("  octo/hello (public)"));
    assert!(out.contains("  octo/secret (private)"));
}

#[test]
fn ls_with_no_repositories_says_so() {
    let mut remote = FakeRemote::new();
    remote.repos.clear();
    let mut h = Harness::new(remote);
    h.run(|ctx| ls::execute(ctx, Some(":."))).unwrap();

    assert_eq!(h.output().trim(), "No repositories found");
}

#[test]
fn ls_lists_directory_entries_with_type_icons() {
    let remote = FakeRemote::new()
        .with_file("src/main.rs", b"fn main() {}")
        .with_file("src/bin/tool.rs", b"")
        .with_file("README.md", b"");
    let mut h = Harness::new(remote);
    h.run(|ctx| ls::execute(ctx, Some("octo/hello:src"))).unwrap();

    let out = h.output();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec!["Contents of octo/hello:src:", "  📁 bin", "  📄 main.rs"]
    );
}

#[test]
fn ls_of_repository_root() {
    let mut h = Harness::new(FakeRemote::new().with_file("README.md", b""));
    h.run(|ctx| ls::execute(ctx, Some("octo/hello"))).unwrap();
    assert!(h.output().starts_with("Contents of octo/hello:/:"));
    assert!(h.output().contains("  📄 README.md"));
}

#[test]
fn ls_rejects_malformed_reference() {
    let mut h = Harness::new(FakeRemote::new());
    let err = h.run(|ctx| ls::execute(ctx, Some("hello"))).unwrap_err();
    assert!(matches!(err, GitupError::UserInput { .. }));
    assert_eq!(h.connector.connections(), 0);
}

#[test]
fn missing_token_fails_before_any_connection() {
    let dir = tempdir().unwrap();
    let local = dir.path().join("a.txt");
    std::fs::write(&local, "a").unwrap();
    let local = local.to_str().unwrap().to_string();

    let store = FileCredentialStore::new(dir.path().join("no-token"));
    let mut h = Harness::with_credentials(FakeRemote::new(), Box::new(store));

    let results = [
        h.run(|ctx| send::execute(ctx, &local, "octo/hello")),
        h.run(|ctx| copy::execute(ctx, &local, "octo/hello:a.txt")),
        h.run(|ctx| copy::execute(ctx, "octo/hello:a.txt", "out")),
        h.run(|ctx| rm::execute(ctx, "octo/hello:a.txt")),
        h.run(|ctx| ls::execute(ctx, None)),
        h.run(|ctx| ls::execute(ctx, Some("octo/hello"))),
    ];
    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(err, GitupError::AuthRequired));
        assert_eq!(err.exit_code(), 1);
    }
    assert_eq!(h.connector.connections(), 0);
}

#[test]
fn login_stores_verified_token() {
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("token");
    let store = FileCredentialStore::new(&token_path);
    let mut h = Harness::with_credentials(FakeRemote::new(), Box::new(store));

    h.run(|ctx| login::execute(ctx, || Ok(Some(format!("  {GOOD_TOKEN}\n")))))
        .unwrap();

    assert!(h.output().contains("Authenticated as octocat"));
    assert_eq!(h.credentials.load().unwrap(), GOOD_TOKEN);
}

#[test]
fn login_with_rejected_token_stores_nothing() {
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("token");
    let store = FileCredentialStore::new(&token_path);
    let mut h = Harness::with_credentials(FakeRemote::new(), Box::new(store));

    let err = h
        .run(|ctx| login::execute(ctx, || Ok(Some("ghp_bad".to_string()))))
        .unwrap_err();

    assert!(matches!(err, GitupError::AuthFailed(_)));
    assert!(!token_path.exists());
}

#[test]
fn login_cancelled_writes_nothing() {
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("token");
    let store = FileCredentialStore::new(&token_path);
    let mut h = Harness::with_credentials(FakeRemote::new(), Box::new(store));

    h.run(|ctx| login::execute(ctx, || Ok(None))).unwrap();

    assert!(h.output().contains("Cancelled"));
    assert!(!token_path.exists());
    assert_eq!(h.connector.connections(), 0);
}

#[test]
fn login_rejects_empty_token() {
    let mut h = Harness::new(FakeRemote::new());
    let err = h
        .run(|ctx| login::execute(ctx, || Ok(Some("   ".to_string()))))
        .unwrap_err();
    assert!(matches!(err, GitupError::UserInput { .. }));
    assert_eq!(h.connector.connections(), 0);
}
