// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use git2::Repository;
use tempfile::TempDir;

use git_utils::git::{CommandGit, Git};

fn git_available() -> bool {
    CommandGit::new().is_available()
}

/// Run the binary with an isolated app directory and git config
fn git_utils(home: &Path, cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-utils"))
        .args(args)
        .arg("--no-update-check")
        .current_dir(cwd)
        .env("GIT_UTILS_HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_CONFIG_GLOBAL", home.join("gitconfig"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute git-utils")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn commit_files(repo: &Repository, files: &[&str], message: &str) {
    let mut index = repo.index().expect("Could not get index");
    for file in files {
        index
            .add_path(Path::new(file))
            .expect("Could not add file to index");
    }
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get sig");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Could not create commit");
}

// Helper function to setup a repository with the given files committed
fn setup_repo(path: &Path, files: &[(&str, &str)]) -> Repository {
    fs::create_dir_all(path).expect("Could not create repo dir");
    let repo = Repository::init(path).expect("Could not init git repo");
    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Could not set commit.gpgsign");
        config
            .set_bool("tag.gpgsign", false)
            .expect("Could not set tag.gpgsign");
    }
    for (name, contents) in files {
        fs::write(path.join(name), contents).expect("Could not write file");
    }
    let names: Vec<&str> = files.iter().map(|(name, _)| *name).collect();
    commit_files(&repo, &names, "Initial commit");
    repo
}

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    let output = git_utils(home.path(), home.path(), &["--help"]);

    assert!(output.status.success());
    let text = stdout(&output);
    for sub in ["bump", "checkout", "fetch", "grep", "pull", "tag", "standup"] {
        assert!(text.contains(sub), "missing {}", sub);
    }
}

#[test]
fn test_config_flag_prints_paths() {
    let home = TempDir::new().unwrap();
    let output = git_utils(home.path(), home.path(), &["--config"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("App Directory:"));
    assert!(text.contains("Config File Path:"));
    assert!(home.path().join("config.json").exists());
}

#[test]
fn test_missing_dir_exits_with_error() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nope");
    let output = git_utils(
        home.path(),
        home.path(),
        &["fetch", "all", "--dir", missing.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_dirty_check_ignores_untracked_files() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    setup_repo(dir.path(), &[("README.md", "hello\n")]);
    let git = CommandGit::new();

    fs::write(dir.path().join("scratch.txt"), "untracked").unwrap();
    assert!(!git.is_dirty(dir.path()).unwrap());

    fs::write(dir.path().join("README.md"), "changed\n").unwrap();
    assert!(git.is_dirty(dir.path()).unwrap());
}

#[test]
fn test_bump_patch_commits_and_tags() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let repo = setup_repo(
        dir.path(),
        &[
            (
                ".git-utils-bump.cfg",
                "[bumpversion]\ncurrent_version = 1.2.3\ncommit = true\ntag = true\ntag_format = v{tag}\n\n[bumpversion:file:app.yaml]\nsearch = version: {current_version}\nreplace = version: {new_version}\n",
            ),
            ("app.yaml", "version: 1.2.3\n"),
        ],
    );

    let output = git_utils(home.path(), dir.path(), &["bump", "patch"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(
        fs::read_to_string(dir.path().join("app.yaml")).unwrap(),
        "version: 1.2.4\n"
    );
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.summary(), Some("Bump version: 1.2.3 → 1.2.4"));
    let tag = repo
        .find_reference("refs/tags/v1.2.4")
        .unwrap()
        .peel_to_tag()
        .unwrap();
    assert_eq!(tag.message().map(str::trim), Some("Version 1.2.4"));
}

#[test]
fn test_bump_refuses_dirty_tree() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    setup_repo(
        dir.path(),
        &[
            (".git-utils-bump.cfg", "[bumpversion]\ncurrent_version = 1.0.0\n\n[bumpversion:file:VERSION]\n"),
            ("VERSION", "1.0.0"),
        ],
    );
    fs::write(dir.path().join("VERSION"), "1.0.0-local").unwrap();

    let output = git_utils(home.path(), dir.path(), &["bump"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dirty"));
    assert_eq!(
        fs::read_to_string(dir.path().join("VERSION")).unwrap(),
        "1.0.0-local"
    );
}

#[test]
fn test_grep_across_repositories() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    setup_repo(&root.path().join("api"), &[("main.rs", "fn main() {}\n// needle here\n")]);
    setup_repo(&root.path().join("web"), &[("index.js", "nothing\n")]);

    let output = git_utils(
        home.path(),
        root.path(),
        &["grep", "needle", "--dir", root.path().to_str().unwrap()],
    );
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains(&format!("api{}main.rs", std::path::MAIN_SEPARATOR)));
    assert!(text.contains("L2: // needle here"));
    assert!(!text.contains("No matches found."));
}

#[test]
fn test_tag_renders_configured_message() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("config.json"),
        r#"{ "tags": { "messages": { "release": "{repo_owner}/{repo_name} {newTag}" } } }"#,
    )
    .unwrap();

    let dir = TempDir::new().unwrap();
    let repo = setup_repo(dir.path(), &[("README.md", "hello\n")]);
    repo.remote("origin", "git@github.com:alice/widgets.git")
        .unwrap();

    let output = git_utils(
        home.path(),
        dir.path(),
        &["tag", "-a", "v0.1.0", "-m", "release"],
    );
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout(&output).contains("git push --tags"));

    let tag = repo
        .find_reference("refs/tags/v0.1.0")
        .unwrap()
        .peel_to_tag()
        .unwrap();
    assert_eq!(tag.message().map(str::trim), Some("alice/widgets v0.1.0"));
}

#[test]
fn test_tag_without_input_shows_usage() {
    let home = TempDir::new().unwrap();
    let output = git_utils(home.path(), home.path(), &["tag"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("--tag_name"));
}

#[test]
fn test_standup_lists_recent_commits() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    setup_repo(dir.path(), &[("README.md", "hello\n")]);

    let output = git_utils(home.path(), dir.path(), &["standup"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Initial commit"));
    assert!(text.contains("<Test User>"));
}
