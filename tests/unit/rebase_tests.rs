use super::*;
use crate::git::Commit;
use crate::plan::{Action, Plan};

fn commit(id: &str) -> Commit {
    Commit {
        hash: format!("{id}0000000000"),
        short_hash: id.to_string(),
        subject: format!("Change {id}"),
        author: "Ada".to_string(),
        date: None,
        tags: Vec::new(),
    }
}

fn entries(rows: &[(&str, Action)]) -> Vec<PlanEntry> {
    rows.iter()
        .map(|(id, action)| PlanEntry {
            commit: commit(id),
            action: *action,
        })
        .collect()
}

#[test]
fn todo_is_oldest_first_with_keyword_and_full_hash() {
    let plan = entries(&[
        ("c3", Action::Pick),
        ("c2", Action::Squash),
        ("c1", Action::Pick),
    ]);
    let todo = render_todo(&plan).expect("todo");
    assert_eq!(
        todo,
        "pick c10000000000 Change c1\nsquash c20000000000 Change c2\npick c30000000000 Change c3\n"
    );
}

#[test]
fn todo_has_one_line_per_entry_in_reverse_order() {
    let plan = entries(&[
        ("e", Action::Drop),
        ("d", Action::Edit),
        ("c", Action::Fixup),
        ("b", Action::Pick),
        ("a", Action::Pick),
    ]);
    let todo = render_todo(&plan).expect("todo");
    let lines: Vec<&str> = todo.lines().collect();
    assert_eq!(lines.len(), plan.len());
    for (line, entry) in lines.iter().zip(plan.iter().rev()) {
        let expected_prefix = format!("{} {} ", entry.action.keyword(), entry.commit.hash);
        assert!(line.starts_with(&expected_prefix), "{line}");
    }
    assert!(!todo.contains("\n\n"));
}

#[test]
fn todo_uses_plan_store_snapshot() {
    let mut plan = Plan::from_commits(vec![commit("c2"), commit("c1")]);
    plan.move_entry(0, crate::plan::Direction::Down);
    plan.set_action(0, Action::Fixup).expect("fixup above oldest");
    let todo = render_todo(plan.snapshot()).expect("todo");
    assert_eq!(
        todo,
        "pick c20000000000 Change c2\nfixup c10000000000 Change c1\n"
    );
}

#[test]
fn empty_plan_is_rejected() {
    assert!(matches!(render_todo(&[]), Err(RebaseError::NothingToRebase)));
}

#[test]
fn target_uses_root_when_plan_covers_history() {
    assert_eq!(RebaseTarget::select(3, 3), RebaseTarget::Root);
    assert_eq!(RebaseTarget::select(5, 3), RebaseTarget::Root);
    assert_eq!(RebaseTarget::select(2, 3), RebaseTarget::Recent(2));
    assert_eq!(RebaseTarget::select(1, 0), RebaseTarget::Root);
    for total in 0..6 {
        for len in 1..6 {
            let expected_root = len >= total;
            assert_eq!(
                RebaseTarget::select(len, total) == RebaseTarget::Root,
                expected_root
            );
        }
    }
}

#[test]
fn target_args() {
    assert_eq!(RebaseTarget::Root.arg(), "--root");
    assert_eq!(RebaseTarget::Recent(4).arg(), "HEAD~4");
}

#[test]
fn shell_quote_escapes_single_quotes() {
    assert_eq!(shell_quote("/tmp/a b"), "'/tmp/a b'");
    assert_eq!(shell_quote("/tmp/it's"), "'/tmp/it'\\''s'");
}

#[test]
fn workspace_holds_todo_and_editor_and_is_removed_on_drop() {
    let root = tempfile::tempdir().expect("tempdir");
    let workspace = RebaseWorkspace::create_in(root.path(), "pick abc one\n").expect("workspace");
    let dir = workspace.path().to_path_buf();
    assert_eq!(
        std::fs::read_to_string(dir.join(TODO_FILE_NAME)).expect("todo"),
        "pick abc one\n"
    );
    let script = std::fs::read_to_string(dir.join(EDITOR_FILE_NAME)).expect("editor");
    assert!(script.starts_with("#!/bin/sh\ncat '"));
    assert!(script.ends_with("> \"$1\"\n"));
    assert_eq!(std::fs::read_dir(&dir).expect("list").count(), 2);
    drop(workspace);
    assert!(!dir.exists());
}

#[test]
fn workspace_creation_failure_is_reported() {
    let root = tempfile::tempdir().expect("tempdir");
    let missing = root.path().join("missing");
    let err = RebaseWorkspace::create_in(&missing, "pick a b\n").expect_err("should fail");
    assert!(matches!(err, RebaseError::CreateWorkspace(_)));
}

#[cfg(unix)]
mod with_fake_git {
    use super::*;
    use std::path::Path;

    struct FakeGit {
        _dir: tempfile::TempDir,
        out: PathBuf,
        git: GitCli,
    }

    /// A stand-in for git, run through `sh`: answers `rev-list --count`, and
    /// for a rebase records its argv, then runs `$GIT_SEQUENCE_EDITOR` against
    /// `todo.out` the way git does when that variable is set, then exits with
    /// `exit_code`.
    fn fake_git(ancestors: Option<usize>, exit_code: i32) -> FakeGit {
        fake_git_with(ancestors, exit_code, |git| git)
    }

    fn fake_git_with(
        ancestors: Option<usize>,
        exit_code: i32,
        configure: impl FnOnce(GitCli) -> GitCli,
    ) -> FakeGit {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().to_path_buf();
        let count_branch = match ancestors {
            Some(count) => format!("echo {count}; exit 0"),
            None => "echo 'fatal: bad revision' >&2; exit 128".to_string(),
        };
        let script = format!(
            r#"#!/bin/sh
out='{out}'
if [ "$1" = "rev-list" ]; then {count_branch}; fi
if [ "$1" = "-c" ]; then
  printf '%s' "${{2#sequence.editor=}}" > "$out/config_editor.txt"
  shift 2
  printf '%s\n' "$@" > "$out/args.txt"
  printf '%s' "$GIT_SEQUENCE_EDITOR" > "$out/editor.txt"
  eval "sh $GIT_SEQUENCE_EDITOR \"\$out/todo.out\""
  exit {exit_code}
fi
exit 99
"#,
            out = out.display(),
        );
        let script_path = out.join("git.sh");
        std::fs::write(&script_path, script).expect("write fake git");
        let git = configure(GitCli::new("sh").with_args_prefix([script_path.as_os_str()]));
        FakeGit {
            _dir: dir,
            out,
            git,
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).expect("read recorded file")
    }

    fn editor_path(fake: &FakeGit) -> PathBuf {
        PathBuf::from(read(&fake.out.join("editor.txt")).trim_matches('\''))
    }

    fn plan() -> Vec<PlanEntry> {
        entries(&[
            ("c3", Action::Pick),
            ("c2", Action::Squash),
            ("c1", Action::Pick),
        ])
    }

    #[test]
    fn rebase_feeds_todo_through_sequence_editor() {
        let fake = fake_git(Some(10), 0);
        let temp_root = tempfile::tempdir().expect("tempdir");
        let status = Rebaser::with_temp_root(&fake.git, temp_root.path())
            .run(&plan())
            .expect("rebase should run");

        assert!(status.success());
        assert_eq!(
            read(&fake.out.join("todo.out")),
            "pick c10000000000 Change c1\nsquash c20000000000 Change c2\npick c30000000000 Change c3\n"
        );
        assert_eq!(read(&fake.out.join("args.txt")), "rebase\n-i\nHEAD~3\n");
    }

    #[test]
    fn inherited_sequence_editor_does_not_replace_the_todo() {
        let elsewhere = tempfile::tempdir().expect("tempdir");
        let stray = elsewhere.path().join("stray.sh");
        std::fs::write(&stray, "#!/bin/sh\necho 'pick zzz Stray' > \"$1\"\n")
            .expect("write stray editor");
        let fake = fake_git_with(Some(10), 0, |git| {
            git.with_env("GIT_SEQUENCE_EDITOR", stray.as_os_str())
        });
        let temp_root = tempfile::tempdir().expect("tempdir");
        Rebaser::with_temp_root(&fake.git, temp_root.path())
            .run(&plan())
            .expect("rebase should run");

        assert_eq!(
            read(&fake.out.join("todo.out")),
            "pick c10000000000 Change c1\nsquash c20000000000 Change c2\npick c30000000000 Change c3\n"
        );
        assert_eq!(
            read(&fake.out.join("editor.txt")),
            read(&fake.out.join("config_editor.txt"))
        );
    }

    #[test]
    fn rebase_uses_root_when_history_is_short() {
        let fake = fake_git(Some(3), 0);
        let temp_root = tempfile::tempdir().expect("tempdir");
        Rebaser::with_temp_root(&fake.git, temp_root.path())
            .run(&plan())
            .expect("rebase should run");
        assert_eq!(read(&fake.out.join("args.txt")), "rebase\n-i\n--root\n");
    }

    #[test]
    fn rebase_falls_back_to_count_when_ancestors_unknown() {
        let fake = fake_git(None, 0);
        let temp_root = tempfile::tempdir().expect("tempdir");
        Rebaser::with_temp_root(&fake.git, temp_root.path())
            .run(&plan())
            .expect("rebase should run");
        assert_eq!(read(&fake.out.join("args.txt")), "rebase\n-i\nHEAD~3\n");
    }

    #[test]
    fn workspace_is_removed_after_success() {
        let fake = fake_git(Some(10), 0);
        let temp_root = tempfile::tempdir().expect("tempdir");
        Rebaser::with_temp_root(&fake.git, temp_root.path())
            .run(&plan())
            .expect("rebase should run");

        let editor = editor_path(&fake);
        assert!(editor.starts_with(temp_root.path()));
        assert!(!editor.exists());
        assert_eq!(std::fs::read_dir(temp_root.path()).expect("list").count(), 0);
    }

    #[test]
    fn nonzero_git_status_is_returned_verbatim_and_workspace_removed() {
        let fake = fake_git(Some(10), 3);
        let temp_root = tempfile::tempdir().expect("tempdir");
        let status = Rebaser::with_temp_root(&fake.git, temp_root.path())
            .run(&plan())
            .expect("git ran");
        assert_eq!(status.code(), Some(3));
        assert!(!editor_path(&fake).exists());
        assert_eq!(std::fs::read_dir(temp_root.path()).expect("list").count(), 0);
    }

    #[test]
    fn empty_plan_never_creates_workspace_or_runs_git() {
        let fake = fake_git(Some(10), 0);
        let temp_root = tempfile::tempdir().expect("tempdir");
        let err = Rebaser::with_temp_root(&fake.git, temp_root.path())
            .run(&[])
            .expect_err("empty plan");
        assert!(matches!(err, RebaseError::NothingToRebase));
        assert_eq!(std::fs::read_dir(temp_root.path()).expect("list").count(), 0);
        assert!(!fake.out.join("args.txt").exists());
    }

    #[test]
    fn workspace_failure_aborts_before_git_runs() {
        let fake = fake_git(Some(10), 0);
        let temp_root = tempfile::tempdir().expect("tempdir");
        let missing = temp_root.path().join("missing");
        let err = Rebaser::with_temp_root(&fake.git, &missing)
            .run(&plan())
            .expect_err("workspace cannot be created");
        assert!(matches!(err, RebaseError::CreateWorkspace(_)));
        assert!(!fake.out.join("args.txt").exists());
    }

    #[test]
    fn missing_git_binary_is_a_launch_error() {
        let git = GitCli::new("__no_such_git__");
        let temp_root = tempfile::tempdir().expect("tempdir");
        let err = Rebaser::with_temp_root(&git, temp_root.path())
            .run(&plan())
            .expect_err("git missing");
        assert!(matches!(err, RebaseError::Launch(_)));
        assert_eq!(std::fs::read_dir(temp_root.path()).expect("list").count(), 0);
    }
}
