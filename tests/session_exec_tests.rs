//! Shell, exec, and ephemeral session orchestration


use std::path::PathBuf;

use lxdev::session::exec::{interactive_shell, run_command, run_ephemeral};
use lxdev::{Series, Shell, ShellTemplates, Workspace};
use test_utils::{Call, FakeManager, FixedSuffixes, ScriptedPrompt};

fn workspace() -> Workspace {
    Workspace {
        project: "myapp".to_string(),
        source_dir: PathBuf::from("/work/myapp"),
    }
}

#[tokio::test]
async fn test_run_command_execs_in_running_instance() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "RUNNING")]);
    let mut prompt = ScriptedPrompt::unused();

    run_command(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
        false,
    )
    .await
    .unwrap();

    let calls = manager.calls();
    assert!(calls.iter().any(|call| matches!(
        call,
        Call::Exec { name, argv, .. }
            if name == "myapp-jammy"
                && argv == &["bash".to_string(), "-c".to_string(), "make test".to_string()]
    )));
    assert!(!calls.iter().any(|call| matches!(call, Call::Stop(_))));
}

#[tokio::test]
async fn test_run_command_starts_stopped_instance_first() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "STOPPED")]);
    let mut prompt = ScriptedPrompt::unused();

    run_command(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
        false,
    )
    .await
    .unwrap();

    let start = manager.call_position(|call| matches!(call, Call::Start(_)));
    let exec = manager.call_position(|call| matches!(call, Call::Exec { .. }));
    assert!(start.unwrap() < exec.unwrap());
}

#[tokio::test]
async fn test_run_command_nonzero_exit_is_reported_not_fatal() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "RUNNING")]);
    manager.push_exec_code(2);
    let mut prompt = ScriptedPrompt::unused();

    let result = run_command(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
        false,
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_run_command_stop_after_stops_instance() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "RUNNING")]);
    let mut prompt = ScriptedPrompt::unused();

    run_command(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
        true,
    )
    .await
    .unwrap();

    let exec = manager.call_position(|call| matches!(call, Call::Exec { .. }));
    let stop = manager.call_position(|call| matches!(call, Call::Stop(_)));
    assert!(exec.unwrap() < stop.unwrap());
}

#[tokio::test]
async fn test_run_command_threads_environment_after_pinned_vars() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "RUNNING")]);
    let mut prompt = ScriptedPrompt::unused();

    run_command(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        "env",
        &["DEBUG=1".to_string(), "NOVALUE".to_string()],
        false,
    )
    .await
    .unwrap();

    let calls = manager.calls();
    let env = calls
        .iter()
        .find_map(|call| match call {
            Call::Exec { env, .. } => Some(env.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        env,
        vec![
            ("HOME".to_string(), "/home/ubuntu".to_string()),
            ("USER".to_string(), "ubuntu".to_string()),
            ("DEBUG".to_string(), "1".to_string()),
            ("NOVALUE".to_string(), String::new()),
        ]
    );
}

#[tokio::test]
async fn test_run_command_without_matching_instance_does_nothing() {
    let manager = FakeManager::new();
    let mut prompt = ScriptedPrompt::unused();

    run_command(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
        false,
    )
    .await
    .unwrap();

    assert_eq!(manager.calls(), vec![Call::List("myapp-jammy".to_string())]);
}

#[tokio::test]
async fn test_run_command_declined_prompt_does_nothing() {
    let manager = FakeManager::with_instances(&[("myapp-jammy-a1b", "RUNNING")]);
    let mut prompt = ScriptedPrompt::new(&["n"]);

    run_command(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
        false,
    )
    .await
    .unwrap();

    assert!(!manager
        .calls()
        .iter()
        .any(|call| matches!(call, Call::Exec { .. })));
}

#[tokio::test]
async fn test_interactive_shell_attaches_requested_shell() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "RUNNING")]);
    let mut prompt = ScriptedPrompt::unused();

    interactive_shell(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        Shell::Zsh,
        false,
    )
    .await
    .unwrap();

    let calls = manager.calls();
    assert!(calls.iter().any(|call| matches!(
        call,
        Call::Exec { user, cwd, argv, .. }
            if *user == 1000 && cwd == "/home/ubuntu/myapp" && argv == &["zsh".to_string()]
    )));
}

#[tokio::test]
async fn test_interactive_shell_stop_after() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "RUNNING")]);
    let mut prompt = ScriptedPrompt::unused();

    interactive_shell(
        &manager,
        &mut prompt,
        &workspace(),
        Series::Jammy,
        Shell::Bash,
        true,
    )
    .await
    .unwrap();

    assert!(manager
        .calls()
        .iter()
        .any(|call| matches!(call, Call::Stop(_))));
}

#[tokio::test]
async fn test_ephemeral_creates_runs_and_removes() {
    let manager = FakeManager::new();
    let templates = ShellTemplates::builtin();
    let mut suffixes = FixedSuffixes::with_ident("tmpidenthere");

    run_ephemeral(
        &manager,
        &templates,
        &mut suffixes,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
    )
    .await
    .unwrap();

    let name = "myapp-jammy-tmpidenthere";
    let launch = manager
        .call_position(|call| matches!(call, Call::Launch { name: launched, .. } if launched == name));
    let exec = manager.call_position(|call| matches!(call, Call::Exec { .. }));
    let stop = manager.call_position(|call| matches!(call, Call::Stop(stopped) if stopped == name));
    let delete =
        manager.call_position(|call| matches!(call, Call::Delete(deleted) if deleted == name));

    assert!(launch.unwrap() < exec.unwrap());
    assert!(exec.unwrap() < stop.unwrap());
    assert!(stop.unwrap() < delete.unwrap());
    assert!(manager.instance_names().is_empty());
}

#[tokio::test]
async fn test_ephemeral_removes_instance_even_when_command_fails() {
    let manager = FakeManager::new();
    manager.push_exec_code(3);
    let templates = ShellTemplates::builtin();
    let mut suffixes = FixedSuffixes::with_ident("tmpidenthere");

    let result = run_ephemeral(
        &manager,
        &templates,
        &mut suffixes,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
    )
    .await;

    assert!(result.is_ok());
    assert!(manager.instance_names().is_empty());
}

#[tokio::test]
async fn test_ephemeral_tears_down_when_exec_invocation_errors() {
    let manager = FakeManager::new();
    manager.fail_exec();
    let templates = ShellTemplates::builtin();
    let mut suffixes = FixedSuffixes::with_ident("tmpidenthere");

    let result = run_ephemeral(
        &manager,
        &templates,
        &mut suffixes,
        &workspace(),
        Series::Jammy,
        "make test",
        &[],
    )
    .await;

    // The error still surfaces, but never before teardown.
    assert!(result.is_err());
    assert!(manager.instance_names().is_empty());
    assert!(manager
        .calls()
        .iter()
        .any(|call| matches!(call, Call::Delete(_))));
}
