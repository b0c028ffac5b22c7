//! Name resolution against a scripted manager and prompt


use lxdev::naming;
use lxdev::Series;
use test_utils::{Call, FakeManager, FixedSuffixes, ScriptedPrompt};

#[tokio::test]
async fn test_resolve_new_returns_candidate_when_unclaimed() {
    let manager = FakeManager::new();
    let mut suffixes = FixedSuffixes::new(&[]);

    let name = naming::resolve_new(&manager, &mut suffixes, "myapp", Series::Jammy)
        .await
        .unwrap();

    assert_eq!(name, "myapp-jammy");
    assert_eq!(manager.calls(), vec![Call::List("myapp-jammy".to_string())]);
}

#[tokio::test]
async fn test_resolve_new_appends_suffix_on_collision() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "RUNNING")]);
    let mut suffixes = FixedSuffixes::new(&["a1b"]);

    let name = naming::resolve_new(&manager, &mut suffixes, "myapp", Series::Jammy)
        .await
        .unwrap();

    assert_eq!(name, "myapp-jammy-a1b");
}

#[tokio::test]
async fn test_resolve_new_lengthens_suffix_until_free() {
    let manager = FakeManager::with_instances(&[
        ("myapp-jammy", "RUNNING"),
        ("myapp-jammy-a1b", "STOPPED"),
        ("myapp-jammy-a1b2", "STOPPED"),
    ]);
    let mut suffixes = FixedSuffixes::new(&["a1b", "2", "3"]);

    let name = naming::resolve_new(&manager, &mut suffixes, "myapp", Series::Jammy)
        .await
        .unwrap();

    // One character at a time past each taken variant.
    assert_eq!(name, "myapp-jammy-a1b23");
}

#[tokio::test]
async fn test_resolve_existing_no_matches() {
    let manager = FakeManager::new();
    let mut prompt = ScriptedPrompt::unused();

    let resolved = naming::resolve_existing(&manager, &mut prompt, "myapp", Series::Jammy)
        .await
        .unwrap();

    assert_eq!(resolved, None);
    assert!(prompt.prompts.is_empty());
}

#[tokio::test]
async fn test_resolve_existing_unique_exact_match_skips_prompt() {
    let manager = FakeManager::with_instances(&[("myapp-jammy", "RUNNING")]);
    let mut prompt = ScriptedPrompt::unused();

    let resolved = naming::resolve_existing(&manager, &mut prompt, "myapp", Series::Jammy)
        .await
        .unwrap();

    assert_eq!(resolved.as_deref(), Some("myapp-jammy"));
    assert!(prompt.prompts.is_empty());
}

#[tokio::test]
async fn test_resolve_existing_single_partial_match_confirms() {
    let manager = FakeManager::with_instances(&[("myapp-jammy-a1b", "RUNNING")]);

    let mut prompt = ScriptedPrompt::new(&[""]);
    let resolved = naming::resolve_existing(&manager, &mut prompt, "myapp", Series::Jammy)
        .await
        .unwrap();
    assert_eq!(resolved.as_deref(), Some("myapp-jammy-a1b"));
    assert_eq!(
        prompt.prompts,
        vec!["Interact with instance myapp-jammy-a1b? [Y/n]: ".to_string()]
    );

    let mut prompt = ScriptedPrompt::new(&["n"]);
    let resolved = naming::resolve_existing(&manager, &mut prompt, "myapp", Series::Jammy)
        .await
        .unwrap();
    assert_eq!(resolved, None);
}

#[tokio::test]
async fn test_resolve_existing_multiple_matches_use_index() {
    let manager = FakeManager::with_instances(&[
        ("myapp-jammy", "RUNNING"),
        ("myapp-jammy-a1b", "STOPPED"),
    ]);
    let mut prompt = ScriptedPrompt::new(&["1"]);

    let resolved = naming::resolve_existing(&manager, &mut prompt, "myapp", Series::Jammy)
        .await
        .unwrap();

    assert_eq!(resolved.as_deref(), Some("myapp-jammy-a1b"));
}

#[tokio::test]
async fn test_resolve_existing_reprompts_on_bad_index() {
    let manager = FakeManager::with_instances(&[
        ("myapp-jammy", "RUNNING"),
        ("myapp-jammy-a1b", "STOPPED"),
    ]);
    let mut prompt = ScriptedPrompt::new(&["nope", "9", "0"]);

    let resolved = naming::resolve_existing(&manager, &mut prompt, "myapp", Series::Jammy)
        .await
        .unwrap();

    assert_eq!(resolved.as_deref(), Some("myapp-jammy"));
    assert_eq!(prompt.prompts.len(), 3);
}

#[tokio::test]
async fn test_ephemeral_name_uses_ident() {
    let mut suffixes = FixedSuffixes::with_ident("qwertyuiopas");
    let name = naming::ephemeral_name(&mut suffixes, "myapp", Series::Noble);
    assert_eq!(name, "myapp-noble-qwertyuiopas");
}
