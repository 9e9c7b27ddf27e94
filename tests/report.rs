use gemini_archive::report::build;

#[test]
fn lists_added_and_deleted_conversations() {
    let msg = build(
        &["abc123".to_string(), "def456".to_string()],
        &["xyz999".to_string()],
    );

    assert!(msg.starts_with("chore: Automatic conversation archive\n"));
    assert!(msg.contains("Added conversations: abc123, def456"));
    assert!(msg.contains("Deleted conversations: xyz999"));
}

#[test]
fn empty_sections_are_omitted() {
    let only_added = build(&["a".to_string()], &[]);
    assert!(!only_added.contains("Deleted conversations"));

    let only_removed = build(&[], &["b".to_string()]);
    assert!(!only_removed.contains("Added conversations"));

    let no_changes = build(&[], &[]);
    assert_eq!(no_changes, "chore: Automatic conversation archive\n");
}

#[test]
fn output_is_deterministic_for_the_same_input_order() {
    let a = build(&["x".to_string(), "y".to_string()], &["z".to_string()]);
    let b = build(&["x".to_string(), "y".to_string()], &["z".to_string()]);
    assert_eq!(a, b);
}
