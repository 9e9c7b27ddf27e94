use std::collections::BTreeSet;

use gemini_archive::reconcile::reconcile;

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn new_ids_are_added_and_stale_ids_are_removed() {
    let desired = set(&["abc123", "def456"]);
    let archived = set(&["def456", "xyz999"]);

    let plan = reconcile(&desired, &archived);

    assert_eq!(plan.to_add, set(&["abc123"]), "to_add must be desired minus archived");
    assert_eq!(plan.to_remove, set(&["xyz999"]), "to_remove must be archived minus desired");
}

#[test]
fn to_add_and_to_remove_are_disjoint() {
    let desired = set(&["a", "b", "c"]);
    let archived = set(&["b", "c", "d", "e"]);

    let plan = reconcile(&desired, &archived);

    assert!(
        plan.to_add.intersection(&plan.to_remove).next().is_none(),
        "the two sets must never overlap"
    );
}

#[test]
fn empty_desired_set_is_a_full_teardown() {
    let desired = set(&[]);
    let archived = set(&["a", "b"]);

    let plan = reconcile(&desired, &archived);

    assert!(plan.to_add.is_empty(), "nothing to add on teardown");
    assert_eq!(plan.to_remove, archived, "everything archived must be removed");
}

#[test]
fn empty_archive_adds_everything() {
    let desired = set(&["a", "b"]);
    let archived = set(&[]);

    let plan = reconcile(&desired, &archived);

    assert_eq!(plan.to_add, desired);
    assert!(plan.to_remove.is_empty());
}

#[test]
fn applying_the_plan_reaches_a_fixed_point() {
    let desired = set(&["a", "b", "c"]);
    let archived = set(&["b", "x"]);

    let plan = reconcile(&desired, &archived);

    // Simulate applying the plan to the archive, then reconcile again.
    let mut updated: BTreeSet<String> = archived.union(&plan.to_add).cloned().collect();
    for id in &plan.to_remove {
        updated.remove(id);
    }

    let second = reconcile(&desired, &updated);
    assert!(second.to_add.is_empty(), "re-run after apply must add nothing");
    assert!(second.to_remove.is_empty(), "re-run after apply must remove nothing");
}
