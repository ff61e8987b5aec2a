use super::*;

fn commit(id: &str) -> Commit {
    Commit {
        hash: format!("{id}-full"),
        short_hash: id.to_string(),
        subject: format!("subject {id}"),
        author: "Ada".to_string(),
        date: None,
        tags: Vec::new(),
    }
}

fn plan_of(ids: &[&str]) -> Plan {
    Plan::from_commits(ids.iter().map(|id| commit(id)).collect())
}

fn order(plan: &Plan) -> Vec<String> {
    plan.snapshot()
        .iter()
        .map(|entry| entry.commit.short_hash.clone())
        .collect()
}

#[test]
fn new_plan_defaults_every_entry_to_pick() {
    let plan = plan_of(&["c3", "c2", "c1"]);
    assert_eq!(plan.len(), 3);
    assert!(
        plan.snapshot()
            .iter()
            .all(|entry| entry.action == Action::Pick)
    );
}

#[test]
fn move_up_and_down_swap_with_neighbour() {
    let mut plan = plan_of(&["c3", "c2", "c1"]);
    assert_eq!(plan.move_entry(1, Direction::Up), Some(0));
    assert_eq!(order(&plan), vec!["c2", "c3", "c1"]);
    assert_eq!(plan.move_entry(0, Direction::Down), Some(1));
    assert_eq!(order(&plan), vec!["c3", "c2", "c1"]);
    assert_eq!(plan.move_entry(1, Direction::Down), Some(2));
    assert_eq!(order(&plan), vec!["c3", "c1", "c2"]);
}

#[test]
fn moves_past_either_end_are_noops() {
    let mut plan = plan_of(&["c3", "c2", "c1"]);
    let before = plan.clone();
    assert_eq!(plan.move_entry(0, Direction::Up), None);
    assert_eq!(plan, before);
    assert_eq!(plan.move_entry(2, Direction::Down), None);
    assert_eq!(plan, before);
    assert_eq!(plan.move_entry(7, Direction::Up), None);
    assert_eq!(plan, before);
}

#[test]
fn move_on_empty_plan_is_noop() {
    let mut plan = Plan::default();
    assert_eq!(plan.move_entry(0, Direction::Down), None);
    assert!(plan.is_empty());
}

#[test]
fn move_up_then_down_restores_order() {
    let mut plan = plan_of(&["c4", "c3", "c2", "c1"]);
    plan.set_action(2, Action::Squash).expect("squash mid entry");
    let before = plan.clone();
    for position in 1..plan.len() {
        let moved = plan.move_entry(position, Direction::Up).expect("move up");
        assert_eq!(moved, position - 1);
        plan.move_entry(moved, Direction::Down).expect("move back");
        assert_eq!(plan, before);
    }
}

#[test]
fn moved_entry_keeps_its_action() {
    let mut plan = plan_of(&["c3", "c2", "c1"]);
    plan.set_action(0, Action::Edit).expect("edit");
    plan.move_entry(0, Direction::Down);
    assert_eq!(plan.get(1).map(|entry| entry.action), Some(Action::Edit));
    assert_eq!(plan.get(0).map(|entry| entry.action), Some(Action::Pick));
}

#[test]
fn oldest_entry_rejects_squash_and_fixup() {
    for action in [Action::Squash, Action::Fixup] {
        let mut plan = plan_of(&["c3", "c2", "c1"]);
        plan.set_action(0, Action::Drop).expect("drop newest");
        let before = plan.clone();
        let err = plan.set_action(2, action).expect_err("oldest cannot merge");
        assert_eq!(err, PlanError::OldestCannotMerge(action));
        assert!(err.to_string().contains("Can't squash/fixup the oldest commit"));
        assert_eq!(plan, before);
    }
}

#[test]
fn single_entry_plan_rejects_squash() {
    let mut plan = plan_of(&["c1"]);
    assert!(plan.set_action(0, Action::Fixup).is_err());
    assert_eq!(plan.get(0).map(|entry| entry.action), Some(Action::Pick));
}

#[test]
fn oldest_entry_accepts_pick_edit_and_drop() {
    for action in [Action::Edit, Action::Drop, Action::Pick] {
        let mut plan = plan_of(&["c3", "c2", "c1"]);
        plan.set_action(2, action).expect("allowed on oldest");
        let actions: Vec<Action> = plan.snapshot().iter().map(|entry| entry.action).collect();
        assert_eq!(actions, vec![Action::Pick, Action::Pick, action]);
    }
}

#[test]
fn squash_allowed_above_oldest_and_can_be_undone() {
    let mut plan = plan_of(&["c3", "c2", "c1"]);
    plan.set_action(1, Action::Squash).expect("squash");
    assert_eq!(plan.get(1).map(|entry| entry.action), Some(Action::Squash));
    plan.set_action(1, Action::Pick).expect("undo");
    assert_eq!(plan.get(1).map(|entry| entry.action), Some(Action::Pick));
}

#[test]
fn dropping_every_entry_is_allowed() {
    let mut plan = plan_of(&["c3", "c2", "c1"]);
    for position in 0..plan.len() {
        plan.set_action(position, Action::Drop).expect("drop");
    }
    assert!(
        plan.snapshot()
            .iter()
            .all(|entry| entry.action == Action::Drop)
    );
}

#[test]
fn set_action_out_of_range_is_reported() {
    let mut plan = plan_of(&["c1"]);
    assert_eq!(
        plan.set_action(3, Action::Edit),
        Err(PlanError::NoSuchEntry(3))
    );
}

#[test]
fn action_keywords_and_picker_order() {
    let keywords: Vec<&str> = Action::ALL.iter().map(|action| action.keyword()).collect();
    assert_eq!(keywords, vec!["pick", "squash", "fixup", "edit", "drop"]);
    assert_eq!(Action::Fixup.index(), 2);
    assert_eq!(Action::Drop.to_string(), "drop");
    assert!(Action::Squash.merges_into_previous());
    assert!(!Action::Edit.merges_into_previous());
}
