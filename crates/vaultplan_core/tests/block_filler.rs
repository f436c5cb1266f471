use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use vaultplan_core::{plan_day, BlockKind, PlannerSettings, StaticTagLexicon, TaskIndex, TaskRecord};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn t(hour: u32, minute: u32) -> NaiveDateTime {
    monday().and_hms_opt(hour, minute, 0).unwrap()
}

fn workday_tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord::new("c1", "- [ ] ship release notes")
            .with_tags(["#b5"])
            .with_duration(60),
        TaskRecord::new("k1", "- [ ] review budget").with_duration(45),
        TaskRecord::new("k2", "- [ ] migrate archive").with_duration(120),
        TaskRecord::new("w1", "- [ ] plan trip"),
    ]
}

#[test]
fn committed_work_fills_the_first_deep_block() {
    let index = TaskIndex::build(workday_tasks());
    let schedule = plan_day(
        &index,
        &StaticTagLexicon::new(),
        &PlannerSettings::default(),
        t(7, 0),
    );
    assert_eq!(schedule.profile_id.as_deref(), Some("workday"));
    assert!(schedule
        .diagnostics
        .iter()
        .any(|line| line.contains("`commit-review` skipped")));
    assert_eq!(schedule.blocks[0].recipe_id, "morning-deep");
    assert_eq!((schedule.blocks[0].start, schedule.blocks[0].end), (t(8, 0), t(9, 30)));

    let placed: Vec<(&str, usize, NaiveDateTime, NaiveDateTime)> = schedule
        .placed_tasks()
        .map(|task| (task.task_id.as_str(), task.block_index, task.start, task.end))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("c1", 0, t(8, 0), t(9, 0)),
            ("w1", 0, t(9, 0), t(9, 30)),
            ("k1", 1, t(9, 30), t(10, 15)),
        ]
    );
}

#[test]
fn tasks_longer_than_every_block_stay_unplaced() {
    let index = TaskIndex::build(workday_tasks());
    let schedule = plan_day(
        &index,
        &StaticTagLexicon::new(),
        &PlannerSettings::default(),
        t(7, 0),
    );
    assert!(schedule.blocks.iter().all(|block| block.minutes < 120));
    assert!(schedule.placed_tasks().all(|task| task.task_id != "k2"));
    assert!(schedule.all_tasks.iter().any(|task| task.id == "k2"));
}

#[test]
fn placed_tasks_stay_inside_their_blocks_and_appear_once() {
    let mut tasks = workday_tasks();
    tasks.extend((0..20).map(|n| TaskRecord::new(format!("q{n:02}"), "quick").with_duration(15)));
    let index = TaskIndex::build(tasks);
    let schedule = plan_day(
        &index,
        &StaticTagLexicon::new(),
        &PlannerSettings::default(),
        t(7, 0),
    );

    let mut seen = BTreeSet::new();
    for task in schedule.placed_tasks() {
        assert!(seen.insert(task.task_id.clone()), "{} placed twice", task.task_id);
        let block = &schedule.blocks[task.block_index];
        assert!(block.start <= task.start && task.end <= block.end);
        assert!(!block.kind.is_governance());
    }
    assert_eq!(seen.len(), 23);
}

#[test]
fn pending_review_withholds_every_other_block() {
    let mut tasks = workday_tasks();
    tasks.push(TaskRecord::new("review", "- [ ] daily review").with_tags(["#r0"]));
    let index = TaskIndex::build(tasks);
    let schedule = plan_day(
        &index,
        &StaticTagLexicon::new(),
        &PlannerSettings::default(),
        t(9, 5),
    );

    assert!(!schedule.context.is_r0_done());
    assert_eq!(schedule.blocks.len(), 1);
    assert_eq!(schedule.blocks[0].kind, BlockKind::GovernanceR0);
    assert_eq!((schedule.blocks[0].start, schedule.blocks[0].end), (t(9, 5), t(9, 35)));
    assert_eq!(schedule.placed_tasks().count(), 0);
    assert!(schedule
        .diagnostics
        .iter()
        .any(|line| line.starts_with("r0: daily review pending")));
}

#[test]
fn completed_review_unlocks_the_profile() {
    let yesterday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let mut tasks = workday_tasks();
    tasks.push(
        TaskRecord::new("review", "- [ ] daily review")
            .with_tags(["#r0"])
            .with_due(yesterday),
    );
    let index = TaskIndex::build(tasks);
    let schedule = plan_day(
        &index,
        &StaticTagLexicon::new(),
        &PlannerSettings::default(),
        t(7, 0),
    );

    assert!(schedule.context.is_r0_done());
    assert!(schedule.blocks.len() > 1);
    assert!(schedule.placed_tasks().all(|task| task.task_id != "review"));
}

#[test]
fn parked_work_never_reaches_an_execute_block() {
    let tasks = vec![
        TaskRecord::new("parked", "- [ ] repaint fence")
            .with_tags(["#b6"])
            .with_duration(30),
        TaskRecord::new("k1", "- [ ] review budget").with_duration(45),
    ];
    let index = TaskIndex::build(tasks);
    let schedule = plan_day(
        &index,
        &StaticTagLexicon::new(),
        &PlannerSettings::default(),
        t(7, 0),
    );

    let placed: Vec<&str> = schedule
        .placed_tasks()
        .map(|task| task.task_id.as_str())
        .collect();
    assert_eq!(placed, vec!["k1"]);
}

#[test]
fn review_pending_just_before_lunch_waits_for_the_afternoon() {
    let mut tasks = workday_tasks();
    tasks.push(TaskRecord::new("review", "- [ ] daily review").with_tags(["#r0"]));
    let index = TaskIndex::build(tasks);
    let schedule = plan_day(
        &index,
        &StaticTagLexicon::new(),
        &PlannerSettings::default(),
        t(12, 29),
    );

    assert_eq!(schedule.blocks.len(), 1);
    assert_eq!(schedule.blocks[0].kind, BlockKind::GovernanceR0);
    assert_eq!(
        (schedule.blocks[0].start, schedule.blocks[0].minutes),
        (t(13, 15), 30)
    );
}

