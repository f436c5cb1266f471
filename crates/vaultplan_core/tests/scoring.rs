use chrono::{Duration, NaiveDate};
use vaultplan_core::{Dimensions, ScoringEngine, StaticTagLexicon, TaskIndex, TaskRecord};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn lexicon() -> StaticTagLexicon {
    StaticTagLexicon::new()
        .with_dimensions("#health", 4, 1, 2)
        .with_dimensions("#chore", 1, 2, 1)
        .with_dimensions("#tax", 3, 3, 4)
        .with_authority_tag("#tax")
}

#[test]
fn tag_and_date_signals_fold_with_max_not_sum() {
    let index = TaskIndex::build(vec![TaskRecord::new("t", "- [ ] dentist")
        .with_tags(["#health", "#chore"])
        .with_due(today() + Duration::days(5))]);
    let lexicon = lexicon();
    let engine = ScoringEngine::new(&lexicon);
    let breakdown = engine.breakdown(index.get("t").unwrap(), &index, today());

    assert_eq!(breakdown.from_tags, Dimensions::new(4, 2, 2));
    assert_eq!(breakdown.from_dates, Dimensions::new(0, 3, 0));
    assert_eq!(breakdown.final_dimensions, Dimensions::new(4, 3, 2));
    assert_eq!(engine.score_task(index.get("t").unwrap(), &index, today()).score, 4.0);
}

#[test]
fn relation_friction_moves_one_step_each_way() {
    let index = TaskIndex::build(vec![
        TaskRecord::new("epic", "epic").with_tags(["#tax"]),
        TaskRecord::new("step", "step").with_tags(["#tax"]).child_of("epic"),
    ]);
    let lexicon = lexicon();
    let engine = ScoringEngine::new(&lexicon);
    assert_eq!(
        engine.dimensions(index.get("epic").unwrap(), &index, today()),
        Dimensions::new(3, 3, 5)
    );
    assert_eq!(
        engine.dimensions(index.get("step").unwrap(), &index, today()),
        Dimensions::new(3, 3, 3)
    );
}

#[test]
fn stale_undated_tasks_gain_value_and_pressure() {
    let index = TaskIndex::build(vec![
        TaskRecord::new("old", "old").with_created(today() - Duration::days(61)),
        TaskRecord::new("old-due", "old")
            .with_created(today() - Duration::days(61))
            .with_due(today() + Duration::days(40)),
    ]);
    let lexicon = StaticTagLexicon::new();
    let engine = ScoringEngine::new(&lexicon);
    assert_eq!(
        engine.dimensions(index.get("old").unwrap(), &index, today()),
        Dimensions::new(5, 3, 0)
    );
    assert_eq!(
        engine.dimensions(index.get("old-due").unwrap(), &index, today()),
        Dimensions::new(0, 3, 0)
    );
}

#[test]
fn future_created_date_is_flagged_with_full_pressure() {
    let index = TaskIndex::build(vec![
        TaskRecord::new("typo", "typo").with_created(today() + Duration::days(3))
    ]);
    let lexicon = StaticTagLexicon::new();
    let engine = ScoringEngine::new(&lexicon);
    assert_eq!(
        engine.dimensions(index.get("typo").unwrap(), &index, today()).pressure,
        5
    );
}

#[test]
fn score_all_orders_by_score_then_id() {
    let index = TaskIndex::build(vec![
        TaskRecord::new("b", "b").with_tags(["#chore"]),
        TaskRecord::new("a", "a").with_tags(["#chore"]),
        TaskRecord::new("z", "z").with_tags(["#health"]),
        TaskRecord::new("none", "none"),
    ]);
    let scored = ScoringEngine::new(&lexicon()).score_all(&index, today());
    let ids: Vec<&str> = scored.iter().map(|task| task.id.as_str()).collect();
    // health: 4*1/3, chore: 1*2/2
    assert_eq!(ids, vec!["z", "a", "b", "none"]);
    assert!(scored.iter().all(|task| task.score >= 0.0));
}
