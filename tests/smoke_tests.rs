//! Smoke tests for the target-directed driver.
//!
//! Each scenario runs a full episode against the in-memory store.

use forward_infer::config::{
    FLAG_GENERATE_ONLY_FIRST, STAT_RESTARTS, STAT_ROWS_GENERATED, STAT_RULES_FIRED,
    STAT_RULES_TRIED,
};
use forward_infer::store::{Slot, TriplePattern};
use forward_infer::{
    ExpressionNode, FlagSet, InferenceError, MemoryStore, NodeId, OutputFormatter, PatternId,
    Rule, StrategyBuilder, StrategyOutcome,
};

struct Kb {
    store: MemoryStore,
    output: NodeId,
    socrates: NodeId,
    plato: NodeId,
    is_a: NodeId,
    mortal: NodeId,
    animal: NodeId,
    socrates_mortal: PatternId,
    any_mortal: PatternId,
    man_x: PatternId,
    mortal_x: PatternId,
    animal_x: PatternId,
    unicorn_x: PatternId,
    god_x: PatternId,
}

fn kb() -> Kb {
    let mut store = MemoryStore::new();
    let socrates = store.node("socrates");
    let plato = store.node("plato");
    let is_a = store.node("is_a");
    let man = store.node("man");
    let mortal = store.node("mortal");
    let animal = store.node("animal");
    let unicorn = store.node("unicorn");
    let god = store.node("god");
    let output = store.node("output");
    store.insert_fact(socrates, is_a, man);

    let socrates_mortal = store.add_pattern(vec![TriplePattern::new(socrates, is_a, mortal)]);
    let any_mortal = store.add_pattern(vec![TriplePattern::new(Slot::var("x"), is_a, mortal)]);
    let man_x = store.add_pattern(vec![TriplePattern::new("x", is_a, man)]);
    let mortal_x = store.add_pattern(vec![TriplePattern::new("x", is_a, mortal)]);
    let animal_x = store.add_pattern(vec![TriplePattern::new("x", is_a, animal)]);
    let unicorn_x = store.add_pattern(vec![TriplePattern::new("x", is_a, unicorn)]);
    let god_x = store.add_pattern(vec![TriplePattern::new("x", is_a, god)]);

    Kb {
        store,
        output,
        socrates,
        plato,
        is_a,
        mortal,
        animal,
        socrates_mortal,
        any_mortal,
        man_x,
        mortal_x,
        animal_x,
        unicorn_x,
        god_x,
    }
}

fn rule(premise: PatternId, conclusion: PatternId) -> Rule {
    Rule::implication(
        conclusion,
        ExpressionNode::atomic(premise),
        ExpressionNode::atomic(conclusion),
    )
}

#[test]
fn test_restart_ordering_stops_before_lower_tier() {
    let mut kb = kb();
    let r_fail = rule(kb.unicorn_x, kb.mortal_x);
    let r_succeed = rule(kb.man_x, kb.mortal_x);
    let r_other = rule(kb.man_x, kb.animal_x);

    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .tier(vec![r_fail, r_succeed])
        .tier(vec![r_other])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert_eq!(outcome, StrategyOutcome::Achieved { firings: 1 });
    assert!(outcome.target_achieved());
    assert_eq!(strategy.stats().get(STAT_RULES_TRIED), Some(2));
    assert_eq!(strategy.stats().get(STAT_RESTARTS), None);
    assert!(kb.store.has_fact(kb.socrates, kb.is_a, kb.mortal));
    assert!(
        !kb.store.has_fact(kb.socrates, kb.is_a, kb.animal),
        "lower tier must not be touched"
    );
}

#[test]
fn test_restart_reenables_rejected_rules() {
    let mut kb = kb();
    let mortal_from_animal = rule(kb.animal_x, kb.mortal_x);
    let r_fail = rule(kb.unicorn_x, kb.mortal_x);
    let animal_from_man = rule(kb.man_x, kb.animal_x);

    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .tier(vec![mortal_from_animal, r_fail])
        .tier(vec![animal_from_man])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    // Tier 1 rejects both rules, tier 2 fires, the rescan fires the first rule.
    assert_eq!(outcome, StrategyOutcome::Achieved { firings: 2 });
    assert_eq!(strategy.stats().get(STAT_RULES_TRIED), Some(4));
    assert_eq!(strategy.stats().get(STAT_RULES_FIRED), Some(2));
    assert_eq!(strategy.stats().get(STAT_RESTARTS), Some(1));

    let formulas: Vec<_> = strategy
        .solution_tree()
        .iter()
        .map(|node| node.formula)
        .collect();
    assert_eq!(formulas, vec![kb.animal_x, kb.mortal_x]);
}

#[test]
fn test_exhaustion_drains_each_tier_once() {
    let mut kb = kb();
    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .tier(vec![rule(kb.unicorn_x, kb.mortal_x)])
        .tier(vec![rule(kb.god_x, kb.mortal_x)])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert_eq!(outcome, StrategyOutcome::Exhausted { firings: 0 });
    assert!(!outcome.target_achieved());
    assert_eq!(strategy.stats().get(STAT_RULES_TRIED), Some(2));
    assert_eq!(strategy.stats().get(STAT_RESTARTS), None);
    assert_eq!(kb.store.commit_count(), 0);
}

#[test]
fn test_fixpoint_without_target_terminates() {
    let mut kb = kb();
    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .tier(vec![rule(kb.man_x, kb.animal_x)])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    // The rule fires once; on the rescan its conclusion already holds.
    assert_eq!(outcome, StrategyOutcome::Exhausted { firings: 1 });
    assert_eq!(strategy.stats().get(STAT_RULES_TRIED), Some(2));
    assert_eq!(strategy.stats().get(STAT_RESTARTS), Some(1));
    assert_eq!(kb.store.commit_count(), 1);
}

#[test]
fn test_empty_rule_sets_abort_before_store_access() {
    let mut kb = kb();
    let mut strategy = StrategyBuilder::new(kb.socrates_mortal).build();
    let err = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .unwrap_err();

    assert_eq!(err, InferenceError::NoRuleSets);
    assert_eq!(err.to_string(), "no rule sets found");
    assert_eq!(kb.store.search_count(), 0);
    assert_eq!(kb.store.commit_count(), 0);
}

#[test]
fn test_satisfied_target_is_a_no_op() {
    let mut kb = kb();
    kb.store.insert_fact(kb.socrates, kb.is_a, kb.mortal);
    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .tier(vec![rule(kb.man_x, kb.animal_x)])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert_eq!(outcome, StrategyOutcome::AlreadyAchieved);
    assert!(!outcome.target_achieved());
    assert_eq!(kb.store.commit_count(), 0);
    assert_eq!(strategy.stats().get(STAT_RULES_TRIED), None);
}

#[test]
fn test_satisfied_ground_target_with_arguments() {
    let mut kb = kb();
    kb.store.insert_fact(kb.socrates, kb.is_a, kb.mortal);
    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .arguments([kb.socrates])
        .tier(vec![rule(kb.man_x, kb.animal_x)])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert_eq!(outcome, StrategyOutcome::AlreadyAchieved);
    assert_eq!(kb.store.commit_count(), 0);
}

#[test]
fn test_ground_premise_with_arguments() {
    let mut kb = kb();
    let socrates_man = {
        let man = kb.store.node("man");
        kb.store
            .add_pattern(vec![TriplePattern::new(kb.socrates, kb.is_a, man)])
    };
    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .arguments([kb.socrates])
        .tier(vec![Rule::implication(
            kb.socrates_mortal,
            ExpressionNode::atomic(socrates_man),
            ExpressionNode::atomic(kb.socrates_mortal),
        )])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert_eq!(outcome, StrategyOutcome::Achieved { firings: 1 });
    assert!(kb.store.has_fact(kb.socrates, kb.is_a, kb.mortal));
}

#[test]
fn test_firing_budget() {
    let mut kb = kb();
    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .max_firings(1)
        .tier(vec![rule(kb.animal_x, kb.mortal_x)])
        .tier(vec![rule(kb.man_x, kb.animal_x)])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert_eq!(outcome, StrategyOutcome::ResourceLimit { firings: 1 });
    assert!(!kb.store.has_fact(kb.socrates, kb.is_a, kb.mortal));
}

#[test]
fn test_arguments_ground_target_and_premises() {
    let mut kb = kb();
    let man = kb.store.node("man");
    kb.store.insert_fact(kb.plato, kb.is_a, man);

    let mut strategy = StrategyBuilder::new(kb.any_mortal)
        .arguments([kb.socrates])
        .tier(vec![rule(kb.man_x, kb.mortal_x)])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert!(outcome.target_achieved());
    assert!(kb.store.has_fact(kb.socrates, kb.is_a, kb.mortal));
    assert!(!kb.store.has_fact(kb.plato, kb.is_a, kb.mortal));
}

#[test]
fn test_generate_only_first_flag() {
    let mut kb = kb();
    let man = kb.store.node("man");
    kb.store.insert_fact(kb.plato, kb.is_a, man);

    let mut flags = FlagSet::new();
    flags.enable(FLAG_GENERATE_ONLY_FIRST);
    let mut strategy = StrategyBuilder::new(kb.any_mortal)
        .apply_flags(&flags)
        .tier(vec![rule(kb.man_x, kb.mortal_x)])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert_eq!(outcome, StrategyOutcome::Achieved { firings: 1 });
    assert_eq!(strategy.stats().get(STAT_ROWS_GENERATED), Some(1));
    assert_eq!(kb.store.commit_count(), 1);
}

#[test]
fn test_output_structure_and_report() {
    let mut kb = kb();
    let mut strategy = StrategyBuilder::new(kb.socrates_mortal)
        .tier(vec![rule(kb.man_x, kb.mortal_x)])
        .build();
    let outcome = strategy
        .apply_iteration_strategy(&mut kb.store, kb.output)
        .expect("episode failed");

    assert_eq!(kb.store.structure(kb.output).len(), 1, "one new edge");

    let json = strategy.solution_tree().to_json().expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert_eq!(value["nodes"][0]["formula"], kb.mortal_x.0);
    assert_eq!(value["nodes"][0]["bindings"][0]["bindings"]["x"], kb.socrates.0);

    let mut formatter = OutputFormatter::new();
    formatter.write_banner().unwrap();
    formatter.write_config(strategy.config()).unwrap();
    formatter.write_solution_tree(strategy.solution_tree()).unwrap();
    formatter.write_outcome(&outcome).unwrap();
    formatter.write_statistics(strategy.stats()).unwrap();
    let report = formatter.into_output();
    assert!(report.contains("Target reached after 1 firings."));
    assert!(report.contains("rules_fired"));
}
