//! Property-based tests for plan validation and truncation ordering.

use proptest::prelude::*;

use crate::seeding::graph::{EntityKind, dependents_closure, truncation_order};
use crate::seeding::plan::{RunPolicy, StageManifest, StagePolicy, StepManifest, validate_plan};

/// Strategy for a random ordering of every entity kind.
fn arb_kind_order() -> impl Strategy<Value = Vec<EntityKind>> {
    Just(EntityKind::ALL.to_vec()).prop_shuffle()
}

/// Strategy for a non-empty subset of entity kinds.
fn arb_roots() -> impl Strategy<Value = Vec<EntityKind>> {
    proptest::sample::subsequence(EntityKind::ALL.to_vec(), 1..6)
}

fn is_topological(order: &[EntityKind]) -> bool {
    order.iter().enumerate().all(|(index, kind)| {
        kind.dependencies()
            .iter()
            .all(|dep| order[..index].contains(dep))
    })
}

/// One single-step stage per kind, in the given order.
fn single_kind_plan(order: &[EntityKind]) -> Vec<StageManifest> {
    order
        .iter()
        .map(|kind| StageManifest {
            name: kind.table_name().to_string(),
            policy: StagePolicy::Required,
            run: RunPolicy::Always,
            steps: vec![StepManifest::new(
                kind.table_name(),
                std::slice::from_ref(static_kind(*kind)),
            )],
        })
        .collect()
}

fn static_kind(kind: EntityKind) -> &'static EntityKind {
    let index = EntityKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap();
    &EntityKind::ALL[index]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A plan is accepted exactly when its stages follow the dependency graph.
    #[test]
    fn prop_validation_matches_topological_order(order in arb_kind_order()) {
        let plan = single_kind_plan(&order);
        prop_assert_eq!(validate_plan(&plan).is_ok(), is_topological(&order));
    }

    /// Truncation never deletes a parent before one of its children.
    #[test]
    fn prop_truncation_order_is_child_first(roots in arb_roots()) {
        let order = truncation_order(&roots);
        let closure = dependents_closure(&roots);

        prop_assert_eq!(order.len(), closure.len());
        for (index, kind) in order.iter().enumerate() {
            for dep in kind.dependencies() {
                if let Some(dep_index) = order.iter().position(|k| k == dep) {
                    prop_assert!(dep_index > index, "{} deleted before child {}", dep, kind);
                }
            }
        }
    }

    /// The closure is closed under "is referenced by".
    #[test]
    fn prop_closure_contains_every_dependent(roots in arb_roots()) {
        let closure = dependents_closure(&roots);
        for kind in &closure {
            for dependent in kind.direct_dependents() {
                prop_assert!(closure.contains(&dependent));
            }
        }
    }
}
