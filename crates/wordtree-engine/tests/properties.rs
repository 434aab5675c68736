//! Property tests: sibling ranks stay contiguous under arbitrary mutation
//! sequences, and single-step moves invert each other.

use proptest::prelude::*;

use wordtree_core::{Depth, NodeId, TraversalOrder};
use wordtree_engine::{EngineError, MenuEngine};
use wordtree_storage::{InMemoryStore, MenuStore};

/// A mutation addressed by indexes into the current list of live nodes.
#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Delete(usize),
    MoveNext(usize),
    MovePrev(usize),
    Reparent(usize, usize),
    Rename(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<usize>().prop_map(Op::Add),
        1 => any::<usize>().prop_map(Op::Delete),
        2 => any::<usize>().prop_map(Op::MoveNext),
        2 => any::<usize>().prop_map(Op::MovePrev),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Reparent(a, b)),
        1 => any::<usize>().prop_map(Op::Rename),
    ]
}

fn live_nodes(engine: &MenuEngine<InMemoryStore>) -> Vec<NodeId> {
    let mut ids = vec![NodeId::ROOT];
    ids.extend(
        engine
            .descendants(NodeId::ROOT, TraversalOrder::Pre, Depth::Unbounded)
            .unwrap()
            .into_iter()
            .map(|c| c.id),
    );
    ids
}

fn apply(engine: &mut MenuEngine<InMemoryStore>, op: &Op, step: usize) {
    let live = live_nodes(engine);
    let pick = |i: usize| live[i % live.len()];
    let parent_of = |engine: &MenuEngine<InMemoryStore>, id: NodeId| {
        engine.store().find_edge(id).unwrap().map(|e| e.parent)
    };

    let result = match op {
        Op::Add(i) => engine
            .add_child(pick(*i), &format!("n{}", step))
            .map(|_| ()),
        Op::Delete(i) => engine.delete_subtree(pick(*i)).map(|_| ()),
        Op::MoveNext(i) => {
            let id = pick(*i);
            match parent_of(engine, id) {
                Some(parent) => engine.move_next(id, parent).map(|_| ()),
                None => Ok(()),
            }
        }
        Op::MovePrev(i) => {
            let id = pick(*i);
            match parent_of(engine, id) {
                Some(parent) => engine.move_prev(id, parent).map(|_| ()),
                None => Ok(()),
            }
        }
        Op::Reparent(i, j) => engine.reparent(pick(*i), pick(*j)).map(|_| ()),
        Op::Rename(i) => engine.rename_node(pick(*i), "renamed").map(|_| ()),
    };

    // Root deletes and cyclic moves are refused; nothing else may fail.
    if let Err(err) = result {
        assert!(
            matches!(err, EngineError::InvalidOperation(_)),
            "unexpected failure for {:?}: {}",
            op,
            err
        );
    }
}

fn assert_contiguous(engine: &MenuEngine<InMemoryStore>) {
    for id in live_nodes(engine) {
        let ordinals: Vec<u32> = engine
            .children(id)
            .unwrap()
            .iter()
            .map(|c| c.ordinal)
            .collect();
        let expected: Vec<u32> = (1..=ordinals.len() as u32).collect();
        assert_eq!(ordinals, expected, "children of {}", id);
    }
}

fn fresh_engine() -> MenuEngine<InMemoryStore> {
    let mut engine = MenuEngine::new(InMemoryStore::new());
    engine.ensure_root().unwrap();
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn ordinals_stay_contiguous(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut engine = fresh_engine();
        for (step, op) in ops.iter().enumerate() {
            apply(&mut engine, op, step);
            assert_contiguous(&engine);
        }

        let report = engine.report().unwrap();
        prop_assert_eq!(report.unreachable(), 0);
        prop_assert_eq!(report.edges + 1, report.nodes);
    }

    #[test]
    fn move_next_then_prev_is_identity(
        siblings in 2usize..8,
        pick in any::<usize>(),
    ) {
        let mut engine = fresh_engine();
        let ids: Vec<NodeId> = (0..siblings)
            .map(|i| engine.add_child(NodeId::ROOT, &format!("s{}", i)).unwrap().id)
            .collect();
        let before: Vec<(NodeId, u32)> = engine
            .children(NodeId::ROOT)
            .unwrap()
            .into_iter()
            .map(|c| (c.id, c.ordinal))
            .collect();

        let id = ids[pick % ids.len()];
        if engine.move_next(id, NodeId::ROOT).unwrap() {
            prop_assert!(engine.move_prev(id, NodeId::ROOT).unwrap());
        }

        let after: Vec<(NodeId, u32)> = engine
            .children(NodeId::ROOT)
            .unwrap()
            .into_iter()
            .map(|c| (c.id, c.ordinal))
            .collect();
        prop_assert_eq!(before, after);
    }
}
