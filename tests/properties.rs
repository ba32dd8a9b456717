//! Property tests for dispatch ordering and notification order.

use std::convert::Infallible;

use proptest::prelude::*;
use stowage::{Keyed, Reducer, Registry, StoreOptions, Value};

#[derive(Clone, Debug, PartialEq)]
struct Tally {
    total: i64,
    last: Option<i64>,
    steps: u32,
}

impl Keyed for Tally {
    fn value(&self, key: &str) -> Value {
        match key {
            "total" => self.total.into(),
            "last" => self.last.into(),
            "steps" => self.steps.into(),
            _ => Value::Absent,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Add(i64),
    Mul(i64),
    Reset,
    Noop,
}

struct TallyReducer;

impl Reducer for TallyReducer {
    type State = Tally;
    type Action = Op;
    type Error = Infallible;

    fn reduce(&self, state: &Tally, op: Op) -> Result<Tally, Infallible> {
        let total = match op {
            Op::Add(n) => state.total.wrapping_add(n),
            Op::Mul(n) => state.total.wrapping_mul(n),
            Op::Reset => 0,
            Op::Noop => return Ok(state.clone()),
        };
        Ok(Tally {
            total,
            last: Some(state.total),
            steps: state.steps + 1,
        })
    }
}

fn initial() -> Tally {
    Tally {
        total: 1,
        last: None,
        steps: 0,
    }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-1000i64..1000).prop_map(Op::Add),
        (-10i64..10).prop_map(Op::Mul),
        Just(Op::Reset),
        Just(Op::Noop),
    ]
}

proptest! {
    #[test]
    fn state_is_the_fold_of_dispatched_actions(ops in prop::collection::vec(op(), 0..64)) {
        let registry = Registry::new();
        let owner = registry
            .create_or_attach("tally", TallyReducer, initial(), StoreOptions::default())
            .unwrap();
        let reader = registry.attach::<TallyReducer>("tally").unwrap();

        for op in &ops {
            reader.dispatch(*op).unwrap();
        }

        let expected = ops
            .iter()
            .try_fold(initial(), |state, op| TallyReducer.reduce(&state, *op))
            .unwrap();
        let state = owner.state();
        prop_assert_eq!(&*state, &expected);
    }

    #[test]
    fn notification_order_is_render_order(
        order in Just((0..6).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let registry = Registry::new();
        let owner = registry
            .create_or_attach("tally", TallyReducer, initial(), StoreOptions::default())
            .unwrap();
        let consumers: Vec<_> = (0..6)
            .map(|_| registry.attach::<TallyReducer>("tally").unwrap())
            .collect();

        for &index in &order {
            consumers[index].watch(["total"]);
        }

        let commit = owner.dispatch(Op::Add(1)).unwrap();

        let mut expected = vec![owner.id()];
        expected.extend(order.iter().map(|&index| consumers[index].id()));
        prop_assert_eq!(commit.consumers().collect::<Vec<_>>(), expected);
    }
}
