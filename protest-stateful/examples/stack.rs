//! Stateful property testing of a simple stack.

use std::rc::Rc;

use protest::combinators::{just, one_of, WeightedValue};
use protest::error::PredicateOutcome;
use protest::integer;
use protest_stateful::{simple_stateful_property, Action, SimpleAction};

#[derive(Debug, Clone, Default)]
struct Stack {
    items: Vec<i64>,
}

type StackAction = Rc<dyn Action<Stack, ()>>;

fn push_action(value: i64) -> StackAction {
    Rc::new(SimpleAction::new(format!("push({value})"), move |state: &mut Stack| {
        state.items.push(value);
        PredicateOutcome::Pass
    }))
}

fn pop_action() -> StackAction {
    Rc::new(SimpleAction::new("pop", |state: &mut Stack| {
        if state.items.pop().is_none() {
            return PredicateOutcome::Precondition("stack is empty".into());
        }
        PredicateOutcome::Pass
    }))
}

fn peek_action() -> StackAction {
    Rc::new(SimpleAction::new("peek", |state: &mut Stack| {
        if state.items.is_empty() {
            return PredicateOutcome::Precondition("stack is empty".into());
        }
        let _ = state.items.last();
        PredicateOutcome::Pass
    }))
}

fn main() {
    let property = simple_stateful_property(just(Stack::default()), |_state: &Stack| {
        one_of(vec![
            WeightedValue::new(integer(0, 100).map(push_action)),
            WeightedValue::new(just(pop_action())),
            WeightedValue::new(just(peek_action())),
        ])
    })
    .set_num_runs(200)
    .set_max_actions(40)
    .set_post_check(|state: &Stack, _model: &()| {
        if state.items.len() > 40 {
            return Err(protest::PropertyError::stateful_failure(
                Vec::new(),
                "<final state>".to_string(),
                "stack grew past its action bound".to_string(),
            ));
        }
        Ok(())
    });

    match property.go() {
        Ok(()) => println!("stack property held across all generated traces"),
        Err(e) => println!("stack property failed: {e}"),
    }
}
