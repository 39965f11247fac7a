//! Stack operations and the shunting-yard infix to postfix conversion.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{join, Cell, Highlight, ListKind, Markers, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Stacks;
    registry.insert(Entry::new("stack-impl", "Stack Implementation", c, ("O(1)", "O(n)"), stack_impl));
    registry.insert(Entry::new("stack-push", "Stack Push", c, ("O(1)", "O(1)"), stack_push));
    registry.insert(Entry::new("stack-pop", "Stack Pop", c, ("O(1)", "O(1)"), stack_pop));
    registry.insert(Entry::new("infix-postfix", "Infix to Postfix", c, ("O(n)", "O(n)"), infix_postfix));
}

const STACK_CAPACITY: usize = 6;
const PUSH_VALUE: i64 = 99;
const EXPRESSION: &str = "a+b*c";

fn stack_view(stack: &[i64]) -> View {
    View::list(ListKind::Stack, stack, Markers::stack_top(stack.len()))
}

fn stack_impl(seed: &Seed) -> Result<Trace> {
    let mut elements = seed.sequence("stack-impl")?;
    elements.truncate(STACK_CAPACITY);
    let mut stack: Vec<i64> = Vec::with_capacity(elements.len());
    let mut rec = Recorder::new("stack-impl");

    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            "Stack operations demo: push every element, then pop them all",
        )
        .at_line(1),
    );

    for value in elements {
        stack.push(value);
        rec.emit(
            Snapshot::new(
                stack_view(&stack),
                format!("Push {value} onto stack. Stack size: {}", stack.len()),
            )
            .mark(Highlight::Swapping, [stack.len() - 1])
            .at_line(2),
        );
    }

    while let Some(popped) = stack.pop() {
        rec.emit(
            Snapshot::new(
                stack_view(&stack),
                format!("Pop {popped} from stack. Stack size: {}", stack.len()),
            )
            .annotate("popped", popped)
            .at_line(3),
        );
    }

    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            "Stack is now empty! LIFO order demonstrated",
        )
        .at_line(5),
    );
    rec.finish()
}

/// Push the seed's target (or 99) onto the first four seed values.
fn stack_push(seed: &Seed) -> Result<Trace> {
    let mut stack = seed.sequence("stack-push")?;
    stack.truncate(4);
    let value = seed.target().unwrap_or(PUSH_VALUE);
    let mut rec = Recorder::new("stack-push");

    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            format!(
                "Initial stack: [{}] (Size: {}/{STACK_CAPACITY})",
                join(&stack, ", "),
                stack.len()
            ),
        )
        .at_line(1),
    );
    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            format!(
                "Step 1: Check for overflow. Current size {} < {STACK_CAPACITY}. OK to push.",
                stack.len()
            ),
        )
        .at_line(2),
    );

    stack.push(value);
    let top = stack.len() - 1;
    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            format!("Step 2: Increment top and insert {value} at index {top}"),
        )
        .mark(Highlight::Swapping, [top])
        .at_line(3),
    );
    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            format!("Push complete! Top is now {value} at index {top}"),
        )
        .mark(Highlight::Found, [top])
        .at_line(4),
    );
    rec.finish()
}

fn stack_pop(seed: &Seed) -> Result<Trace> {
    let mut stack = seed.sequence("stack-pop")?;
    stack.truncate(5);
    let mut rec = Recorder::new("stack-pop");

    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            format!(
                "Initial stack: [{}] (Size: {})",
                join(&stack, ", "),
                stack.len()
            ),
        )
        .at_line(1),
    );

    let Some(&value) = stack.last() else {
        rec.emit(
            Snapshot::new(stack_view(&stack), "Stack underflow: nothing to pop")
                .mark(Highlight::Found, [])
                .at_line(2),
        );
        return rec.finish();
    };
    let top = stack.len() - 1;

    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            "Step 1: Check for underflow. Stack is not empty. OK to pop.",
        )
        .at_line(2),
    );
    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            format!("Step 2: Access the top element: {value}"),
        )
        .mark(Highlight::Current, [top])
        .at_line(3),
    );

    stack.pop();
    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            format!("Step 3: Decrement top pointer. Popped value: {value}"),
        )
        .annotate("popped", value)
        .at_line(4),
    );
    rec.emit(
        Snapshot::new(
            stack_view(&stack),
            format!("Pop complete! {value} removed from stack."),
        )
        .annotate("popped", value)
        .at_line(5),
    );
    rec.finish()
}

fn precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 1,
        '*' | '/' => 2,
        '^' => 3,
        _ => 0,
    }
}

fn operator_view(stack: &[char]) -> View {
    View::List {
        list: ListKind::Stack,
        items: stack.iter().copied().map(Cell::Char).collect(),
        markers: Markers::stack_top(stack.len()),
    }
}

/// Shunting-yard over a fixed expression. The view is the operator stack;
/// the postfix output so far is in the `output` annotation.
fn infix_postfix(_seed: &Seed) -> Result<Trace> {
    let mut rec = Recorder::new("infix-postfix");
    let mut ops: Vec<char> = Vec::new();
    let mut output = String::new();

    rec.emit(
        Snapshot::new(
            operator_view(&ops),
            format!("Convert infix \"{EXPRESSION}\" to postfix"),
        )
        .annotate("output", output.clone())
        .at_line(1),
    );

    for (i, c) in EXPRESSION.chars().enumerate() {
        let message = if c.is_ascii_alphanumeric() {
            output.push(c);
            format!("Operand '{c}' → output. Result: {output}")
        } else if c == '(' {
            ops.push(c);
            "Open parenthesis → stack".to_string()
        } else if c == ')' {
            while let Some(top) = ops.pop() {
                if top == '(' {
                    break;
                }
                output.push(top);
            }
            format!("Close parenthesis: popped to output. Result: {output}")
        } else {
            while let Some(&top) = ops.last() {
                let right_assoc = c == '^';
                let outranks = precedence(top) > precedence(c)
                    || (precedence(top) == precedence(c) && !right_assoc);
                if top == '(' || !outranks {
                    break;
                }
                output.push(top);
                ops.pop();
            }
            ops.push(c);
            format!("Operator '{c}' → stack. Stack: [{}]", join(&ops, ", "))
        };

        let mut snap = Snapshot::new(operator_view(&ops), message)
            .annotate("output", output.clone())
            .annotate("position", i)
            .at_line(if c.is_ascii_alphanumeric() { 3 } else { 5 });
        if !c.is_ascii_alphanumeric() && !ops.is_empty() {
            snap = snap.mark(Highlight::Swapping, [ops.len() - 1]);
        }
        rec.emit(snap);
    }

    while let Some(top) = ops.pop() {
        if top != '(' {
            output.push(top);
        }
        rec.emit(
            Snapshot::new(
                operator_view(&ops),
                format!("Pop remaining: Result: {output}"),
            )
            .annotate("output", output.clone())
            .at_line(7),
        );
    }

    rec.emit(
        Snapshot::new(operator_view(&ops), format!("Postfix: {output}"))
            .annotate("output", output)
            .at_line(9),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Scalar;

    #[test]
    fn stack_impl_is_lifo() {
        let trace = stack_impl(&Seed::from(vec![1, 2, 3])).unwrap();
        // intro + 3 pushes + 3 pops + outro
        assert_eq!(trace.len(), 8);
        assert_eq!(trace.steps()[3].view, stack_view(&[1, 2, 3]));
        assert_eq!(trace.steps()[4].annotation("popped"), Some(&Scalar::Int(3)));
        assert!(trace.last().view.is_empty());
    }

    #[test]
    fn push_marks_new_top() {
        let trace = stack_push(&Seed::from(vec![4, 5, 6, 7, 8])).unwrap();
        let View::List { items, markers, .. } = &trace.last().view else {
            panic!("expected list view");
        };
        assert_eq!(items.len(), 5);
        assert_eq!(items[4], Cell::Int(99));
        assert_eq!(markers.top, Some(4));
        assert_eq!(trace.last().highlighted(Highlight::Found), &[4]);
    }

    #[test]
    fn pop_from_empty_reports_underflow() {
        let trace = stack_pop(&Seed::from(vec![])).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.last().message, "Stack underflow: nothing to pop");
    }

    #[test]
    fn pop_removes_top() {
        let trace = stack_pop(&Seed::from(vec![1, 2, 3])).unwrap();
        assert_eq!(trace.last().view, stack_view(&[1, 2]));
        assert_eq!(trace.last().message, "Pop complete! 3 removed from stack.");
    }

    #[test]
    fn postfix_respects_precedence() {
        let trace = infix_postfix(&Seed::from(vec![])).unwrap();
        assert_eq!(trace.last().message, "Postfix: abc*+");
        assert!(trace.last().view.is_empty());
    }
}
