//! Queue operations, including a fixed-capacity ring buffer.

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{join, Cell, Highlight, ListKind, Markers, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Queues;
    registry.insert(Entry::new("queue-impl", "Queue Implementation", c, ("O(1)", "O(n)"), queue_impl));
    registry.insert(Entry::new("circular-queue", "Circular Queue", c, ("O(1)", "O(n)"), circular_queue));
    registry.insert(Entry::new("queue-enqueue", "Queue Enqueue", c, ("O(1)", "O(1)"), queue_enqueue));
    registry.insert(Entry::new("queue-dequeue", "Queue Dequeue", c, ("O(1)", "O(1)"), queue_dequeue));
}

const QUEUE_CAPACITY: usize = 5;
const ENQUEUE_VALUE: i64 = 88;

fn queue_view(queue: &[i64]) -> View {
    View::list(ListKind::Queue, queue, Markers::queue_ends(queue.len()))
}

fn queue_impl(seed: &Seed) -> Result<Trace> {
    let mut elements = seed.sequence("queue-impl")?;
    elements.truncate(6);
    let mut queue: Vec<i64> = Vec::with_capacity(elements.len());
    let mut rec = Recorder::new("queue-impl");

    rec.emit(Snapshot::new(queue_view(&queue), "Queue operations demo: FIFO order").at_line(1));

    for value in elements {
        queue.push(value);
        rec.emit(
            Snapshot::new(
                queue_view(&queue),
                format!("Enqueue {value} at rear. Queue size: {}", queue.len()),
            )
            .mark(Highlight::Swapping, [queue.len() - 1])
            .at_line(2),
        );
    }

    while !queue.is_empty() {
        let value = queue.remove(0);
        rec.emit(
            Snapshot::new(
                queue_view(&queue),
                format!("Dequeue {value} from front. Queue size: {}", queue.len()),
            )
            .annotate("dequeued", value)
            .at_line(3),
        );
    }

    rec.emit(
        Snapshot::new(queue_view(&queue), "Queue is now empty! FIFO order demonstrated").at_line(5),
    );
    rec.finish()
}

/// Ring buffer of capacity 5.
struct Ring {
    slots: Vec<Cell>,
    front: Option<usize>,
    rear: Option<usize>,
    len: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Cell::Empty; capacity],
            front: None,
            rear: None,
            len: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    fn enqueue(&mut self, value: i64) -> usize {
        let rear = self.rear.map_or(0, |r| (r + 1) % self.slots.len());
        self.slots[rear] = Cell::Int(value);
        self.rear = Some(rear);
        self.front.get_or_insert(rear);
        self.len += 1;
        rear
    }

    fn dequeue(&mut self) -> Option<(usize, Cell)> {
        let front = self.front?;
        let value = std::mem::replace(&mut self.slots[front], Cell::Empty);
        self.len -= 1;
        if self.len == 0 {
            self.front = None;
            self.rear = None;
        } else {
            self.front = Some((front + 1) % self.slots.len());
        }
        Some((front, value))
    }

    fn describe(&self) -> String {
        let show = |p: Option<usize>| p.map_or("-1".to_string(), |i| i.to_string());
        format!("Front: {}, Rear: {}", show(self.front), show(self.rear))
    }

    fn view(&self) -> View {
        View::List {
            list: ListKind::Queue,
            items: self.slots.clone(),
            markers: Markers {
                front: self.front,
                rear: self.rear,
                ..Markers::default()
            },
        }
    }
}

/// Enqueue up to four seed values, dequeue two, then enqueue the next two so
/// the rear wraps around to the start of the buffer.
fn circular_queue(seed: &Seed) -> Result<Trace> {
    let values = seed.sequence("circular-queue")?;
    let mut ring = Ring::new(QUEUE_CAPACITY);
    let mut rec = Recorder::new("circular-queue");
    let mut pending = values.iter().copied().take(6);

    rec.emit(
        Snapshot::new(
            ring.view(),
            format!("Circular Queue of size {QUEUE_CAPACITY}. {}", ring.describe()),
        )
        .at_line(1),
    );

    let enqueue = |ring: &mut Ring, value: i64, rec: &mut Recorder| {
        if ring.is_full() {
            rec.emit(
                Snapshot::new(ring.view(), format!("Queue full, cannot enqueue {value}"))
                    .at_line(2),
            );
            return;
        }
        let at = ring.enqueue(value);
        rec.emit(
            Snapshot::new(ring.view(), format!("Enqueue {value}. {}", ring.describe()))
                .mark(Highlight::Swapping, [at])
                .at_line(3),
        );
    };

    for value in pending.by_ref().take(4) {
        enqueue(&mut ring, value, &mut rec);
    }

    for _ in 0..2 {
        let Some((at, value)) = ring.dequeue() else {
            break;
        };
        rec.emit(
            Snapshot::new(ring.view(), format!("Dequeue {value}. {}", ring.describe()))
                .mark(Highlight::Swapping, [at])
                .at_line(5),
        );
    }

    for value in pending {
        enqueue(&mut ring, value, &mut rec);
    }

    let mut done = Snapshot::new(
        ring.view(),
        format!("Circular queue demo complete. {}", ring.describe()),
    )
    .annotate("size", ring.len)
    .at_line(7);
    if let (Some(front), Some(rear)) = (ring.front, ring.rear) {
        done = done.mark(Highlight::Pointers, [front, rear]);
    }
    rec.emit(done);
    rec.finish()
}

/// Enqueue the seed's target (or 88) behind the first four seed values.
fn queue_enqueue(seed: &Seed) -> Result<Trace> {
    let mut queue = seed.sequence("queue-enqueue")?;
    queue.truncate(4);
    let value = seed.target().unwrap_or(ENQUEUE_VALUE);
    let mut rec = Recorder::new("queue-enqueue");

    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            format!(
                "Initial queue: [{}] (Size: {}/{QUEUE_CAPACITY})",
                join(&queue, ", "),
                queue.len()
            ),
        )
        .at_line(1),
    );
    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            format!(
                "Step 1: Check for overflow. Current size {} < {QUEUE_CAPACITY}. OK to enqueue.",
                queue.len()
            ),
        )
        .at_line(2),
    );

    queue.push(value);
    let rear = queue.len() - 1;
    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            format!("Step 2: Update rear and insert {value} at the end."),
        )
        .mark(Highlight::Swapping, [rear])
        .at_line(3),
    );
    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            format!("Enqueue complete! Rear is now {value} at index {rear}"),
        )
        .mark(Highlight::Found, [rear])
        .at_line(4),
    );
    rec.finish()
}

fn queue_dequeue(seed: &Seed) -> Result<Trace> {
    let mut queue = seed.sequence("queue-dequeue")?;
    queue.truncate(5);
    let mut rec = Recorder::new("queue-dequeue");

    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            format!(
                "Initial queue: [{}] (Size: {})",
                join(&queue, ", "),
                queue.len()
            ),
        )
        .at_line(1),
    );

    if queue.is_empty() {
        rec.emit(
            Snapshot::new(queue_view(&queue), "Queue underflow: nothing to dequeue")
                .mark(Highlight::Found, [])
                .at_line(2),
        );
        return rec.finish();
    }

    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            "Step 1: Check for underflow. Queue is not empty. OK to dequeue.",
        )
        .at_line(2),
    );
    let value = queue[0];
    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            format!("Step 2: Access the front element: {value}"),
        )
        .mark(Highlight::Current, [0])
        .at_line(3),
    );

    queue.remove(0);
    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            format!("Step 3: Update front pointer. Dequeued value: {value}"),
        )
        .annotate("dequeued", value)
        .at_line(4),
    );
    rec.emit(
        Snapshot::new(
            queue_view(&queue),
            format!("Dequeue complete! {value} removed from front."),
        )
        .annotate("dequeued", value)
        .at_line(5),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Scalar;

    #[test]
    fn queue_impl_is_fifo() {
        let trace = queue_impl(&Seed::from(vec![1, 2, 3])).unwrap();
        assert_eq!(trace.len(), 8);
        assert_eq!(trace.steps()[4].annotation("dequeued"), Some(&Scalar::Int(1)));
        assert_eq!(trace.steps()[4].view, queue_view(&[2, 3]));
    }

    #[test]
    fn circular_queue_wraps_rear() {
        let trace = circular_queue(&Seed::from(vec![1, 2, 3, 4, 5, 6, 7])).unwrap();
        let View::List { items, markers, .. } = &trace.last().view else {
            panic!("expected list view");
        };
        // 1 and 2 dequeued, 5 at slot 4, 6 wrapped to slot 0
        assert_eq!(
            items,
            &vec![Cell::Int(6), Cell::Empty, Cell::Int(3), Cell::Int(4), Cell::Int(5)]
        );
        assert_eq!(markers.front, Some(2));
        assert_eq!(markers.rear, Some(0));
        assert_eq!(trace.last().annotation("size"), Some(&Scalar::Int(4)));
    }

    #[test]
    fn circular_queue_short_seed() {
        let trace = circular_queue(&Seed::from(vec![9])).unwrap();
        let View::List { markers, .. } = &trace.last().view else {
            panic!("expected list view");
        };
        assert_eq!(markers.front, None);
        assert_eq!(markers.rear, None);
    }

    #[test]
    fn enqueue_appends_at_rear() {
        let trace = queue_enqueue(&Seed::from(vec![1, 2])).unwrap();
        assert_eq!(trace.last().view, queue_view(&[1, 2, 88]));
        assert_eq!(trace.last().highlighted(Highlight::Found), &[2]);
    }

    #[test]
    fn dequeue_underflow_and_success() {
        let empty = queue_dequeue(&Seed::from(vec![])).unwrap();
        assert_eq!(empty.last().message, "Queue underflow: nothing to dequeue");

        let trace = queue_dequeue(&Seed::from(vec![7, 8])).unwrap();
        assert_eq!(trace.last().view, queue_view(&[8]));
    }
}
