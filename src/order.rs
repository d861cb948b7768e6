use std::collections::VecDeque;
use std::rc::Rc;

use crate::recipe::Recipe;

/// A single customer order. Immutable once constructed.
#[derive(Clone)]
pub struct Order {
    pub recipe: Rc<Recipe>,
    pub qty: u32,
    pub arrival_tick: u64,
    pub weight: u64,
}

impl Order {
    pub fn new(recipe: Rc<Recipe>, qty: u32, arrival_tick: u64) -> Self {
        let weight = qty as u64 * recipe.total_unit_weight;
        Order {
            recipe,
            qty,
            arrival_tick,
            weight,
        }
    }

    pub fn recipe_name(&self) -> &str {
        &self.recipe.name
    }
}

/// FIFO of orders that could not be produced at acceptance time. Arrival
/// order is preserved by construction (tail insertion only).
#[derive(Default)]
pub struct WaitingQueue {
    orders: VecDeque<Order>,
}

impl WaitingQueue {
    pub fn new() -> Self {
        WaitingQueue {
            orders: VecDeque::new(),
        }
    }

    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn contains_recipe(&self, name: &str) -> bool {
        self.orders.iter().any(|o| o.recipe_name() == name)
    }

    /// Scans head-to-tail exactly once, handing each order to `try_promote`.
    /// Orders `try_promote` accepts (returns `true`, meaning it committed the
    /// availability check and took ownership of the order) are detached;
    /// everything else stays in FIFO order at the front.
    pub fn promote_head_to_tail(&mut self, mut try_promote: impl FnMut(&Order) -> bool) {
        let mut remaining = VecDeque::with_capacity(self.orders.len());

        for order in self.orders.drain(..) {
            if !try_promote(&order) {
                remaining.push_back(order);
            }
        }

        self.orders = remaining;
    }
}

/// Queue of producible orders, kept sorted ascending by `arrival_tick`.
#[derive(Default)]
pub struct ReadyQueue {
    orders: VecDeque<Order>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        ReadyQueue {
            orders: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn contains_recipe(&self, name: &str) -> bool {
        self.orders.iter().any(|o| o.recipe_name() == name)
    }

    /// Appends an order whose `arrival_tick` is known to dominate every
    /// order already queued (the direct-acceptance case).
    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Inserts a promoted order at its sorted position via a linear scan
    /// from the head. Arrival ticks are unique, so equality never arises.
    pub fn insert_sorted(&mut self, order: Order) {
        let pos = self
            .orders
            .iter()
            .position(|existing| existing.arrival_tick > order.arrival_tick)
            .unwrap_or(self.orders.len());
        self.orders.insert(pos, order);
    }

    /// Returns the largest head prefix whose cumulative weight does not
    /// exceed `capacity`, without removing anything.
    pub fn dispatch_prefix_len(&self, capacity: u64) -> usize {
        let mut cumulative = 0u64;
        let mut count = 0;

        for order in &self.orders {
            let next = cumulative + order.weight;
            if next > capacity {
                break;
            }
            cumulative = next;
            count += 1;
        }

        count
    }

    /// Removes and returns the first `count` orders, in their original
    /// (arrival-ascending) order.
    pub fn take_prefix(&mut self, count: usize) -> Vec<Order> {
        self.orders.drain(..count).collect()
    }
}
