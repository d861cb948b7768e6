use std::rc::Rc;

use log::{debug, info};

use crate::cookbook::Cookbook;
use crate::order::{Order, ReadyQueue, WaitingQueue};
use crate::pallet::Pallet;
use crate::recipe::{Recipe, RecipeItem};
use crate::warehouse::Warehouse;

/// Result of a single command: the command's own output line, plus any
/// truck-dispatch lines triggered by the tick that command completed.
pub struct DispatchOutcome {
    pub command_line: String,
    pub truck_lines: Option<Vec<String>>,
}

/// Two-phase availability check for `order` against `requireds` as scratch
/// space: a feasibility pass against every ingredient's cached `total_qty`,
/// then, only if every ingredient clears, a commit pass that consumes from
/// each heap. Free function (rather than a `Scheduler` method) so it can be
/// called while the caller still holds a live borrow of `self.waiting` or
/// `self.ready` — it only ever touches the order's own recipe handles and
/// the scratch buffer.
fn check_and_commit(requireds: &mut Vec<u64>, order: &Order) -> bool {
    requireds.clear();
    requireds.reserve(order.recipe.items.len());

    for item in &order.recipe.items {
        let amount = item.weight_per_unit as u64 * order.qty as u64;
        if item.slot.borrow().total_qty() < amount {
            return false;
        }
        requireds.push(amount);
    }

    for (item, amount) in order.recipe.items.iter().zip(requireds.iter()) {
        item.slot.borrow_mut().consume(*amount);
        debug!(
            "order for {} {}: consumed {amount} units of {}",
            order.qty,
            order.recipe_name(),
            item.ingredient_name
        );
    }

    true
}

/// Owns the cookbook, warehouse, queues and clock, and drives every command
/// through the fixed per-tick pipeline: command effect, truck dispatch if
/// due, expiry sweep if due.
pub struct Scheduler {
    cookbook: Cookbook,
    warehouse: Warehouse,
    waiting: WaitingQueue,
    ready: ReadyQueue,
    now: u64,
    next_expiry: Option<u64>,
    period: u32,
    capacity: u64,
    requireds: Vec<u64>,
}

impl Scheduler {
    pub fn new(period: u32, capacity: u32) -> Self {
        Scheduler {
            cookbook: Cookbook::new(),
            warehouse: Warehouse::new(),
            waiting: WaitingQueue::new(),
            ready: ReadyQueue::new(),
            now: 0,
            next_expiry: None,
            period,
            capacity: capacity as u64,
            requireds: Vec::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// `add_recipe NAME (ING QTY)+`. `items` is already tokenized into
    /// `(ingredient, weight_per_unit)` pairs.
    pub fn add_recipe(&mut self, name: &str, items: &[(String, u32)]) -> DispatchOutcome {
        let command_line = if self.cookbook.contains(name) {
            debug!("add_recipe {name}: ignored (name collision)");
            "ignored".to_string()
        } else {
            let recipe_items: Vec<RecipeItem> = items
                .iter()
                .filter(|(_, weight_per_unit)| *weight_per_unit > 0)
                .map(|(ingredient, weight_per_unit)| RecipeItem {
                    ingredient_name: Rc::from(ingredient.as_str()),
                    slot: self.warehouse.slot_for(ingredient),
                    weight_per_unit: *weight_per_unit,
                })
                .collect();

            self.cookbook.insert(Recipe::new(name.into(), recipe_items));
            info!("add_recipe {name}: added");
            "added".to_string()
        };

        self.finish_command(command_line)
    }

    /// `remove_recipe NAME`.
    pub fn remove_recipe(&mut self, name: &str) -> DispatchOutcome {
        let command_line = if !self.cookbook.contains(name) {
            "not present".to_string()
        } else if self.waiting.contains_recipe(name) || self.ready.contains_recipe(name) {
            "pending orders".to_string()
        } else {
            self.cookbook.remove(name);
            info!("remove_recipe {name}: removed");
            "removed".to_string()
        };

        self.finish_command(command_line)
    }

    /// `restock (ING QTY EXPIRY)+`.
    pub fn restock(&mut self, triples: &[(String, u32, u64)]) -> DispatchOutcome {
        let mut accepted = 0;

        for (ingredient, qty, expiry) in triples {
            match Pallet::new(*qty, *expiry, self.now) {
                Some(pallet) => {
                    let slot = self.warehouse.slot_for(ingredient);
                    slot.borrow_mut().insert(pallet);
                    accepted += 1;

                    self.next_expiry = Some(match self.next_expiry {
                        Some(current) if current <= *expiry => current,
                        _ => *expiry,
                    });
                }
                None => debug!("restock {ingredient} {qty} {expiry}: rejected silently"),
            }
        }

        info!("restock applied: {accepted}/{} pallets stored", triples.len());

        self.promote_waiting();
        self.finish_command("restocked".to_string())
    }

    /// `order RECIPE QTY`.
    pub fn order(&mut self, recipe_name: &str, qty: u32) -> DispatchOutcome {
        let command_line = match self.cookbook.get(recipe_name) {
            Some(recipe) if qty > 0 => {
                let order = Order::new(recipe, qty, self.now);

                if check_and_commit(&mut self.requireds, &order) {
                    self.ready.push_back(order);
                } else {
                    self.waiting.push_back(order);
                }

                "accepted".to_string()
            }
            _ => "rejected".to_string(),
        };

        self.finish_command(command_line)
    }

    /// Scans the WaitingQueue head-to-tail exactly once, promoting every
    /// order that now clears the availability check into the ReadyQueue at
    /// its sorted position. Orders left behind keep their relative order.
    fn promote_waiting(&mut self) {
        let requireds = &mut self.requireds;
        let ready = &mut self.ready;

        self.waiting.promote_head_to_tail(|order| {
            if check_and_commit(requireds, order) {
                ready.insert_sorted(order.clone());
                true
            } else {
                false
            }
        });
    }

    /// Advances the clock past the command just processed and runs the two
    /// fixed post-command hooks in their mandated order: truck dispatch
    /// before expiry sweep, so the truck can still consume pallets on their
    /// final valid tick.
    fn finish_command(&mut self, command_line: String) -> DispatchOutcome {
        self.now += 1;

        let truck_lines = if self.now % self.period as u64 == 0 {
            Some(self.dispatch_truck())
        } else {
            None
        };

        if self.next_expiry == Some(self.now) {
            self.next_expiry = self.warehouse.expire_and_recompute_next(self.now);
        }

        DispatchOutcome {
            command_line,
            truck_lines,
        }
    }

    fn dispatch_truck(&mut self) -> Vec<String> {
        let prefix_len = self.ready.dispatch_prefix_len(self.capacity);

        if prefix_len == 0 {
            info!("truck dispatch at tick {}: empty truck", self.now);
            return vec!["empty truck".to_string()];
        }

        let mut prefix = self.ready.take_prefix(prefix_len);
        prefix.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.arrival_tick.cmp(&b.arrival_tick)));

        info!(
            "truck dispatch at tick {}: dispatched with {} orders",
            self.now,
            prefix.len()
        );

        prefix
            .iter()
            .map(|order| format!("{} {} {}", order.arrival_tick, order.recipe_name(), order.qty))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
        pairs.iter().map(|(name, qty)| (name.to_string(), *qty)).collect()
    }

    #[test]
    fn test1_basic_accept_and_dispatch() {
        // Three commands land on tick 3, the first multiple of P=3.
        let mut scheduler = Scheduler::new(3, 100);
        scheduler.add_recipe("cake", &items(&[("flour", 10)]));
        scheduler.restock(&[("flour".to_string(), 50, 5)]);
        let outcome = scheduler.order("cake", 3);

        assert_eq!(outcome.command_line, "accepted");
        assert_eq!(outcome.truck_lines, Some(vec!["2 cake 3".to_string()]));
    }

    #[test]
    fn test2_insufficient_stock_then_promote_on_restock() {
        let mut scheduler = Scheduler::new(10, 1000);
        scheduler.add_recipe("bun", &items(&[("sugar", 5)]));

        let outcome = scheduler.order("bun", 4);
        assert_eq!(outcome.command_line, "accepted");
        assert!(outcome.truck_lines.is_none());

        let outcome = scheduler.restock(&[("sugar".to_string(), 20, 50)]);
        assert_eq!(outcome.command_line, "restocked");

        for _ in 0..6 {
            scheduler.restock(&[]);
        }

        let outcome = scheduler.restock(&[]);
        assert_eq!(outcome.truck_lines, Some(vec!["1 bun 4".to_string()]));
    }

    #[test]
    fn test3_remove_recipe_blocked_by_pending_order_then_succeeds() {
        let mut scheduler = Scheduler::new(100, 100);
        scheduler.add_recipe("pie", &items(&[("apple", 2)]));
        scheduler.order("pie", 1);

        let blocked = scheduler.remove_recipe("pie");
        assert_eq!(blocked.command_line, "pending orders");
    }

    #[test]
    fn test4_truck_capacity_prefix_stops_at_first_overflow() {
        // Seven commands land on tick 7, the first multiple of P=7, so the
        // truck only loads once all three orders have been placed.
        let mut scheduler = Scheduler::new(7, 100);
        scheduler.add_recipe("heavy", &items(&[("x", 60)]));
        scheduler.add_recipe("mid", &items(&[("x", 50)]));
        scheduler.add_recipe("light", &items(&[("x", 10)]));
        scheduler.restock(&[("x".to_string(), 1000, 1000)]);

        scheduler.order("heavy", 1);
        scheduler.order("mid", 1);
        let outcome = scheduler.order("light", 1);

        assert_eq!(outcome.truck_lines, Some(vec!["4 heavy 1".to_string()]));
    }

    #[test]
    fn test5_dispatch_ordering_tiebreak_by_arrival() {
        let mut scheduler = Scheduler::new(4, 100);
        scheduler.add_recipe("a", &items(&[("x", 40)]));
        scheduler.restock(&[("x".to_string(), 1000, 1000)]);

        scheduler.order("a", 1);
        let outcome = scheduler.order("a", 1);

        assert_eq!(
            outcome.truck_lines,
            Some(vec!["2 a 1".to_string(), "3 a 1".to_string()])
        );
    }

    #[test]
    fn test6_expiry_runs_after_truck_dispatch_on_the_same_tick() {
        let mut scheduler = Scheduler::new(1, 1000);
        scheduler.add_recipe("jam", &items(&[("fruit", 1)]));
        scheduler.restock(&[("fruit".to_string(), 10, 3)]);
        scheduler.restock(&[]);

        let outcome = scheduler.order("jam", 10);
        assert_eq!(outcome.command_line, "accepted");
        assert_eq!(outcome.truck_lines, Some(vec!["empty truck".to_string()]));
    }
}
