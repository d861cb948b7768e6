use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::hash_table::ChainMap;
use crate::ingredient_heap::IngredientHeap;

/// A stable, non-owning handle to one ingredient's heap. Cloning an
/// `IngredientSlot` is cheap (it bumps a refcount) and stays valid across
/// any number of warehouse resizes, since a resize only relocates which
/// bucket holds the `Rc`, never the `IngredientHeap` the `Rc` points at.
pub type IngredientSlot = Rc<RefCell<IngredientHeap>>;

/// Maps ingredient name to its pallet heap.
#[derive(Default)]
pub struct Warehouse {
    slots: ChainMap<IngredientSlot>,
}

impl Warehouse {
    pub fn new() -> Self {
        Warehouse {
            slots: ChainMap::new(),
        }
    }

    /// Returns the slot for `ingredient`, creating an empty one if this is
    /// the first time it's referenced (by a restock or a recipe).
    pub fn slot_for(&mut self, ingredient: &str) -> IngredientSlot {
        Rc::clone(
            self.slots
                .get_or_insert_with(ingredient, || Rc::new(RefCell::new(IngredientHeap::new()))),
        )
    }

    pub fn get(&self, ingredient: &str) -> Option<IngredientSlot> {
        self.slots.get(ingredient).map(Rc::clone)
    }

    /// Runs the expiry sweep over every ingredient slot and recomputes the
    /// smallest remaining `expiry_tick`, or `None` if no pallet is left
    /// anywhere. Logs the number of pallets the sweep removed.
    pub fn expire_and_recompute_next(&mut self, now: u64) -> Option<u64> {
        let mut next_expiry = None;
        let mut removed = 0;

        for (_, slot) in self.slots.iter_mut() {
            let mut heap = slot.borrow_mut();
            removed += heap.expire(now);

            if let Some(pallet) = heap.peek() {
                next_expiry = Some(match next_expiry {
                    Some(current) if current <= pallet.expiry_tick => current,
                    _ => pallet.expiry_tick,
                });
            }
        }

        if removed > 0 {
            info!("expiry sweep at tick {now}: removed {removed} pallets");
        }

        next_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pallet::Pallet;

    #[test]
    fn test1_slot_for_creates_empty_heap_on_first_reference() {
        let mut warehouse = Warehouse::new();
        let slot = warehouse.slot_for("flour");
        assert_eq!(slot.borrow().total_qty(), 0);
    }

    #[test]
    fn test2_slot_for_returns_the_same_handle_twice() {
        let mut warehouse = Warehouse::new();
        let a = warehouse.slot_for("flour");
        a.borrow_mut().insert(Pallet {
            qty: 10,
            expiry_tick: 5,
        });
        let b = warehouse.slot_for("flour");
        assert_eq!(b.borrow().total_qty(), 10);
    }

    #[test]
    fn test3_expire_and_recompute_next_tracks_minimum_across_slots() {
        let mut warehouse = Warehouse::new();
        warehouse.slot_for("flour").borrow_mut().insert(Pallet {
            qty: 10,
            expiry_tick: 5,
        });
        warehouse.slot_for("sugar").borrow_mut().insert(Pallet {
            qty: 5,
            expiry_tick: 3,
        });

        let next = warehouse.expire_and_recompute_next(1);
        assert_eq!(next, Some(3));

        let next = warehouse.expire_and_recompute_next(3);
        assert_eq!(next, Some(5));
        assert_eq!(warehouse.get("sugar").unwrap().borrow().total_qty(), 0);
    }

    #[test]
    fn test4_expire_and_recompute_next_is_none_when_warehouse_is_empty() {
        let mut warehouse = Warehouse::new();
        assert_eq!(warehouse.expire_and_recompute_next(0), None);
    }
}
