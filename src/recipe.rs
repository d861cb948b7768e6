use std::rc::Rc;

use crate::warehouse::IngredientSlot;

/// One `(ingredient, weight-per-unit)` line of a recipe.
pub struct RecipeItem {
    pub ingredient_name: Rc<str>,
    pub slot: IngredientSlot,
    pub weight_per_unit: u32,
}

/// A named list of ingredient requirements plus their cached total weight.
///
/// `name` is the same owned string the Cookbook stores as this recipe's
/// key, so printing a recipe's name never needs a re-lookup.
pub struct Recipe {
    pub name: Rc<str>,
    pub items: Vec<RecipeItem>,
    pub total_unit_weight: u64,
}

impl Recipe {
    pub fn new(name: Rc<str>, items: Vec<RecipeItem>) -> Self {
        let total_unit_weight = items.iter().map(|item| item.weight_per_unit as u64).sum();
        Recipe {
            name,
            items,
            total_unit_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::Warehouse;

    #[test]
    fn test1_total_unit_weight_is_the_sum_of_items() {
        let mut warehouse = Warehouse::new();
        let items = vec![
            RecipeItem {
                ingredient_name: Rc::from("flour"),
                slot: warehouse.slot_for("flour"),
                weight_per_unit: 10,
            },
            RecipeItem {
                ingredient_name: Rc::from("sugar"),
                slot: warehouse.slot_for("sugar"),
                weight_per_unit: 5,
            },
        ];
        let recipe = Recipe::new(Rc::from("cake"), items);
        assert_eq!(recipe.total_unit_weight, 15);
    }
}
