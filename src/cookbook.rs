use std::rc::Rc;

use crate::hash_table::ChainMap;
use crate::recipe::Recipe;

/// A stable, non-owning handle to one recipe. See [`crate::warehouse::IngredientSlot`]
/// for why this is safe to hold onto across cookbook resizes.
pub type RecipeHandle = Rc<Recipe>;

/// Maps recipe name to its [`Recipe`].
#[derive(Default)]
pub struct Cookbook {
    recipes: ChainMap<RecipeHandle>,
}

impl Cookbook {
    pub fn new() -> Self {
        Cookbook {
            recipes: ChainMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<RecipeHandle> {
        self.recipes.get(name).map(Rc::clone)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    /// Inserts `recipe`, returning `false` without mutating the cookbook if
    /// `recipe.name` is already present (the `add_recipe ... -> ignored`
    /// case).
    pub fn insert(&mut self, recipe: Recipe) -> bool {
        let name: &str = &recipe.name;
        self.recipes.insert(name, Rc::new(recipe))
    }

    /// Removes and returns the recipe, if present.
    pub fn remove(&mut self, name: &str) -> Option<RecipeHandle> {
        self.recipes.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::Warehouse;

    fn sample_recipe(name: &str, warehouse: &mut Warehouse) -> Recipe {
        use crate::recipe::RecipeItem;

        Recipe::new(
            Rc::from(name),
            vec![RecipeItem {
                ingredient_name: Rc::from("flour"),
                slot: warehouse.slot_for("flour"),
                weight_per_unit: 10,
            }],
        )
    }

    #[test]
    fn test1_insert_then_get_round_trips() {
        let mut warehouse = Warehouse::new();
        let mut cookbook = Cookbook::new();
        assert!(cookbook.insert(sample_recipe("cake", &mut warehouse)));
        assert_eq!(&*cookbook.get("cake").unwrap().name, "cake");
    }

    #[test]
    fn test2_insert_rejects_name_collision() {
        let mut warehouse = Warehouse::new();
        let mut cookbook = Cookbook::new();
        assert!(cookbook.insert(sample_recipe("cake", &mut warehouse)));
        assert!(!cookbook.insert(sample_recipe("cake", &mut warehouse)));
    }

    #[test]
    fn test3_remove_deletes_entry() {
        let mut warehouse = Warehouse::new();
        let mut cookbook = Cookbook::new();
        cookbook.insert(sample_recipe("cake", &mut warehouse));
        assert!(cookbook.remove("cake").is_some());
        assert!(cookbook.get("cake").is_none());
    }
}
