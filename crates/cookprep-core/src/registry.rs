use crate::id::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// An item type definition in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    /// Name shown to the player in status text.
    pub display_name: String,
}

/// The station family a recipe is cooked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeKind {
    CookingPot,
    Juicer,
}

impl RecipeKind {
    /// Label used in player-facing status lines.
    pub fn label(self) -> &'static str {
        match self {
            RecipeKind::CookingPot => "cooking pot",
            RecipeKind::Juicer => "juicer",
        }
    }
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of a recipe's cost: `amount` units drawn from any mix of the
/// accepted items. `items` keeps its declared order, which is also the order
/// inventory is drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    pub items: Vec<ItemId>,
    pub amount: u32,
}

impl CostEntry {
    pub fn new(items: Vec<ItemId>, amount: u32) -> Self {
        Self { items, amount }
    }

    pub fn accepts(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }
}

/// A recipe definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDef {
    pub name: String,
    pub result: ItemId,
    pub kind: RecipeKind,
    pub costs: Vec<CostEntry>,
}

/// Builder for constructing an immutable Registry.
/// Items and recipes are registered, then `build` validates references.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item type. Returns its ID.
    pub fn register_item(&mut self, name: &str, display_name: &str) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.items.push(ItemDef {
            name: name.to_string(),
            display_name: display_name.to_string(),
        });
        self.item_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a recipe. Returns its ID.
    pub fn register_recipe(
        &mut self,
        name: &str,
        result: ItemId,
        kind: RecipeKind,
        costs: Vec<CostEntry>,
    ) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(RecipeDef {
            name: name.to_string(),
            result,
            kind,
            costs,
        });
        self.recipe_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Validate item references and freeze the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for recipe in &self.recipes {
            if recipe.result.0 as usize >= self.items.len() {
                return Err(RegistryError::InvalidItemRef(recipe.result));
            }
            for (index, cost) in recipe.costs.iter().enumerate() {
                if cost.items.is_empty() && cost.amount > 0 {
                    return Err(RegistryError::EmptyCost {
                        recipe: recipe.name.clone(),
                        index,
                    });
                }
                if let Some(&bad) = cost.items.iter().find(|i| i.0 as usize >= self.items.len()) {
                    return Err(RegistryError::InvalidItemRef(bad));
                }
            }
        }

        Ok(Registry {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            recipes: self.recipes,
            recipe_name_to_id: self.recipe_name_to_id,
        })
    }
}

/// Immutable registry. Frozen after build().
#[derive(Debug, Clone)]
pub struct Registry {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
}

impl Registry {
    pub fn get_item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.0 as usize)
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(id.0 as usize)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Display name of an item, falling back to its registry name and then
    /// to the raw id.
    pub fn display_name(&self, id: ItemId) -> String {
        match self.get_item(id) {
            Some(def) if !def.display_name.is_empty() => def.display_name.clone(),
            Some(def) => def.name.clone(),
            None => format!("item #{}", id.0),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemId),
    #[error("recipe '{recipe}' cost #{index} accepts no items")]
    EmptyCost { recipe: String, index: usize },
}
