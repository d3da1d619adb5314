//! Serde data file structs for cooking content.
//!
//! Items and recipes are written by name and resolved into registry ids by
//! the loader. Every file may be RON, JSON, or TOML.

use cookprep_core::registry::RecipeKind;
use serde::Deserialize;

// ===========================================================================
// Items
// ===========================================================================

/// An item type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
    /// Player-facing name. Defaults to `name`.
    #[serde(default)]
    pub display_name: Option<String>,
}

// ===========================================================================
// Recipes
// ===========================================================================

/// One cost entry of a recipe, in short or full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CostData {
    /// Short form: `("item_name", amount)`.
    Short(String, u32),
    /// Full form: any of `items` may fill the entry.
    Full { items: Vec<String>, amount: u32 },
}

impl CostData {
    pub fn item_names(&self) -> Vec<&str> {
        match self {
            CostData::Short(item, _) => vec![item.as_str()],
            CostData::Full { items, .. } => items.iter().map(String::as_str).collect(),
        }
    }

    pub fn amount(&self) -> u32 {
        match self {
            CostData::Short(_, amount) | CostData::Full { amount, .. } => *amount,
        }
    }
}

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    pub result: String,
    pub kind: RecipeKind,
    pub costs: Vec<CostData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// TOML has no top-level arrays; lists sit under a key.
    fn toml_list<T: serde::de::DeserializeOwned>(src: &str, key: &str) -> Vec<T> {
        let mut table: toml::Table = toml::from_str(src).unwrap();
        table.remove(key).unwrap().try_into().unwrap()
    }

    #[test]
    fn item_ron() {
        let items: Vec<ItemData> =
            ron::from_str(r#"[(name: "raw_fish", display_name: Some("Raw Fish")), (name: "potato")]"#).unwrap();
        assert_eq!(items[0].display_name.as_deref(), Some("Raw Fish"));
        assert!(items[1].display_name.is_none());
    }

    #[test]
    fn recipe_ron_both_cost_forms() {
        let ron_str = r#"(
            name: "charcoal",
            result: "charcoal",
            kind: cooking_pot,
            costs: [
                ("raw_fish", 1),
                (items: ["wood_log", "plank"], amount: 2),
            ],
        )"#;
        let recipe: RecipeData = ron::from_str(ron_str).unwrap();
        assert_eq!(recipe.kind, RecipeKind::CookingPot);
        assert_eq!(recipe.costs[0].item_names(), vec!["raw_fish"]);
        assert_eq!(recipe.costs[1].item_names(), vec!["wood_log", "plank"]);
        assert_eq!(recipe.costs[1].amount(), 2);
    }

    #[test]
    fn recipe_json() {
        let json = r#"{
            "name": "berry_juice",
            "result": "berry_juice",
            "kind": "juicer",
            "costs": [["berries", 2]]
        }"#;
        let recipe: RecipeData = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.kind, RecipeKind::Juicer);
        assert_eq!(recipe.costs[0].amount(), 2);
    }

    #[test]
    fn recipes_toml() {
        let toml_str = r#"
[[recipes]]
name = "fish_soup"
result = "fish_soup"
kind = "cooking_pot"
costs = [["raw_fish", 1], { items = ["potato"], amount = 1 }]
"#;
        let recipes: Vec<RecipeData> = toml_list(toml_str, "recipes");
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].costs[1].item_names(), vec!["potato"]);
    }

    #[test]
    fn items_toml() {
        let toml_str = r#"
[[items]]
name = "wood_log"
display_name = "Wood Log"
"#;
        let items: Vec<ItemData> = toml_list(toml_str, "items");
        assert_eq!(items[0].name, "wood_log");
        assert_eq!(items[0].display_name.as_deref(), Some("Wood Log"));
    }
}
