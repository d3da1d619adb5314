//! Resolution pipeline: reads data files, resolves item names, builds the
//! registry.
//!
//! A content directory holds `items.*` and `recipes.*` (required) and an
//! optional `config.*`, each in RON, TOML, or JSON.

use crate::schema::{ItemData, RecipeData};
use cookprep_core::config::PrepConfig;
use cookprep_core::id::{ItemId, RecipeId};
use cookprep_core::registry::{CostEntry, Registry, RegistryBuilder, RegistryError};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An item name could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The resolved content failed registry validation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Find `{base_name}.ron`, `.toml`, or `.json` in `dir`. More than one is an
/// error.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list. TOML files carry the array under `toml_key`; RON and
/// JSON hold it at the top level.
pub fn deserialize_list<T: DeserializeOwned>(path: &Path, toml_key: &str) -> Result<Vec<T>, DataLoadError> {
    if detect_format(path)? != Format::Toml {
        return deserialize_file(path);
    }

    let content = std::fs::read_to_string(path)?;
    let mut table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
    let array = table
        .remove(toml_key)
        .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?;
    array.try_into().map_err(|e: toml::de::Error| parse_error(path, e))
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

pub fn check_duplicate<V>(map: &HashMap<String, V>, name: &str, file: &Path) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Content loading
// ===========================================================================

/// Everything a host needs to build a coordinator.
#[derive(Debug)]
pub struct Content {
    pub registry: Registry,
    pub config: PrepConfig,
}

/// Load a content directory. `config.*` is optional and falls back to
/// [`PrepConfig::default`]; fields it leaves out keep their defaults.
pub fn load_content(dir: &Path) -> Result<Content, DataLoadError> {
    let items_path = require_data_file(dir, "items")?;
    let recipes_path = require_data_file(dir, "recipes")?;

    let items: Vec<ItemData> = deserialize_list(&items_path, "items")?;
    let recipes: Vec<RecipeData> = deserialize_list(&recipes_path, "recipes")?;

    let mut builder = RegistryBuilder::new();
    let mut item_ids: HashMap<String, ItemId> = HashMap::new();
    for item in &items {
        check_duplicate(&item_ids, &item.name, &items_path)?;
        let display = item.display_name.as_deref().unwrap_or(&item.name);
        let id = builder.register_item(&item.name, display);
        item_ids.insert(item.name.clone(), id);
    }

    let mut recipe_ids: HashMap<String, RecipeId> = HashMap::new();
    for recipe in &recipes {
        check_duplicate(&recipe_ids, &recipe.name, &recipes_path)?;
        let result = *resolve_name(&item_ids, &recipe.result, &recipes_path, "item")?;
        let costs = recipe
            .costs
            .iter()
            .map(|cost| -> Result<CostEntry, DataLoadError> {
                let items = cost
                    .item_names()
                    .into_iter()
                    .map(|name| resolve_name(&item_ids, name, &recipes_path, "item").copied())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CostEntry::new(items, cost.amount()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let id = builder.register_recipe(&recipe.name, result, recipe.kind, costs);
        recipe_ids.insert(recipe.name.clone(), id);
    }

    let config = match find_data_file(dir, "config")? {
        Some(path) => deserialize_file(&path)?,
        None => PrepConfig::default(),
    };

    Ok(Content {
        registry: builder.build()?,
        config,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cookprep_core::registry::RecipeKind;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cookprep_data_test_{suffix}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const ITEMS_RON: &str = r#"[
        (name: "wood_log", display_name: Some("Wood Log")),
        (name: "plank"),
        (name: "charcoal", display_name: Some("Charcoal")),
    ]"#;

    const RECIPES_RON: &str = r#"[
        (
            name: "charcoal",
            result: "charcoal",
            kind: cooking_pot,
            costs: [(items: ["wood_log", "plank"], amount: 2)],
        ),
    ]"#;

    // -----------------------------------------------------------------------
    // detect_format / find_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn detect_formats() {
        assert_eq!(detect_format(Path::new("items.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("items.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("items.json")).unwrap(), Format::Json);
        assert!(matches!(
            detect_format(Path::new("items.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("items")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_data_file_cases() {
        let dir = make_test_dir("find");
        assert_eq!(find_data_file(&dir, "items").unwrap(), None);

        fs::write(dir.join("items.json"), "[]").unwrap();
        assert_eq!(find_data_file(&dir, "items").unwrap(), Some(dir.join("items.json")));

        fs::write(dir.join("items.ron"), "[]").unwrap();
        assert!(matches!(
            find_data_file(&dir, "items"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");
        assert!(matches!(
            require_data_file(&dir, "recipes"),
            Err(DataLoadError::MissingRequired { ref file, .. }) if file == "recipes"
        ));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_list_toml() {
        let dir = make_test_dir("list_toml");
        let path = dir.join("items.toml");
        fs::write(&path, "[[items]]\nname = \"potato\"\n\n[[items]]\nname = \"raw_fish\"\n").unwrap();

        let items: Vec<ItemData> = deserialize_list(&path, "items").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "raw_fish");

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("items.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<ItemData>, _> = deserialize_list(&path, "items");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("parse_err");
        let path = dir.join("items.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<Vec<ItemData>, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_content
    // -----------------------------------------------------------------------

    #[test]
    fn load_ron_content_without_config() {
        let dir = make_test_dir("load_ron");
        fs::write(dir.join("items.ron"), ITEMS_RON).unwrap();
        fs::write(dir.join("recipes.ron"), RECIPES_RON).unwrap();

        let content = load_content(&dir).unwrap();
        let registry = &content.registry;
        assert_eq!(registry.item_count(), 3);
        let recipe = registry.get_recipe(registry.recipe_id("charcoal").unwrap()).unwrap();
        assert_eq!(recipe.kind, RecipeKind::CookingPot);
        assert_eq!(recipe.costs[0].items, vec![ItemId(0), ItemId(1)]);
        assert_eq!(recipe.costs[0].amount, 2);
        assert_eq!(registry.display_name(recipe.result), "Charcoal");
        assert_eq!(registry.display_name(ItemId(1)), "plank");
        assert_eq!(content.config, PrepConfig::default());

        cleanup(&dir);
    }

    #[test]
    fn load_mixed_formats_with_partial_config() {
        let dir = make_test_dir("load_mixed");
        fs::write(
            dir.join("items.json"),
            r#"[{"name": "berries"}, {"name": "berry_juice", "display_name": "Berry Juice"}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("recipes.toml"),
            r#"
[[recipes]]
name = "berry_juice"
result = "berry_juice"
kind = "juicer"
costs = [["berries", 2]]
"#,
        )
        .unwrap();
        fs::write(dir.join("config.toml"), "use_distance = 5.0\nrng_seed = 42\n").unwrap();

        let content = load_content(&dir).unwrap();
        assert_eq!(content.registry.recipe_count(), 1);
        assert_eq!(content.config.use_distance, 5.0);
        assert_eq!(content.config.rng_seed, Some(42));
        assert!(content.config.shuffle_ingredients);

        cleanup(&dir);
    }

    #[test]
    fn unresolved_item_is_reported() {
        let dir = make_test_dir("unresolved");
        fs::write(dir.join("items.ron"), r#"[(name: "charcoal")]"#).unwrap();
        fs::write(dir.join("recipes.ron"), RECIPES_RON).unwrap();

        let result = load_content(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedRef { ref name, expected_kind: "item", .. }) if name == "wood_log"
        ));

        cleanup(&dir);
    }

    #[test]
    fn duplicate_item_is_reported() {
        let dir = make_test_dir("duplicate");
        fs::write(dir.join("items.ron"), r#"[(name: "plank"), (name: "plank")]"#).unwrap();
        fs::write(dir.join("recipes.ron"), "[]").unwrap();

        assert!(matches!(
            load_content(&dir),
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "plank"
        ));

        cleanup(&dir);
    }

    #[test]
    fn empty_cost_fails_registry_validation() {
        let dir = make_test_dir("empty_cost");
        fs::write(dir.join("items.ron"), r#"[(name: "charcoal")]"#).unwrap();
        fs::write(
            dir.join("recipes.ron"),
            r#"[(name: "charcoal", result: "charcoal", kind: cooking_pot, costs: [(items: [], amount: 1)])]"#,
        )
        .unwrap();

        assert!(matches!(
            load_content(&dir),
            Err(DataLoadError::Registry(RegistryError::EmptyCost { index: 0, .. }))
        ));

        cleanup(&dir);
    }

    #[test]
    fn missing_recipes_file() {
        let dir = make_test_dir("no_recipes");
        fs::write(dir.join("items.ron"), ITEMS_RON).unwrap();

        assert!(matches!(
            load_content(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(format!("{data_err}").contains("file not found"));
    }
}
