//! Category tags and the registry describing them

use std::borrow::Cow;
use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Semantic tag used to select candidate points for a route step.
///
/// Categories are plain identifiers (`coffee_shop`, `library`, ...). The set is
/// open: anything registered in a [`CategoryRegistry`] is a valid category,
/// and the planner never enumerates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(Cow<'static, str>);

impl Category {
    pub const HOME: Category = Category::from_static("home");
    pub const GROCERY_STORE: Category = Category::from_static("grocery_store");
    pub const MUSEUM: Category = Category::from_static("museum");
    pub const LIBRARY: Category = Category::from_static("library");
    pub const COFFEE_SHOP: Category = Category::from_static("coffee_shop");
    pub const MEDICAL: Category = Category::from_static("medical");
    pub const FAST_FOOD: Category = Category::from_static("fast_food");
    pub const RESTAURANT: Category = Category::from_static("restaurant");
    pub const OUTDOOR_SPACE: Category = Category::from_static("outdoor_space");
    pub const DESSERTS: Category = Category::from_static("desserts");

    pub const fn from_static(id: &'static str) -> Self {
        Category(Cow::Borrowed(id))
    }

    /// Creates a category from user input.
    ///
    /// The identifier is trimmed, lowercased and has spaces and dashes
    /// replaced with underscores, so "Coffee Shop" and `coffee_shop` are the
    /// same tag.
    pub fn new(id: &str) -> Self {
        let normalized: String = id
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Category(Cow::Owned(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::new(value)
    }
}

/// Display metadata for a registered category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub label: String,
}

/// Set of known categories, keyed by tag identifier
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    entries: HashMap<Category, CategoryInfo>,
    order: Vec<Category>,
}

const BUILTIN: &[(&str, &str)] = &[
    ("home", "Home"),
    ("grocery_store", "Grocery store"),
    ("museum", "Museum"),
    ("library", "Library"),
    ("coffee_shop", "Coffee shop"),
    ("medical", "Medical"),
    ("fast_food", "Fast food"),
    ("restaurant", "Restaurant"),
    ("outdoor_space", "Outdoor space"),
    ("desserts", "Desserts"),
    ("mexican", "Mexican food"),
    ("italian", "Italian food"),
    ("chinese", "Chinese food"),
    ("japanese", "Japanese food"),
    ("korean", "Korean food"),
    ("indian", "Indian food"),
    ("thai", "Thai food"),
    ("mediterranean", "Mediterranean food"),
];

impl CategoryRegistry {
    /// Registry with the built-in neighborhood categories
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for &(id, label) in BUILTIN {
            registry.register(Category::from_static(id), label);
        }
        registry
    }

    /// Adds a category, or replaces the label of an existing one.
    pub fn register(&mut self, id: Category, label: impl Into<String>) {
        let info = CategoryInfo {
            id: id.clone(),
            label: label.into(),
        };
        if self.entries.insert(id.clone(), info).is_none() {
            self.order.push(id);
        }
    }

    pub fn contains(&self, id: &Category) -> bool {
        self.entries.contains_key(id)
    }

    /// Resolves free-form input to a registered category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] when the tag is not registered.
    pub fn resolve(&self, input: &str) -> Result<Category, Error> {
        let category = Category::new(input);
        if self.contains(&category) {
            Ok(category)
        } else {
            Err(Error::UnknownCategory(input.to_string()))
        }
    }

    /// Categories in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
