use std::collections::HashSet;

use serde::Serialize;

use crate::models::Dish;

/// Distinct categories in the order they first appear.
pub fn extract_categories(dishes: &[Dish]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut categories = vec![];
    for dish in dishes {
        if seen.insert(&dish.category) {
            categories.push(dish.category.clone());
        }
    }
    categories
}

/// User-selected category filters, kept in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategorySelection(Vec<String>);

impl CategorySelection {
    /// Selects an unselected category, or deselects a selected one.
    pub fn toggle(&mut self, category: &str) {
        match self.0.iter().position(|c| c == category) {
            Some(idx) => {
                self.0.remove(idx);
            }
            None => self.0.push(category.to_string()),
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|c| c == category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = CategorySelection::default();
        for category in iter {
            let category = category.into();
            if !selection.contains(&category) {
                selection.0.push(category);
            }
        }
        selection
    }
}

pub fn is_visible(dish: &Dish, selected: &CategorySelection, search: &str) -> bool {
    (selected.is_empty() || selected.contains(&dish.category)) && dish.name.contains(search)
}

/// Case-sensitive substring match on the name, restricted to the selected
/// categories when any are selected.
pub fn filter_dishes(dishes: &[Dish], selected: &CategorySelection, search: &str) -> Vec<Dish> {
    dishes
        .iter()
        .filter(|dish| is_visible(dish, selected, search))
        .cloned()
        .collect()
}
