//! Rendering of drinks for the chat. Pure functions, no I/O.

use crate::db::{Drink, DrinkIngredient, IngredientCategory};

impl DrinkIngredient {
    /// Amount with its unit, e.g. `2.00 oz`, `3 dashes` or `1`.
    ///
    /// Categories without a known unit render as an empty string.
    pub fn display_amount(&self) -> String {
        match &self.ingredient.category {
            category if category.is_liquid() => {
                format!("{:.2} oz", f64::from(self.amount) / 100.0)
            }
            IngredientCategory::Bitters => format!("{} dashes", self.amount),
            IngredientCategory::Garnish => self.amount.to_string(),
            _ => String::new(),
        }
    }

    /// One ingredient line, e.g. `2.00 oz bourbon`.
    ///
    /// The separating space is kept when the amount is empty, so `ice` renders as ` ice`.
    pub fn display_line(&self) -> String {
        format!("{} {}", self.display_amount(), self.ingredient.name)
    }
}

/// Full recipe card: one labeled field per line, ingredients in store order.
///
/// Sent as plain text, so the labels carry no markup.
pub fn format_drink_full(drink: &Drink) -> String {
    let ingredients = drink
        .ingredients
        .iter()
        .map(|i| format!(" {}", i.display_line()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Name: {}\nAuthor: @{}\nMixing: {}\nGlass: {}\nServing: {}\nIngredients:\n{}\nNotes:\n {}",
        drink.name, drink.author, drink.mixing, drink.glass, drink.serving, ingredients, drink.notes
    )
}

pub fn drink_names(drinks: &[Drink]) -> Vec<&str> {
    drinks.iter().map(|d| d.name.as_str()).collect()
}
