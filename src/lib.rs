//! # Bottender
//!
//! A chat bot that looks up cocktail recipes, suggests random drinks and
//! accepts new recipes from chat members, backed by a PostgreSQL catalog.

pub mod bot;
pub mod commands;
pub mod config;
pub mod db;
pub mod display;
pub mod errors;
pub mod observability;
pub mod observability_config;
pub mod validation;

// Re-export types for easier access
pub use commands::{Command, CommandKind, CommandSpec, COMMANDS};
pub use db::{Drink, DrinkIngredient, Ingredient, IngredientCategory, NewRecipe, RecipeStore};
pub use errors::{AppError, AppResult};
