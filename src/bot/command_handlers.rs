//! Command Handlers module for processing bot commands

use tracing::{debug, info};

// Import command types
use crate::commands::{describe_command, help_text, AddRecipeArgs, Command};

// Import database types
use crate::db::{DrinkIngredient, NewRecipe};

// Import rendering helpers
use crate::display::{drink_names, format_drink_full};

use crate::errors::error_logging;

use super::HandlerContext;

pub const NO_DRINKS_FOUND: &str = "no drinks found";
pub const RANDOM_INTRO: &str =
    "I've selected a few of my favorites, but let's let chance decide which one to make";
pub const RECIPE_ADDED: &str = "Success!";
pub const RECIPE_ADD_FAILED: &str = "failed to add recipe";

/// How a command ended, for metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    NotFound,
    /// The request itself was unusable and the user was told why
    Rejected,
    Failed,
}

impl CommandOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandOutcome::Success => "success",
            CommandOutcome::NotFound => "not_found",
            CommandOutcome::Rejected => "rejected",
            CommandOutcome::Failed => "failed",
        }
    }
}

/// Run a parsed command
pub async fn handle_command(ctx: &HandlerContext<'_>, command: Command) -> CommandOutcome {
    match command {
        Command::Describe { query } => handle_describe_command(ctx, &query).await,
        Command::Random { ingredient } => handle_random_command(ctx, ingredient.as_deref()).await,
        Command::AddRecipe(args) => handle_add_recipe_command(ctx, args).await,
        Command::Help => handle_help_command(ctx).await,
    }
}

/// Handle `describe <name>`
pub async fn handle_describe_command(ctx: &HandlerContext<'_>, query: &str) -> CommandOutcome {
    match ctx.store.describe_drink_by_name(query).await {
        Ok(Some(drink)) => {
            debug!(drink_id = drink.id, "Describing drink");
            ctx.reply(&format_drink_full(&drink)).await;
            CommandOutcome::Success
        }
        Ok(None) => {
            ctx.reply(NO_DRINKS_FOUND).await;
            CommandOutcome::NotFound
        }
        Err(e) => {
            // Store failures stay in the logs
            error_logging::log_database_error(
                &e,
                "describe_drink_by_name",
                Some(&[("query", &query)]),
            );
            CommandOutcome::Failed
        }
    }
}

/// Handle `random [ingredient]`
pub async fn handle_random_command(
    ctx: &HandlerContext<'_>,
    ingredient: Option<&str>,
) -> CommandOutcome {
    let drinks = match ctx
        .store
        .random_drinks(ingredient, ctx.settings.random_sample_size)
        .await
    {
        Ok(drinks) => drinks,
        Err(e) => {
            error_logging::log_database_error(
                &e,
                "random_drinks",
                Some(&[("ingredient", &ingredient.unwrap_or(""))]),
            );
            return CommandOutcome::Failed;
        }
    };

    if drinks.is_empty() {
        ctx.reply(NO_DRINKS_FOUND).await;
        return CommandOutcome::NotFound;
    }

    ctx.reply(RANDOM_INTRO).await;
    ctx.reply(&format!("/flip {}", drink_names(&drinks).join(", ")))
        .await;
    CommandOutcome::Success
}

/// Handle `addrecipe`: resolve every ingredient, store the drink, then announce it
pub async fn handle_add_recipe_command(
    ctx: &HandlerContext<'_>,
    args: AddRecipeArgs,
) -> CommandOutcome {
    let mut ingredients = Vec::with_capacity(args.ingredients.len());
    for spec in &args.ingredients {
        match ctx.store.describe_ingredient_by_name(&spec.name).await {
            Ok(Some(ingredient)) => ingredients.push(DrinkIngredient {
                ingredient,
                amount: spec.amount,
            }),
            Ok(None) => {
                debug!(ingredient = %spec.name, "Unknown ingredient in recipe");
                ctx.reply(&format!("failed to describe ingredient: {}", spec.name))
                    .await;
                return CommandOutcome::Rejected;
            }
            Err(e) => {
                error_logging::log_database_error(
                    &e,
                    "describe_ingredient_by_name",
                    Some(&[("ingredient", &spec.name)]),
                );
                ctx.reply(&format!("failed to describe ingredient: {}", spec.name))
                    .await;
                return CommandOutcome::Failed;
            }
        }
    }

    let recipe = NewRecipe {
        name: args.name,
        mixing: args.mixing,
        glass: args.glass,
        serving: args.serving,
        notes: args.notes,
        ingredients,
        author: ctx.sender.to_string(),
    };

    let drink_id = match ctx.store.add_recipe(&recipe).await {
        Ok(id) => id,
        Err(e) => {
            error_logging::log_recipe_error(
                &e,
                "add_recipe",
                ctx.sender,
                Some(&recipe.name),
                Some(recipe.ingredients.len()),
            );
            ctx.reply(RECIPE_ADD_FAILED).await;
            return CommandOutcome::Failed;
        }
    };

    info!(
        drink_id = drink_id,
        drink_name = %recipe.name,
        author = %recipe.author,
        "Recipe added"
    );

    let describe = describe_command(&ctx.settings.command_prefix, &recipe.name);
    ctx.reply(RECIPE_ADDED).await;
    ctx.reply(&describe).await;
    ctx.broadcast(&format!(
        "New recipe added by @{}: {}!",
        recipe.author, recipe.name
    ))
    .await;
    ctx.broadcast(&describe).await;

    CommandOutcome::Success
}

/// Handle `help`
pub async fn handle_help_command(ctx: &HandlerContext<'_>) -> CommandOutcome {
    ctx.reply(&help_text(&ctx.settings.command_prefix)).await;
    CommandOutcome::Success
}
