use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnection, PgPool};
use sqlx::Row;
use tracing::{debug, info, warn, Instrument};

use crate::observability;

/// Category of a catalog ingredient; decides how its amount is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientCategory {
    Spirit,
    Liqueur,
    Aromatic,
    Sugar,
    Citrus,
    Mixer,
    Bitters,
    Garnish,
    /// Anything the catalog holds that is not one of the known categories
    Other(String),
}

impl IngredientCategory {
    pub fn as_str(&self) -> &str {
        match self {
            IngredientCategory::Spirit => "spirit",
            IngredientCategory::Liqueur => "liqueur",
            IngredientCategory::Aromatic => "aromatic",
            IngredientCategory::Sugar => "sugar",
            IngredientCategory::Citrus => "citrus",
            IngredientCategory::Mixer => "mixer",
            IngredientCategory::Bitters => "bitters",
            IngredientCategory::Garnish => "garnish",
            IngredientCategory::Other(raw) => raw,
        }
    }

    /// Liquids are measured in hundredths of an ounce
    pub fn is_liquid(&self) -> bool {
        matches!(
            self,
            IngredientCategory::Spirit
                | IngredientCategory::Liqueur
                | IngredientCategory::Aromatic
                | IngredientCategory::Sugar
                | IngredientCategory::Citrus
                | IngredientCategory::Mixer
        )
    }
}

impl From<&str> for IngredientCategory {
    fn from(raw: &str) -> Self {
        match raw {
            "spirit" => IngredientCategory::Spirit,
            "liqueur" => IngredientCategory::Liqueur,
            "aromatic" => IngredientCategory::Aromatic,
            "sugar" => IngredientCategory::Sugar,
            "citrus" => IngredientCategory::Citrus,
            "mixer" => IngredientCategory::Mixer,
            "bitters" => IngredientCategory::Bitters,
            "garnish" => IngredientCategory::Garnish,
            other => IngredientCategory::Other(other.to_string()),
        }
    }
}

/// Represents a catalog ingredient in the database
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub category: IngredientCategory,
    pub description: String,
}

/// One ingredient of a drink together with its amount
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkIngredient {
    pub ingredient: Ingredient,
    /// Hundredths of an ounce for liquids, dashes for bitters, a count for garnish
    pub amount: i32,
}

/// Represents a fully hydrated drink in the database
#[derive(Debug, Clone, PartialEq)]
pub struct Drink {
    pub id: i64,
    pub name: String,
    pub mixing: String,
    pub glass: String,
    pub serving: String,
    pub notes: String,
    pub author: String,
    /// Ordered by descending amount, ties broken by ingredient name
    pub ingredients: Vec<DrinkIngredient>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Everything needed to insert a recipe
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub mixing: String,
    pub glass: String,
    pub serving: String,
    pub notes: String,
    /// Ingredients must already be resolved against the catalog
    pub ingredients: Vec<DrinkIngredient>,
    pub author: String,
}

/// Read and write access to the drink catalog
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Exact-name lookup; `None` when no drink with that name exists
    async fn describe_drink_by_name(&self, name: &str) -> Result<Option<Drink>>;

    /// Exact, case-sensitive ingredient lookup
    async fn describe_ingredient_by_name(&self, name: &str) -> Result<Option<Ingredient>>;

    /// Returns up to `count` random drinks, optionally restricted to drinks
    /// with an ingredient whose name contains `ingredient_filter`
    /// (case-insensitive). Drinks that fail to hydrate are dropped from the
    /// result rather than failing the call.
    async fn random_drinks(
        &self,
        ingredient_filter: Option<&str>,
        count: usize,
    ) -> Result<Vec<Drink>>;

    /// Inserts the drink and all its ingredient rows atomically, returning the new drink id
    async fn add_recipe(&self, recipe: &NewRecipe) -> Result<i64>;
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema");

    // Create ingredient catalog table
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ingredient (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) UNIQUE NOT NULL,
            category VARCHAR(32) NOT NULL,
            description TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredient table")?;

    // Create drinks table
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS drinks (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            mixing VARCHAR(255) NOT NULL DEFAULT '',
            glass VARCHAR(255) NOT NULL DEFAULT '',
            serving VARCHAR(255) NOT NULL DEFAULT '',
            notes TEXT NOT NULL DEFAULT '',
            author VARCHAR(255) NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create drinks table")?;

    // Create drink/ingredient association table
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS drink_ingredients (
            drink_id BIGINT NOT NULL REFERENCES drinks(id) ON DELETE CASCADE,
            ingredient_id BIGINT NOT NULL REFERENCES ingredient(id),
            amount INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create drink_ingredients table")?;

    // Create indexes for lookups
    sqlx::query("CREATE INDEX IF NOT EXISTS drinks_name_idx ON drinks(name)")
        .execute(pool)
        .await
        .context("Failed to create drinks name index")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS drink_ingredients_drink_id_idx ON drink_ingredients(drink_id)",
    )
    .execute(pool)
    .await
    .context("Failed to create drink_ingredients drink_id index")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS drink_ingredients_ingredient_id_idx ON drink_ingredients(ingredient_id)",
    )
    .execute(pool)
    .await
    .context("Failed to create drink_ingredients ingredient_id index")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Create a catalog ingredient. The bot itself never calls this; the
/// catalog is maintained out of band.
pub async fn create_ingredient(
    pool: &PgPool,
    name: &str,
    category: &IngredientCategory,
    description: &str,
) -> Result<i64> {
    debug!(ingredient = %name, category = %category.as_str(), "Creating catalog ingredient");

    let row = sqlx::query(
        "INSERT INTO ingredient (name, category, description) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(category.as_str())
    .bind(description)
    .fetch_one(pool)
    .await
    .context("Failed to insert new ingredient")?;

    let ingredient_id: i64 = row.get(0);
    debug!(ingredient_id = %ingredient_id, "Ingredient created successfully");
    Ok(ingredient_id)
}

/// Look up a catalog ingredient by exact name
pub async fn describe_ingredient_by_name(pool: &PgPool, name: &str) -> Result<Option<Ingredient>> {
    debug!(ingredient = %name, "Describing ingredient");

    let row = sqlx::query("SELECT id, name, category, description FROM ingredient WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("Failed to describe ingredient")?;

    Ok(row.map(|row| {
        let category: String = row.get(2);
        Ingredient {
            id: row.get(0),
            name: row.get(1),
            category: IngredientCategory::from(category.as_str()),
            description: row.get(3),
        }
    }))
}

/// Hydrate a drink: base attributes first, then its ordered ingredient list.
///
/// A base row with an empty `mixing` column is treated as absent.
pub async fn describe_drink_by_id(pool: &PgPool, drink_id: i64) -> Result<Option<Drink>> {
    let start_time = Instant::now();

    let row = sqlx::query(
        "SELECT name, mixing, glass, serving, notes, author, created_at FROM drinks WHERE id = $1",
    )
    .bind(drink_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read drink")?;

    let Some(row) = row else {
        debug!(drink_id = %drink_id, "No drink found");
        return Ok(None);
    };

    let mixing: String = row.get(1);
    if mixing.is_empty() {
        debug!(drink_id = %drink_id, "Drink row has no mixing method, treating as not found");
        return Ok(None);
    }

    let mut drink = Drink {
        id: drink_id,
        name: row.get(0),
        mixing,
        glass: row.get(2),
        serving: row.get(3),
        notes: row.get(4),
        author: row.get(5),
        ingredients: Vec::new(),
        created_at: row.get(6),
    };

    let rows = sqlx::query(
        "SELECT i.id, i.name, i.category, i.description, di.amount
         FROM drink_ingredients AS di
         JOIN ingredient AS i ON di.ingredient_id = i.id
         WHERE di.drink_id = $1
         ORDER BY di.amount DESC, i.name ASC",
    )
    .bind(drink_id)
    .fetch_all(pool)
    .await
    .context("Failed to read drink ingredients")?;

    drink.ingredients = rows
        .into_iter()
        .map(|row| {
            let category: String = row.get(2);
            DrinkIngredient {
                ingredient: Ingredient {
                    id: row.get(0),
                    name: row.get(1),
                    category: IngredientCategory::from(category.as_str()),
                    description: row.get(3),
                },
                amount: row.get(4),
            }
        })
        .collect();

    observability::record_db_metrics("describe_drink", start_time.elapsed());
    debug!(
        drink_id = %drink_id,
        ingredient_count = drink.ingredients.len(),
        "Drink hydrated"
    );
    Ok(Some(drink))
}

/// Look up a drink by exact name and hydrate it. Duplicate names resolve to the oldest drink.
pub async fn describe_drink_by_name(pool: &PgPool, name: &str) -> Result<Option<Drink>> {
    debug!(drink = %name, "Describing drink");

    let row = sqlx::query("SELECT id FROM drinks WHERE name = $1 ORDER BY id LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("Failed to look up drink by name")?;

    match row {
        Some(row) => describe_drink_by_id(pool, row.get(0)).await,
        None => {
            debug!(drink = %name, "No drink with that name");
            Ok(None)
        }
    }
}

/// Build a `LIKE` pattern that matches `fragment` anywhere, with wildcards in the fragment taken literally
pub fn substring_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Pick up to `count` random drinks, optionally filtered by an ingredient name fragment
pub async fn random_drinks(
    pool: &PgPool,
    ingredient_filter: Option<&str>,
    count: usize,
) -> Result<Vec<Drink>> {
    let limit = i64::try_from(count).unwrap_or(i64::MAX);
    let rows = match ingredient_filter {
        Some(fragment) => sqlx::query(
            "SELECT drink_id FROM (
                SELECT DISTINCT di.drink_id
                FROM drink_ingredients AS di
                JOIN ingredient AS i ON di.ingredient_id = i.id
                WHERE i.name ILIKE $1
            ) AS matches
            ORDER BY RANDOM()
            LIMIT $2",
        )
        .bind(substring_pattern(fragment))
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to sample drinks by ingredient")?,
        None => sqlx::query("SELECT id FROM drinks ORDER BY RANDOM() LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
            .context("Failed to sample drinks")?,
    };

    let drink_ids: Vec<i64> = rows.into_iter().map(|row| row.get(0)).collect();
    debug!(
        filter = ?ingredient_filter,
        candidates = drink_ids.len(),
        "Sampled random drink ids"
    );

    let mut drinks = Vec::with_capacity(drink_ids.len());
    for drink_id in drink_ids {
        match describe_drink_by_id(pool, drink_id).await {
            Ok(Some(drink)) => drinks.push(drink),
            Ok(None) => {
                warn!(drink_id = %drink_id, "Random drink vanished or is incomplete, skipping");
            }
            Err(e) => {
                warn!(drink_id = %drink_id, error = %e, "Failed to describe random drink, skipping");
            }
        }
    }

    Ok(drinks)
}

async fn insert_recipe_rows(conn: &mut PgConnection, recipe: &NewRecipe) -> Result<i64> {
    let row = sqlx::query(
        "INSERT INTO drinks (name, mixing, glass, serving, notes, author)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&recipe.name)
    .bind(&recipe.mixing)
    .bind(&recipe.glass)
    .bind(&recipe.serving)
    .bind(&recipe.notes)
    .bind(&recipe.author)
    .fetch_one(&mut *conn)
    .await
    .context("Failed to insert drink")?;

    let drink_id: i64 = row.get(0);

    for item in &recipe.ingredients {
        sqlx::query(
            "INSERT INTO drink_ingredients (drink_id, ingredient_id, amount) VALUES ($1, $2, $3)",
        )
        .bind(drink_id)
        .bind(item.ingredient.id)
        .bind(item.amount)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to insert drink ingredient {}", item.ingredient.name))?;
    }

    Ok(drink_id)
}

/// Insert a recipe as a single transaction.
///
/// Either the drink row and every ingredient row commit together or nothing
/// is written. The transaction is rolled back on every failure path.
pub async fn add_recipe(pool: &PgPool, recipe: &NewRecipe) -> Result<i64> {
    let start_time = Instant::now();

    if recipe.name.trim().is_empty()
        || recipe.mixing.is_empty()
        || recipe.glass.is_empty()
        || recipe.serving.is_empty()
    {
        anyhow::bail!("Refusing to insert incomplete drink {:?}", recipe.name);
    }

    info!(
        drink = %recipe.name,
        author = %recipe.author,
        ingredient_count = recipe.ingredients.len(),
        "Adding recipe"
    );

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    match insert_recipe_rows(&mut tx, recipe).await {
        Ok(drink_id) => {
            tx.commit().await.context("Failed to commit recipe")?;
            observability::record_db_metrics("add_recipe", start_time.elapsed());
            info!(drink_id = %drink_id, drink = %recipe.name, "Recipe added successfully");
            Ok(drink_id)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back recipe transaction");
            }
            Err(e)
        }
    }
}

/// PostgreSQL-backed [`RecipeStore`]
#[derive(Debug, Clone)]
pub struct PgRecipeStore {
    pool: Arc<PgPool>,
}

impl PgRecipeStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn describe_drink_by_name(&self, name: &str) -> Result<Option<Drink>> {
        describe_drink_by_name(&self.pool, name)
            .instrument(observability::db_span("describe_drink_by_name", "drinks"))
            .await
    }

    async fn describe_ingredient_by_name(&self, name: &str) -> Result<Option<Ingredient>> {
        describe_ingredient_by_name(&self.pool, name)
            .instrument(observability::db_span("describe_ingredient", "ingredient"))
            .await
    }

    async fn random_drinks(
        &self,
        ingredient_filter: Option<&str>,
        count: usize,
    ) -> Result<Vec<Drink>> {
        random_drinks(&self.pool, ingredient_filter, count)
            .instrument(observability::db_span("random_drinks", "drink_ingredients"))
            .await
    }

    async fn add_recipe(&self, recipe: &NewRecipe) -> Result<i64> {
        add_recipe(&self.pool, recipe)
            .instrument(observability::db_span("add_recipe", "drinks"))
            .await
    }
}
