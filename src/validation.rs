//! Validation module for recipe submission input
//!
//! Every failure carries the exact corrective text shown to the submitter.

use crate::errors::{AppError, AppResult};

/// An `--ingredient` value split into catalog name and amount, not yet resolved against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientSpec {
    pub name: String,
    pub amount: i32,
}

/// Parse an ingredient token of the form `<name>,<amount>`
///
/// # Examples
/// ```
/// use bottender::validation::parse_ingredient_token;
///
/// let spec = parse_ingredient_token("bourbon,200").unwrap();
/// assert_eq!(spec.name, "bourbon");
/// assert_eq!(spec.amount, 200);
///
/// assert!(parse_ingredient_token("bourbon,abc").is_err());
/// assert!(parse_ingredient_token("bourbon").is_err());
/// ```
pub fn parse_ingredient_token(token: &str) -> AppResult<IngredientSpec> {
    let parts: Vec<&str> = token.split(',').collect();
    if parts.len() != 2 || parts[0].trim().is_empty() {
        return Err(AppError::Validation(format!("invalid ingredient: {}", token)));
    }

    let amount_text = parts[1].trim();
    let amount = match amount_text.parse::<i32>() {
        Ok(amount) if amount >= 0 => amount,
        _ => {
            return Err(AppError::Validation(format!(
                "invalid ingredient amount: {}",
                parts[1]
            )))
        }
    };

    Ok(IngredientSpec {
        name: parts[0].trim().to_string(),
        amount,
    })
}

/// Check that the mandatory drink attributes were supplied
pub fn validate_drink_fields(mixing: &str, serving: &str, glass: &str) -> AppResult<()> {
    let missing: Vec<&str> = [("mixing", mixing), ("serving", serving), ("glass", glass)]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "must specify all aspects of drink, missing: {}",
            missing.join(", ")
        )))
    }
}

/// Validates a drink name
pub fn validate_drink_name(name: &str) -> AppResult<&str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation("must specify a drink name".to_string()));
    }

    if trimmed.len() > 255 {
        return Err(AppError::Validation("drink name is too long".to_string()));
    }

    Ok(trimmed)
}
