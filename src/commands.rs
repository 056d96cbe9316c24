//! Command table and parsing of chat commands
//!
//! Every command is addressed as `<prefix> <name> [arguments]`, for example
//! `!bottender describe martini`. The set of commands, their usage
//! line and their help text live in [`COMMANDS`]; classification and help
//! generation are both driven from that table.

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;

use crate::errors::{AppError, AppResult};
use crate::validation::{
    parse_ingredient_token, validate_drink_fields, validate_drink_name, IngredientSpec,
};

/// Which handler a command is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Describe,
    Random,
    AddRecipe,
    Help,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Describe => "describe",
            CommandKind::Random => "random",
            CommandKind::AddRecipe => "addrecipe",
            CommandKind::Help => "help",
        }
    }
}

/// One row of the command table
#[derive(Debug)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub examples: &'static [&'static str],
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        kind: CommandKind::Describe,
        name: "describe",
        summary: "Describe a drink",
        usage: "<drink name>",
        examples: &["martini", "parisian daiquiri"],
    },
    CommandSpec {
        kind: CommandKind::Random,
        name: "random",
        summary: "Pick a random drink from an ingredient",
        usage: "[ingredient]",
        examples: &["gin", "elderflower"],
    },
    CommandSpec {
        kind: CommandKind::AddRecipe,
        name: "addrecipe",
        summary: "Add a new drink recipe",
        usage: "--ingredient \"name,amount\" [--ingredient ...] --mixing <method> --serving <style> --glass <glass> [--notes <notes>] <drink name>",
        examples: &["--ingredient bourbon,200 --ingredient \"simple syrup,50\" --ingredient 'aromatic bitters,2' --serving rocks --mixing stirred --glass rocks 'Old Fashioned'"],
    },
    CommandSpec {
        kind: CommandKind::Help,
        name: "help",
        summary: "Show what I can do",
        usage: "",
        examples: &[],
    },
];

/// A fully parsed and validated command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Describe { query: String },
    Random { ingredient: Option<String> },
    AddRecipe(AddRecipeArgs),
    Help,
}

/// Validated arguments of the add-recipe form
#[derive(Debug, Clone, PartialEq)]
pub struct AddRecipeArgs {
    pub name: String,
    pub mixing: String,
    pub serving: String,
    pub glass: String,
    pub notes: String,
    pub ingredients: Vec<IngredientSpec>,
}

#[derive(Parser, Debug)]
#[command(
    name = "addrecipe",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct AddRecipeFlags {
    #[arg(long = "ingredient", allow_hyphen_values = true)]
    ingredients: Vec<String>,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    mixing: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    serving: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    glass: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    notes: String,
    #[arg(value_name = "NAME")]
    names: Vec<String>,
}

/// Find the table entry a message addresses, if any
pub fn classify(text: &str, prefix: &str) -> Option<&'static CommandSpec> {
    let mut words = text.split_whitespace();
    if words.next()? != prefix {
        return None;
    }
    let name = words.next()?;
    COMMANDS.iter().find(|spec| spec.name == name)
}

impl CommandSpec {
    /// Parse the full message text (prefix and command name included)
    pub fn parse(&self, text: &str) -> AppResult<Command> {
        match self.kind {
            CommandKind::Describe => {
                let query = trailing_words(text).ok_or_else(|| {
                    AppError::Validation("must specify a drink query".to_string())
                })?;
                Ok(Command::Describe { query })
            }
            CommandKind::Random => Ok(Command::Random {
                ingredient: trailing_words(text),
            }),
            CommandKind::AddRecipe => parse_add_recipe(text).map(Command::AddRecipe),
            CommandKind::Help => Ok(Command::Help),
        }
    }
}

/// Words after the prefix and command name, joined with single spaces
fn trailing_words(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().skip(2).collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Flags understood by the addrecipe form
const ADD_RECIPE_FLAGS: &[&str] = &["ingredient", "mixing", "serving", "glass", "notes"];

/// Parse `<prefix> addrecipe [flags] <name>`
pub fn parse_add_recipe(text: &str) -> AppResult<AddRecipeArgs> {
    let tokens = split_shell_words(text)
        .map_err(|_| AppError::Validation("failed to split command".to_string()))?;
    if tokens.len() < 3 {
        return Err(AppError::Validation(
            "must specify drink ingredients".to_string(),
        ));
    }

    let flags = AddRecipeFlags::try_parse_from(normalize_flag_dashes(&tokens[2..]))
        .map_err(|e| AppError::Validation(describe_flag_error(&e)))?;

    if flags.names.len() != 1 {
        return Err(AppError::Validation("must specify a drink name".to_string()));
    }
    let name = validate_drink_name(&flags.names[0])?.to_string();

    validate_drink_fields(&flags.mixing, &flags.serving, &flags.glass)?;

    let ingredients = flags
        .ingredients
        .iter()
        .map(|token| parse_ingredient_token(token))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(AddRecipeArgs {
        name,
        mixing: flags.mixing,
        serving: flags.serving,
        glass: flags.glass,
        notes: flags.notes,
        ingredients,
    })
}

/// Split a command line into words using shell quoting rules.
///
/// Curly double quotes, which mobile keyboards substitute for `"`, are
/// treated as plain double quotes.
pub fn split_shell_words(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    let normalized: String = input
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            other => other,
        })
        .collect();
    shell_words::split(&normalized)
}

/// Accept `-mixing` as well as `--mixing` for the known flags.
///
/// Flag values are passed through untouched, even when they start with a dash.
fn normalize_flag_dashes(tokens: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(tokens.len());
    let mut expecting_value = false;

    for token in tokens {
        if expecting_value {
            normalized.push(token.clone());
            expecting_value = false;
            continue;
        }

        let token = match token.strip_prefix('-') {
            Some(rest) if !rest.starts_with('-') && is_add_recipe_flag(rest) => {
                format!("-{}", token)
            }
            _ => token.clone(),
        };
        if let Some(flag) = token.strip_prefix("--") {
            expecting_value = !flag.contains('=') && is_add_recipe_flag(flag);
        }
        normalized.push(token);
    }

    normalized
}

fn is_add_recipe_flag(flag: &str) -> bool {
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    ADD_RECIPE_FLAGS.contains(&name)
}

/// User-facing text for a flag parsing failure, naming the offending argument
fn describe_flag_error(error: &clap::Error) -> String {
    let argument = match error.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(argument)) => Some(argument.as_str()),
        _ => None,
    };

    match (error.kind(), argument) {
        (ErrorKind::UnknownArgument, Some(argument)) => {
            format!("failed to parse command: unknown flag {}", argument)
        }
        (kind, Some(argument)) => format!("failed to parse command: {}: {}", kind, argument),
        (kind, None) => format!("failed to parse command: {}", kind),
    }
}

/// The command that makes the bot describe `drink_name`
pub fn describe_command(prefix: &str, drink_name: &str) -> String {
    format!("{} describe {}", prefix, drink_name)
}

/// Help text for every command in the table
pub fn help_text(prefix: &str) -> String {
    COMMANDS
        .iter()
        .filter(|spec| spec.kind != CommandKind::Help)
        .map(|spec| {
            let mut section = format!(
                "{} {} - {}\nUsage:\n  {} {} {}",
                prefix, spec.name, spec.summary, prefix, spec.name, spec.usage
            );
            if !spec.examples.is_empty() {
                section.push_str("\nExamples:");
                for example in spec.examples {
                    section.push_str(&format!("\n  {} {} {}", prefix, spec.name, example));
                }
            }
            section
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
