//! Line tokenizer for the command language. A line that doesn't match one
//! of the four known command shapes exactly is a parse mismatch: the whole
//! line is dropped, nothing is emitted, and the tick still advances once
//! the shell processes the next well-formed line.

use itertools::Itertools;

/// One parsed input line.
pub enum Command {
    AddRecipe {
        name: String,
        items: Vec<(String, u32)>,
    },
    RemoveRecipe {
        name: String,
    },
    Restock {
        triples: Vec<(String, u32, u64)>,
    },
    Order {
        recipe: String,
        qty: u32,
    },
}

/// Parses the program header line (`P C`), the two positive integers that
/// seed the scheduler. Returns `None` on anything else.
pub fn parse_header(line: &str) -> Option<(u32, u32)> {
    let mut tokens = line.split_whitespace();
    let period = tokens.next()?.parse().ok()?;
    let capacity = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((period, capacity))
}

/// Parses one command line. Blank lines are not commands and are handled
/// by the caller before this is reached.
pub fn parse_line(line: &str) -> Option<Command> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next()?;

    match keyword {
        "add_recipe" => parse_add_recipe(tokens),
        "remove_recipe" => parse_remove_recipe(tokens),
        "restock" => parse_restock(tokens),
        "order" => parse_order(tokens),
        _ => None,
    }
}

fn parse_add_recipe<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Command> {
    let name = tokens.next()?.to_string();
    let rest: Vec<&str> = tokens.collect();

    if rest.is_empty() || rest.len() % 2 != 0 {
        return None;
    }

    let mut items = Vec::with_capacity(rest.len() / 2);
    for (ingredient, qty) in rest.into_iter().tuples() {
        items.push((ingredient.to_string(), qty.parse().ok()?));
    }

    Some(Command::AddRecipe { name, items })
}

fn parse_remove_recipe<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Command> {
    let name = tokens.next()?.to_string();
    if tokens.next().is_some() {
        return None;
    }
    Some(Command::RemoveRecipe { name })
}

fn parse_restock<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<Command> {
    let rest: Vec<&str> = tokens.collect();
    if rest.is_empty() || rest.len() % 3 != 0 {
        return None;
    }

    let mut triples = Vec::with_capacity(rest.len() / 3);
    for (ingredient, qty, expiry) in rest.into_iter().tuples() {
        triples.push((ingredient.to_string(), qty.parse().ok()?, expiry.parse().ok()?));
    }

    Some(Command::Restock { triples })
}

fn parse_order<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Command> {
    let recipe = tokens.next()?.to_string();
    let qty: u32 = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(Command::Order { recipe, qty })
}
