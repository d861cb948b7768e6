use std::io::{self, BufRead, Write};

use log::{debug, warn};

use pastry_shop_sim::error::{ErrorKind, ShopError};
use pastry_shop_sim::parser::{self, Command};
use pastry_shop_sim::scheduler::Scheduler;
use pastry_shop_sim::utils::init_logger;

fn main() -> Result<(), ShopError> {
    init_logger();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let header = lines
        .next()
        .ok_or_else(|| ShopError::of_kind("missing program header", ErrorKind::MissingHeader))??;
    let (period, capacity) = parser::parse_header(&header)
        .ok_or_else(|| ShopError::of_kind("malformed program header", ErrorKind::MissingHeader))?;

    let mut scheduler = Scheduler::new(period, capacity);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = parser::parse_line(&line) else {
            warn!("dropping malformed line: {line:?}");
            continue;
        };
        debug!("parsed command: {line}");

        let outcome = match command {
            Command::AddRecipe { name, items } => scheduler.add_recipe(&name, &items),
            Command::RemoveRecipe { name } => scheduler.remove_recipe(&name),
            Command::Restock { triples } => scheduler.restock(&triples),
            Command::Order { recipe, qty } => scheduler.order(&recipe, qty),
        };

        writeln!(out, "{}", outcome.command_line)?;
        if let Some(truck_lines) = outcome.truck_lines {
            for truck_line in truck_lines {
                writeln!(out, "{truck_line}")?;
            }
        }
    }

    Ok(())
}
