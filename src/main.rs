use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use recipe_finder::{
    config::{Config, CONFIG_PATH_VAR},
    query::{Query, MAX_SERVINGS, MIN_SERVINGS},
    render, RecipeFinder,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recipe-finder")]
#[command(about = "Get a recipe with full nutrition info, scaled to your servings", long_about = None)]
struct Cli {
    /// Dish to look up, like "lentil soup". Asks for dishes when omitted
    dish: Vec<String>,

    /// Number of servings to scale the recipe to
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(MIN_SERVINGS as i64..=MAX_SERVINGS as i64)
    )]
    servings: u32,

    /// TOML config file
    #[arg(short, long, env = CONFIG_PATH_VAR)]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let finder = RecipeFinder::new(&config).context("Failed to create the HTTP client")?;

    let mut out = io::stdout().lock();

    if cli.dish.is_empty() {
        interactive(&finder, cli.servings, &mut out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let query = Query::new(cli.dish.join(" "), cli.servings)?;
    if lookup(&finder, &query, &mut out)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Runs one query and shows the recipe or what went wrong
///
/// Returns `false` if the lookup failed.
fn lookup(finder: &RecipeFinder, query: &Query, out: &mut impl Write) -> io::Result<bool> {
    writeln!(out, "Searching for '{}'...", query.dish_name())?;
    match finder.find(query) {
        Ok(recipe) => {
            let scaled = recipe.scale_to_servings(query.desired_servings());
            writeln!(out)?;
            render::write_recipe(&scaled, finder.currency(), out)?;
            Ok(true)
        }
        Err(err) => {
            tracing::debug!(error = ?err, "lookup failed");
            render::write_error(&err, out)?;
            Ok(false)
        }
    }
}

fn interactive(finder: &RecipeFinder, servings: u32, out: &mut impl Write) -> Result<()> {
    let mut lines = io::stdin().lock().lines();
    let mut servings = servings;

    writeln!(out, "Enter a dish name, or an empty line to quit.")?;
    loop {
        write!(out, "\nWhat recipe do you want? ")?;
        out.flush()?;
        let Some(dish) = lines.next().transpose()? else {
            break;
        };
        if dish.trim().is_empty() {
            break;
        }

        write!(out, "Number of servings [{servings}]: ")?;
        out.flush()?;
        let Some(answer) = lines.next().transpose()? else {
            break;
        };
        let wanted = match answer.trim() {
            "" => servings,
            n => match n.parse::<u32>() {
                Ok(n) => n,
                Err(_) => {
                    writeln!(
                        out,
                        "Servings must be a whole number between {MIN_SERVINGS} and {MAX_SERVINGS}"
                    )?;
                    continue;
                }
            },
        };

        match Query::new(&dish, wanted) {
            Ok(query) => {
                servings = wanted;
                lookup(finder, &query, out)?;
            }
            Err(err) => writeln!(out, "{err}")?,
        }
    }
    Ok(())
}
