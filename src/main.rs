mod cli;
mod config;
mod observability;

use anyhow::{bail, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        cli::print_help();
        return Ok(());
    };

    match command {
        "help" | "-h" | "--help" => {
            cli::print_help();
            return Ok(());
        }
        "operations" => {
            cli::print_operations();
            return Ok(());
        }
        _ => {}
    }

    let config = config::load_config()?;
    observability::init_tracing(config.log_level.as_deref());

    match command {
        "run" => cli::handle_run(&config, &args[1..]).await,
        "search" => cli::handle_search(&config, &args[1..]).await,
        "check" => cli::handle_check(&config).await,
        other => bail!("Unknown command: {other}. Run `blue help` for usage."),
    }
}
