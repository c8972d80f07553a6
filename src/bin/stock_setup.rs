use std::path::PathBuf;

use clap::Parser;
use stock_service::credentials::{read_env_file, run_wizard, write_env_file, TerminalPrompter};
use stock_service::BoxError;

/// Writes the database connection settings, with an encrypted password, to
/// an env file.
#[derive(Parser)]
#[command(name = "stock-setup")]
struct Cli {
    /// File to read defaults from and write the settings to.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let existing = read_env_file(&cli.env_file)?;
    let values = run_wizard(&existing, &mut TerminalPrompter)?;

    println!("Create settings and save to: {}", cli.env_file.display());
    write_env_file(&cli.env_file, &values)?;
    Ok(())
}
