use clap::Parser;
use slimset_cli::{execute, init_logging, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    execute(&cli)?;
    Ok(())
}
