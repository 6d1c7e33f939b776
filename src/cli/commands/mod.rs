//! Command dispatch.

pub mod run;
pub mod validate;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;

/// Dispatches the parsed CLI to its command implementation.
///
/// # Errors
///
/// Propagates the executed command's error.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Validate(args) => validate::execute(&args),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
