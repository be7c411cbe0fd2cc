//! CLI interface for setversion.

use anyhow::Result;
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

use crate::console::Console;
use crate::resolver::PropertyResolver;
use crate::version;

/// setversion: stamps TeamCity build numbers for branch builds.
#[derive(Parser)]
#[command(name = "setversion")]
#[command(about = "Stamps TeamCity build numbers for branch builds", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Compute and log the build number without emitting the TeamCity
    /// service message.
    #[arg(long, alias = "dryrun")]
    pub dry_run: bool,
}

impl Cli {
    /// Executes the command.
    ///
    /// Every policy outcome terminates successfully; missing environment,
    /// unreadable files, and absent properties are reported as diagnostic
    /// lines, never as a failing exit status.
    pub fn execute(self) -> Result<()> {
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut console = Console::new(&mut stdout);

        let resolver = PropertyResolver::from_env();
        version::run(&resolver, &mut console, self.dry_run);

        Ok(())
    }
}
