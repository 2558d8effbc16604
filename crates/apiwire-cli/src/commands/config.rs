//! Config command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::settings;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Save the effective configuration as the default
    #[arg(long)]
    pub save: bool,
}

pub fn run(global: &GlobalArgs, args: ConfigArgs) -> Result<()> {
    let config = settings::resolve(global)?;

    // Validate before printing or saving.
    apiwire::BaseUrl::new(&config.base_url).context("Invalid base URL")?;

    if args.save {
        let path = settings::save(&config)?;
        output::success("Configuration saved");
        output::field("Path", &path.display().to_string());
    }

    output::json_pretty(&config)
}
