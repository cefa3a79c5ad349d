//! Config subcommand implementation.

use super::{Context, OutputFormat};
use crate::config::Paths;
use crate::error::{CliResult, StorageError};
use crate::output;
use clap::Parser;
use console::style;

/// Show the effective configuration.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Output format (csv is not supported and falls back to plain)
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl ConfigCommand {
    /// Execute the config command.
    pub fn execute(&self, ctx: &Context<'_>) -> CliResult<()> {
        let config = ctx.config;
        if self.output == OutputFormat::Json {
            let mut out = std::io::stdout().lock();
            return Ok(output::write_json(&mut out, config)?);
        }

        let value = serde_json::to_value(config).map_err(StorageError::from)?;
        if let Some(fields) = value.as_object() {
            for (key, value) in fields {
                let shown = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => "-".to_string(),
                    other => other.to_string(),
                };
                println!("{:<26} {}", style(key).bold(), shown);
            }
        }

        println!("{:<26} {}", style("account").bold(), ctx.account);
        if ctx.verbose {
            let paths = Paths::resolve()?;
            println!("{:<26} {}", style("configDir").bold(), paths.config_dir.display());
            println!("{:<26} {}", style("dataDir").bold(), paths.data_dir.display());
        }
        if config.store_type == crate::config::StoreType::Json {
            println!(
                "{:<26} {}",
                style("storeDirectory").bold(),
                config.store_base_directory()?.display()
            );
        }
        Ok(())
    }
}
