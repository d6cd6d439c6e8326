//! Analyzers command - show which analyzers a scan would dispatch

use anyhow::Result;
use ferroscan_core::config::Config;
use serde_json::json;

use crate::Cli;
use crate::commands::build_registry;
use crate::exit_codes;

pub fn run(cli: &Cli, config: &Config) -> Result<i32> {
    let registry = build_registry(config);
    let handles = registry.snapshot();

    if cli.format == "json" {
        let entries: Vec<_> = handles
            .iter()
            .map(|handle| {
                json!({
                    "name": handle.name,
                    "enabled": handle.settings.enabled,
                    "timeout_override_seconds": handle.settings.timeout_override_seconds,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for handle in &handles {
            let state = if handle.settings.enabled {
                "enabled"
            } else {
                "disabled"
            };
            match handle.settings.timeout_override_seconds {
                Some(seconds) => println!("{} ({state}, timeout {seconds}s)", handle.name),
                None => println!("{} ({state})", handle.name),
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}
