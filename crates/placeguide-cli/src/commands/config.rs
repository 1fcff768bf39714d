//! Config command implementation

use crate::cli::ConfigArgs;
use crate::config_loader::{load_config, resolved_config_file};
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use std::collections::BTreeMap;
use tabled::Tabled;

pub fn execute(args: ConfigArgs, output: &OutputWriter) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let config_file = resolved_config_file(args.config.as_deref());

    let values: BTreeMap<String, ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| (key, ConfigEntry { value, source: format!("{:?}", source) }))
        .collect();

    if output.is_json() {
        output.result(ConfigOutput {
            config_file: config_file.map(|p| p.display().to_string()),
            values,
        })?;
        return Ok(());
    }

    #[derive(Tabled)]
    struct ConfigRow {
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    output.section("Configuration Values");
    match &config_file {
        Some(path) => output.kv("Settings file", path.display()),
        None => output.kv("Settings file", "none"),
    }

    let rows: Vec<ConfigRow> = values
        .into_iter()
        .map(|(key, entry)| ConfigRow { key, value: entry.value, source: entry.source })
        .collect();
    output.table(rows);

    output.section("Configuration Precedence");
    output.info("CLI arguments > Environment variables > Config file > Defaults");

    Ok(())
}
