//! Categories command implementation

use crate::cli::CategoriesArgs;
use crate::config_loader::{load_categories, load_config_with_overrides};
use crate::output::OutputWriter;
use crate::output_types::{CategoriesOutput, CategoryInfo};
use anyhow::Result;
use placeguide_core::config::CliConfigOverrides;
use tabled::Tabled;

pub fn execute(args: CategoriesArgs, output: &OutputWriter) -> Result<()> {
    let overrides = CliConfigOverrides { categories_path: args.categories, ..Default::default() };
    let config = load_config_with_overrides(args.config.as_deref(), overrides)?;
    let table = load_categories(&config)?;

    let categories: Vec<CategoryInfo> =
        table.iter().map(|(id, policy)| CategoryInfo::new(id, policy)).collect();

    if output.is_json() {
        output.result(CategoriesOutput {
            path: config.categories_path.value.display().to_string(),
            categories,
        })?;
        return Ok(());
    }

    #[derive(Tabled)]
    struct CategoryRow {
        #[tabled(rename = "Category")]
        id: String,
        #[tabled(rename = "Distance (m)")]
        distance: String,
        #[tabled(rename = "Walk (min)")]
        walking: String,
        #[tabled(rename = "Min signals")]
        min_signals: usize,
        #[tabled(rename = "Counted signals")]
        signal_fields: String,
        #[tabled(rename = "Mismatch keywords")]
        keywords: String,
    }

    output.section(format!("Categories ({})", config.categories_path.value.display()));

    let rows = categories
        .into_iter()
        .map(|c| CategoryRow {
            id: c.id.to_string(),
            distance: match (c.min_meters, c.max_meters) {
                (None, _) => "any".to_string(),
                (Some(min), Some(max)) => format!("{:.0} - {:.0}", min, max),
                (Some(min), None) => format!(">= {:.0}", min),
            },
            walking: c.max_walking_minutes.map_or("-".to_string(), |m| format!("<= {:.1}", m)),
            min_signals: c.min_signals,
            signal_fields: c.signal_fields.map_or("all".to_string(), |f| f.join(", ")),
            keywords: if c.mismatch_keywords.is_empty() {
                "-".to_string()
            } else {
                c.mismatch_keywords.join(", ")
            },
        })
        .collect();

    output.table(rows);
    Ok(())
}
