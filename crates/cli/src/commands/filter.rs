//! `filter` command.

use std::path::Path;

use clap::Args;
use serde_json::{Map, Value};
use visible_core::filter::{coerce_filters, run_filter};

use super::{CliError, open_catalog};

/// Filter fields, mirroring the `filter-devices` tool arguments.
///
/// Values are passed through the same coercion as tool arguments, so
/// `--max-price abc` is dropped rather than rejected.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub max_price: Option<String>,
    #[arg(long)]
    pub condition: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub in_stock: Option<String>,
    /// Free-text query to infer filters from
    #[arg(long)]
    pub query: Option<String>,
}

impl FilterArgs {
    fn raw_filters(&self) -> Map<String, Value> {
        [
            ("brand", &self.brand),
            ("max_price", &self.max_price),
            ("condition", &self.condition),
            ("color", &self.color),
            ("size", &self.size),
            ("category", &self.category),
            ("in_stock", &self.in_stock),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| (key.to_string(), Value::String(v.clone())))
        })
        .collect()
    }
}

/// Run the filter and print the structured result as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn run(data: Option<&Path>, args: &FilterArgs) -> Result<(), CliError> {
    let catalog = open_catalog(data)?;
    let report = run_filter(
        &catalog,
        coerce_filters(&args.raw_filters()),
        args.query.as_deref(),
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_filters_skips_unset_fields() {
        let args = FilterArgs {
            brand: Some("pixel".to_string()),
            max_price: Some("300".to_string()),
            query: Some("black".to_string()),
            ..Default::default()
        };
        let raw = args.raw_filters();

        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get("brand"), Some(&Value::String("pixel".to_string())));
        assert!(raw.get("query").is_none());
    }
}
