//! `list` command implementation.

use anyhow::{Context, Result};
use contracts::{ApiCatalog, ApiDefinition};
use serde::Serialize;
use tracing::info;

use crate::cli::ListArgs;

/// Catalog info for JSON output
#[derive(Serialize)]
struct CatalogInfo {
    base_url: String,
    api_count: usize,
    categories: Vec<CategoryInfo>,
}

#[derive(Serialize)]
struct CategoryInfo {
    name: String,
    apis: Vec<ApiInfo>,
}

#[derive(Serialize)]
struct ApiInfo {
    id: String,
    name: String,
    method: String,
    endpoint: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<ParamInfo>,
}

#[derive(Serialize)]
struct ParamInfo {
    name: String,
    kind: String,
    required: bool,
    label: String,
}

/// Execute the `list` command
pub fn run_list(args: &ListArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let base_url = config.dispatcher.base_url.clone();
    let catalog = config.catalog();

    info!(apis = catalog.len(), "Catalog loaded");

    if args.json {
        let info = build_catalog_info(&catalog, &base_url, args.params);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize catalog info")?;
        println!("{}", json);
    } else {
        print_catalog(&catalog, &base_url, args.params);
    }

    Ok(())
}

fn build_catalog_info(catalog: &ApiCatalog, base_url: &str, with_params: bool) -> CatalogInfo {
    let categories = catalog
        .by_category()
        .into_iter()
        .map(|(name, apis)| CategoryInfo {
            name: name.to_string(),
            apis: apis.into_iter().map(|api| api_info(api, with_params)).collect(),
        })
        .collect();

    CatalogInfo {
        base_url: base_url.to_string(),
        api_count: catalog.len(),
        categories,
    }
}

fn api_info(api: &ApiDefinition, with_params: bool) -> ApiInfo {
    let parameters = if with_params {
        api.parameters
            .iter()
            .map(|p| ParamInfo {
                name: p.name.clone(),
                kind: format!("{:?}", p.kind).to_lowercase(),
                required: p.required,
                label: p.label.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    ApiInfo {
        id: api.id.clone(),
        name: api.name.clone(),
        method: api.method.to_string(),
        endpoint: api.endpoint.clone(),
        parameters,
    }
}

fn print_catalog(catalog: &ApiCatalog, base_url: &str, with_params: bool) {
    println!("API Sandbox catalog ({} APIs, base {})", catalog.len(), base_url);

    for (category, apis) in catalog.by_category() {
        println!("\n{} ({})", category, apis.len());
        for (i, api) in apis.iter().enumerate() {
            let is_last = i == apis.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            let child_prefix = if is_last { "   " } else { "│  " };

            println!(
                "   {} {:<18} {:<4} {}  {}",
                prefix,
                api.id,
                api.method.as_str(),
                api.endpoint,
                api.name
            );

            if with_params {
                for (j, param) in api.parameters.iter().enumerate() {
                    let param_prefix = if j == api.parameters.len() - 1 { "└─" } else { "├─" };
                    let marker = if param.required { "*" } else { " " };
                    println!(
                        "   {}  {} {}{} ({:?}) {}",
                        child_prefix, param_prefix, param.name, marker, param.kind, param.label
                    );
                }
            }
        }
    }

    println!();
}
