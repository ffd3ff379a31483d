//! API catalog - static description of every invocable endpoint
//!
//! Loaded once from configuration and shared read-only by the dispatcher.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// HTTP method declared by an API definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

impl HttpMethod {
    /// Canonical upper-case verb
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared value kind of a parameter
///
/// Informational only: values always travel as the text the user entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    #[default]
    String,
    Number,
    Date,
}

/// Parameter descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParameter {
    /// Key used in the request body
    pub name: String,

    /// Declared kind
    #[serde(default, rename = "type")]
    pub kind: ParamKind,

    /// Whether the form marks this field as mandatory
    #[serde(default)]
    pub required: bool,

    /// Display label
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Regular expression hint for the input form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One invocable API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDefinition {
    /// Unique key (e.g. "pin-checker")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Category tag used for grouping
    pub category: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub method: HttpMethod,

    /// Path relative to the dispatcher base URL, starting with '/'
    pub endpoint: String,

    /// Ordered parameter list
    #[serde(default)]
    pub parameters: Vec<ApiParameter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

impl ApiDefinition {
    /// Look up a parameter descriptor by name
    pub fn parameter(&self, name: &str) -> Option<&ApiParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names of required parameters, in declaration order
    pub fn required_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }
}

/// Ordered, immutable collection of API definitions
///
/// Lookups by id are O(1). When ids collide the first definition wins;
/// the config validator rejects such catalogs before they get here.
#[derive(Debug, Clone, Default)]
pub struct ApiCatalog {
    apis: Vec<ApiDefinition>,
    index: HashMap<String, usize>,
}

impl ApiCatalog {
    /// Build a catalog preserving declaration order
    pub fn new(apis: Vec<ApiDefinition>) -> Self {
        let mut index = HashMap::with_capacity(apis.len());
        for (pos, api) in apis.iter().enumerate() {
            index.entry(api.id.clone()).or_insert(pos);
        }
        Self { apis, index }
    }

    /// Resolve an identifier
    pub fn get(&self, id: &str) -> Option<&ApiDefinition> {
        self.index.get(id).map(|&pos| &self.apis[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ApiDefinition> {
        self.apis.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.apis.iter().map(|api| api.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// Group definitions by category, categories in first-seen order
    pub fn by_category(&self) -> Vec<(&str, Vec<&ApiDefinition>)> {
        let mut groups: Vec<(&str, Vec<&ApiDefinition>)> = Vec::new();
        for api in &self.apis {
            match groups.iter_mut().find(|(cat, _)| *cat == api.category) {
                Some((_, members)) => members.push(api),
                None => groups.push((api.category.as_str(), vec![api])),
            }
        }
        groups
    }

    /// Underlying definitions
    pub fn as_slice(&self) -> &[ApiDefinition] {
        &self.apis
    }
}

impl From<Vec<ApiDefinition>> for ApiCatalog {
    fn from(apis: Vec<ApiDefinition>) -> Self {
        Self::new(apis)
    }
}

impl<'a> IntoIterator for &'a ApiCatalog {
    type Item = &'a ApiDefinition;
    type IntoIter = std::slice::Iter<'a, ApiDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.apis.iter()
    }
}
