//! Product records, component categories and the open spec bag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Component kind. The serde names are part of the persisted cart format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "CPU")]
    Cpu,
    Motherboard,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "SSD")]
    Ssd,
    Case,
    #[serde(rename = "PSU")]
    Psu,
    LiquidCooler,
    AirCooler,
    Monitor,
    Software,
    Other,
}

impl Category {
    pub const COUNT: usize = 12;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Gpu,
        Category::Ram,
        Category::Ssd,
        Category::Case,
        Category::Psu,
        Category::LiquidCooler,
        Category::AirCooler,
        Category::Monitor,
        Category::Software,
        Category::Other,
    ];

    /// Position in [`Category::ALL`], used to index fixed-size per-category tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label, also part of a product's searchable text.
    pub fn label(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Motherboard => "Motherboard",
            Category::Gpu => "Graphics Card",
            Category::Ram => "Memory",
            Category::Ssd => "SSD",
            Category::Case => "Case",
            Category::Psu => "Power Supply",
            Category::LiquidCooler => "Liquid Cooler",
            Category::AirCooler => "Air Cooler",
            Category::Monitor => "Monitor",
            Category::Software => "Software",
            Category::Other => "Other",
        }
    }

    /// Serialized name as used in JSON.
    pub fn code(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Motherboard => "Motherboard",
            Category::Gpu => "GPU",
            Category::Ram => "RAM",
            Category::Ssd => "SSD",
            Category::Case => "Case",
            Category::Psu => "PSU",
            Category::LiquidCooler => "LiquidCooler",
            Category::AirCooler => "AirCooler",
            Category::Monitor => "Monitor",
            Category::Software => "Software",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the serialized code or the label, ignoring case, spaces, dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_category_name(s);
        Category::ALL
            .iter()
            .copied()
            .find(|c| {
                normalize_category_name(c.code()) == wanted
                    || normalize_category_name(c.label()) == wanted
            })
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}

fn normalize_category_name(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Category constraint for searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            trimmed.parse().map(CategoryFilter::Only)
        }
    }
}

/// Well-known spec keys read by the compatibility rules and the power aggregator.
pub mod keys {
    pub const SOCKET: &str = "socket";
    pub const MEMORY_TYPE: &str = "memoryType";
    pub const TDP: &str = "tdp";
    pub const LENGTH: &str = "length";
    pub const MAX_GPU_LENGTH: &str = "maxGpuLength";
    pub const HEIGHT: &str = "height";
    pub const MAX_COOLER_HEIGHT: &str = "maxCoolerHeight";
}

/// Open attribute bag. Unknown keys are kept as-is; the rule-relevant keys have typed accessors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SpecMap(BTreeMap<String, String>);

impl SpecMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated sub-values of `key`, trimmed, empty pieces dropped.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.get(key).map(split_multi_value).unwrap_or_default()
    }

    pub fn socket(&self) -> Option<&str> {
        self.non_blank(keys::SOCKET)
    }

    pub fn memory_type(&self) -> Option<&str> {
        self.non_blank(keys::MEMORY_TYPE)
    }

    pub fn tdp(&self) -> Option<&str> {
        self.non_blank(keys::TDP)
    }

    pub fn length(&self) -> Option<&str> {
        self.non_blank(keys::LENGTH)
    }

    pub fn max_gpu_length(&self) -> Option<&str> {
        self.non_blank(keys::MAX_GPU_LENGTH)
    }

    pub fn height(&self) -> Option<&str> {
        self.non_blank(keys::HEIGHT)
    }

    pub fn max_cooler_height(&self) -> Option<&str> {
        self.non_blank(keys::MAX_COOLER_HEIGHT)
    }

    fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SpecMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Split a spec value like `"LGA1700, AM5"` into trimmed sub-values.
pub fn split_multi_value(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

/// Catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Whole currency units
    pub price: u64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub spec_details: SpecMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category, price: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category,
            description: String::new(),
            image_url: None,
            spec_details: SpecMap::new(),
            last_updated: None,
        }
    }

    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec_details.insert(key, value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Lower-cased text matched by free-text queries.
    pub fn searchable_text(&self) -> String {
        let mut text = format!(
            "{} {} {} {}",
            self.name,
            self.id,
            self.description,
            self.category.label()
        );
        for (_, value) in self.spec_details.iter() {
            text.push(' ');
            text.push_str(value);
        }
        text.to_lowercase()
    }
}
