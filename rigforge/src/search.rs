//! Product search and cascading facet options.
//!
//! Query grammar: the query is split on `|` into OR-groups and each group on
//! whitespace into AND-terms. A product matches when every term of at least
//! one group is a substring of its lower-cased searchable text. A group with
//! no terms (an empty query, or `"ryzen |"`) matches every product.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::catalog::{CategoryFilter, Product};

/// Spec key → accepted values. An empty value set leaves the key unconstrained.
pub type ActiveFilters = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    Name,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price-asc" | "price_asc" | "price" => Ok(SortOrder::PriceAsc),
            "price-desc" | "price_desc" => Ok(SortOrder::PriceDesc),
            "name" => Ok(SortOrder::Name),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Parsed query, reusable across many products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    groups: Vec<Vec<String>>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let groups = raw
            .to_lowercase()
            .split('|')
            .map(|group| group.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();
        Self { groups }
    }

    /// True when some OR-group has no terms, which every product satisfies.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().any(Vec::is_empty)
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.is_empty() {
            return true;
        }
        let text = product.searchable_text();
        self.groups
            .iter()
            .any(|terms| terms.iter().all(|term| text.contains(term.as_str())))
    }
}

fn passes_filter(product: &Product, key: &str, accepted: &BTreeSet<String>) -> bool {
    if accepted.is_empty() {
        return true;
    }
    product
        .spec_details
        .values(key)
        .into_iter()
        .any(|v| accepted.contains(v))
}

fn passes_filters(product: &Product, filters: &ActiveFilters, skip_key: Option<&str>) -> bool {
    filters
        .iter()
        .filter(|(key, _)| Some(key.as_str()) != skip_key)
        .all(|(key, accepted)| passes_filter(product, key, accepted))
}

/// Products matching category, query and every active filter, in input order.
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
    category: CategoryFilter,
    filters: &ActiveFilters,
) -> Vec<&'a Product> {
    let query = Query::parse(query);
    products
        .iter()
        .filter(|p| category.matches(p.category))
        .filter(|p| query.matches(p))
        .filter(|p| passes_filters(p, filters, None))
        .collect()
}

/// Distinct values of `target_key` among products matching everything except
/// the filter on `target_key` itself, sorted lexicographically.
pub fn smart_options(
    products: &[Product],
    category: CategoryFilter,
    target_key: &str,
    query: &str,
    filters: &ActiveFilters,
) -> Vec<String> {
    let query = Query::parse(query);
    let options: BTreeSet<String> = products
        .iter()
        .filter(|p| category.matches(p.category))
        .filter(|p| query.matches(p))
        .filter(|p| passes_filters(p, filters, Some(target_key)))
        .flat_map(|p| p.spec_details.values(target_key))
        .map(str::to_string)
        .collect();
    options.into_iter().collect()
}

/// Stable sort of an already-filtered list.
pub fn sort_products(products: &mut [&Product], order: SortOrder) {
    match order {
        SortOrder::PriceAsc => products.sort_by_key(|p| p.price),
        SortOrder::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

/// Parse `key=value` pairs into filters; repeated keys accumulate values.
pub fn parse_filter_args<I, S>(args: I) -> Result<ActiveFilters, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut filters = ActiveFilters::new();
    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("filter must be key=value: {}", arg))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("filter key is empty: {}", arg));
        }
        let entry = filters.entry(key.to_string()).or_default();
        for v in value.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            entry.insert(v.to_string());
        }
    }
    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{keys, Category};

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("cpu-intel", "Core i7 14700K", Category::Cpu, 400)
                .with_spec(keys::SOCKET, "LGA1700")
                .with_spec(keys::TDP, "125W"),
            Product::new("cpu-amd", "Ryzen 7 7800X3D", Category::Cpu, 450)
                .with_spec(keys::SOCKET, "AM5")
                .with_spec(keys::TDP, "120W"),
            Product::new("mb-z790", "Z790 Gaming", Category::Motherboard, 280)
                .with_spec(keys::SOCKET, "LGA1700")
                .with_spec(keys::MEMORY_TYPE, "DDR5"),
            Product::new("mb-b650", "B650 Tomahawk", Category::Motherboard, 220)
                .with_spec(keys::SOCKET, "AM5")
                .with_spec(keys::MEMORY_TYPE, "DDR5"),
            Product::new("mb-b760d4", "B760 DDR4", Category::Motherboard, 150)
                .with_spec(keys::SOCKET, "LGA1700")
                .with_spec(keys::MEMORY_TYPE, "DDR4"),
            Product::new("cool-1", "Peerless Assassin", Category::AirCooler, 45)
                .with_spec(keys::SOCKET, "LGA1700, AM5")
                .with_spec(keys::HEIGHT, "155mm"),
            Product::new("os-1", "Windows 11 Pro", Category::Software, 200),
        ]
    }

    fn filters(pairs: &[(&str, &[&str])]) -> ActiveFilters {
        pairs
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_matches_all() {
        let products = catalog();
        let result = filter_products(&products, "   ", CategoryFilter::All, &ActiveFilters::new());
        assert_eq!(result.len(), products.len());
    }

    #[test]
    fn test_and_terms_within_group() {
        let products = catalog();
        let result = filter_products(&products, "ryzen x3d", CategoryFilter::All, &ActiveFilters::new());
        assert_eq!(ids(&result), vec!["cpu-amd"]);

        let none = filter_products(&products, "ryzen 14700k", CategoryFilter::All, &ActiveFilters::new());
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_or_group_matches_everything() {
        let products = catalog();
        let all = filter_products(&products, "", CategoryFilter::All, &ActiveFilters::new());
        let trailing = filter_products(&products, "ryzen |", CategoryFilter::All, &ActiveFilters::new());
        let leading = filter_products(&products, "|  ryzen", CategoryFilter::All, &ActiveFilters::new());
        assert_eq!(trailing.len(), all.len());
        assert_eq!(leading.len(), all.len());
    }

    #[test]
    fn test_or_groups() {
        let products = catalog();
        let result = filter_products(&products, "ryzen | z790", CategoryFilter::All, &ActiveFilters::new());
        assert_eq!(ids(&result), vec!["cpu-amd", "mb-z790"]);
    }

    #[test]
    fn test_query_matches_spec_values_and_category_label() {
        let products = catalog();
        let by_spec = filter_products(&products, "155MM", CategoryFilter::All, &ActiveFilters::new());
        assert_eq!(ids(&by_spec), vec!["cool-1"]);

        let by_label = filter_products(&products, "air cooler", CategoryFilter::All, &ActiveFilters::new());
        assert_eq!(ids(&by_label), vec!["cool-1"]);
    }

    #[test]
    fn test_category_filter() {
        let products = catalog();
        let result = filter_products(
            &products,
            "",
            CategoryFilter::Only(Category::Motherboard),
            &ActiveFilters::new(),
        );
        assert_eq!(ids(&result), vec!["mb-z790", "mb-b650", "mb-b760d4"]);
    }

    #[test]
    fn test_multi_value_spec_matches_filter() {
        let products = catalog();
        let result = filter_products(
            &products,
            "",
            CategoryFilter::All,
            &filters(&[(keys::SOCKET, &["AM5"])]),
        );
        assert_eq!(ids(&result), vec!["cpu-amd", "mb-b650", "cool-1"]);
    }

    #[test]
    fn test_missing_spec_key_never_matches_filter() {
        let products = catalog();
        let result = filter_products(
            &products,
            "",
            CategoryFilter::Only(Category::Software),
            &filters(&[(keys::SOCKET, &["AM5", "LGA1700"])]),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_value_set_is_unconstrained() {
        let products = catalog();
        let result = filter_products(&products, "", CategoryFilter::All, &filters(&[(keys::SOCKET, &[])]));
        assert_eq!(result.len(), products.len());
    }

    #[test]
    fn test_additional_filter_never_grows_result() {
        let products = catalog();
        let base = filters(&[(keys::SOCKET, &["LGA1700", "AM5"])]);
        let narrowed = filters(&[
            (keys::SOCKET, &["LGA1700", "AM5"]),
            (keys::MEMORY_TYPE, &["DDR5"]),
        ]);

        let before = filter_products(&products, "", CategoryFilter::All, &base).len();
        let after = filter_products(&products, "", CategoryFilter::All, &narrowed).len();
        assert!(after <= before);
        assert_eq!(after, 2);
    }

    #[test]
    fn test_smart_options_ignore_own_selection() {
        let products = catalog();
        let category = CategoryFilter::Only(Category::Motherboard);

        let unselected = smart_options(&products, category, keys::SOCKET, "", &ActiveFilters::new());
        let selected = smart_options(
            &products,
            category,
            keys::SOCKET,
            "",
            &filters(&[(keys::SOCKET, &["AM5"])]),
        );
        assert_eq!(unselected, vec!["AM5", "LGA1700"]);
        assert_eq!(selected, unselected);
    }

    #[test]
    fn test_smart_options_cascade_from_other_keys() {
        let products = catalog();
        let category = CategoryFilter::Only(Category::Motherboard);

        let sockets = smart_options(
            &products,
            category,
            keys::SOCKET,
            "",
            &filters(&[(keys::MEMORY_TYPE, &["DDR4"])]),
        );
        assert_eq!(sockets, vec!["LGA1700"]);

        let memory = smart_options(
            &products,
            category,
            keys::MEMORY_TYPE,
            "",
            &filters(&[(keys::SOCKET, &["AM5"])]),
        );
        assert_eq!(memory, vec!["DDR5"]);
    }

    #[test]
    fn test_smart_options_split_multi_values() {
        let products = catalog();
        let options = smart_options(
            &products,
            CategoryFilter::Only(Category::AirCooler),
            keys::SOCKET,
            "",
            &ActiveFilters::new(),
        );
        assert_eq!(options, vec!["AM5", "LGA1700"]);
    }

    #[test]
    fn test_sort_orders() {
        let products = catalog();
        let mut result = filter_products(&products, "", CategoryFilter::Only(Category::Cpu), &ActiveFilters::new());

        sort_products(&mut result, SortOrder::PriceDesc);
        assert_eq!(ids(&result), vec!["cpu-amd", "cpu-intel"]);

        sort_products(&mut result, SortOrder::PriceAsc);
        assert_eq!(ids(&result), vec!["cpu-intel", "cpu-amd"]);

        sort_products(&mut result, SortOrder::Name);
        assert_eq!(ids(&result), vec!["cpu-intel", "cpu-amd"]);
    }

    #[test]
    fn test_parse_filter_args() {
        let parsed = parse_filter_args(["socket=AM5", "socket=LGA1700", "memoryType=DDR5, DDR4"]).unwrap();
        assert_eq!(parsed["socket"].len(), 2);
        assert!(parsed["memoryType"].contains("DDR4"));
        assert!(parse_filter_args(["nokey"]).is_err());
        assert!(parse_filter_args(["=AM5"]).is_err());
    }
}
