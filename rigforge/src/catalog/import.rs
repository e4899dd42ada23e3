//! Bulk import of loosely-typed product records.
//!
//! Each record is validated on its own; a bad record is reported with a
//! reason and the rest of the batch carries on. When an id repeats, the
//! first record keeps it and later ones are rejected.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::catalog::product::{Category, Product, SpecMap};

/// Why a single record was rejected.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordError {
    /// Position of the record in the input array
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub products: Vec<Product>,
    pub errors: Vec<RecordError>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a JSON array of records into products.
///
/// A non-array input yields a single error at index 0.
pub fn import_records(input: &Value) -> ImportReport {
    let mut report = ImportReport::default();

    let records = match input.as_array() {
        Some(records) => records,
        None => {
            report.errors.push(RecordError {
                index: 0,
                id: None,
                reason: "expected an array of product records".to_string(),
            });
            return report;
        }
    };

    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let parsed = parse_record(record).and_then(|product| {
            if seen.insert(product.id.clone()) {
                Ok(product)
            } else {
                Err(format!("duplicate id '{}'", product.id))
            }
        });
        match parsed {
            Ok(product) => report.products.push(product),
            Err(reason) => {
                let id = record.get("id").and_then(Value::as_str).map(str::to_string);
                tracing::warn!("Rejected import record {} ({:?}): {}", index, id, reason);
                report.errors.push(RecordError { index, id, reason });
            }
        }
    }

    tracing::info!(
        "Imported {} products, {} rejected",
        report.products.len(),
        report.errors.len()
    );
    report
}

fn parse_record(record: &Value) -> Result<Product, String> {
    let obj = record
        .as_object()
        .ok_or_else(|| "record is not an object".to_string())?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| "missing name".to_string())?;

    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing category".to_string())?
        .parse::<Category>()
        .map_err(|e| e.to_string())?;

    let price = parse_price(obj.get("price").ok_or_else(|| "missing price".to_string())?)?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut spec_details = SpecMap::new();
    if let Some(specs) = obj.get("specDetails").and_then(Value::as_object) {
        for (key, value) in specs {
            match value {
                Value::String(s) => spec_details.insert(key.clone(), s.clone()),
                Value::Number(n) => spec_details.insert(key.clone(), n.to_string()),
                Value::Bool(b) => spec_details.insert(key.clone(), b.to_string()),
                Value::Null => {}
                _ => return Err(format!("spec '{}' must be a scalar value", key)),
            }
        }
    }

    Ok(Product {
        id,
        name: name.to_string(),
        price,
        category,
        description: obj
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        image_url: obj
            .get("imageUrl")
            .and_then(Value::as_str)
            .filter(|u| !u.trim().is_empty())
            .map(str::to_string),
        spec_details,
        last_updated: None,
    })
}

fn parse_price(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => {
            if let Some(p) = n.as_u64() {
                Ok(p)
            } else if n.as_i64().is_some() {
                Err(format!("negative price: {}", n))
            } else {
                Err(format!("price must be a whole number: {}", n))
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("unparseable price: '{}'", s)),
        _ => Err("price must be a number".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_and_invalid_records_in_one_batch() {
        let input = json!([
            { "id": "cpu-1", "name": "Core i5", "category": "CPU", "price": 220,
              "specDetails": { "socket": "LGA1700", "cores": 10 } },
            { "id": "bad-1", "category": "CPU", "price": 100 },
            { "id": "bad-2", "name": "Mystery", "category": "Toaster", "price": 10 },
            { "name": "Case X", "category": "case", "price": "89" },
            { "id": "bad-3", "name": "Cheap", "category": "SSD", "price": "abc" },
            { "id": "bad-4", "name": "Refund", "category": "SSD", "price": -5 }
        ]);

        let report = import_records(&input);

        assert_eq!(report.products.len(), 2);
        assert_eq!(report.products[0].spec_details.get("cores"), Some("10"));
        assert_eq!(report.products[1].price, 89);
        assert!(!report.products[1].id.is_empty());

        let indexes: Vec<_> = report.errors.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![1, 2, 4, 5]);
        assert!(report.errors[0].reason.contains("name"));
        assert!(report.errors[1].reason.contains("category"));
        assert!(report.errors[2].reason.contains("unparseable"));
        assert!(report.errors[3].reason.contains("negative"));
        assert_eq!(report.errors[3].id.as_deref(), Some("bad-4"));
    }

    #[test]
    fn test_repeated_id_keeps_first_record() {
        let input = json!([
            { "id": "a", "name": "First", "category": "CPU", "price": 100 },
            { "id": "b", "name": "Other", "category": "GPU", "price": 200 },
            { "id": "a", "name": "Second", "category": "CPU", "price": 120 }
        ]);

        let report = import_records(&input);

        let ids: Vec<_> = report.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(report.products[0].name, "First");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].index, 2);
        assert!(report.errors[0].reason.contains("duplicate id"));

        let mut store = crate::catalog::InMemoryCatalog::new();
        crate::catalog::CatalogStore::bulk_upsert(&mut store, report.products).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_non_array_input() {
        let report = import_records(&json!({ "name": "x" }));
        assert!(report.products.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_fractional_price_rejected() {
        let report = import_records(&json!([
            { "name": "Fan", "category": "Other", "price": 9.5 }
        ]));
        assert!(report.products.is_empty());
        assert!(report.errors[0].reason.contains("whole number"));
    }
}
