//! Power draw, PSU sizing and price totals.
//!
//! Per-category wattages are estimates, not measurements, so they live in
//! [`PowerProfile`] and can be overridden from the engine config.

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::catalog::Category;
use crate::measure::parse_wattage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerProfile {
    pub ram_watts: u32,
    /// Applied to RAM whose name carries a dual-kit marker
    pub dual_kit_multiplier: u32,
    pub dual_kit_markers: Vec<String>,
    pub motherboard_watts: u32,
    pub ssd_watts: u32,
    pub liquid_cooler_watts: u32,
    pub air_cooler_watts: u32,
    pub case_watts: u32,
    /// Added once when any CPU or GPU is present
    pub cpu_gpu_overhead_watts: u32,
    pub psu_headroom: f64,
    pub psu_step_watts: u32,
}

impl Default for PowerProfile {
    fn default() -> Self {
        Self {
            ram_watts: 15,
            dual_kit_multiplier: 2,
            dual_kit_markers: vec!["*2".to_string(), "x2".to_string()],
            motherboard_watts: 50,
            ssd_watts: 10,
            liquid_cooler_watts: 35,
            air_cooler_watts: 10,
            case_watts: 10,
            cpu_gpu_overhead_watts: 30,
            psu_headroom: 1.3,
            psu_step_watts: 50,
        }
    }
}

impl PowerProfile {
    fn is_dual_kit(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.dual_kit_markers
            .iter()
            .any(|marker| name.contains(&marker.to_lowercase()))
    }

    /// Estimated draw of a single unit of `item`.
    pub fn unit_draw(&self, item: &CartItem) -> u32 {
        let specs = &item.product.spec_details;
        match item.category() {
            Category::Cpu | Category::Gpu => parse_wattage(specs.tdp()),
            Category::Ram => {
                if self.is_dual_kit(&item.product.name) {
                    self.ram_watts * self.dual_kit_multiplier
                } else {
                    self.ram_watts
                }
            }
            Category::Motherboard => self.motherboard_watts,
            Category::Ssd => self.ssd_watts,
            Category::LiquidCooler => self.liquid_cooler_watts,
            Category::AirCooler => self.air_cooler_watts,
            Category::Case => self.case_watts,
            Category::Psu | Category::Monitor | Category::Software | Category::Other => 0,
        }
    }

    /// Total estimated draw of the build in watts.
    pub fn total_draw(&self, items: &[CartItem]) -> u64 {
        let components = items
            .iter()
            .map(|item| u64::from(self.unit_draw(item)) * u64::from(item.quantity))
            .fold(0u64, u64::saturating_add);
        let has_processor = items
            .iter()
            .any(|i| matches!(i.category(), Category::Cpu | Category::Gpu));
        if has_processor {
            components.saturating_add(u64::from(self.cpu_gpu_overhead_watts))
        } else {
            components
        }
    }

    /// Draw plus headroom, rounded up to the next PSU step. Zero draw needs no PSU.
    pub fn recommended_psu(&self, total_draw: u64) -> u64 {
        if total_draw == 0 {
            return 0;
        }
        let step = u64::from(self.psu_step_watts.max(1));
        let steps = (total_draw as f64 * self.psu_headroom / step as f64).ceil() as u64;
        steps.saturating_mul(step)
    }
}

/// Sum of price × quantity over the build, saturating at `u64::MAX`.
pub fn total_price(items: &[CartItem]) -> u64 {
    items
        .iter()
        .map(CartItem::line_total)
        .fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{keys, Product};

    fn item(id: &str, name: &str, category: Category, quantity: u32) -> CartItem {
        CartItem::new(Product::new(id, name, category, 100), quantity)
    }

    #[test]
    fn test_reference_build() {
        let profile = PowerProfile::default();
        let items = vec![
            CartItem::new(Product::new("cpu", "CPU", Category::Cpu, 300).with_spec(keys::TDP, "125W"), 1),
            CartItem::new(Product::new("gpu", "GPU", Category::Gpu, 600).with_spec(keys::TDP, "200 W"), 1),
            item("case", "Case", Category::Case, 1),
        ];
        let draw = profile.total_draw(&items);
        assert_eq!(draw, 365);
        assert_eq!(profile.recommended_psu(draw), 500);
    }

    #[test]
    fn test_empty_build() {
        let profile = PowerProfile::default();
        assert_eq!(profile.total_draw(&[]), 0);
        assert_eq!(profile.recommended_psu(0), 0);
        assert_eq!(total_price(&[]), 0);
    }

    #[test]
    fn test_no_overhead_without_cpu_or_gpu() {
        let profile = PowerProfile::default();
        let items = vec![
            item("mb", "Board", Category::Motherboard, 1),
            item("ssd", "NVMe", Category::Ssd, 2),
            item("aio", "AIO 360", Category::LiquidCooler, 1),
            item("air", "Tower", Category::AirCooler, 1),
            item("psu", "850W", Category::Psu, 1),
            item("mon", "27in", Category::Monitor, 2),
        ];
        assert_eq!(profile.total_draw(&items), 50 + 20 + 35 + 10);
    }

    #[test]
    fn test_dual_kit_ram() {
        let profile = PowerProfile::default();
        let items = vec![
            item("r1", "Vengeance 16GB X2", Category::Ram, 1),
            item("r2", "Fury 8GB*2", Category::Ram, 2),
            item("r3", "Single 32GB", Category::Ram, 1),
        ];
        assert_eq!(profile.total_draw(&items), 30 + 60 + 15);
    }

    #[test]
    fn test_tdp_without_number_counts_zero() {
        let profile = PowerProfile::default();
        let items = vec![CartItem::new(
            Product::new("cpu", "CPU", Category::Cpu, 1).with_spec(keys::TDP, "unknown"),
            2,
        )];
        assert_eq!(profile.total_draw(&items), 30);
    }

    #[test]
    fn test_psu_rounding() {
        let profile = PowerProfile::default();
        assert_eq!(profile.recommended_psu(1), 50);
        assert_eq!(profile.recommended_psu(100), 150);
        assert_eq!(profile.recommended_psu(500), 650);
    }

    #[test]
    fn test_total_price_uses_quantity() {
        let items = vec![
            CartItem::new(Product::new("a", "A", Category::Ram, 80), 2),
            CartItem::new(Product::new("b", "B", Category::Ssd, 120), 1),
        ];
        assert_eq!(total_price(&items), 280);
    }

    #[test]
    fn test_profile_from_partial_json() {
        let profile: PowerProfile = serde_json::from_str(r#"{ "ram_watts": 5 }"#).unwrap();
        assert_eq!(profile.ram_watts, 5);
        assert_eq!(profile.psu_step_watts, 50);
    }

    #[test]
    fn test_total_price_saturates() {
        let items = vec![
            CartItem::new(Product::new("a", "A", Category::Gpu, u64::MAX - 10), 1),
            CartItem::new(Product::new("b", "B", Category::Gpu, u64::MAX / 2 + 1), 2),
        ];
        assert_eq!(total_price(&items), u64::MAX);
    }
}
