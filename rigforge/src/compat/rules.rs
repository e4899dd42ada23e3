//! Pairwise compatibility rules.
//!
//! Each rule looks at one cart item against the current build and returns a
//! message when it finds a conflict. Cross-category checks only consult the
//! primary (first) item of the other category.

use crate::build::BuildState;
use crate::cart::CartItem;
use crate::catalog::Category;
use crate::measure::{exceeds, parse_dimension};

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String>;
}

fn socket(item: &CartItem) -> Option<&str> {
    item.product.spec_details.socket()
}

fn memory_type(item: &CartItem) -> Option<&str> {
    item.product.spec_details.memory_type()
}

pub struct SocketRule;

impl Rule for SocketRule {
    fn id(&self) -> &str {
        "cpu_socket"
    }

    fn name(&self) -> &str {
        "CPU/motherboard socket"
    }

    fn description(&self) -> &str {
        "CPU and motherboard must share the same socket"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        match item.category() {
            Category::Motherboard => {
                let cpu = build.primary(Category::Cpu)?;
                let (board, chip) = (socket(item)?, socket(cpu)?);
                (board != chip).then(|| {
                    format!(
                        "Socket mismatch: motherboard is {} but CPU {} is {}",
                        board, cpu.product.name, chip
                    )
                })
            }
            Category::Cpu => {
                let mb = build.primary(Category::Motherboard)?;
                let (chip, board) = (socket(item)?, socket(mb)?);
                (chip != board).then(|| {
                    format!(
                        "Socket mismatch: CPU is {} but motherboard {} is {}",
                        chip, mb.product.name, board
                    )
                })
            }
            _ => None,
        }
    }
}

pub struct BoardMemoryRule;

impl Rule for BoardMemoryRule {
    fn id(&self) -> &str {
        "board_memory_type"
    }

    fn name(&self) -> &str {
        "Motherboard memory type"
    }

    fn description(&self) -> &str {
        "Installed RAM must match the memory type the motherboard supports"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        if item.category() != Category::Motherboard {
            return None;
        }
        let supported = memory_type(item)?;
        let ram = build.primary(Category::Ram)?;
        let installed = memory_type(ram)?;
        (installed != supported).then(|| {
            format!(
                "Memory type mismatch: board supports {} but {} is {}",
                supported, ram.product.name, installed
            )
        })
    }
}

pub struct RamBoardMemoryRule;

impl Rule for RamBoardMemoryRule {
    fn id(&self) -> &str {
        "ram_memory_type"
    }

    fn name(&self) -> &str {
        "RAM memory type"
    }

    fn description(&self) -> &str {
        "RAM modules must be of the type the motherboard supports"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        if item.category() != Category::Ram {
            return None;
        }
        let mb = build.primary(Category::Motherboard)?;
        let supported = memory_type(mb)?;
        let installed = memory_type(item)?;
        (installed != supported).then(|| {
            format!(
                "Memory type mismatch: {} module on motherboard {} which supports {}",
                installed, mb.product.name, supported
            )
        })
    }
}

pub struct MixedRamRule;

impl Rule for MixedRamRule {
    fn id(&self) -> &str {
        "mixed_ram"
    }

    fn name(&self) -> &str {
        "Mixed RAM types"
    }

    fn description(&self) -> &str {
        "All RAM kits in a build should be of the same type"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        if item.category() != Category::Ram {
            return None;
        }
        let own = memory_type(item)?;
        build
            .items(Category::Ram)
            .iter()
            .filter(|other| other.id() != item.id())
            .find_map(|other| {
                let theirs = memory_type(other)?;
                (theirs != own).then(|| {
                    format!(
                        "Mixed RAM types: this kit is {} but {} is {}",
                        own, other.product.name, theirs
                    )
                })
            })
    }
}

pub struct GpuLengthRule;

impl Rule for GpuLengthRule {
    fn id(&self) -> &str {
        "gpu_length"
    }

    fn name(&self) -> &str {
        "GPU length"
    }

    fn description(&self) -> &str {
        "Graphics card must fit the case's maximum GPU length"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        if item.category() != Category::Gpu {
            return None;
        }
        let case = build.primary(Category::Case)?;
        let length = parse_dimension(item.product.spec_details.length());
        let limit = parse_dimension(case.product.spec_details.max_gpu_length());
        exceeds(length, limit).then(|| {
            format!(
                "GPU too long for case: {}mm exceeds {} limit of {}mm",
                length.unwrap_or_default(),
                case.product.name,
                limit.unwrap_or_default()
            )
        })
    }
}

pub struct CaseGpuClearanceRule;

impl Rule for CaseGpuClearanceRule {
    fn id(&self) -> &str {
        "case_gpu_clearance"
    }

    fn name(&self) -> &str {
        "Case GPU clearance"
    }

    fn description(&self) -> &str {
        "Case must have room for the selected graphics card"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        if item.category() != Category::Case {
            return None;
        }
        let gpu = build.primary(Category::Gpu)?;
        let limit = parse_dimension(item.product.spec_details.max_gpu_length());
        let length = parse_dimension(gpu.product.spec_details.length());
        exceeds(length, limit).then(|| {
            format!(
                "Case too small for GPU: fits {}mm but {} is {}mm",
                limit.unwrap_or_default(),
                gpu.product.name,
                length.unwrap_or_default()
            )
        })
    }
}

pub struct CoolerHeightRule;

impl Rule for CoolerHeightRule {
    fn id(&self) -> &str {
        "cooler_height"
    }

    fn name(&self) -> &str {
        "Air cooler height"
    }

    fn description(&self) -> &str {
        "Air cooler must fit under the case's maximum cooler height"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        if item.category() != Category::AirCooler {
            return None;
        }
        let case = build.primary(Category::Case)?;
        let height = parse_dimension(item.product.spec_details.height());
        let limit = parse_dimension(case.product.spec_details.max_cooler_height());
        exceeds(height, limit).then(|| {
            format!(
                "Cooler too tall for case: {}mm exceeds {} limit of {}mm",
                height.unwrap_or_default(),
                case.product.name,
                limit.unwrap_or_default()
            )
        })
    }
}

pub struct CaseCoolerClearanceRule;

impl Rule for CaseCoolerClearanceRule {
    fn id(&self) -> &str {
        "case_cooler_clearance"
    }

    fn name(&self) -> &str {
        "Case cooler clearance"
    }

    fn description(&self) -> &str {
        "Case must be wide enough for the selected air cooler"
    }

    fn check(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        if item.category() != Category::Case {
            return None;
        }
        let cooler = build.primary(Category::AirCooler)?;
        let limit = parse_dimension(item.product.spec_details.max_cooler_height());
        let height = parse_dimension(cooler.product.spec_details.height());
        exceeds(height, limit).then(|| {
            format!(
                "Case too narrow for cooler: allows {}mm but {} is {}mm",
                limit.unwrap_or_default(),
                cooler.product.name,
                height.unwrap_or_default()
            )
        })
    }
}
