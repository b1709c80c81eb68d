//! Collects the physical memory descriptors registered in an image.

use tracing::debug;

use crate::error::Result;
use crate::image::Image;
use crate::record::{decode, MemoryRegion};

pub const DESCRIPTOR_PREFIX: &str = "__scattered_array_";
pub const DESCRIPTOR_SUFFIX: &str = "phys_mem_map";

/// Matches `^__scattered_array_.*phys_mem_map$`.
pub fn is_descriptor_symbol(name: &str) -> bool {
    name.len() >= DESCRIPTOR_PREFIX.len() + DESCRIPTOR_SUFFIX.len()
        && name.starts_with(DESCRIPTOR_PREFIX)
        && name.ends_with(DESCRIPTOR_SUFFIX)
}

/// Decodes every descriptor symbol, in symbol-table order.
pub fn memory_regions(image: &Image<'_>) -> Result<Vec<MemoryRegion>> {
    let regions = image
        .symbols()?
        .iter()
        .filter(|sym| is_descriptor_symbol(&sym.name))
        .map(|sym| decode(image, sym))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = regions.len(), "scanned memory descriptors");
    Ok(regions)
}
