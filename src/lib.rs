//! Generates the secure-partition resource descriptor (`tee_rd.dts`) for an
//! OP-TEE core image from the physical memory map compiled into it.

pub mod classify;
pub mod emit;
pub mod error;
pub mod image;
pub mod record;
pub mod report;
pub mod resolve;
pub mod scan;


pub use error::{Error, Result};
pub use image::Image;

use crate::classify::classify;
use crate::emit::Document;
use crate::record::MemoryRegion;

/// Assembles the descriptor from already scanned regions.
pub fn build_document(image: &Image<'_>, regions: &[MemoryRegion]) -> Result<Document> {
    Ok(Document {
        load_address: image.load_address()?,
        entrypoint: image.entry_point()?,
        regions: classify(regions),
    })
}

/// Scans `image` and renders the full descriptor text.
pub fn generate(image: &Image<'_>) -> Result<String> {
    let regions = scan::memory_regions(image)?;
    Ok(build_document(image, &regions)?.render())
}
