//! Decoding of `struct core_mmu_phys_mem` records.
//!
//! The only layout understood is the 64-bit little-endian one:
//!
//! ```text
//! 0x00  u64  address of the NUL-terminated region name
//! 0x08  u32  region type
//! 0x0c  u32  padding
//! 0x10  u64  physical base
//! 0x18  u64  size in bytes
//! ```

use tracing::trace;

use crate::error::{Error, Result};
use crate::image::{Image, Symbol};
use crate::resolve::{bytes_at, read_cstr};

pub const RECORD_SIZE: usize = 32;

/// One physical memory descriptor as found in the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    pub symbol_name: String,
    /// `None` when the name pointer does not land in program data.
    pub descriptive_name: Option<String>,
    pub type_code: u32,
    pub base: u64,
    pub size: u64,
}

fn field<const N: usize>(rec: &[u8], at: usize) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(&rec[at..at + N]);
    out
}

/// Decodes the record a descriptor symbol points at.
pub fn decode(image: &Image<'_>, sym: &Symbol) -> Result<MemoryRegion> {
    if sym.size != RECORD_SIZE as u64 {
        return Err(Error::UnsupportedRecordLayout {
            symbol: sym.name.clone(),
            size: sym.size,
        });
    }

    let data = bytes_at(image, sym.value).ok_or_else(|| Error::UnresolvedRecord {
        symbol: sym.name.clone(),
        address: sym.value,
    })?;
    let rec = data.get(..RECORD_SIZE).ok_or_else(|| Error::TruncatedRecord {
        symbol: sym.name.clone(),
        address: sym.value,
    })?;

    let name_va = u64::from_le_bytes(field(rec, 0x00));
    let region = MemoryRegion {
        symbol_name: sym.name.clone(),
        descriptive_name: read_cstr(image, name_va),
        type_code: u32::from_le_bytes(field(rec, 0x08)),
        base: u64::from_le_bytes(field(rec, 0x10)),
        size: u64::from_le_bytes(field(rec, 0x18)),
    };
    trace!(?region, "decoded descriptor");
    Ok(region)
}
