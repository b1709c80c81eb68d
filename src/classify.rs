//! Mapping of descriptor types onto resource-descriptor memory regions.

use tracing::debug;

use crate::record::MemoryRegion;

/// `enum teecore_memtypes` values that end up in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MemType {
    TeeRamRx = 2,
    TeeRamRo = 3,
    TeeRamRw = 4,
    TaRam = 8,
    NsecShm = 9,
    RamSec = 13,
    IoSec = 15,
}

impl MemType {
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            2 => Self::TeeRamRx,
            3 => Self::TeeRamRo,
            4 => Self::TeeRamRw,
            8 => Self::TaRam,
            9 => Self::NsecShm,
            13 => Self::RamSec,
            15 => Self::IoSec,
            _ => return None,
        })
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TeeRamRx => "MEM_AREA_TEE_RAM_RX",
            Self::TeeRamRo => "MEM_AREA_TEE_RAM_RO",
            Self::TeeRamRw => "MEM_AREA_TEE_RAM_RW",
            Self::TaRam => "MEM_AREA_TA_RAM",
            Self::NsecShm => "MEM_AREA_NSEC_SHM",
            Self::RamSec => "MEM_AREA_RAM_SEC",
            Self::IoSec => "MEM_AREA_IO_SEC",
        }
    }
}

/// Region attributes understood by the partition loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MemAttr {
    Device = 0,
    NormalCode = 1,
    NormalData = 2,
    NormalBss = 3,
    NormalRodata = 4,
    NormalSpmSpSharedMem = 5,
    NormalClientSharedMem = 6,
    NormalMiscellaneous = 7,
}

impl MemAttr {
    pub fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Select {
    /// First region of the type with a non-zero size.
    First,
    /// Every region of the type, numbered in scan order.
    All,
}

struct Rule {
    name: &'static str,
    mem_type: MemType,
    attr: MemAttr,
    select: Select,
}

#[rustfmt::skip]
static RULES: &[Rule] = &[
    Rule { name: "TEE_RAM_RX", mem_type: MemType::TeeRamRx, attr: MemAttr::NormalCode, select: Select::First },
    Rule { name: "TEE_RAM_RO", mem_type: MemType::TeeRamRo, attr: MemAttr::NormalRodata, select: Select::First },
    Rule { name: "TEE_RAM_RW", mem_type: MemType::TeeRamRw, attr: MemAttr::NormalData, select: Select::First },
    Rule { name: "TA_RAM", mem_type: MemType::TaRam, attr: MemAttr::NormalData, select: Select::First },
    Rule { name: "RAM_SEC", mem_type: MemType::RamSec, attr: MemAttr::NormalData, select: Select::First },
    Rule { name: "IO_SEC", mem_type: MemType::IoSec, attr: MemAttr::Device, select: Select::All },
    Rule { name: "NSEC_SHM", mem_type: MemType::NsecShm, attr: MemAttr::NormalClientSharedMem, select: Select::First },
];

/// A `memory_regions` entry ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedBlock {
    /// Node name, e.g. `TEE_RAM_RX` or `IO_SEC1`.
    pub node: String,
    /// The `str` property: the rule name without any ordinal.
    pub label: &'static str,
    pub base: u64,
    pub size: u64,
    pub attr: MemAttr,
    pub imp_def_attr: u32,
}

impl ClassifiedBlock {
    fn new(rule: &Rule, node: String, region: &MemoryRegion) -> Self {
        Self {
            node,
            label: rule.name,
            base: region.base,
            size: region.size,
            attr: rule.attr,
            imp_def_attr: rule.mem_type.code(),
        }
    }
}

/// Picks the regions to emit, in output order. Regions of any other type are dropped.
pub fn classify(regions: &[MemoryRegion]) -> Vec<ClassifiedBlock> {
    let mut blocks = Vec::new();
    for rule in RULES {
        let code = rule.mem_type.code();
        let mut matching = regions.iter().filter(|r| r.type_code == code);
        match rule.select {
            Select::First => match matching.find(|r| r.size > 0) {
                Some(r) => blocks.push(ClassifiedBlock::new(rule, rule.name.to_string(), r)),
                None => debug!(block = rule.name, "no region, block omitted"),
            },
            Select::All => blocks.extend(
                matching
                    .enumerate()
                    .map(|(i, r)| ClassifiedBlock::new(rule, format!("{}{}", rule.name, i), r)),
            ),
        }
    }
    blocks
}
