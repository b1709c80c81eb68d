//! Error types for the resource-descriptor generator.

use thiserror::Error;

/// Conditions that stop a conversion.
///
/// Everything the pipeline can degrade gracefully on (unresolved names, unknown
/// region types, empty classification rows) is not represented here; those are
/// plain data outcomes.
#[derive(Error, Debug)]
pub enum Error {
    /// The ELF reader rejected the input file.
    #[error("failed to parse ELF image: {0}")]
    Elf(#[from] elf::ParseError),

    /// No section named `.symtab`.
    #[error("Symbol table not found")]
    SymbolTableMissing,

    /// A `.symtab` section exists but is not of type `SHT_SYMTAB`.
    #[error(".symtab not a symbol table")]
    NotASymbolTable,

    /// A descriptor symbol whose size does not match the known record layout.
    #[error("Unknown struct core_mmu_phys_mem size {size} (symbol {symbol})")]
    UnsupportedRecordLayout { symbol: String, size: u64 },

    /// A descriptor symbol pointing outside every loadable-data section.
    #[error("descriptor {symbol} at {address:#x} is not in a loadable data section")]
    UnresolvedRecord { symbol: String, address: u64 },

    /// A descriptor record that runs past the end of its section.
    #[error("descriptor {symbol} at {address:#x} is truncated by the end of its section")]
    TruncatedRecord { symbol: String, address: u64 },

    #[error("Cannot find load address")]
    MissingLoadSegment,

    #[error("Cannot find entry point")]
    MissingEntryPoint,
}

pub type Result<T> = std::result::Result<T, Error>;
