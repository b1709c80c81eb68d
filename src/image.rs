//! In-memory view of the object file the generator reads from.
//!
//! The pipeline only ever looks at section ranges and bytes, loadable segments,
//! the symbol table and the entry point, so that is all an [`Image`] keeps.

use elf::abi::{PT_LOAD, SHT_PROGBITS, SHT_SYMTAB};
use elf::endian::AnyEndian;
use elf::ElfBytes;

use crate::error::{Error, Result};

pub struct Section<'a> {
    pub name: String,
    pub sh_type: u32,
    pub addr: u64,
    pub size: u64,
    pub body: &'a [u8],
}

impl Section<'_> {
    /// Initialized program data, the only kind descriptors and their strings live in.
    pub fn is_progbits(&self) -> bool {
        self.sh_type == SHT_PROGBITS
    }

    pub fn contains(&self, va: u64) -> bool {
        va >= self.addr && va - self.addr < self.size
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub p_type: u32,
    pub vaddr: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub value: u64,
    pub size: u64,
}

pub enum SymbolTable {
    Missing,
    /// `.symtab` exists under some other section type.
    Malformed,
    Present(Vec<Symbol>),
}

pub struct Image<'a> {
    pub sections: Vec<Section<'a>>,
    pub segments: Vec<Segment>,
    pub symtab: SymbolTable,
    pub entry: u64,
}

impl<'a> Image<'a> {
    pub fn parse(content: &'a [u8]) -> Result<Self> {
        let elf = ElfBytes::<AnyEndian>::minimal_parse(content)?;

        let (shdrs, strtab) = elf.section_headers_with_strtab()?;
        let mut sections = Vec::new();
        if let (Some(shdrs), Some(strtab)) = (shdrs, strtab) {
            for s in shdrs.iter() {
                let name = strtab.get(s.sh_name as usize)?.to_string();
                let body = if s.sh_type == SHT_PROGBITS {
                    elf.section_data(&s)?.0
                } else {
                    &[]
                };
                sections.push(Section {
                    name,
                    sh_type: s.sh_type,
                    addr: s.sh_addr,
                    size: s.sh_size,
                    body,
                });
            }
        }

        let symtab = match sections.iter().find(|s| s.name == ".symtab") {
            None => SymbolTable::Missing,
            Some(s) if s.sh_type != SHT_SYMTAB => SymbolTable::Malformed,
            Some(_) => match elf.symbol_table()? {
                None => SymbolTable::Malformed,
                Some((symbols, strtab)) => {
                    let symbols = symbols
                        .iter()
                        .map(|s| -> Result<Symbol> {
                            Ok(Symbol {
                                name: strtab.get(s.st_name as usize)?.to_string(),
                                value: s.st_value,
                                size: s.st_size,
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    SymbolTable::Present(symbols)
                }
            },
        };

        let segments = elf
            .segments()
            .map(|phdrs| {
                phdrs
                    .iter()
                    .map(|p| Segment {
                        p_type: p.p_type,
                        vaddr: p.p_vaddr,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            sections,
            segments,
            symtab,
            entry: elf.ehdr.e_entry,
        })
    }

    pub fn symbols(&self) -> Result<&[Symbol]> {
        match &self.symtab {
            SymbolTable::Missing => Err(Error::SymbolTableMissing),
            SymbolTable::Malformed => Err(Error::NotASymbolTable),
            SymbolTable::Present(symbols) => Ok(symbols),
        }
    }

    /// Virtual address of the last `PT_LOAD` segment.
    pub fn load_address(&self) -> Result<u64> {
        self.segments
            .iter()
            .rev()
            .find(|seg| seg.p_type == PT_LOAD)
            .map(|seg| seg.vaddr)
            .ok_or(Error::MissingLoadSegment)
    }

    pub fn entry_point(&self) -> Result<u64> {
        match self.entry {
            0 => Err(Error::MissingEntryPoint),
            e => Ok(e),
        }
    }
}
