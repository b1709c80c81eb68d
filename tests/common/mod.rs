//! Minimal little-endian ELF64 writer for end-to-end tests.
#![allow(dead_code)]

pub const DATA_ADDR: u64 = 0x0e10_0000;
pub const ENTRY: u64 = 0x0e10_0040;
/// Not covered by any section of a built image.
pub const DANGLING: u64 = 0xdead_0000;

const EHDR_SIZE: usize = 64;
const PHDR_SIZE: usize = 56;
const SHDR_SIZE: usize = 64;
const SYM_SIZE: usize = 24;

const SHT_PROGBITS: u32 = 1;
const SHT_SYMTAB: u32 = 2;
const SHT_STRTAB: u32 = 3;
const PT_LOAD: u32 = 1;
const PT_NOTE: u32 = 4;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Symtab {
    Proper,
    Missing,
    WrongType,
}

enum Name {
    Text(String),
    At(u64),
}

struct Record {
    symbol: String,
    name: Name,
    type_code: u32,
    base: u64,
    size: u64,
}

pub struct ElfBuilder {
    records: Vec<Record>,
    /// Extra symbols pointing at the start of the data section.
    raw_symbols: Vec<(String, u64)>,
    segments: Vec<(u32, u64)>,
    entry: u64,
    symtab: Symtab,
}

impl ElfBuilder {
    pub fn new() -> Self {
        Self {
            records: vec![],
            raw_symbols: vec![],
            segments: vec![(PT_LOAD, DATA_ADDR)],
            entry: ENTRY,
            symtab: Symtab::Proper,
        }
    }

    pub fn region(mut self, symbol: &str, name: &str, type_code: u32, base: u64, size: u64) -> Self {
        self.records.push(Record {
            symbol: symbol.to_string(),
            name: Name::Text(name.to_string()),
            type_code,
            base,
            size,
        });
        self
    }

    pub fn region_named_at(mut self, symbol: &str, name_va: u64, type_code: u32, base: u64, size: u64) -> Self {
        self.records.push(Record {
            symbol: symbol.to_string(),
            name: Name::At(name_va),
            type_code,
            base,
            size,
        });
        self
    }

    pub fn raw_symbol(mut self, name: &str, size: u64) -> Self {
        self.raw_symbols.push((name.to_string(), size));
        self
    }

    pub fn segments(mut self, segments: &[(u32, u64)]) -> Self {
        self.segments = segments.to_vec();
        self
    }

    pub fn no_load_segment(self) -> Self {
        self.segments(&[(PT_NOTE, 0)])
    }

    pub fn entry(mut self, entry: u64) -> Self {
        self.entry = entry;
        self
    }

    pub fn symtab(mut self, symtab: Symtab) -> Self {
        self.symtab = symtab;
        self
    }

    fn data(&self) -> Vec<u8> {
        let mut strings = Vec::new();
        let strings_va = DATA_ADDR + (self.records.len() * 32) as u64;
        let mut data = Vec::new();
        for rec in &self.records {
            let name_va = match &rec.name {
                Name::Text(text) => {
                    let va = strings_va + strings.len() as u64;
                    strings.extend_from_slice(text.as_bytes());
                    strings.push(0);
                    va
                }
                Name::At(va) => *va,
            };
            data.extend_from_slice(&name_va.to_le_bytes());
            data.extend_from_slice(&rec.type_code.to_le_bytes());
            data.extend_from_slice(&0u32.to_le_bytes());
            data.extend_from_slice(&rec.base.to_le_bytes());
            data.extend_from_slice(&rec.size.to_le_bytes());
        }
        data.extend(strings);
        // Room for raw symbols of any declared size.
        data.resize(data.len().max(64), 0);
        data
    }

    fn symbols(&self) -> Vec<(String, u64, u64)> {
        let mut symbols = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.symbol.clone(), DATA_ADDR + (i * 32) as u64, 32))
            .collect::<Vec<_>>();
        symbols.extend(
            self.raw_symbols
                .iter()
                .map(|(name, size)| (name.clone(), DATA_ADDR, *size)),
        );
        symbols
    }

    pub fn build(&self) -> Vec<u8> {
        let data = self.data();

        let mut strtab = vec![0u8];
        let mut symtab = vec![0u8; SYM_SIZE];
        for (name, value, size) in self.symbols() {
            let st_name = strtab.len() as u32;
            strtab.extend_from_slice(name.as_bytes());
            strtab.push(0);
            symtab.extend_from_slice(&st_name.to_le_bytes());
            symtab.push(0x11); // STB_GLOBAL, STT_OBJECT
            symtab.push(0);
            symtab.extend_from_slice(&1u16.to_le_bytes());
            symtab.extend_from_slice(&value.to_le_bytes());
            symtab.extend_from_slice(&size.to_le_bytes());
        }

        let with_symtab = self.symtab != Symtab::Missing;
        let mut shstrtab = vec![0u8];
        let mut add_name = |name: &str| {
            let off = shstrtab.len() as u32;
            shstrtab.extend_from_slice(name.as_bytes());
            shstrtab.push(0);
            off
        };
        let data_name = add_name(".data");
        let symtab_name = add_name(".symtab");
        let strtab_name = add_name(".strtab");
        let shstrtab_name = add_name(".shstrtab");

        let phoff = EHDR_SIZE;
        let data_off = align8(phoff + self.segments.len() * PHDR_SIZE);
        let symtab_off = align8(data_off + data.len());
        let strtab_off = symtab_off + symtab.len();
        let shstrtab_off = strtab_off + strtab.len();
        let shoff = align8(shstrtab_off + shstrtab.len());

        // null, .data, [.symtab, .strtab,] .shstrtab
        let shnum: u16 = if with_symtab { 5 } else { 3 };
        let shstrndx = shnum - 1;

        let mut out = Vec::new();
        out.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
        out.extend_from_slice(&[0; 8]);
        put16(&mut out, 2); // ET_EXEC
        put16(&mut out, 0xb7); // EM_AARCH64
        put32(&mut out, 1);
        put64(&mut out, self.entry);
        put64(&mut out, phoff as u64);
        put64(&mut out, shoff as u64);
        put32(&mut out, 0);
        put16(&mut out, EHDR_SIZE as u16);
        put16(&mut out, PHDR_SIZE as u16);
        put16(&mut out, self.segments.len() as u16);
        put16(&mut out, SHDR_SIZE as u16);
        put16(&mut out, shnum);
        put16(&mut out, shstrndx);
        assert_eq!(out.len(), EHDR_SIZE);

        for (p_type, vaddr) in &self.segments {
            put32(&mut out, *p_type);
            put32(&mut out, 6); // PF_R | PF_W
            put64(&mut out, data_off as u64);
            put64(&mut out, *vaddr);
            put64(&mut out, *vaddr);
            put64(&mut out, data.len() as u64);
            put64(&mut out, data.len() as u64);
            put64(&mut out, 0x1000);
        }

        pad_to(&mut out, data_off);
        out.extend_from_slice(&data);
        pad_to(&mut out, symtab_off);
        out.extend_from_slice(&symtab);
        out.extend_from_slice(&strtab);
        out.extend_from_slice(&shstrtab);
        pad_to(&mut out, shoff);

        out.extend_from_slice(&[0; SHDR_SIZE]);
        shdr(&mut out, data_name, SHT_PROGBITS, 3, DATA_ADDR, data_off, data.len(), 0, 0, 8, 0);
        if with_symtab {
            let (sh_type, entsize) = match self.symtab {
                Symtab::WrongType => (SHT_PROGBITS, 0),
                _ => (SHT_SYMTAB, SYM_SIZE),
            };
            shdr(&mut out, symtab_name, sh_type, 0, 0, symtab_off, symtab.len(), 3, 1, 8, entsize);
            shdr(&mut out, strtab_name, SHT_STRTAB, 0, 0, strtab_off, strtab.len(), 0, 0, 1, 0);
        }
        shdr(&mut out, shstrtab_name, SHT_STRTAB, 0, 0, shstrtab_off, shstrtab.len(), 0, 0, 1, 0);
        out
    }
}

#[allow(clippy::too_many_arguments)]
fn shdr(
    out: &mut Vec<u8>,
    name: u32,
    sh_type: u32,
    flags: u64,
    addr: u64,
    offset: usize,
    size: usize,
    link: u32,
    info: u32,
    align: u64,
    entsize: usize,
) {
    put32(out, name);
    put32(out, sh_type);
    put64(out, flags);
    put64(out, addr);
    put64(out, offset as u64);
    put64(out, size as u64);
    put32(out, link);
    put32(out, info);
    put64(out, align);
    put64(out, entsize as u64);
}

fn align8(n: usize) -> usize {
    (n + 7) & !7
}

fn pad_to(out: &mut Vec<u8>, len: usize) {
    assert!(out.len() <= len);
    out.resize(len, 0);
}

fn put16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}
