//! `--list` output: one colored row per scanned descriptor.

use std::io::{self, Write};

use ansi_term::{Color, Style};

use crate::classify::MemType;
use crate::record::MemoryRegion;

const BG_COLORS: [u8; 2] = [232, 236];
const FG_COLORS: [u8; 7] = [1, 2, 3, 4, 5, 6, 7];

pub struct RegionTable {
    color: bool,
    demangle: bool,
}

impl RegionTable {
    pub fn new(color: bool, demangle: bool) -> Self {
        Self { color, demangle }
    }

    pub fn write<W: Write>(&self, out: &mut W, regions: &[MemoryRegion]) -> io::Result<()> {
        let mut printer = ColorPrinter::new(out, self.color);
        for (i, r) in regions.iter().enumerate() {
            let row = Style::default().on(Color::Fixed(BG_COLORS[i % BG_COLORS.len()]));
            let mem_type = MemType::from_code(r.type_code);
            let fg = mem_type
                .map(|t| FG_COLORS[t.code() as usize % FG_COLORS.len()])
                .unwrap_or(8);

            printer.print(&format!("{:#018x}+{:#010x} ", r.base, r.size), row)?;
            printer.print(
                &format!(
                    "{:>2} {:<20}",
                    r.type_code,
                    mem_type.map(MemType::name).unwrap_or("-")
                ),
                row.fg(Color::Fixed(fg)).bold(),
            )?;
            printer.print(
                &format!(" {:<16} ", r.descriptive_name.as_deref().unwrap_or("")),
                row,
            )?;
            printer.print(&self.symbol_name(&r.symbol_name), row.dimmed())?;
            printer.newline()?;
        }
        Ok(())
    }

    fn symbol_name(&self, name: &str) -> String {
        if self.demangle {
            rustc_demangle::demangle(name).to_string()
        } else {
            name.to_string()
        }
    }
}

struct ColorPrinter<'w, W> {
    out: &'w mut W,
    enabled: bool,
    last_style: Style,
}

impl<'w, W: Write> ColorPrinter<'w, W> {
    fn new(out: &'w mut W, enabled: bool) -> Self {
        Self {
            out,
            enabled,
            last_style: Style::default(),
        }
    }

    fn set_style(&mut self, style: Style) -> io::Result<()> {
        if self.enabled && self.last_style != style {
            write!(self.out, "{}", self.last_style.infix(style))?;
            self.last_style = style;
        }
        Ok(())
    }

    fn print(&mut self, s: &str, style: Style) -> io::Result<()> {
        self.set_style(style)?;
        self.out.write_all(s.as_bytes())
    }

    fn newline(&mut self) -> io::Result<()> {
        self.set_style(Style::default())?;
        writeln!(self.out)
    }
}
