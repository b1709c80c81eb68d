use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use sp_rd_gen::report::RegionTable;
use sp_rd_gen::{build_document, scan, Image};
use tracing::info;

mod logging;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// The input tee.elf
    #[arg(long = "tee-elf", alias = "tee_elf")]
    tee_elf: PathBuf,

    /// The output tee_rd.dts (stdout if omitted)
    #[arg(long)]
    out: Option<PathBuf>,

    /// List scanned memory descriptors on stderr
    #[arg(short, long)]
    list: bool,

    /// Demangle symbols in the listing
    #[arg(short, long)]
    demangle: bool,

    /// Disable colors in the listing
    #[arg(long)]
    no_color: bool,

    /// More logging (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    let content = std::fs::read(&args.tee_elf)
        .with_context(|| format!("failed to read {}", args.tee_elf.display()))?;
    let image = Image::parse(&content)
        .with_context(|| format!("failed to load {}", args.tee_elf.display()))?;

    let regions = scan::memory_regions(&image)?;
    if args.list {
        RegionTable::new(!args.no_color, args.demangle)
            .write(&mut io::stderr().lock(), &regions)
            .context("failed to write region listing")?;
    }

    let doc = build_document(&image, &regions)?;
    let text = doc.render();
    info!(
        descriptors = regions.len(),
        regions = doc.regions.len(),
        load_address = doc.load_address,
        entrypoint = doc.entrypoint,
        "generated resource descriptor"
    );

    match &args.out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("failed to write descriptor")?,
    }
    Ok(())
}
