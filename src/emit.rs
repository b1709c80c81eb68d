//! Device-tree source rendering of the resource descriptor.

use crate::classify::ClassifiedBlock;

pub const COMPATIBLE: &str = "arm,sp_rd";

/// Everything the descriptor needs that is not a constant.
#[derive(Debug, Clone)]
pub struct Document {
    pub load_address: u64,
    pub entrypoint: u64,
    pub regions: Vec<ClassifiedBlock>,
}

/// Tab-indented DTS text builder.
struct DtsWriter {
    out: String,
    depth: usize,
}

impl DtsWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, node: &str) {
        self.line(&format!("{node} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("};");
    }

    fn string(&mut self, prop: &str, value: &str) {
        self.line(&format!("{prop} = \"{value}\";"));
    }

    fn cell(&mut self, prop: &str, value: u64) {
        self.line(&format!("{prop} = <{value:#x}>;"));
    }

    /// Two-cell value; the high cell is always written as zero.
    fn cells2(&mut self, prop: &str, value: u64) {
        self.line(&format!("{prop} = <0x0 {value:#x}>;"));
    }
}

impl Document {
    pub fn render(&self) -> String {
        let mut w = DtsWriter::new();
        w.line("/dts-v1/;");
        w.blank();
        w.open("/");
        w.string("compatible", COMPATIBLE);
        w.blank();

        w.open("attribute");
        w.cell("version", 1);
        w.cell("sp_type", 1);
        w.cell("pe_mpidr", 0);
        w.cell("runtime_el", 1);
        w.cell("exec_type", 1);
        w.cell("panic_policy", 1);
        w.cell("xlat_granule", 0);
        w.cell("binary_size", 0);
        w.cells2("load_address", self.load_address);
        w.cells2("entrypoint", self.entrypoint);
        w.close();
        w.blank();

        w.open("memory_regions");
        for region in &self.regions {
            w.blank();
            w.open(&region.node);
            w.string("str", region.label);
            w.cells2("base", region.base);
            w.cells2("size", region.size);
            w.cell("attr", region.attr.code().into());
            w.cell("imp_def_attr", region.imp_def_attr.into());
            w.close();
        }
        w.close();
        w.blank();

        w.open("notifications");
        w.blank();
        w.open("notification_0");
        w.cell("attr", 0);
        w.cell("pe", 0);
        w.close();
        w.close();

        w.close();
        w.out
    }
}
