mod entry;
mod formatter;
mod root;
mod size;

pub use entry::ScanEntry;
pub use formatter::{format_json, format_table, total_size, FormatOptions};
pub use root::scan_top_level;
pub use size::{format_size, measure, size_of, ScanWarning, SizeReport};
