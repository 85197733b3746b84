pub mod format;
pub mod sections;
pub mod text;

pub use format::format_key;
pub use sections::{report_sections, ReportRow, ReportSection};
pub use text::{render_ansi, render_plain};
