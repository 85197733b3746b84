//! Text renderers for report sections: plain and ANSI terminal output.

use scanlens_core::ScanReport;

use crate::sections::{report_sections, ReportSection};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";

/// Render a report as plain text.
pub fn render_plain(report: &ScanReport) -> String {
    render_sections(&report_sections(report), false)
}

/// Render a report with ANSI styling for terminals.
pub fn render_ansi(report: &ScanReport) -> String {
    render_sections(&report_sections(report), true)
}

fn render_sections(sections: &[ReportSection], ansi: bool) -> String {
    let mut out = String::new();
    for section in sections {
        if !out.is_empty() {
            out.push('\n');
        }
        if ansi {
            out.push_str(&format!("{BOLD}{CYAN}{}{RESET}\n", section.title));
        } else {
            out.push_str(&format!("### {}\n", section.title));
        }

        if section.rows.is_empty() {
            out.push_str("  (none)\n");
            continue;
        }
        for row in &section.rows {
            if ansi {
                out.push_str(&format!(
                    "  {DIM}{}{RESET}  {}\n",
                    row.label, row.value
                ));
            } else {
                out.push_str(&format!("  {}: {}\n", row.label, row.value));
            }
        }
    }
    out
}
