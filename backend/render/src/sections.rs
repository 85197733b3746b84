//! Walks a parsed report into display sections.
//!
//! The walk is a straight projection: one section per report block, one
//! row per field or map key, in the order the model emitted them.

use serde_json::{Map, Value};

use scanlens_core::ScanReport;

use crate::format::{display_value, format_key};

/// A labeled row of the rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub label: String,
    pub value: String,
}

/// A titled section of the rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: String,
    pub rows: Vec<ReportRow>,
}

fn row(label: impl Into<String>, value: impl Into<String>) -> ReportRow {
    ReportRow {
        label: label.into(),
        value: value.into(),
    }
}

fn map_rows(record: &Map<String, Value>) -> Vec<ReportRow> {
    record
        .iter()
        .map(|(key, value)| row(format_key(key), display_value(value)))
        .collect()
}

/// Project a report into its four display sections.
pub fn report_sections(report: &ScanReport) -> Vec<ReportSection> {
    let summary = &report.scan_summary;
    let target = &summary.target_information;

    let mut sections = vec![ReportSection {
        title: "Scan Summary".to_string(),
        rows: vec![
            row("Host", &target.host),
            row("IP Address", &target.ip_address),
            row("Nmap Version", &target.nmap_version),
            row("Scan Year", display_value(&target.scan_year)),
            row("Command Executed", &summary.command_executed),
            row("Better Command Suggestion", &summary.better_command_suggestion),
        ],
    }];

    sections.push(ReportSection {
        title: "Identified Ports".to_string(),
        rows: report
            .identified_ports
            .port_details
            .iter()
            .map(|detail| {
                row(
                    format!("Port {} ({})", detail.port, detail.protocol),
                    format!("{} - {}", detail.service, detail.usage),
                )
            })
            .collect(),
    });

    let mut analysis_rows = Vec::new();
    for (_, record) in report.security_analysis.sub_records() {
        analysis_rows.extend(map_rows(record));
    }
    sections.push(ReportSection {
        title: "Security Analysis".to_string(),
        rows: analysis_rows,
    });

    sections.push(ReportSection {
        title: "Recommendations".to_string(),
        rows: map_rows(&report.recommendations),
    });

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ScanReport {
        serde_json::from_value(serde_json::json!({
            "scanSummary": {
                "targetInformation": {
                    "host": "localhost",
                    "ipAddress": "127.0.0.1",
                    "nmapVersion": "4.20",
                    "scanYear": 2007
                },
                "commandExecuted": "nmap localhost",
                "betterCommandSuggestion": "nmap -sV localhost"
            },
            "identifiedPorts": {
                "portDetails": [
                    {"port": 22, "protocol": "tcp", "service": "SSH", "usage": "secure logins"}
                ]
            },
            "securityAnalysis": {
                "assessment": {
                    "serviceIntentionality": "Check each service.",
                    "configurationReview": "Review configs."
                },
                "servicePatching": {"outdatedServices": "Patch."},
                "accessControl": {"firewallRules": "Restrict."},
                "systemMonitoring": {"scanSchedule": "Scan weekly."},
                "additionalScans": {"serviceVersionDetection": "Run -sV."}
            },
            "recommendations": {"updateNmap": "Upgrade."}
        }))
        .unwrap()
    }

    #[test]
    fn one_row_per_key_in_every_map_record() {
        let report = sample_report();
        let sections = report_sections(&report);

        let analysis = sections
            .iter()
            .find(|s| s.title == "Security Analysis")
            .unwrap();
        let expected: usize = report
            .security_analysis
            .sub_records()
            .iter()
            .map(|(_, record)| record.len())
            .sum();
        assert_eq!(analysis.rows.len(), expected);

        let recommendations = sections
            .iter()
            .find(|s| s.title == "Recommendations")
            .unwrap();
        assert_eq!(recommendations.rows.len(), report.recommendations.len());
    }

    #[test]
    fn keys_are_title_cased() {
        let sections = report_sections(&sample_report());
        let analysis = sections
            .iter()
            .find(|s| s.title == "Security Analysis")
            .unwrap();
        assert!(analysis
            .rows
            .iter()
            .any(|r| r.label == "Service Intentionality"));
        assert!(analysis
            .rows
            .iter()
            .any(|r| r.label == "Configuration Review"));
    }

    #[test]
    fn port_rows_carry_protocol_and_service() {
        let sections = report_sections(&sample_report());
        let ports = sections
            .iter()
            .find(|s| s.title == "Identified Ports")
            .unwrap();
        assert_eq!(ports.rows[0].label, "Port 22 (tcp)");
        assert_eq!(ports.rows[0].value, "SSH - secure logins");
    }

    #[test]
    fn empty_report_still_yields_all_sections() {
        let sections = report_sections(&ScanReport::default());
        assert_eq!(sections.len(), 4);
        let summary = &sections[0];
        // Blank fields render as blank rows, not missing rows.
        assert_eq!(summary.rows.len(), 6);
        assert!(summary.rows.iter().all(|r| r.value.is_empty()));
    }
}
