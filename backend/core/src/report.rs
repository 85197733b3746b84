//! Wire types for the structured scan report.
//!
//! The shape is fixed by the prompt sent to the report model; nothing here
//! validates it. Every field defaults, so a model that omits a section
//! produces blank values instead of a failed parse.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured analysis of one scan screenshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    #[serde(default)]
    pub scan_summary: ScanSummary,
    #[serde(default)]
    pub identified_ports: IdentifiedPorts,
    #[serde(default)]
    pub security_analysis: SecurityAnalysis,
    #[serde(default)]
    pub recommendations: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    #[serde(default)]
    pub target_information: TargetInformation,
    #[serde(default)]
    pub command_executed: String,
    #[serde(default)]
    pub better_command_suggestion: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInformation {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub nmap_version: String,
    /// Usually a bare year number, but models occasionally emit a string.
    #[serde(default)]
    pub scan_year: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiedPorts {
    #[serde(default)]
    pub port_details: Vec<PortDetail>,
}

/// One open port with the service the model identified on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDetail {
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub usage: String,
}

/// The five fixed sub-records of the security analysis. Keys inside each
/// record are free-form camelCase labels chosen by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAnalysis {
    #[serde(default)]
    pub assessment: Map<String, Value>,
    #[serde(default)]
    pub service_patching: Map<String, Value>,
    #[serde(default)]
    pub access_control: Map<String, Value>,
    #[serde(default)]
    pub system_monitoring: Map<String, Value>,
    #[serde(default)]
    pub additional_scans: Map<String, Value>,
}

impl SecurityAnalysis {
    /// The sub-records in their fixed display order.
    pub fn sub_records(&self) -> [(&'static str, &Map<String, Value>); 5] {
        [
            ("assessment", &self.assessment),
            ("servicePatching", &self.service_patching),
            ("accessControl", &self.access_control),
            ("systemMonitoring", &self.system_monitoring),
            ("additionalScans", &self.additional_scans),
        ]
    }
}
