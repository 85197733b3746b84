//! Fixed prompts for the two pipeline calls.
//!
//! The report schema lives entirely in `REPORT_SYSTEM_PROMPT`; changing the
//! sample document there changes the wire contract with every client.

/// System prompt for the vision call: free-text markdown analysis of the
/// pictured scan output.
pub const VISION_SYSTEM_PROMPT: &str = "\
You are an nmap tool expert. You will be given an image of nmap scan output \
and you have to give the analysis of the scan in the following format:
### Scan Summary
- **Host**:
- **IP Address**:
- **Nmap Version**: ...
- **Scan Year**: ...
- **Command Executed**: // command used
- **Better Command Suggestion**: // suggest an improved command

### Identified Ports
- **Port <number> (<protocol>)**
  - **Service**: <service name>
  - **Usage**: <what the service is typically used for>
(one entry per open port visible in the image)

### Security Analysis (this is the expected outline; some explanations may \
be missing but all the points should be covered)
- **Assessment**
  - **Service Intentionality**
  - **Configuration Review**
  - **Unnecessary Services**
- **Service Patching**
  - **Outdated Services**
- **Access Control**
  - **Firewall Rules**
  - **Authentication**
  - **Traffic Encryption**
- **System Monitoring**
  - **Scan Schedule**
  - **System Logs**
- **Additional Scans**
  - Perform a detailed nmap scan with the '-sV' flag to detect service \
versions. (Service version detection is not enabled by default.)
  - Use the '--script' flag with nmap for NSE scripts and further service \
enumeration, and mention vulnerability scripts in a sentence \
(https://nmap.org/book/nse.html)

### Recommendations (list of recommendations)
- ";

/// System prompt for the JSON-mode call: reformat the free-text analysis
/// into the fixed report schema.
pub const REPORT_SYSTEM_PROMPT: &str = r#"You are an nmap tool expert. You will be given a description of an image of nmap scan output and you have to give the analysis of the scan as a JSON output like this:
{
  "scanSummary": {
    "targetInformation": {
      "host": "localhost",
      "ipAddress": "127.0.0.1",
      "nmapVersion": "4.20",
      "scanYear": 2007
    },
    "commandExecuted": "nmap [options] [target]",
    "betterCommandSuggestion": "nmap -sV --script [target]"
  },
  "identifiedPorts": {
    "portDetails": [
      {
        "port": 22,
        "protocol": "tcp",
        "service": "SSH",
        "usage": "secure logins, file transfers (scp, sftp), port forwarding"
      },
      {
        "port": 80,
        "protocol": "tcp",
        "service": "HTTP",
        "usage": "serving web pages"
      }
    ]
  },
  "securityAnalysis": {
    "assessment": {
      "serviceIntentionality": "Ensure each service is intentionally running and required for functionality.",
      "configurationReview": "Review configurations to ensure they are properly secured.",
      "unnecessaryServices": "Check and consider stopping unnecessary services to reduce attack surface."
    },
    "servicePatching": {
      "outdatedServices": "Update all services to patch known vulnerabilities."
    },
    "accessControl": {
      "firewallRules": "Implement rules to limit access to services from authorized networks/IP addresses only.",
      "authentication": "Use strong passwords and key-based authentication for SSH.",
      "trafficEncryption": "Enable HTTPS for web services to encrypt traffic."
    },
    "systemMonitoring": {
      "scanSchedule": "Regularly scan the machine to detect unauthorized changes to open ports.",
      "trafficMonitoring": "Monitor network traffic to and from these ports for suspicious activity."
    },
    "additionalScans": {
      "serviceVersionDetection": "Perform a detailed nmap scan with the '-sV' flag to detect service versions.",
      "vulnerabilityEnumeration": "Use the '--script' flag with nmap for NSE scripts and further service enumeration."
    }
  },
  "recommendations": {
    "updateNmap": "Update nmap to the latest version for improved service detection.",
    "performSecurityAssessment": "Follow the security assessment recommendations provided.",
    "implementAccessControl": "Implement the suggested access control measures.",
    "conductMonitoring": "Carry out monitoring as advised.",
    "executeAdditionalScans": "Perform additional scans for an in-depth vulnerability assessment."
  }
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use scanlens_core::ScanReport;

    #[test]
    fn report_prompt_sample_matches_report_schema() {
        // The sample document embedded in the prompt is the schema contract;
        // it must parse into ScanReport with every record populated.
        let start = REPORT_SYSTEM_PROMPT.find('{').unwrap();
        let sample = &REPORT_SYSTEM_PROMPT[start..];
        let report: ScanReport = serde_json::from_str(sample).unwrap();

        assert_eq!(report.identified_ports.port_details[0].port, 22);
        for (_, record) in report.security_analysis.sub_records() {
            assert!(!record.is_empty());
        }
        assert!(!report.recommendations.is_empty());
    }
}
