//! Human-readable printer status strings

/// Windows spooler status bits, in display order
const SPOOLER_STATUS_BITS: &[(u32, &str)] = &[
    (0x0000_0001, "Paused"),
    (0x0000_0002, "Error"),
    (0x0000_0004, "Pending Deletion"),
    (0x0000_0008, "Paper Jam"),
    (0x0000_0010, "Paper Out"),
    (0x0000_0020, "Manual Feed"),
    (0x0000_0040, "Paper Problem"),
    (0x0000_0080, "Offline"),
    (0x0000_0100, "IO Active"),
    (0x0000_0200, "Busy"),
    (0x0000_0400, "Printing"),
    (0x0000_0800, "Output Bin Full"),
    (0x0000_1000, "Not Available"),
    (0x0000_2000, "Waiting"),
    (0x0000_4000, "Processing"),
    (0x0000_8000, "Initializing"),
    (0x0001_0000, "Warming Up"),
    (0x0002_0000, "Toner Low"),
    (0x0004_0000, "No Toner"),
    (0x0008_0000, "Page Punt"),
    (0x0010_0000, "User Intervention"),
    (0x0020_0000, "Out of Memory"),
    (0x0040_0000, "Door Open"),
    (0x0080_0000, "Server Unknown"),
    (0x0100_0000, "Power Save"),
];

/// Translate a `PRINTER_INFO_2.Status` bitmask.
///
/// `0` is "Ready"; set bits are joined with ", ". Bits outside the known
/// table fall back to `Status Code: N`.
pub fn spooler_status_text(status: u32) -> String {
    if status == 0 {
        return "Ready".to_string();
    }
    let names: Vec<&str> = SPOOLER_STATUS_BITS
        .iter()
        .filter(|(bit, _)| status & bit != 0)
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        format!("Status Code: {}", status)
    } else {
        names.join(", ")
    }
}

/// Map `lpstat -p <name>` output to a status string
pub fn cups_status_text(lpstat_output: &str) -> &'static str {
    if lpstat_output.contains("is idle") {
        "Ready"
    } else if lpstat_output.contains("printing") {
        "Printing"
    } else if lpstat_output.contains("disabled") {
        "Paused"
    } else {
        "Unknown"
    }
}

/// Whether a status string means the printer cannot take work right now
pub fn is_unavailable(status: &str) -> bool {
    let lower = status.to_lowercase();
    lower.contains("offline") || lower.contains("not available")
}
