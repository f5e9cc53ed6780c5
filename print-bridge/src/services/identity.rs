//! Local machine identity
//!
//! POS clients pair with one workstation by its machine id and send it with
//! every print request. The id is read once at startup.
//!
//! Sources, first hit wins:
//! 1. `MACHINE_ID` override from config
//! 2. Linux: `/etc/machine-id`, then `/var/lib/dbus/machine-id`
//! 3. macOS: `IOPlatformUUID` from `ioreg`
//! 4. Windows: `wmic csproduct get UUID`, then registry `MachineGuid`

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info, warn};

const MACHINE_ID_FILES: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// Machine identity, resolved once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    machine_id: Option<String>,
}

impl Identity {
    /// Identity with a known id
    pub fn fixed(machine_id: impl Into<String>) -> Self {
        Self {
            machine_id: Some(machine_id.into()),
        }
    }

    /// Identity for a host whose id could not be read
    pub fn unknown() -> Self {
        Self { machine_id: None }
    }

    /// Walk the platform sources
    pub async fn detect(override_id: Option<&str>) -> Self {
        if let Some(id) = override_id.map(str::trim).filter(|s| !s.is_empty()) {
            info!("Using machine id from configuration");
            return Self::fixed(id);
        }

        let found = if cfg!(target_os = "windows") {
            match wmic_uuid().await {
                Some(id) => Some(id),
                None => registry_machine_guid().await,
            }
        } else if cfg!(target_os = "macos") {
            ioreg_uuid().await
        } else {
            read_machine_id_files(MACHINE_ID_FILES.iter().map(Path::new))
        };

        match found {
            Some(id) => {
                info!(machine_id = %id, "Machine id detected");
                Self::fixed(id)
            }
            None => {
                warn!("Could not determine machine id; print requests will not be checked");
                Self::unknown()
            }
        }
    }

    pub fn machine_id(&self) -> Option<&str> {
        self.machine_id.as_deref()
    }

    /// Whether a caller-supplied token matches this machine. With no known id
    /// every caller is accepted.
    pub fn verify(&self, token: &str) -> bool {
        match &self.machine_id {
            Some(id) => id == token,
            None => true,
        }
    }
}

fn read_machine_id_files<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<String> {
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let id = content.trim();
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
            Err(e) => debug!(path = %path.display(), error = %e, "machine-id not readable"),
        }
    }
    None
}

async fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output().await {
        Ok(out) if out.status.success() => Some(String::from_utf8_lossy(&out.stdout).into_owned()),
        Ok(out) => {
            debug!(program, code = ?out.status.code(), "identity command failed");
            None
        }
        Err(e) => {
            debug!(program, error = %e, "identity command unavailable");
            None
        }
    }
}

async fn ioreg_uuid() -> Option<String> {
    let out = command_stdout("ioreg", &["-d2", "-c", "IOPlatformExpertDevice"]).await?;
    parse_ioreg(&out)
}

async fn wmic_uuid() -> Option<String> {
    let out = command_stdout("wmic", &["csproduct", "get", "UUID"]).await?;
    parse_wmic(&out)
}

async fn registry_machine_guid() -> Option<String> {
    let out = command_stdout(
        "reg",
        &[
            "query",
            r"HKLM\SOFTWARE\Microsoft\Cryptography",
            "/v",
            "MachineGuid",
        ],
    )
    .await?;
    parse_reg_query(&out)
}

/// `"IOPlatformUUID" = "XXXXXXXX-..."`
fn parse_ioreg(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|l| l.contains("IOPlatformUUID"))
        .find_map(|l| l.split_once('='))
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|id| !id.is_empty())
}

/// First non-empty line that is not the `UUID` header
fn parse_wmic(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && *l != "UUID")
        .map(str::to_string)
}

/// `    MachineGuid    REG_SZ    xxxxxxxx-...`
fn parse_reg_query(output: &str) -> Option<String> {
    output
        .lines()
        .find(|l| l.contains("MachineGuid"))
        .and_then(|l| l.split_whitespace().nth(2))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let id = Identity::fixed("abc");
        assert!(id.verify("abc"));
        assert!(!id.verify("abd"));
        assert!(!id.verify(""));
        assert!(Identity::unknown().verify("anything"));
    }

    #[tokio::test]
    async fn test_override_wins() {
        let id = Identity::detect(Some("  from-env \n")).await;
        assert_eq!(id.machine_id(), Some("from-env"));
    }

    #[test]
    fn test_machine_id_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let empty = dir.path().join("empty");
        let real = dir.path().join("machine-id");
        std::fs::write(&empty, "\n").unwrap();
        std::fs::write(&real, "0123456789abcdef\n").unwrap();

        let id = read_machine_id_files([missing.as_path(), empty.as_path(), real.as_path()]);
        assert_eq!(id.as_deref(), Some("0123456789abcdef"));
        assert_eq!(read_machine_id_files([missing.as_path()]), None);
    }

    #[test]
    fn test_parse_ioreg() {
        let out = r#"
+-o Root  <class IORegistryEntry>
  +-o MacBookPro18,3  <class IOPlatformExpertDevice>
      "IOPlatformSerialNumber" = "C02XXXXX"
      "IOPlatformUUID" = "5F3C1F0A-1111-2222-3333-444455556666"
"#;
        assert_eq!(
            parse_ioreg(out).as_deref(),
            Some("5F3C1F0A-1111-2222-3333-444455556666")
        );
        assert_eq!(parse_ioreg("nothing here"), None);
    }

    #[test]
    fn test_parse_wmic() {
        let out = "UUID                                  \r\n4C4C4544-0042-3510-8050-B7C04F4E3232  \r\n\r\n";
        assert_eq!(
            parse_wmic(out).as_deref(),
            Some("4C4C4544-0042-3510-8050-B7C04F4E3232")
        );
        assert_eq!(parse_wmic("UUID\r\n\r\n"), None);
    }

    #[test]
    fn test_parse_reg_query() {
        let out = "\r\nHKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Cryptography\r\n    MachineGuid    REG_SZ    9a8b7c6d-1234-5678-9abc-def012345678\r\n";
        assert_eq!(
            parse_reg_query(out).as_deref(),
            Some("9a8b7c6d-1234-5678-9abc-def012345678")
        );
    }
}
