use std::path::PathBuf;

use escpos_kit::CodePage;

/// Which printer transport to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// OS spooler: CUPS on Unix, the print spooler on Windows
    #[default]
    System,
    /// Raw TCP printers listed in `NETWORK_PRINTERS`
    Network,
}

impl BackendKind {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "network" | "tcp" => BackendKind::Network,
            _ => BackendKind::System,
        }
    }
}

/// Bridge configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 9100 | HTTP / WebSocket port |
/// | ALLOWED_CORS | * | Comma separated origins, `*` allows any |
/// | WORK_DIR | `<tmp>/print-bridge` | Working directory |
/// | IMAGE_CACHE_DIR | `<WORK_DIR>/images` | Downloaded logo cache |
/// | LOG_LEVEL | info | trace / debug / info / warn / error |
/// | LOG_DIR | (unset) | Daily rolling log files when set |
/// | PRINTER_BACKEND | system | `system` or `network` |
/// | NETWORK_PRINTERS | (unset) | `Kitchen=192.168.1.50:9100,Bar=192.168.1.51` |
/// | MACHINE_ID | (unset) | Overrides the detected machine id |
/// | TEXT_ENCODING | utf8 | `utf8` or `gbk` |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 PRINTER_BACKEND=network NETWORK_PRINTERS=Kitchen=10.0.0.5 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    /// Allowed origins; empty means any origin
    pub allowed_origins: Vec<String>,
    pub work_dir: PathBuf,
    pub image_cache_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub printer_backend: BackendKind,
    pub network_printers: Option<String>,
    pub machine_id: Option<String>,
    pub code_page: CodePage,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset where noted
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let work_dir = var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("print-bridge"));
        let image_cache_dir = var("IMAGE_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| work_dir.join("images"));

        Self {
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(9100),
            allowed_origins: parse_origins(&var("ALLOWED_CORS").unwrap_or_else(|| "*".into())),
            work_dir,
            image_cache_dir,
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: non_empty("LOG_DIR"),
            printer_backend: var("PRINTER_BACKEND")
                .map(|v| BackendKind::parse(&v))
                .unwrap_or_default(),
            network_printers: non_empty("NETWORK_PRINTERS"),
            machine_id: non_empty("MACHINE_ID"),
            code_page: var("TEXT_ENCODING")
                .map(|v| CodePage::parse(&v))
                .unwrap_or_default(),
        }
    }

    /// Override port and working directory
    ///
    /// Used by tests
    pub fn with_overrides(work_dir: impl Into<PathBuf>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.image_cache_dir = config.work_dir.join("images");
        config.http_port = http_port;
        config
    }

    /// True when every origin is accepted
    pub fn cors_permissive(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// `*` (anywhere in the list) means any origin
fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
