use std::{fmt, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use readreceipt_storage_notion::DEFAULT_NOTION_API_URL;
use readreceipt_storage_sheets::{
    DEFAULT_DRIVE_API_URL, DEFAULT_SHEETS_API_URL, DEFAULT_SPREADSHEET_NAME,
};

/// Storage backend selected at startup. Exactly one is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Notion,
    Sheets,
}

impl Backend {
    pub fn default_credentials_file(self) -> &'static str {
        match self {
            Backend::Notion => "notion-keys.json",
            Backend::Sheets => "read-receipts-key.json",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Notion => write!(f, "notion"),
            Backend::Sheets => write!(f, "sheets"),
        }
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "notion" => Ok(Backend::Notion),
            "sheets" | "google-sheets" => Ok(Backend::Sheets),
            other => Err(anyhow!("unknown backend '{}', expected notion or sheets", other)),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Directory that relative resource paths are resolved against.
    pub resource_root: PathBuf,
    pub backend: Backend,
    pub credentials_file: PathBuf,
    pub pixel_path: PathBuf,
    pub spreadsheet_name: String,
    pub backend_timeout: Duration,
    pub notion_api_url: String,
    pub sheets_api_url: String,
    pub drive_api_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("RR_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:5555".to_string())
            .parse()
            .context("Invalid RR_LISTEN_ADDR")?;
        let backend: Backend = match lookup("RR_BACKEND") {
            Some(raw) => raw.parse().context("Invalid RR_BACKEND")?,
            None => Backend::Notion,
        };
        let resource_root = match lookup("RR_RESOURCE_ROOT") {
            Some(root) => PathBuf::from(root),
            None => executable_dir()?,
        };
        let credentials_file = resource_root.join(
            lookup("RR_CREDENTIALS_FILE")
                .unwrap_or_else(|| backend.default_credentials_file().to_string()),
        );
        let pixel_path = resource_root
            .join(lookup("RR_PIXEL_PATH").unwrap_or_else(|| "assets/blank.png".into()));
        let spreadsheet_name =
            lookup("RR_SPREADSHEET_NAME").unwrap_or_else(|| DEFAULT_SPREADSHEET_NAME.into());
        let timeout_ms: u64 = lookup("RR_BACKEND_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .context("Invalid RR_BACKEND_TIMEOUT_MS")?;
        if timeout_ms == 0 {
            return Err(anyhow!("RR_BACKEND_TIMEOUT_MS must be greater than zero"));
        }

        Ok(Self {
            listen_addr,
            resource_root,
            backend,
            credentials_file,
            pixel_path,
            spreadsheet_name,
            backend_timeout: Duration::from_millis(timeout_ms),
            notion_api_url: lookup("RR_NOTION_API_URL")
                .unwrap_or_else(|| DEFAULT_NOTION_API_URL.into()),
            sheets_api_url: lookup("RR_SHEETS_API_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.into()),
            drive_api_url: lookup("RR_DRIVE_API_URL")
                .unwrap_or_else(|| DEFAULT_DRIVE_API_URL.into()),
        })
    }
}

/// Directory holding the running binary, the default resource root.
fn executable_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot locate the running executable")?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Executable {} has no parent directory", exe.display()))
}
