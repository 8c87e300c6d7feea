//! Configuration management
//!
//! Settings come from three layers, each overriding the previous one:
//! a JSON file (`~/.graphcell/config.json` by default), `MS_*` environment
//! variables, and finally explicit overrides from the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::auth::provider::microsoft::DEFAULT_AUTHORITY_HOST;
use crate::auth::{Credentials, DEFAULT_SCOPE};
use crate::common::{config_path, ConfigError, DEFAULT_TIMEOUT_SECS};
use crate::graph::target::{DriveTarget, FileSelector, SiteSelector, WorkbookTarget};
use crate::graph::DEFAULT_GRAPH_BASE_URL;

/// How the workbook is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Addressing {
    /// `users/{user}/drive/items/{id}`
    #[default]
    ByIdUnderUser,
    /// `me/drive/items/{id}`
    ByIdUnderSelf,
    /// `users/{user}/drive/root:/{path}:`
    ByPathUnderUser,
    /// `sites/{site}/drive/items/{id}`
    ByIdUnderSite,
}

impl Addressing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Addressing::ByIdUnderUser => "by-id-under-user",
            Addressing::ByIdUnderSelf => "by-id-under-self",
            Addressing::ByPathUnderUser => "by-path-under-user",
            Addressing::ByIdUnderSite => "by-id-under-site",
        }
    }
}

impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Addressing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "by-id-under-user" => Ok(Addressing::ByIdUnderUser),
            "by-id-under-self" => Ok(Addressing::ByIdUnderSelf),
            "by-path-under-user" => Ok(Addressing::ByPathUnderUser),
            "by-id-under-site" => Ok(Addressing::ByIdUnderSite),
            other => Err(ConfigError::invalid(
                "addressing",
                format!(
                    "unknown strategy '{}' (expected by-id-under-user, by-id-under-self, by-path-under-user or by-id-under-site)",
                    other
                ),
            )),
        }
    }
}

/// All settings. Every field is optional so layers can be merged.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    pub user_id: Option<String>,
    pub site_id: Option<String>,
    pub site_hostname: Option<String>,
    pub site_path: Option<String>,
    pub file_id: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub sheet_name: Option<String>,
    pub addressing: Option<Addressing>,
    pub authority_host: Option<String>,
    pub graph_base_url: Option<String>,
    pub scope: Option<String>,
    pub timeout_secs: Option<u64>,
}

// Custom Debug implementation that redacts the secret
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("user_id", &self.user_id)
            .field("site_id", &self.site_id)
            .field("site_hostname", &self.site_hostname)
            .field("site_path", &self.site_path)
            .field("file_id", &self.file_id)
            .field("file_name", &self.file_name)
            .field("file_path", &self.file_path)
            .field("sheet_name", &self.sheet_name)
            .field("addressing", &self.addressing)
            .field("authority_host", &self.authority_host)
            .field("graph_base_url", &self.graph_base_url)
            .field("scope", &self.scope)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load file + environment. `path` of `None` means the default location,
    /// which may be absent; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::layered(path, config_path, |key| std::env::var(key).ok())
    }

    fn layered<D, F>(path: Option<&Path>, default_path: D, lookup: F) -> Result<Self, ConfigError>
    where
        D: FnOnce() -> Result<PathBuf, ConfigError>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = default_path()?;
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    debug!("No config file at {}", default.display());
                    Self::default()
                }
            }
        };
        config.merge(Self::from_lookup(lookup)?);
        Ok(config)
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file_err = |message: String| ConfigError::File {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| file_err(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| file_err(format!("invalid JSON: {}", e)))?;
        debug!("Loaded config from {}", path.display());
        config.validated()
    }

    /// Build from `MS_*` keys via any lookup (the process environment in
    /// [`Config::load`]). Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addressing = get("MS_ADDRESSING").map(|v| v.parse::<Addressing>()).transpose()?;
        let timeout_secs = get("MS_HTTP_TIMEOUT_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid("timeout_secs", e.to_string()))
            })
            .transpose()?;

        Self {
            tenant_id: get("MS_TENANT_ID"),
            client_id: get("MS_CLIENT_ID"),
            client_secret: get("MS_CLIENT_SECRET"),
            user_id: get("MS_USER_ID"),
            site_id: get("MS_SITE_ID"),
            site_hostname: get("MS_SITE_HOSTNAME"),
            site_path: get("MS_SITE_PATH"),
            file_id: get("MS_FILE_ID"),
            file_name: get("MS_FILE_NAME"),
            file_path: get("MS_FILE_PATH"),
            sheet_name: get("MS_SHEET_NAME"),
            addressing,
            authority_host: get("MS_AUTHORITY_HOST"),
            graph_base_url: get("MS_GRAPH_BASE_URL"),
            scope: get("MS_SCOPE"),
            timeout_secs,
        }
        .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::invalid("timeout_secs", "must be at least 1 second"));
        }
        Ok(self)
    }

    /// Overlay every value set in `other` onto `self`.
    pub fn merge(&mut self, other: Config) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            tenant_id,
            client_id,
            client_secret,
            user_id,
            site_id,
            site_hostname,
            site_path,
            file_id,
            file_name,
            file_path,
            sheet_name,
            addressing,
            authority_host,
            graph_base_url,
            scope,
            timeout_secs,
        );
    }

    // ── Resolved values ─────────────────────────────────────────────────────

    /// Credentials for the token provider. Missing values are left empty and
    /// rejected when a token is requested.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.tenant_id.clone().unwrap_or_default(),
            self.client_id.clone().unwrap_or_default(),
            self.client_secret.clone().unwrap_or_default(),
        )
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing.unwrap_or_default()
    }

    pub fn authority_host(&self) -> &str {
        self.authority_host.as_deref().unwrap_or(DEFAULT_AUTHORITY_HOST)
    }

    pub fn graph_base_url(&self) -> &str {
        self.graph_base_url.as_deref().unwrap_or(DEFAULT_GRAPH_BASE_URL)
    }

    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or(DEFAULT_SCOPE)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn require_sheet_name(&self) -> Result<&str, ConfigError> {
        require(&self.sheet_name, "sheet_name", "MS_SHEET_NAME")
    }

    /// The drive that filename searches run against for the configured strategy.
    pub fn search_drive(&self) -> Result<DriveTarget, ConfigError> {
        match self.addressing() {
            Addressing::ByIdUnderUser | Addressing::ByPathUnderUser => Ok(DriveTarget::User(
                require(&self.user_id, "user_id", "MS_USER_ID")?.to_string(),
            )),
            Addressing::ByIdUnderSelf => Ok(DriveTarget::Me),
            Addressing::ByIdUnderSite => Ok(DriveTarget::Site(self.site_selector()?)),
        }
    }

    /// Build the unresolved workbook target for the configured strategy.
    pub fn workbook_target(&self) -> Result<WorkbookTarget, ConfigError> {
        let target = match self.addressing() {
            Addressing::ByIdUnderUser => WorkbookTarget::UserItem {
                user_id: require(&self.user_id, "user_id", "MS_USER_ID")?.to_string(),
                file: self.file_selector()?,
            },
            Addressing::ByIdUnderSelf => WorkbookTarget::MeItem {
                file: self.file_selector()?,
            },
            Addressing::ByPathUnderUser => WorkbookTarget::UserPath {
                user_id: require(&self.user_id, "user_id", "MS_USER_ID")?.to_string(),
                path: require(&self.file_path, "file_path", "MS_FILE_PATH")?.to_string(),
            },
            Addressing::ByIdUnderSite => WorkbookTarget::SiteItem {
                site: self.site_selector()?,
                file: self.file_selector()?,
            },
        };
        Ok(target)
    }

    fn file_selector(&self) -> Result<FileSelector, ConfigError> {
        match (&self.file_id, &self.file_name) {
            (Some(id), _) => Ok(FileSelector::Id(id.clone())),
            (None, Some(name)) => Ok(FileSelector::Name(name.clone())),
            (None, None) => Err(ConfigError::Missing {
                key: "file_id",
                env: "MS_FILE_ID or MS_FILE_NAME",
            }),
        }
    }

    fn site_selector(&self) -> Result<SiteSelector, ConfigError> {
        if let Some(id) = &self.site_id {
            return Ok(SiteSelector::Id(id.clone()));
        }
        match (&self.site_hostname, &self.site_path) {
            (Some(hostname), Some(path)) => Ok(SiteSelector::Path {
                hostname: hostname.clone(),
                path: path.clone(),
            }),
            _ => Err(ConfigError::Missing {
                key: "site_id",
                env: "MS_SITE_ID or MS_SITE_HOSTNAME + MS_SITE_PATH",
            }),
        }
    }
}

fn require<'a>(
    value: &'a Option<String>,
    key: &'static str,
    env: &'static str,
) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or(ConfigError::Missing { key, env })
}
