//! Drive and Site Resolution
//!
//! Turns a configured [`WorkbookTarget`] into a concrete [`WorkbookRef`],
//! looking up SharePoint sites and searching drives by file name as needed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use super::common::{encode_path, extract_array};
use super::target::{Drive, DriveTarget, FileSelector, ItemRef, SiteSelector, WorkbookRef, WorkbookTarget};
use super::workbook::CellClient;
use crate::auth::OAuthProvider;
use crate::common::{GraphError, ResolveError};

/// A drive item found by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    /// `parentReference.path`, e.g. `/drive/root:/Reports`
    pub parent_path: Option<String>,
}

impl DriveItem {
    fn from_json(item: &Value) -> Option<Self> {
        Some(Self {
            id: item.get("id")?.as_str()?.to_string(),
            name: item.get("name")?.as_str()?.to_string(),
            parent_path: item
                .get("parentReference")
                .and_then(|p| p.get("path"))
                .and_then(|p| p.as_str())
                .map(String::from),
        })
    }
}

/// `sites/{hostname}:/{site path}` with every segment percent-encoded.
fn site_lookup_path(hostname: &str, site_path: &str) -> String {
    format!("sites/{}:/{}", urlencoding::encode(hostname), encode_path(site_path))
}

impl<P: OAuthProvider> CellClient<P> {
    /// Search `drive` for an item whose name matches `file_name`
    /// case-insensitively.
    pub async fn find_file(&self, drive: &Drive, file_name: &str) -> Result<DriveItem, ResolveError> {
        let token = self.tokens().get_token().await?;

        info!("Searching {} for '{}'", drive.path(), file_name);
        let response = self.graph().get(&token, &drive.search_path(file_name)).await?;

        if !response.status.is_success() {
            error!(
                "Search failed (HTTP {}): {}",
                response.status.as_u16(),
                response.body
            );
            return Err(response.into_error().into());
        }

        let parsed = response.json()?;
        let wanted = file_name.to_lowercase();
        let item = extract_array(&parsed, "value")
            .iter()
            .filter_map(DriveItem::from_json)
            .find(|item| item.name.to_lowercase() == wanted)
            .ok_or_else(|| {
                error!("No item named '{}' in {}", file_name, drive.path());
                ResolveError::NotFound(file_name.to_string())
            })?;

        info!(
            "Found '{}' (id {}) under {}",
            item.name,
            item.id,
            item.parent_path.as_deref().unwrap_or("?")
        );
        Ok(item)
    }

    /// Look up a SharePoint site id from its hostname and server-relative path.
    pub async fn resolve_site(&self, hostname: &str, site_path: &str) -> Result<String, ResolveError> {
        let token = self.tokens().get_token().await?;

        let path = site_lookup_path(hostname, site_path);
        debug!("Resolving site {}", path);
        let response = self.graph().get(&token, &path).await?;

        if !response.status.is_success() {
            error!(
                "Site lookup failed (HTTP {}): {}",
                response.status.as_u16(),
                response.body
            );
            return Err(response.into_error().into());
        }

        let parsed = response.json()?;
        let id = parsed
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GraphError::Malformed("site response missing id".to_string()))?
            .to_string();

        info!("Resolved site {}/{} to {}", hostname, site_path, id);
        Ok(id)
    }

    /// Resolve the container. Only site paths need a round trip.
    pub async fn resolve_drive(&self, target: &DriveTarget) -> Result<Drive, ResolveError> {
        match target {
            DriveTarget::User(user) => Ok(Drive::User(user.clone())),
            DriveTarget::Me => Ok(Drive::Me),
            DriveTarget::Site(SiteSelector::Id(id)) => Ok(Drive::Site(id.clone())),
            DriveTarget::Site(SiteSelector::Path { hostname, path }) => {
                Ok(Drive::Site(self.resolve_site(hostname, path).await?))
            }
        }
    }

    /// The single configurable resolution step: container first, then file.
    pub async fn resolve(&self, target: &WorkbookTarget) -> Result<WorkbookRef, ResolveError> {
        let drive = self.resolve_drive(&target.drive_target()).await?;

        let item = match target {
            WorkbookTarget::UserPath { path, .. } => ItemRef::Path(path.clone()),
            WorkbookTarget::UserItem { file, .. }
            | WorkbookTarget::MeItem { file }
            | WorkbookTarget::SiteItem { file, .. } => match file {
                FileSelector::Id(id) => ItemRef::Id(id.clone()),
                FileSelector::Name(name) => ItemRef::Id(self.find_file(&drive, name).await?.id),
            },
        };

        Ok(WorkbookRef::new(drive, item))
    }
}
