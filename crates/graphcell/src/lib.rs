//! graphcell
//!
//! Read and write single cells of Excel workbooks stored in OneDrive or
//! SharePoint, through Microsoft Graph, using an app-only token obtained with
//! the OAuth2 client-credential grant.
//!
//! ```ignore
//! let config = Config::load(None)?;
//! let client = CellClient::from_config(&config)?;
//! let workbook = client.resolve(&config.workbook_target()?).await?;
//! let address = CellAddress::new(workbook, config.require_sheet_name()?, "A1:A1")?;
//! client.write_cell(&address, &"PUNTO".into()).await?;
//! ```

pub mod auth;
pub mod common;
pub mod config;
pub mod graph;

pub use auth::{CachedToken, Credentials, OAuthProvider, OAuthTokens, TokenProvider};
pub use common::{
    AppResult, AuthError, ConfigError, Error, ErrorCode, GraphError, ReadError, ResolveError,
    WriteError,
};
pub use config::{Addressing, Config};
pub use graph::{
    CellAddress, CellClient, CellValue, Drive, DriveItem, DriveTarget, FileSelector, GraphClient,
    ItemRef, ReadBack, SiteSelector, WorkbookRef, WorkbookTarget,
};
