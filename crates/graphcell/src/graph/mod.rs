//! Microsoft Graph Module
//!
//! Authenticated access to workbook ranges in OneDrive and SharePoint drives.

pub mod client;
pub mod common;
pub mod drive;
pub mod target;
pub mod workbook;

pub use client::{GraphClient, GraphResponse, DEFAULT_GRAPH_BASE_URL};
pub use drive::DriveItem;
pub use target::{Drive, DriveTarget, FileSelector, ItemRef, SiteSelector, WorkbookRef, WorkbookTarget};
pub use workbook::{CellAddress, CellClient, CellValue, ReadBack, WRITE_SUCCESS};
