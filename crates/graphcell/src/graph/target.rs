//! Workbook Addressing
//!
//! A [`WorkbookTarget`] is what configuration asks for; a [`WorkbookRef`] is
//! the concrete (drive, item) pair the range endpoints are built from. The
//! resolution step between the two lives in [`super::drive`].

use super::common::{encode_path, odata_literal};

/// How the workbook file is identified inside its drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelector {
    /// Drive item id, used as is.
    Id(String),
    /// File name, resolved by searching the drive.
    Name(String),
}

/// How a SharePoint site is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSelector {
    Id(String),
    /// `contoso.sharepoint.com` + `sites/finance`, resolved with a site lookup.
    Path { hostname: String, path: String },
}

/// Drive that has not been resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveTarget {
    User(String),
    Me,
    Site(SiteSelector),
}

/// Unresolved workbook location, one variant per addressing strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookTarget {
    UserItem { user_id: String, file: FileSelector },
    MeItem { file: FileSelector },
    UserPath { user_id: String, path: String },
    SiteItem { site: SiteSelector, file: FileSelector },
}

impl WorkbookTarget {
    pub fn drive_target(&self) -> DriveTarget {
        match self {
            WorkbookTarget::UserItem { user_id, .. } | WorkbookTarget::UserPath { user_id, .. } => {
                DriveTarget::User(user_id.clone())
            }
            WorkbookTarget::MeItem { .. } => DriveTarget::Me,
            WorkbookTarget::SiteItem { site, .. } => DriveTarget::Site(site.clone()),
        }
    }
}

/// A resolved drive (the container).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drive {
    User(String),
    Me,
    Site(String),
}

impl Drive {
    /// Path of the drive relative to the Graph base URL.
    pub fn path(&self) -> String {
        match self {
            Drive::User(user) => format!("users/{}/drive", urlencoding::encode(user)),
            Drive::Me => "me/drive".to_string(),
            Drive::Site(site) => format!("sites/{}/drive", urlencoding::encode(site)),
        }
    }

    /// `{drive}/root/search(q='{name}')`
    pub fn search_path(&self, file_name: &str) -> String {
        format!("{}/root/search(q='{}')", self.path(), odata_literal(file_name))
    }
}

/// A resolved drive item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Id(String),
    Path(String),
}

/// Resolved (container, file) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookRef {
    pub drive: Drive,
    pub item: ItemRef,
}

impl WorkbookRef {
    pub fn new(drive: Drive, item: ItemRef) -> Self {
        Self { drive, item }
    }

    /// Path of the workbook item relative to the Graph base URL.
    pub fn item_path(&self) -> String {
        match &self.item {
            ItemRef::Id(id) => format!("{}/items/{}", self.drive.path(), urlencoding::encode(id)),
            ItemRef::Path(path) => format!("{}/root:/{}:", self.drive.path(), encode_path(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_paths_per_strategy() {
        let by_user = WorkbookRef::new(Drive::User("ana@contoso.com".into()), ItemRef::Id("01ABC".into()));
        assert_eq!(by_user.item_path(), "users/ana%40contoso.com/drive/items/01ABC");

        let by_self = WorkbookRef::new(Drive::Me, ItemRef::Id("01ABC".into()));
        assert_eq!(by_self.item_path(), "me/drive/items/01ABC");

        let by_path = WorkbookRef::new(
            Drive::User("ana".into()),
            ItemRef::Path("Reports/Q1 ventas.xlsx".into()),
        );
        assert_eq!(by_path.item_path(), "users/ana/drive/root:/Reports/Q1%20ventas.xlsx:");

        let by_site = WorkbookRef::new(
            Drive::Site("contoso.sharepoint.com,1111,2222".into()),
            ItemRef::Id("01XYZ".into()),
        );
        assert_eq!(
            by_site.item_path(),
            "sites/contoso.sharepoint.com%2C1111%2C2222/drive/items/01XYZ"
        );
    }

    #[test]
    fn test_search_path() {
        assert_eq!(
            Drive::Me.search_path("test_api_excel.xlsx"),
            "me/drive/root/search(q='test_api_excel.xlsx')"
        );
    }

    #[test]
    fn test_drive_target() {
        let target = WorkbookTarget::UserPath {
            user_id: "ana".into(),
            path: "a.xlsx".into(),
        };
        assert_eq!(target.drive_target(), DriveTarget::User("ana".into()));
    }
}
