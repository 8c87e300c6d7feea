//! Workbook Range Access
//!
//! Single-cell reads and writes against
//! `.../workbook/worksheets('{sheet}')/range(address='{range}')/values`.
//! Every call obtains a token from the cache and then makes exactly one
//! HTTP request.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::client::GraphClient;
use super::common::odata_literal;
use super::target::WorkbookRef;
use crate::auth::provider::microsoft::MicrosoftProvider;
use crate::auth::{OAuthProvider, TokenProvider};
use crate::common::{ConfigError, Error, GraphError, ReadError, WriteError};
use crate::config::Config;

/// Statuses accepted as a successful write.
pub const WRITE_SUCCESS: [StatusCode; 3] = [StatusCode::OK, StatusCode::ACCEPTED, StatusCode::NO_CONTENT];

/// A single cell value. Sent and received as a 1×1 matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Whether `other`, as read back from Excel, holds what `self` wrote.
    ///
    /// Excel stores numeric and boolean text as numbers and booleans, so
    /// `"42"` matches `42` and `"TRUE"` matches `true`.
    pub fn matches(&self, other: &CellValue) -> bool {
        match (self, other) {
            (CellValue::Text(text), CellValue::Number(n))
            | (CellValue::Number(n), CellValue::Text(text)) => {
                text.trim().parse::<f64>().is_ok_and(|parsed| parsed == *n)
            }
            (CellValue::Text(text), CellValue::Bool(b)) | (CellValue::Bool(b), CellValue::Text(text)) => {
                text.trim().eq_ignore_ascii_case(if *b { "true" } else { "false" })
            }
            (CellValue::Text(text), CellValue::Empty) | (CellValue::Empty, CellValue::Text(text)) => {
                text.is_empty()
            }
            _ => self == other,
        }
    }

    /// Convert a JSON scalar. Arrays and objects are not cell values.
    fn from_json(value: &Value) -> Result<Self, GraphError> {
        match value {
            Value::Null => Ok(CellValue::Empty),
            Value::Bool(b) => Ok(CellValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .ok_or_else(|| GraphError::Malformed(format!("unrepresentable number {}", n))),
            Value::String(s) => Ok(CellValue::Text(s.clone())),
            other => Err(GraphError::Malformed(format!("expected a scalar, got {}", other))),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Workbook + sheet + range, e.g. `VENTAS` / `A1:A1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAddress {
    workbook: WorkbookRef,
    sheet: String,
    range: String,
}

impl CellAddress {
    /// Validate and build an address. The range must be A1-style notation.
    pub fn new(
        workbook: WorkbookRef,
        sheet: impl Into<String>,
        range: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let sheet = sheet.into();
        let range = range.into().trim().to_string();

        if sheet.trim().is_empty() {
            return Err(ConfigError::invalid("sheet_name", "sheet name is empty"));
        }
        if range.is_empty()
            || !range
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ':' || c == '$')
        {
            return Err(ConfigError::invalid(
                "range",
                format!("'{}' is not an A1-style range", range),
            ));
        }

        Ok(Self {
            workbook,
            sheet,
            range,
        })
    }

    pub fn workbook(&self) -> &WorkbookRef {
        &self.workbook
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn range(&self) -> &str {
        &self.range
    }

    /// Path of the range `values` resource relative to the Graph base URL.
    pub fn values_path(&self) -> String {
        format!(
            "{}/workbook/worksheets('{}')/range(address='{}')/values",
            self.workbook.item_path(),
            odata_literal(&self.sheet),
            self.range
        )
    }
}

/// Cell access client: token cache + Graph client.
pub struct CellClient<P = MicrosoftProvider> {
    graph: GraphClient,
    tokens: Arc<TokenProvider<P>>,
}

impl CellClient<MicrosoftProvider> {
    /// Wire up the Microsoft token provider and Graph client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let tokens = Arc::new(TokenProvider::from_config(config)?);
        let graph = GraphClient::from_config(config)?;
        Ok(Self::new(graph, tokens))
    }
}

impl<P: OAuthProvider> CellClient<P> {
    pub fn new(graph: GraphClient, tokens: Arc<TokenProvider<P>>) -> Self {
        Self { graph, tokens }
    }

    pub fn graph(&self) -> &GraphClient {
        &self.graph
    }

    pub fn tokens(&self) -> &TokenProvider<P> {
        &self.tokens
    }

    /// Read `values[0][0]` of the addressed range.
    ///
    /// Only HTTP 200 counts as success. A missing `values` field reads as
    /// [`CellValue::Empty`].
    pub async fn read_cell(&self, address: &CellAddress) -> Result<CellValue, ReadError> {
        let token = self.tokens.get_token().await?;

        debug!("Reading {}!{}", address.sheet(), address.range());
        let response = self
            .graph
            .get(&token, &address.values_path())
            .await
            .map_err(|e| {
                error!("Read of {}!{} failed: {}", address.sheet(), address.range(), e);
                e
            })?;

        if response.status != StatusCode::OK {
            error!(
                "Read of {}!{} failed (HTTP {}): {}",
                address.sheet(),
                address.range(),
                response.status.as_u16(),
                response.body
            );
            return Err(response.into_error().into());
        }

        let parsed = response.json()?;
        let value = match parsed.get("values").and_then(|v| v.get(0)).and_then(|row| row.get(0)) {
            Some(v) => CellValue::from_json(v)?,
            None => CellValue::Empty,
        };

        debug!("Read {}!{} = {:?}", address.sheet(), address.range(), value);
        Ok(value)
    }

    /// PATCH `{"values": [[value]]}` onto the addressed range.
    ///
    /// 200, 202 and 204 all count as success.
    pub async fn write_cell(&self, address: &CellAddress, value: &CellValue) -> Result<(), WriteError> {
        let token = self.tokens.get_token().await?;

        info!("Writing '{}' to {}!{}", value, address.sheet(), address.range());
        let payload = json!({ "values": [[value]] });

        let response = self
            .graph
            .patch(&token, &address.values_path(), &payload)
            .await
            .map_err(|e| {
                error!("Write to {}!{} failed: {}", address.sheet(), address.range(), e);
                e
            })?;

        if !WRITE_SUCCESS.contains(&response.status) {
            error!(
                "Write to {}!{} failed (HTTP {}): {}",
                address.sheet(),
                address.range(),
                response.status.as_u16(),
                response.body
            );
            return Err(response.into_error().into());
        }

        info!("Updated {}!{}", address.sheet(), address.range());
        Ok(())
    }

    /// Write `value`, then read the same range back.
    pub async fn write_and_read_back(
        &self,
        address: &CellAddress,
        value: &CellValue,
    ) -> Result<ReadBack, Error> {
        self.write_cell(address, value).await?;
        let read = self.read_cell(address).await?;
        Ok(ReadBack {
            written: value.clone(),
            read,
        })
    }
}

/// A written value and what the range held afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadBack {
    pub written: CellValue,
    pub read: CellValue,
}

impl ReadBack {
    pub fn matches(&self) -> bool {
        self.written.matches(&self.read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::target::{Drive, ItemRef};

    fn workbook() -> WorkbookRef {
        WorkbookRef::new(Drive::User("ana".into()), ItemRef::Id("01ABC".into()))
    }

    #[test]
    fn test_values_path() {
        let address = CellAddress::new(workbook(), "VENTAS", "A1:A1").unwrap();
        assert_eq!(
            address.values_path(),
            "users/ana/drive/items/01ABC/workbook/worksheets('VENTAS')/range(address='A1:A1')/values"
        );

        let address = CellAddress::new(workbook(), "Q1 Sales", " $B$2 ").unwrap();
        assert_eq!(address.range(), "$B$2");
        assert!(address
            .values_path()
            .ends_with("worksheets('Q1%20Sales')/range(address='$B$2')/values"));
    }

    #[test]
    fn test_address_validation() {
        assert!(CellAddress::new(workbook(), "VENTAS", "").is_err());
        assert!(CellAddress::new(workbook(), "VENTAS", "A1') or ('1").is_err());
        assert!(CellAddress::new(workbook(), "  ", "A1").is_err());
    }

    #[test]
    fn test_cell_value_json_shape() {
        let payload = json!({ "values": [[CellValue::from("API_OK")]] });
        assert_eq!(payload, json!({ "values": [["API_OK"]] }));

        let payload = json!({ "values": [[CellValue::Empty]] });
        assert_eq!(payload, json!({ "values": [[null]] }));

        let payload = json!({ "values": [[CellValue::from(42.5)]] });
        assert_eq!(payload, json!({ "values": [[42.5]] }));
    }

    #[test]
    fn test_cell_value_from_json() {
        assert_eq!(CellValue::from_json(&json!("PUNTO")).unwrap(), CellValue::from("PUNTO"));
        assert_eq!(CellValue::from_json(&json!(7)).unwrap(), CellValue::Number(7.0));
        assert_eq!(CellValue::from_json(&json!(true)).unwrap(), CellValue::Bool(true));
        assert_eq!(CellValue::from_json(&Value::Null).unwrap(), CellValue::Empty);
        assert!(CellValue::from_json(&json!(["nested"])).is_err());
    }

    #[test]
    fn test_matches_excel_coercion() {
        assert!(CellValue::from("42").matches(&CellValue::Number(42.0)));
        assert!(CellValue::from(" 42.50 ").matches(&CellValue::Number(42.5)));
        assert!(CellValue::from("TRUE").matches(&CellValue::Bool(true)));
        assert!(CellValue::from("false").matches(&CellValue::Bool(false)));
        assert!(CellValue::from("").matches(&CellValue::Empty));
        assert!(CellValue::from("PUNTO").matches(&CellValue::from("PUNTO")));

        assert!(!CellValue::from("42").matches(&CellValue::Number(43.0)));
        assert!(!CellValue::from("PUNTO").matches(&CellValue::from("punto")));
        assert!(!CellValue::from("yes").matches(&CellValue::Bool(true)));
        assert!(!CellValue::from("0").matches(&CellValue::Empty));
    }

    #[test]
    fn test_write_success_set() {
        for code in [200u16, 202, 204] {
            assert!(WRITE_SUCCESS.contains(&StatusCode::from_u16(code).unwrap()));
        }
        for code in [201u16, 400, 401, 404, 409, 429, 500] {
            assert!(!WRITE_SUCCESS.contains(&StatusCode::from_u16(code).unwrap()));
        }
    }
}
