//! Subcommand implementations.
//!
//! Library errors are converted to `graphcell::Error` before reaching anyhow so
//! `main` can recover the exit code.

use anyhow::bail;
use graphcell::{AppResult, CellAddress, CellClient, CellValue, Config, Error, ReadBack};
use tracing::info;

async fn connect(config: &Config, range: &str) -> AppResult<(CellClient, CellAddress)> {
    let sheet = config.require_sheet_name()?.to_string();
    let target = config.workbook_target()?;
    let client = CellClient::from_config(config)?;
    let workbook = client.resolve(&target).await?;
    let address = CellAddress::new(workbook, sheet, range)?;
    Ok((client, address))
}

pub async fn read(config: &Config, range: &str) -> anyhow::Result<()> {
    let (client, address) = connect(config, range).await?;
    let value = client.read_cell(&address).await.map_err(Error::from)?;
    println!("{}", value);
    Ok(())
}

pub async fn write(config: &Config, range: &str, value: String) -> anyhow::Result<()> {
    let (client, address) = connect(config, range).await?;
    client
        .write_cell(&address, &CellValue::from(value))
        .await
        .map_err(Error::from)?;
    println!("updated {}!{}", address.sheet(), address.range());
    Ok(())
}

pub async fn find_file(config: &Config, name: &str) -> anyhow::Result<()> {
    let client = CellClient::from_config(config)?;
    let drive_target = config.search_drive().map_err(Error::from)?;
    let drive = client.resolve_drive(&drive_target).await.map_err(Error::from)?;
    let item = client.find_file(&drive, name).await.map_err(Error::from)?;

    println!("id:   {}", item.id);
    println!("name: {}", item.name);
    println!("path: {}", item.parent_path.as_deref().unwrap_or("-"));
    Ok(())
}

pub async fn token(config: &Config) -> anyhow::Result<()> {
    let client = CellClient::from_config(config)?;
    client.tokens().get_token().await.map_err(Error::from)?;

    if let Some(cached) = client.tokens().cached().await {
        println!("token acquired, expires {}", cached.expires_at.to_rfc3339());
    }
    Ok(())
}

pub async fn smoke(config: &Config, range: &str, value: String) -> anyhow::Result<()> {
    let (client, address) = connect(config, range).await?;
    let target = format!("{}!{}", address.sheet(), address.range());
    let expected = CellValue::from(value);

    info!("Smoke test: writing '{}' to {}", expected, target);
    let outcome = match client.write_and_read_back(&address, &expected).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let step = match &e {
                Error::Write(_) => "write to",
                _ => "read back from",
            };
            println!("FAILED: {} {} ({})", step, target, e);
            return Err(e.into());
        }
    };

    match verdict(&target, &outcome) {
        Ok(line) => {
            println!("{}", line);
            Ok(())
        }
        Err(line) => {
            println!("{}", line);
            bail!("read-back mismatch on {}", target)
        }
    }
}

/// Summary line for a smoke run: `Ok` when the read-back holds the written value.
fn verdict(target: &str, outcome: &ReadBack) -> Result<String, String> {
    if outcome.matches() {
        Ok(format!("PASSED: {} = '{}'", target, outcome.read))
    } else {
        Err(format!(
            "FAILED: wrote '{}' but read back '{}'",
            outcome.written, outcome.read
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(written: &str, read: CellValue) -> ReadBack {
        ReadBack {
            written: CellValue::from(written),
            read,
        }
    }

    #[test]
    fn test_verdict_accepts_excel_coercion() {
        assert_eq!(
            verdict("VENTAS!A1:A1", &outcome("42", CellValue::Number(42.0))),
            Ok("PASSED: VENTAS!A1:A1 = '42'".to_string())
        );
        assert!(verdict("VENTAS!A1:A1", &outcome("TRUE", CellValue::Bool(true))).is_ok());
        assert!(verdict("VENTAS!A1:A1", &outcome("PUNTO", CellValue::from("PUNTO"))).is_ok());
    }

    #[test]
    fn test_verdict_reports_mismatch() {
        assert_eq!(
            verdict("VENTAS!A1:A1", &outcome("PUNTO", CellValue::from("OTHER"))),
            Err("FAILED: wrote 'PUNTO' but read back 'OTHER'".to_string())
        );
    }

    #[tokio::test]
    async fn test_smoke_without_sheet_is_config_error() {
        let err = smoke(&Config::default(), "A1:A1", "PUNTO".into())
            .await
            .unwrap_err();
        let code = err.downcast_ref::<Error>().map(|e| e.code());
        assert_eq!(code, Some(graphcell::ErrorCode::Config));
    }
}
