use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use colored::Colorize;
use hashdrive_catalog::{classify, render_previews, DisplayEntry, Gateway, Preview};
use hashdrive_ledger::{FileLedger, FileLedgerConfig, RegistryLedger};
use hashdrive_pin::{ContentStore, PinError, PinResult, PinataClient};
use hashdrive_sdk::{Drive, DriveConfig, Recovery, Registration};
use hashdrive_types::{Account, ContentId, ContentLocator};
use serde_json::json;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = DriveConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.apply_env();

    let format = cli.format.clone();
    let account = cli
        .account
        .as_deref()
        .map(Account::parse)
        .transpose()
        .context("invalid --account")?;

    match cli.command {
        Command::Upload(args) => cmd_upload(&config, account, args, &format).await,
        Command::List(args) => cmd_list(&config, account, args, &format).await,
        Command::Classify(args) => cmd_classify(args, &format),
        Command::Resolve(args) => cmd_resolve(&config, args, &format),
        Command::Reregister(args) => cmd_reregister(&config, account, args, &format).await,
        Command::Config(args) => cmd_config(&config, args, &format),
    }
}

/// Stand-in used when no pinning credentials are configured, so read-only
/// commands work without them.
struct UnconfiguredStore;

#[async_trait]
impl ContentStore for UnconfiguredStore {
    async fn upload(&self, _data: Vec<u8>, _filename: &str) -> PinResult<ContentId> {
        Err(PinError::Config(
            "pinning credentials are not set (HASHDRIVE_API_KEY / HASHDRIVE_API_SECRET)".into(),
        ))
    }
}

fn open_drive(config: &DriveConfig, account: Option<Account>) -> anyhow::Result<Drive> {
    let store: Arc<dyn ContentStore> = if config.pinning.has_credentials() {
        Arc::new(PinataClient::new(config.pinning.clone())?)
    } else {
        Arc::new(UnconfiguredStore)
    };

    let ledger_config = FileLedgerConfig {
        sync_mode: config.ledger.sync_mode,
    };
    let ledger: Arc<dyn RegistryLedger> = Arc::new(
        FileLedger::open(&config.ledger.path, ledger_config)
            .with_context(|| format!("opening ledger {}", config.ledger.path.display()))?,
    );

    let drive = Drive::from_config(config, store, ledger)?;
    if let Some(account) = account {
        drive.connect(account)?;
    }
    Ok(drive)
}

fn print_registration(reg: &Registration, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "account": reg.record.account.to_hex(),
                "locator": reg.locator().as_str(),
                "position": reg.record.position,
                "visible": reg.is_visible(),
            });
            println!("{value}");
        }
        OutputFormat::Text => {
            println!("{} Registered {}", "✓".green().bold(), reg.locator().as_str().cyan());
            println!("  Account: {}", reg.record.account.short().yellow());
            println!("  Position: {}", reg.record.position);
            if !reg.is_visible() {
                println!("  {}", "pending: may not appear in listings yet".dimmed());
            }
        }
    }
}

fn explain_failure(err: &hashdrive_sdk::DriveError) {
    if let Recovery::Reregister(locator) = err.recovery() {
        eprintln!(
            "{} content is pinned but not registered; retry with `hashdrive reregister {}`",
            "!".yellow().bold(),
            locator
        );
    }
}

async fn cmd_upload(
    config: &DriveConfig,
    account: Option<Account>,
    args: UploadArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let data = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("reading {}", args.path.display()))?;
    let filename = match args.name {
        Some(name) => name,
        None => args
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("path has no file name; pass --name")?,
    };

    let drive = open_drive(config, account)?;
    match drive.upload(data, &filename).await {
        Ok(reg) => {
            print_registration(&reg, format);
            Ok(())
        }
        Err(err) => {
            explain_failure(&err);
            Err(err.into())
        }
    }
}

async fn cmd_reregister(
    config: &DriveConfig,
    account: Option<Account>,
    args: ReregisterArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let locator = ContentLocator::parse(&args.locator)?;
    let drive = open_drive(config, account)?;
    let reg = drive.reregister(locator).await?;
    print_registration(&reg, format);
    Ok(())
}

/// Judge a HEAD response for `entry`: it must succeed and, when the server
/// names a content type, that type must render as the entry's classification.
fn judge_response(
    entry: &DisplayEntry,
    status: reqwest::StatusCode,
    content_type: Option<&str>,
) -> Result<(), String> {
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }
    match content_type {
        Some(ct) if !entry.file_type.accepts_content_type(ct) => {
            Err(format!("served as {ct}, expected {}", entry.file_type))
        }
        _ => Ok(()),
    }
}

/// HEAD each resolved URL and report the entries that would not render.
async fn check_urls(entries: &[DisplayEntry]) -> anyhow::Result<HashMap<String, String>> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let mut failures = HashMap::new();
    for entry in entries {
        let verdict = match client.head(&entry.resolved_url).send().await {
            Ok(resp) => {
                let content_type = resp
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok());
                judge_response(entry, resp.status(), content_type)
            }
            Err(e) => Err(e.to_string()),
        };
        if let Err(reason) = verdict {
            failures.insert(entry.resolved_url.clone(), reason);
        }
    }
    Ok(failures)
}

async fn cmd_list(
    config: &DriveConfig,
    account: Option<Account>,
    args: ListArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let address = args
        .address
        .as_deref()
        .map(Account::parse)
        .transpose()
        .context("invalid address")?;
    let drive = open_drive(config, account)?;
    let entries = drive.files(address.as_ref()).await?;

    let previews = if args.check {
        let failures = check_urls(&entries).await?;
        render_previews(entries, |e| match failures.get(&e.resolved_url) {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        })
    } else {
        entries.into_iter().map(|entry| Preview::Media { entry }).collect()
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&previews)?),
        OutputFormat::Text => {
            if previews.is_empty() {
                println!("No files.");
            }
            for (i, preview) in previews.iter().enumerate() {
                let entry = preview.entry();
                let kind = format!("{:<6}", entry.file_type.as_str());
                match preview {
                    Preview::Media { .. } => {
                        println!("{:>3}  {}  {}", i, kind.cyan(), entry.resolved_url);
                    }
                    Preview::Unavailable { reason, .. } => {
                        println!(
                            "{:>3}  {}  {}  {}",
                            i,
                            kind.dimmed(),
                            entry.locator,
                            format!("(preview unavailable: {reason})").red()
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn cmd_classify(args: LocatorArgs, format: &OutputFormat) -> anyhow::Result<()> {
    for locator in &args.locators {
        let file_type = classify(locator);
        match format {
            OutputFormat::Json => println!("{}", json!({ "locator": locator, "file_type": file_type })),
            OutputFormat::Text => println!("{}  {}", file_type.as_str().cyan(), locator),
        }
    }
    Ok(())
}

fn cmd_resolve(config: &DriveConfig, args: LocatorArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let gateway = Gateway::new(&config.gateway)?;
    for locator in &args.locators {
        let url = gateway.resolve(locator);
        match format {
            OutputFormat::Json => println!("{}", json!({ "locator": locator, "resolved_url": url })),
            OutputFormat::Text => println!("{}", url),
        }
    }
    Ok(())
}

fn cmd_config(config: &DriveConfig, args: ConfigArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let shown = if args.show_secret { config.clone() } else { config.redacted() };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Text => print!("{}", shown.to_toml_string()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> DriveConfig {
        let mut config = DriveConfig::default();
        config.ledger.path = dir.join("registry.log");
        config
    }

    #[tokio::test]
    async fn drive_without_credentials_can_still_list() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let account = Account::from_bytes([1; 20]);

        let drive = open_drive(&config, Some(account)).unwrap();
        assert!(drive.files(None).await.unwrap().is_empty());

        let err = drive.upload(b"x".to_vec(), "x.txt").await.unwrap_err();
        assert!(matches!(
            err,
            hashdrive_sdk::DriveError::Upload(PinError::Config(_))
        ));
    }

    #[tokio::test]
    async fn reregister_then_list_through_file_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let account = Account::from_bytes([2; 20]);

        {
            let drive = open_drive(&config, Some(account)).unwrap();
            let locator = ContentLocator::parse("ipfs://QmPinned/cat.gif").unwrap();
            drive.reregister(locator).await.unwrap();
        }

        let drive = open_drive(&config, None).unwrap();
        let files = drive.files(Some(&account)).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_type, hashdrive_catalog::FileType::Image);
    }

    #[test]
    fn response_must_match_classified_type() {
        let entry = DisplayEntry {
            locator: "ipfs://cid/clip.mp4".into(),
            file_type: hashdrive_catalog::FileType::Video,
            resolved_url: "https://gw.example/ipfs/cid/clip.mp4".into(),
        };
        let ok = reqwest::StatusCode::OK;

        assert!(judge_response(&entry, ok, Some("video/mp4")).is_ok());
        assert!(judge_response(&entry, ok, None).is_ok());

        let wrong = judge_response(&entry, ok, Some("text/html")).unwrap_err();
        assert!(wrong.contains("text/html"));
        assert!(wrong.contains("video"));

        let missing = judge_response(&entry, reqwest::StatusCode::NOT_FOUND, Some("video/mp4")).unwrap_err();
        assert!(missing.contains("404"));
    }

    #[test]
    fn bad_gateway_is_reported() {
        let mut config = DriveConfig::default();
        config.gateway.base_url = "::".into();
        let args = LocatorArgs {
            locators: vec!["ipfs://a".into()],
        };
        assert!(cmd_resolve(&config, args, &OutputFormat::Text).is_err());
    }
}
