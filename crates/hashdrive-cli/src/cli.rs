use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hashdrive",
    about = "Pin files to IPFS and register them under a wallet address",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "hashdrive.toml")]
    pub config: PathBuf,

    /// Active account (0x-prefixed address).
    #[arg(long, global = true, env = "HASHDRIVE_ACCOUNT")]
    pub account: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Pin a file and register it under the active account
    Upload(UploadArgs),
    /// List files registered under an address
    List(ListArgs),
    /// Show the file type inferred for locators
    Classify(LocatorArgs),
    /// Show the gateway URL for locators
    Resolve(LocatorArgs),
    /// Register already-pinned content again
    Reregister(ReregisterArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    pub path: PathBuf,
    /// Name sent to the pinning service. Defaults to the file name.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Address to list. Defaults to the active account.
    pub address: Option<String>,
    /// Request each resolved URL and mark entries that are unreachable or
    /// served as a different type than their classification.
    #[arg(long)]
    pub check: bool,
}

#[derive(Args)]
pub struct LocatorArgs {
    #[arg(required = true)]
    pub locators: Vec<String>,
}

#[derive(Args)]
pub struct ReregisterArgs {
    pub locator: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Show the API secret instead of redacting it.
    #[arg(long)]
    pub show_secret: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_upload() {
        let cli = Cli::try_parse_from(["hashdrive", "upload", "photo.png", "--account", "0xabc"]).unwrap();
        if let Command::Upload(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("photo.png"));
            assert!(args.name.is_none());
        } else { panic!("wrong command"); }
        assert_eq!(cli.account, Some("0xabc".into()));
    }

    #[test]
    fn parse_upload_with_name() {
        let cli = Cli::try_parse_from(["hashdrive", "upload", "/tmp/x", "--name", "report.pdf"]).unwrap();
        if let Command::Upload(args) = cli.command {
            assert_eq!(args.name, Some("report.pdf".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_list_default_address() {
        let cli = Cli::try_parse_from(["hashdrive", "list"]).unwrap();
        if let Command::List(args) = cli.command {
            assert!(args.address.is_none());
            assert!(!args.check);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_list_other_address_with_check() {
        let cli = Cli::try_parse_from(["hashdrive", "list", "0x5fbdb2315678afecb367f032d93f642f64180aa3", "--check"]).unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.address.as_deref(), Some("0x5fbdb2315678afecb367f032d93f642f64180aa3"));
            assert!(args.check);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_classify_many() {
        let cli = Cli::try_parse_from(["hashdrive", "classify", "ipfs://a/b.png", "ipfs://c"]).unwrap();
        if let Command::Classify(args) = cli.command {
            assert_eq!(args.locators.len(), 2);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn classify_needs_a_locator() {
        assert!(Cli::try_parse_from(["hashdrive", "classify"]).is_err());
    }

    #[test]
    fn parse_reregister() {
        let cli = Cli::try_parse_from(["hashdrive", "reregister", "ipfs://QmX"]).unwrap();
        assert!(matches!(cli.command, Command::Reregister(_)));
    }

    #[test]
    fn parse_config_path_and_json() {
        let cli = Cli::try_parse_from(["hashdrive", "--format", "json", "--config", "/etc/hd.toml", "config"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, PathBuf::from("/etc/hd.toml"));
        assert!(matches!(cli.command, Command::Config(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["hashdrive", "--verbose", "resolve", "ipfs://a"]).unwrap();
        assert!(cli.verbose);
    }
}
