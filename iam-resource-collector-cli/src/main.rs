use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use iam_resource_collector_core::commands::{fetch_accounts, load_sdk_config};
use iam_resource_collector_core::config::{
    ACCOUNTS_PARAMETER_ENV, BUCKET_ENV, CONCURRENCY_ENV, DEFAULT_KEY_PREFIX,
    DEFAULT_SESSION_NAME, KEY_PREFIX_ENV, PAGINATION_ENV, SESSION_DURATION_ENV, SESSION_NAME_ENV,
};
use iam_resource_collector_core::{
    extract_account_from_arn, CollectorClients, CollectorService, CollectorSettings, Pagination,
};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "iam-resource-collector",
    version,
    about = "Snapshot IAM users, roles, groups and customer-managed policies across AWS accounts into S3"
)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// AWS region override; defaults to the SDK's region resolution.
    #[arg(long, global = true)]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one collection and write the snapshot to S3
    Collect(CollectArgs),
    /// Print the configured target accounts without assuming any role
    Accounts(AccountsArgs),
}

#[derive(Args, Debug)]
struct CollectArgs {
    /// SSM parameter holding the accounts JSON array
    #[arg(long, env = ACCOUNTS_PARAMETER_ENV)]
    accounts_parameter: String,

    /// Bucket receiving the snapshot
    #[arg(long, env = BUCKET_ENV)]
    bucket: String,

    /// Role session name passed to AssumeRole
    #[arg(long, env = SESSION_NAME_ENV, default_value = DEFAULT_SESSION_NAME)]
    session_name: String,

    /// Object key prefix
    #[arg(long, env = KEY_PREFIX_ENV, default_value = DEFAULT_KEY_PREFIX)]
    key_prefix: String,

    /// IAM list pagination: full or first-page
    #[arg(long, env = PAGINATION_ENV, default_value = "full")]
    pagination: Pagination,

    /// Accounts processed at once
    #[arg(long, env = CONCURRENCY_ENV, default_value_t = 1)]
    concurrency: usize,

    /// Role session duration in seconds
    #[arg(long, env = SESSION_DURATION_ENV)]
    session_duration: Option<i32>,
}

impl CollectArgs {
    fn into_settings(self) -> CollectorSettings {
        let mut settings = CollectorSettings::new(self.accounts_parameter, self.bucket);
        settings.session_name = self.session_name;
        settings.key_prefix = self.key_prefix;
        settings.pagination = self.pagination;
        settings.concurrency = self.concurrency;
        settings.session_duration = self.session_duration;
        settings
    }
}

#[derive(Args, Debug)]
struct AccountsArgs {
    /// SSM parameter holding the accounts JSON array
    #[arg(long, env = ACCOUNTS_PARAMETER_ENV)]
    accounts_parameter: String,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // RUST_LOG wins when set
    builder.parse_default_env();
    builder.init();
}

async fn run_collect(args: CollectArgs, region: Option<String>) -> Result<()> {
    let service = CollectorService::load(args.into_settings(), region)
        .await
        .context("Refusing to start collection")?;

    let response = service.collect().await.context("Collection run failed")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialize response")?
    );
    Ok(())
}

async fn run_accounts(args: AccountsArgs, region: Option<String>) -> Result<()> {
    let config = load_sdk_config(region).await;
    let clients = CollectorClients::from_sdk_config(&config, None);

    let accounts = fetch_accounts(clients.parameters.as_ref(), &args.accounts_parameter)
        .await
        .context("Failed to load accounts")?;

    let listing: Vec<serde_json::Value> = accounts
        .iter()
        .map(|account| {
            serde_json::json!({
                "account_name": account.account_name,
                "role_arn": account.role_arn,
                "account_id": extract_account_from_arn(&account.role_arn),
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&listing).context("Failed to serialize accounts")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Collect(args) => run_collect(args, cli.region).await,
        Commands::Accounts(args) => run_accounts(args, cli.region).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
