/*!
 * mdpack CLI - Command Line Interface
 */

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mdpack::{
    commands::{
        run_command, MetadataTypesCommand, OrgDeleteCommand, OrgDeleteFlags, ReportFlags,
        SourceNameCommand, SourceNameFlags, SourcePathCommand, SourcePathFlags,
        UninstallReportCommand, VersionCreateListCommand, VersionCreateReportCommand,
        WaitOptions,
    },
    config::{CliConfig, LogLevel},
    error::{MdpackError, Result, EXIT_SUCCESS},
    gateway::{GatewayConnector, QueryGateway, RestConnector},
    logging,
    org::{FileOrgConfigStore, OrgConfigStore},
    output::OutputWriter,
    package::{ListOptions, PackageUninstallRequestApi, PackageVersionCreateRequestApi},
};
use mdpack_core_poll::CancelSignal;
use tracing::debug;

#[derive(Parser)]
#[command(name = "mdpack")]
#[command(version, about = "Metadata layouts and packaging requests for platform orgs", long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/mdpack/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print results as a JSON envelope
    #[arg(long, global = true)]
    json: bool,

    /// Log level
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Log file path (JSON lines)
    #[arg(long = "log", global = true, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Packaging requests
    #[command(subcommand)]
    Package(PackageCommands),

    /// Scratch org management
    #[command(subcommand)]
    Org(OrgCommands),

    /// Source and mdapi file layouts
    #[command(subcommand)]
    Source(SourceCommands),

    /// Metadata type registry
    #[command(subcommand)]
    Metadata(MetadataCommands),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum PackageCommands {
    /// Package versions
    #[command(subcommand)]
    Version(VersionCommands),

    /// Package uninstall requests
    #[command(subcommand)]
    Uninstall(UninstallCommands),
}

#[derive(Subcommand)]
enum VersionCommands {
    /// Package version create requests
    #[command(subcommand)]
    Create(VersionCreateCommands),
}

#[derive(Subcommand)]
enum VersionCreateCommands {
    /// List version create requests
    List {
        /// Only requests created in the last N days (0 = today)
        #[arg(short = 'c', long = "created-last-days", value_name = "DAYS", allow_hyphen_values = true)]
        created_last_days: Option<String>,

        /// Only requests in this status (Queued, InProgress, Success, Error)
        #[arg(short = 's', long)]
        status: Option<String>,

        #[command(flatten)]
        devhub: DevHubArg,
    },

    /// Report on one version create request
    Report {
        #[command(flatten)]
        report: ReportArgs,

        #[command(flatten)]
        devhub: DevHubArg,
    },
}

#[derive(Subcommand)]
enum UninstallCommands {
    /// Report on one uninstall request
    Report {
        #[command(flatten)]
        report: ReportArgs,

        #[command(flatten)]
        target: TargetOrgArg,
    },
}

#[derive(Subcommand)]
enum OrgCommands {
    /// Delete a scratch org
    Delete {
        #[command(flatten)]
        target: TargetOrgArg,

        #[command(flatten)]
        devhub: DevHubArg,
    },
}

#[derive(Subcommand)]
enum SourceCommands {
    /// Show where an entity lives in the source and mdapi trees
    Path {
        /// Metadata type (ApexClass, Territory2Model, ...)
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Entity full name
        #[arg(short = 'n', long = "name")]
        full_name: String,

        /// Source tree root
        #[arg(long, default_value = mdpack::commands::source_path::DEFAULT_SOURCE_ROOT)]
        source_root: PathBuf,

        /// Mdapi tree root
        #[arg(long, default_value = mdpack::commands::source_path::DEFAULT_MDAPI_ROOT)]
        mdapi_root: PathBuf,
    },

    /// Show the entity name a file belongs to
    Name {
        /// Metadata type
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// File path relative to the tree root (classes/Foo.cls)
        file: String,

        /// Namespace prefix of the owning package
        #[arg(long)]
        namespace: Option<String>,
    },
}

#[derive(Subcommand)]
enum MetadataCommands {
    /// List registered metadata types
    Types,
}

#[derive(Args)]
struct ReportArgs {
    /// Request id (15 or 18 characters)
    #[arg(short = 'i', long = "request-id")]
    request_id: String,

    /// Minutes to wait for the request to finish
    #[arg(short = 'w', long, value_name = "MINUTES")]
    wait: Option<u64>,
}

impl From<ReportArgs> for ReportFlags {
    fn from(args: ReportArgs) -> Self {
        ReportFlags {
            request_id: args.request_id,
            wait_minutes: args.wait,
        }
    }
}

#[derive(Args)]
struct DevHubArg {
    /// Dev hub username
    #[arg(short = 'v', long = "target-devhub-username")]
    target_devhub_username: Option<String>,
}

#[derive(Args)]
struct TargetOrgArg {
    /// Org username
    #[arg(short = 'u', long = "target-username")]
    target_username: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    let code = match run(cli, &output) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            output.error(&e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, output: &OutputWriter) -> Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    config.verbose |= cli.verbose;

    if let Err(e) = logging::init_logging(&config) {
        output.warning(&format!("Failed to initialize logging: {}", e));
    }

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| MdpackError::Config(format!("Failed to start async runtime: {}", e)))?;

    runtime.block_on(async {
        let cancel = CancelSignal::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupt received, stopping");
                on_interrupt.cancel();
            }
        });

        let wait = WaitOptions {
            cancel,
            spinner: !cli.json && console::user_attended_stderr(),
        };
        dispatch(cli.command, &config, wait, output).await
    })
}

struct Session {
    store: Arc<dyn OrgConfigStore>,
    connector: Arc<dyn GatewayConnector>,
}

impl Session {
    fn open(config: &CliConfig) -> Result<Self> {
        Ok(Self {
            store: Arc::new(FileOrgConfigStore::new(config.orgs_dir()?)),
            connector: Arc::new(RestConnector::new(&config.api_version)),
        })
    }

    /// Gateway for a flag-selected org, falling back to a configured default
    fn gateway(
        &self,
        username: Option<String>,
        default: Option<&str>,
        role: &str,
    ) -> Result<Arc<dyn QueryGateway>> {
        let username = username.or_else(|| default.map(str::to_string)).ok_or_else(|| {
            MdpackError::InvalidArgument(format!("No {} specified", role))
        })?;
        let org = self.store.load(&username)?;
        debug!(username = %username, role, "Connecting org");
        Ok(self.connector.connect(&org)?)
    }
}

async fn dispatch(
    command: Commands,
    config: &CliConfig,
    wait: WaitOptions,
    output: &OutputWriter,
) -> Result<()> {
    match command {
        Commands::Package(PackageCommands::Version(VersionCommands::Create(create))) => {
            let session = Session::open(config)?;
            match create {
                VersionCreateCommands::List {
                    created_last_days,
                    status,
                    devhub,
                } => {
                    let gateway = session.gateway(
                        devhub.target_devhub_username,
                        config.default_devhub_username.as_deref(),
                        "dev hub",
                    )?;
                    let command =
                        VersionCreateListCommand::new(PackageVersionCreateRequestApi::new(gateway));
                    let flags = ListOptions {
                        created_last_days,
                        status,
                    };
                    run_command(&command, flags, output).await?;
                }
                VersionCreateCommands::Report { report, devhub } => {
                    let gateway = session.gateway(
                        devhub.target_devhub_username,
                        config.default_devhub_username.as_deref(),
                        "dev hub",
                    )?;
                    let command = VersionCreateReportCommand::new(
                        PackageVersionCreateRequestApi::new(gateway),
                        config.poll.clone(),
                        wait,
                    );
                    run_command(&command, report.into(), output).await?;
                }
            }
        }
        Commands::Package(PackageCommands::Uninstall(UninstallCommands::Report {
            report,
            target,
        })) => {
            let session = Session::open(config)?;
            let gateway = session.gateway(
                target.target_username,
                config.default_username.as_deref(),
                "target org",
            )?;
            let command = UninstallReportCommand::new(
                PackageUninstallRequestApi::new(gateway),
                config.poll.clone(),
                wait,
            );
            run_command(&command, report.into(), output).await?;
        }
        Commands::Org(OrgCommands::Delete { target, devhub }) => {
            let session = Session::open(config)?;
            let command = OrgDeleteCommand::new(session.store, session.connector).with_defaults(
                config.default_username.clone(),
                config.default_devhub_username.clone(),
            );
            let flags = OrgDeleteFlags {
                target_username: target.target_username,
                devhub_username: devhub.target_devhub_username,
            };
            run_command(&command, flags, output).await?;
        }
        Commands::Source(source) => {
            let registry = Arc::new(config.registry()?);
            match source {
                SourceCommands::Path {
                    type_name,
                    full_name,
                    source_root,
                    mdapi_root,
                } => {
                    let flags = SourcePathFlags {
                        type_name,
                        full_name,
                        source_root,
                        mdapi_root,
                    };
                    run_command(&SourcePathCommand::new(registry), flags, output).await?;
                }
                SourceCommands::Name {
                    type_name,
                    file,
                    namespace,
                } => {
                    let flags = SourceNameFlags {
                        type_name,
                        file_name: file,
                        namespace,
                    };
                    run_command(&SourceNameCommand::new(registry), flags, output).await?;
                }
            }
        }
        Commands::Metadata(MetadataCommands::Types) => {
            let registry = Arc::new(config.registry()?);
            run_command(&MetadataTypesCommand::new(registry), (), output).await?;
        }
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "mdpack", &mut std::io::stdout());
        }
    }
    Ok(())
}
