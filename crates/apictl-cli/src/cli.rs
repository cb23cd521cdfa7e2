//! Command-line surface for apictl.

use std::path::PathBuf;

use apictl_config::DEFAULT_TIMEOUT_SECS;
use apictl_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, command_span, init_logging};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{AppContext, CliResult, EXIT_FAILURE};
use crate::commands::{actions, config, describe, permissions, relations, resources};

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let exit_code = if err.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = err.print();
            return exit_code;
        }
    };

    let level = if cli.globals.debug {
        "debug"
    } else {
        DEFAULT_LOG_LEVEL
    };
    let _logging = match init_logging(&LoggingConfig {
        level,
        format: cli.globals.log_format.into(),
    }) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: {err:#}");
            return EXIT_FAILURE;
        }
    };

    let trace_id = Uuid::new_v4().to_string();
    let span = command_span(command_label(&cli.command), &trace_id);
    match dispatch(cli, &trace_id).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            EXIT_FAILURE
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let Cli { globals, command } = cli;
    if let Command::Config(command) = command {
        return match command {
            ConfigCommand::Init(args) => config::handle_config_init(&globals, &args),
            ConfigCommand::Show => config::handle_config_show(&globals),
        };
    }

    let ctx = AppContext::from_globals(&globals, trace_id)?;
    match command {
        Command::Create(args) => resources::handle_create(&ctx, args).await,
        Command::Read(args) => resources::handle_read(&ctx, args).await,
        Command::Update(args) => resources::handle_update(&ctx, args).await,
        Command::Delete(args) => resources::handle_delete(&ctx, args).await,
        Command::List(args) => resources::handle_list(&ctx, args).await,
        Command::Relation(command) => match command {
            RelationCommand::Get(args) => relations::handle_relation_get(&ctx, args).await,
            RelationCommand::Update(args) => relations::handle_relation_update(&ctx, args).await,
            RelationCommand::Add(args) => relations::handle_relation_add(&ctx, args).await,
            RelationCommand::Remove(args) => relations::handle_relation_remove(&ctx, args).await,
        },
        Command::Describe(args) => describe::handle_describe(&ctx, args).await,
        Command::Permission(command) => match command {
            PermissionCommand::View(args) => permissions::handle_permission_view(&ctx, args).await,
            PermissionCommand::Set(args) => permissions::handle_permission_set(&ctx, args).await,
            PermissionCommand::Add(args) => permissions::handle_permission_add(&ctx, args).await,
            PermissionCommand::Remove(args) => {
                permissions::handle_permission_remove(&ctx, args).await
            }
        },
        Command::Action(command) => match command {
            ActionCommand::List(args) => actions::handle_action_list(&ctx, args).await,
            ActionCommand::Execute(args) => actions::handle_action_execute(&ctx, args).await,
        },
        // Handled before the client is built.
        Command::Config(_) => Ok(()),
    }
}

#[derive(Parser)]
#[command(
    name = "apictl",
    version,
    about = "Command-line client for JSON:API resource servers"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) globals: GlobalArgs,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Flags accepted by every subcommand.
#[derive(Args, Clone, Debug)]
pub(crate) struct GlobalArgs {
    #[arg(
        long,
        global = true,
        env = "APICTL_CONFIG",
        help = "Configuration file [default: ~/.apictl/config.json]"
    )]
    pub(crate) config: Option<PathBuf>,
    #[arg(long, global = true, env = "APICTL_BASE_URL")]
    pub(crate) base_url: Option<String>,
    #[arg(long, global = true, env = "APICTL_API_KEY", hide_env_values = true)]
    pub(crate) api_key: Option<String>,
    #[arg(
        long,
        global = true,
        env = "APICTL_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "Per-request timeout in seconds"
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, help = "Log requests and responses to stderr")]
    pub(crate) debug: bool,
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub(crate) log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Create a resource.
    Create(CreateArgs),
    /// Read one resource.
    Read(ResourceArgs),
    /// Update a resource's attributes.
    Update(UpdateArgs),
    /// Delete a resource.
    Delete(ResourceArgs),
    /// List a collection.
    List(ListArgs),
    /// Read or change a relationship.
    #[command(subcommand)]
    Relation(RelationCommand),
    /// Describe a resource type's columns, relations, and actions.
    Describe(TypeArgs),
    /// View or change a resource's permission bitmask.
    #[command(subcommand)]
    Permission(PermissionCommand),
    /// List or execute actions.
    #[command(subcommand)]
    Action(ActionCommand),
    /// Manage the local configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub(crate) enum RelationCommand {
    /// Fetch related resources (or linkage with --linkage).
    Get(RelationGetArgs),
    /// Replace the relationship.
    Update(RelationDataArgs),
    /// Add members to a to-many relationship.
    Add(RelationDataArgs),
    /// Remove members from a to-many relationship.
    Remove(RelationDataArgs),
}

#[derive(Subcommand)]
pub(crate) enum PermissionCommand {
    /// Show the current permission names.
    View(ResourceArgs),
    /// Replace the permission with the given names.
    Set(PermissionArgs),
    /// Grant the given names in addition to the current ones.
    Add(PermissionArgs),
    /// Revoke the given names.
    Remove(PermissionArgs),
}

#[derive(Subcommand)]
pub(crate) enum ActionCommand {
    /// List actions attached to a type.
    List(TypeArgs),
    /// Execute an action.
    Execute(ActionExecuteArgs),
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Write a configuration file from --base-url, --api-key, and --api-prefix.
    Init(ConfigInitArgs),
    /// Print the effective configuration with the API key redacted.
    Show,
}

#[derive(Args, Debug)]
pub(crate) struct TypeArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
}

#[derive(Args, Debug)]
pub(crate) struct ResourceArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
    #[arg(long)]
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct CreateArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
    #[arg(long, value_name = "JSON", help = "Attributes as a JSON object")]
    pub(crate) attributes: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct UpdateArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
    #[arg(long, default_value = "")]
    pub(crate) id: String,
    #[arg(long, value_name = "JSON", help = "Attributes to change as a JSON object")]
    pub(crate) attributes: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
    #[arg(long = "page[number]", alias = "page-number", value_name = "N")]
    pub(crate) page_number: Option<u64>,
    #[arg(long = "page[size]", alias = "page-size", value_name = "N")]
    pub(crate) page_size: Option<u64>,
    #[arg(long, value_name = "FIELD:VALUE,...")]
    pub(crate) filter: Option<String>,
    #[arg(long, value_name = "FIELDS", help = "Comma-separated; prefix with - to sort descending")]
    pub(crate) sort: Option<String>,
    #[arg(long, value_name = "RELATIONS")]
    pub(crate) include: Option<String>,
    #[arg(long, value_name = "TYPE:F1,F2;...")]
    pub(crate) fields: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RelationTarget {
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
    #[arg(long)]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) relation: String,
}

#[derive(Args, Debug)]
pub(crate) struct RelationGetArgs {
    #[command(flatten)]
    pub(crate) target: RelationTarget,
    #[arg(long, help = "Read resource identifiers from the relationship endpoint")]
    pub(crate) linkage: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RelationDataArgs {
    #[command(flatten)]
    pub(crate) target: RelationTarget,
    #[arg(
        long,
        value_name = "JSON",
        help = "Identifier, identifier array, null, or a {\"data\": ...} document"
    )]
    pub(crate) data: String,
}

#[derive(Args, Debug)]
pub(crate) struct PermissionArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
    #[arg(long)]
    pub(crate) id: String,
    #[arg(long, value_name = "NAME,...")]
    pub(crate) permissions: String,
}

#[derive(Args, Debug)]
pub(crate) struct ActionExecuteArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, value_name = "JSON", help = "Action inputs as a JSON object")]
    pub(crate) inputs: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ConfigInitArgs {
    #[arg(long, value_name = "PREFIX")]
    pub(crate) api_prefix: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Create(_) => "create",
        Command::Read(_) => "read",
        Command::Update(_) => "update",
        Command::Delete(_) => "delete",
        Command::List(_) => "list",
        Command::Relation(RelationCommand::Get(_)) => "relation_get",
        Command::Relation(RelationCommand::Update(_)) => "relation_update",
        Command::Relation(RelationCommand::Add(_)) => "relation_add",
        Command::Relation(RelationCommand::Remove(_)) => "relation_remove",
        Command::Describe(_) => "describe",
        Command::Permission(PermissionCommand::View(_)) => "permission_view",
        Command::Permission(PermissionCommand::Set(_)) => "permission_set",
        Command::Permission(PermissionCommand::Add(_)) => "permission_add",
        Command::Permission(PermissionCommand::Remove(_)) => "permission_remove",
        Command::Action(ActionCommand::List(_)) => "action_list",
        Command::Action(ActionCommand::Execute(_)) => "action_execute",
        Command::Config(ConfigCommand::Init(_)) => "config_init",
        Command::Config(ConfigCommand::Show) => "config_show",
    }
}
