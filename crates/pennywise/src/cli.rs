//! Clap derive structures for the `pennywise` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pennywise -- track accounts, budgets and savings goals
#[derive(Debug, Parser)]
#[command(
    name = "pennywise",
    version,
    about = "Track personal finances from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "PENNYWISE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Document service URL (overrides profile)
    #[arg(long, short = 'S', env = "PENNYWISE_SERVER", global = true)]
    pub server: Option<String>,

    /// Owner id to sync as (overrides profile)
    #[arg(long, short = 'u', env = "PENNYWISE_USER", global = true)]
    pub user: Option<String>,

    /// API token
    #[arg(long, env = "PENNYWISE_API_TOKEN", global = true, hide_env = true)]
    pub api_token: Option<String>,

    /// Work against a throwaway in-memory store instead of the server
    #[arg(long, global = true)]
    pub offline: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PENNYWISE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PENNYWISE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PENNYWISE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage accounts
    #[command(alias = "acc", alias = "a")]
    Accounts(AccountsArgs),

    /// Manage transactions
    #[command(alias = "tx", alias = "t")]
    Transactions(TransactionsArgs),

    /// Manage savings goals
    #[command(alias = "g")]
    Goals(GoalsArgs),

    /// Manage budget categories
    #[command(alias = "b")]
    Budget(BudgetArgs),

    /// Show balances, income, expenses and spending per category
    Summary,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AccountKindArg {
    Checking,
    Savings,
    Credit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransactionKindArg {
    Income,
    Expense,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// List accounts
    #[command(alias = "ls")]
    List,

    /// Show one account with its latest transactions
    Get {
        /// Account id
        id: String,

        /// Number of transactions to show
        #[arg(long, short = 'n', default_value = "3")]
        recent: usize,
    },

    /// Open a new account
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Account type
        #[arg(long = "type", value_enum, default_value = "checking")]
        kind: AccountKindArg,

        /// Currency code (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Delete an account and all of its transactions
    #[command(alias = "rm")]
    Delete {
        /// Account id
        id: String,
    },

    /// Move money between two accounts
    Transfer {
        /// Source account id
        #[arg(long)]
        from: String,

        /// Destination account id
        #[arg(long)]
        to: String,

        /// Amount to move
        #[arg(long)]
        amount: Decimal,

        /// Free-text note
        #[arg(long, default_value = "")]
        description: String,

        /// Booking date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TRANSACTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TransactionsArgs {
    #[command(subcommand)]
    pub command: TransactionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TransactionsCommand {
    /// List transactions (of the first account unless --account is given)
    #[command(alias = "ls")]
    List {
        /// Account id
        #[arg(long, short = 'a')]
        account: Option<String>,

        /// List transactions of every account
        #[arg(long, conflicts_with = "account")]
        all: bool,
    },

    /// Record a transaction
    Create(TransactionFields),

    /// Change a transaction; omitted fields keep their value
    Update {
        /// Transaction id
        id: String,

        /// Account id
        #[arg(long)]
        account: Option<String>,

        /// Amount, entered without sign
        #[arg(long)]
        amount: Option<Decimal>,

        /// Income or expense
        #[arg(long = "type", value_enum)]
        kind: Option<TransactionKindArg>,

        /// Category name
        #[arg(long)]
        category: Option<String>,

        /// Free-text note
        #[arg(long)]
        description: Option<String>,

        /// Booking date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Goal id (only kept for the "Goal" category)
        #[arg(long)]
        goal: Option<String>,
    },

    /// Delete a transaction
    #[command(alias = "rm")]
    Delete {
        /// Transaction id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct TransactionFields {
    /// Account id (defaults to the first account)
    #[arg(long, short = 'a')]
    pub account: Option<String>,

    /// Amount, entered without sign
    #[arg(long)]
    pub amount: Decimal,

    /// Income or expense
    #[arg(long = "type", value_enum, default_value = "expense")]
    pub kind: TransactionKindArg,

    /// Category name
    #[arg(long, default_value = "Other")]
    pub category: String,

    /// Free-text note
    #[arg(long, default_value = "")]
    pub description: String,

    /// Booking date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Goal id to contribute to (requires --category Goal)
    #[arg(long)]
    pub goal: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GOALS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GoalsArgs {
    #[command(subcommand)]
    pub command: GoalsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GoalsCommand {
    /// List goals with progress
    #[command(alias = "ls")]
    List,

    /// Create a savings goal
    Create {
        /// Goal name
        #[arg(long)]
        name: String,

        /// Amount to save
        #[arg(long)]
        target: Decimal,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: NaiveDate,

        /// Colour (defaults to the next palette colour)
        #[arg(long)]
        color: Option<String>,
    },

    /// Change a goal; omitted fields keep their value
    Update {
        /// Goal id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        target: Option<Decimal>,

        #[arg(long)]
        deadline: Option<NaiveDate>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a goal and detach its transactions
    #[command(alias = "rm")]
    Delete {
        /// Goal id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BUDGET
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BudgetArgs {
    #[command(subcommand)]
    pub command: BudgetCommand,
}

#[derive(Debug, Subcommand)]
pub enum BudgetCommand {
    /// List budget categories with usage
    #[command(alias = "ls")]
    List,

    /// Create a budget category
    Create {
        /// Category name, matched against transaction categories
        #[arg(long)]
        name: String,

        /// Monthly limit
        #[arg(long)]
        limit: Decimal,

        /// Colour (hex)
        #[arg(long)]
        color: Option<String>,
    },

    /// Change a budget category; renaming does not touch transactions
    Update {
        /// Category id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        limit: Option<Decimal>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a budget category; its transactions move to "Other"
    #[command(alias = "rm")]
    Delete {
        /// Category id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: server, user, api_token, api_token_env, insecure, timeout, debounce_ms, ca_cert
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the API token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
