use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "numicollec",
    version,
    about = "collection page client for numista",
    long_about = "numicollec drives the \"my collection\" page of a numista account from the terminal: add or edit items, remove them, toggle wishes, save legacy quantities and personal comments, upload pictures.\n\nExamples:\n  numicollec save --coin 95 --quantity 2 --grade vf\n  numicollec remove --item 1234 --coin 95 --yes\n  numicollec want 95\n  numicollec upload --coin 95 front.jpg back.jpg\n  numicollec api items --type coin\n\nTip: Put the session cookie in ~/.numicollec/config.yml to keep invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        global = true,
        help_heading = "Output",
        help = "Result format (text or json)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.numicollec/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Saved collection page to repaint and recount (HTML)."
    )]
    pub page: Option<PathBuf>,

    #[arg(
        short = 'u',
        long = "bu",
        visible_alias = "base-url",
        value_name = "URL",
        global = true,
        help_heading = "Connection",
        help = "Site origin (defaults to https://en.numista.com)."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 's',
        long = "ses",
        visible_alias = "session",
        value_name = "COOKIE",
        global = true,
        help_heading = "Connection",
        help = "Session cookie sent with every request (name=value; ...)."
    )]
    pub session: Option<String>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "Connection",
        help = "HTTP request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'P',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        global = true,
        help_heading = "Connection",
        help = "HTTP proxy URL."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "ak",
        visible_alias = "api-key",
        value_name = "KEY",
        global = true,
        help_heading = "Connection",
        help = "Numista API key, needed by the api subcommands."
    )]
    pub api_key: Option<String>,

    #[arg(
        long = "abu",
        visible_alias = "api-base-url",
        value_name = "URL",
        global = true,
        help_heading = "Connection",
        help = "API root (defaults to https://api.numista.com/api/v3)."
    )]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add an item to the collection, or edit it with --item
    Save(ItemArgs),
    /// Remove an item from the collection
    Remove {
        #[arg(long, value_name = "ID")]
        item: u32,
        #[arg(long, value_name = "ID")]
        version: Option<u32>,
        #[arg(long, value_name = "ID")]
        coin: u32,
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Put a collectible type on the wish list
    Want {
        type_tag: String,
        /// Clear the flag instead of setting it
        #[arg(long)]
        off: bool,
    },
    /// Mark a collectible type as not wanted
    DontWant {
        type_tag: String,
        #[arg(long)]
        off: bool,
    },
    /// Save a legacy per-status quantity
    Quantity {
        #[arg(long, value_name = "ID")]
        piece: u32,
        #[arg(long, value_name = "STATUS")]
        status: String,
        #[arg(long, value_name = "N")]
        quantity: String,
        /// Recount the legacy totals of this type afterwards
        #[arg(long = "type", value_name = "TYPE")]
        type_piece: Option<String>,
    },
    /// Edit the personal comment of a piece
    Comment {
        #[arg(long, value_name = "ID")]
        piece: u32,
        /// New comment; prompts when omitted
        #[arg(long)]
        text: Option<String>,
        /// Comment currently shown, used as the prompt's starting text
        #[arg(long)]
        previous: Option<String>,
    },
    /// Upload pictures or PDF documents for an item
    Upload {
        #[arg(long, value_name = "ID")]
        coin: u32,
        #[arg(long = "type", value_name = "TYPE", default_value = "coin")]
        collectible_type: String,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Print the item form markup without sending anything
    Form(ItemArgs),
    /// Read and edit the collection through the public API
    Api(ApiArgs),
    /// Write a default config file if none exists
    InitConfig,
}

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    #[arg(
        long,
        value_name = "ID",
        global = true,
        help = "User to act on (defaults to the owner of the API key)."
    )]
    pub user: Option<u64>,

    #[command(subcommand)]
    pub action: ApiAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ApiAction {
    /// Fetch a token for the owner of the API key
    Token,
    /// List the user's collections
    Collections {
        #[arg(long = "type", value_name = "TYPE")]
        collectible_type: Option<String>,
    },
    /// List collected items
    Items {
        #[arg(long = "type", value_name = "TYPE")]
        collectible_type: Option<String>,
        #[arg(long, value_name = "ID")]
        type_id: Option<u64>,
        #[arg(long, value_name = "ID")]
        collection: Option<u64>,
    },
    /// Show one collected item
    Item { id: u64 },
    /// Add an item to the collection
    Add(ApiItemArgs),
    /// Change fields of a collected item
    Edit {
        id: u64,
        #[command(flatten)]
        fields: ApiItemArgs,
    },
    /// Delete a collected item
    Delete {
        id: u64,
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ApiItemArgs {
    #[arg(long, value_name = "ID", help = "Catalogue type of the item.")]
    pub type_id: Option<u64>,

    #[arg(long, value_name = "ID")]
    pub issue: Option<u64>,

    #[arg(long, value_name = "N")]
    pub quantity: Option<u32>,

    #[arg(long, value_name = "GRADE", help = "Grade (g, vg, f, vf, xf, au, unc).")]
    pub grade: Option<String>,

    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Offer the item for exchange."
    )]
    pub swap: Option<bool>,

    #[arg(long, help = "Private comment.")]
    pub comment: Option<String>,

    #[arg(long)]
    pub public_comment: Option<String>,

    #[arg(long, value_name = "AMOUNT", help = "Buying price.")]
    pub price: Option<String>,

    #[arg(long, value_name = "CODE", requires = "price", help = "Price currency (defaults to USD).")]
    pub currency: Option<String>,

    #[arg(long, value_name = "ID")]
    pub collection: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ItemArgs {
    #[arg(long, value_name = "ID")]
    pub coin: u32,

    #[arg(
        long = "type",
        value_name = "TYPE",
        default_value = "coin",
        help = "Collectible type (coin, banknote or exonumia)."
    )]
    pub collectible_type: String,

    #[arg(long, value_name = "ID")]
    pub version: Option<u32>,

    #[arg(long, value_name = "ID", help = "Existing item to edit.")]
    pub item: Option<u32>,

    #[arg(long, value_name = "N")]
    pub quantity: Option<u32>,

    #[arg(long, value_name = "GRADE", help = "Grade (g, vg, f, vf, xf, au, unc).")]
    pub grade: Option<String>,

    #[arg(long, value_name = "AMOUNT", help = "Buying value.")]
    pub value: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,

    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Offer the item for exchange."
    )]
    pub swap: Option<bool>,

    #[arg(long)]
    pub swap_comment: Option<String>,

    #[arg(long, value_name = "ID")]
    pub section: Option<u32>,

    #[arg(
        long,
        value_name = "FILES",
        help = "Pictures already attached, comma-separated."
    )]
    pub pictures: Option<String>,

    #[arg(long, help = "Open a fresh form for the same collectible after saving.")]
    pub add_again: bool,
}
