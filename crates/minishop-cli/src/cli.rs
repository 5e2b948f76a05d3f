use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use minishop_core::orders::OrderLineRequest;
use minishop_db::models::types::{ItemType, OrderStatus};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a default, documented config file
    #[clap(name = "defconfig")]
    DefConfig,

    /// Print the configuration file to stdout
    Config,

    /// View env
    Env,

    /// Insert the sample teams, members and items
    Seed,

    /// Manage teams
    #[command(arg_required_else_help = true)]
    Team {
        #[clap(subcommand)]
        action: TeamAction,
    },

    /// Manage and search members
    #[command(arg_required_else_help = true)]
    Member {
        #[clap(subcommand)]
        action: MemberAction,
    },

    /// Manage the item catalog
    #[command(arg_required_else_help = true)]
    Item {
        #[clap(subcommand)]
        action: ItemAction,
    },

    /// Place, inspect and cancel orders
    #[command(arg_required_else_help = true)]
    Order {
        #[clap(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
pub enum TeamAction {
    /// Create a team
    Add {
        /// Team name
        name: String,
    },

    /// List teams with their members
    #[clap(visible_alias = "ls")]
    List,

    /// Show the average member age per team
    Stats,
}

#[derive(Subcommand)]
pub enum MemberAction {
    /// Register a member
    Add {
        /// Username
        username: String,

        /// Age of the member
        #[arg(required = true, long)]
        age: i32,

        /// Name of the team to join
        #[arg(required = false, long)]
        team: Option<String>,
    },

    /// Search members with optional filters
    #[clap(visible_alias = "s")]
    Search {
        /// Exact username
        #[arg(required = false, long)]
        username: Option<String>,

        /// Exact team name
        #[arg(required = false, long)]
        team_name: Option<String>,

        /// Minimum age (inclusive)
        #[arg(required = false, long)]
        age_goe: Option<i32>,

        /// Maximum age (inclusive)
        #[arg(required = false, long)]
        age_loe: Option<i32>,

        /// Zero-based page number
        #[arg(required = false, long, conflicts_with = "offset", allow_negative_numbers = true)]
        page: Option<i64>,

        /// Number of rows to skip
        #[arg(required = false, long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Rows per page
        #[arg(required = false, long, allow_negative_numbers = true)]
        size: Option<i64>,

        /// Always run the count query
        #[arg(required = false, long)]
        simple: bool,
    },

    /// Show count, sum, average, maximum and minimum age
    Stats,

    /// Rename every member younger than AGE
    RenameYoungerThan {
        /// Age bound (exclusive)
        age: i32,

        /// New username
        username: String,
    },

    /// Remove every member younger than AGE
    RemoveYoungerThan {
        /// Age bound (exclusive)
        age: i32,
    },
}

#[derive(Subcommand)]
pub enum ItemAction {
    /// Add a book to the catalog
    AddBook {
        /// Title
        name: String,

        #[arg(required = true, long)]
        price: i32,

        #[arg(required = true, long)]
        stock: i32,

        #[arg(required = false, long)]
        author: Option<String>,

        #[arg(required = false, long)]
        isbn: Option<String>,
    },

    /// Add a movie to the catalog
    AddMovie {
        /// Title
        name: String,

        #[arg(required = true, long)]
        price: i32,

        #[arg(required = true, long)]
        stock: i32,

        #[arg(required = false, long)]
        artist: Option<String>,

        #[arg(required = false, long)]
        etc: Option<String>,
    },

    /// List catalog items
    #[clap(visible_alias = "ls")]
    List {
        /// Only list one kind of item
        #[arg(required = false, long = "type", value_enum)]
        item_type: Option<ItemTypeArg>,
    },
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Place an order
    Place {
        /// Ordering member id
        #[arg(required = true, long)]
        member: i32,

        /// Item and quantity as ID:QTY, repeatable
        #[arg(required = true, long = "item", value_parser = parse_order_line)]
        items: Vec<OrderLineRequest>,

        #[arg(required = false, long)]
        city: Option<String>,

        #[arg(required = false, long)]
        street: Option<String>,

        #[arg(required = false, long)]
        zipcode: Option<String>,
    },

    /// Show an order with its lines
    Show {
        /// Order id
        id: i32,
    },

    /// List orders, newest first
    #[clap(visible_alias = "ls")]
    List {
        /// Only orders of this member
        #[arg(required = false, long)]
        member: Option<i32>,

        /// Only orders in this state
        #[arg(required = false, long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Cancel an order and restock its items
    Cancel {
        /// Order id
        id: i32,
    },

    /// Mark the delivery of an order as completed
    Deliver {
        /// Order id
        id: i32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ItemTypeArg {
    Book,
    Movie,
}

impl From<ItemTypeArg> for ItemType {
    fn from(value: ItemTypeArg) -> Self {
        match value {
            ItemTypeArg::Book => ItemType::Book,
            ItemTypeArg::Movie => ItemType::Movie,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Ordered,
    Cancelled,
}

impl From<StatusArg> for OrderStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Ordered => OrderStatus::Ordered,
            StatusArg::Cancelled => OrderStatus::Cancelled,
        }
    }
}

fn parse_order_line(value: &str) -> Result<OrderLineRequest, String> {
    let (item_id, quantity) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ID:QTY, got '{value}'"))?;

    let item_id = item_id
        .trim()
        .parse()
        .map_err(|_| format!("invalid item id '{item_id}'"))?;
    let quantity = quantity
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity '{quantity}'"))?;

    Ok(OrderLineRequest { item_id, quantity })
}
