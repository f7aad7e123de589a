//! Bakeline CLI - Browse the catalog, manage a cart, place and track orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! bake-cli catalog list
//! bake-cli catalog show 12
//!
//! # Build a cart and check out
//! bake-cli cart add 12 --quantity 2 --option 31 --option 44
//! bake-cli cart show
//! bake-cli cart checkout
//!
//! # Order history and the distributor daily view
//! bake-cli orders list --date 2026-08-26
//! bake-cli distribution daily --date 2026-08-26
//! ```
//!
//! # Environment Variables
//!
//! - `BAKELINE_API_BASE_URL` - Base URL of the ordering backend (required)
//! - `BAKELINE_TIMEOUT_SECS` - Overall request timeout (default 30)
//! - `BAKELINE_SESSION_FILE` / `BAKELINE_CART_FILE` - State file locations

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use bakeline_client::{Bakeline, config::ClientConfig};
use bakeline_core::PriceChannel;

mod commands;

#[derive(Parser)]
#[command(name = "bake-cli")]
#[command(author, version, about = "Bakeline ordering CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which price channel to display amounts for.
#[derive(Clone, Copy, ValueEnum)]
enum Channel {
    Retail,
    Wholesale,
}

impl From<Channel> for PriceChannel {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Retail => Self::Retail,
            Channel::Wholesale => Self::Wholesale,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Distributor views
    Distribution {
        #[command(subcommand)]
        action: DistributionAction,
    },
    /// Log in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out and drop the stored session
    Logout,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List all products
    List,
    /// Show a product with its option groups
    Show {
        /// Product id
        id: i64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the current cart
    Show {
        #[arg(long, value_enum, default_value = "retail")]
        channel: Channel,
    },
    /// Add a product to the cart
    Add {
        /// Product id
        id: i64,

        /// Quantity to add
        #[arg(short, long, default_value = "1")]
        quantity: u32,

        /// Selected option item id (repeatable)
        #[arg(short, long = "option")]
        options: Vec<i64>,
    },
    /// Remove a line from the cart
    Remove {
        /// Product id
        id: i64,

        /// Selected option item id (repeatable)
        #[arg(short, long = "option")]
        options: Vec<i64>,
    },
    /// Change a line's quantity
    SetQty {
        /// Product id
        id: i64,

        /// New quantity
        quantity: u32,

        /// Selected option item id (repeatable)
        #[arg(short, long = "option")]
        options: Vec<i64>,
    },
    /// Empty the cart
    Clear,
    /// Place an order from the current cart
    Checkout,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, optionally for one delivery date
    List {
        /// Delivery date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, value_enum, default_value = "retail")]
        channel: Channel,
    },
    /// Show one order with per-line fulfillment state
    Show {
        /// Order id
        id: i64,

        #[arg(long, value_enum, default_value = "retail")]
        channel: Channel,
    },
}

#[derive(Subcommand)]
enum DistributionAction {
    /// Per-product roll-up of a day's orders
    Daily {
        /// Delivery date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, value_enum, default_value = "wholesale")]
        channel: Channel,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let app = Bakeline::new(ClientConfig::from_env()?)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(&app).await?,
            CatalogAction::Show { id } => commands::catalog::show(&app, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show { channel } => {
                commands::cart::show(&app, channel.into()).await?;
            }
            CartAction::Add {
                id,
                quantity,
                options,
            } => commands::cart::add(&app, id, quantity, &options).await?,
            CartAction::Remove { id, options } => {
                commands::cart::remove(&app, id, &options).await?;
            }
            CartAction::SetQty {
                id,
                quantity,
                options,
            } => commands::cart::set_quantity(&app, id, quantity, &options).await?,
            CartAction::Clear => commands::cart::clear(&app).await?,
            CartAction::Checkout => commands::cart::checkout(&app).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List { date, channel } => {
                commands::orders::list(&app, date, channel.into()).await?;
            }
            OrdersAction::Show { id, channel } => {
                commands::orders::show(&app, id, channel.into()).await?;
            }
        },
        Commands::Distribution { action } => match action {
            DistributionAction::Daily { date, channel } => {
                commands::distribution::daily(&app, date, channel.into()).await?;
            }
        },
        Commands::Login { email, password } => {
            commands::auth::login(&app, &email, password).await?;
        }
        Commands::Logout => commands::auth::logout(&app).await,
    }
    Ok(())
}
