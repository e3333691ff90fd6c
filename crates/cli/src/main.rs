//! Shopfront console - browse, shop and administer from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the session is kept in SHOPFRONT_SESSION_FILE)
//! shop login -e grace@example.com -p secret123
//!
//! # Browse and search the catalog
//! shop products list --page 2
//! shop products search mug
//!
//! # Cart and checkout
//! shop cart add 17 --quantity 2
//! shop cart set 5 3
//! shop cart checkout
//!
//! # Admin tables
//! shop admin products create --name Mug --price 9.50 --stock 10 --category 1 --image mug.png
//! shop admin orders status 42 shipped
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPFRONT_API_URL` - Backend base URL
//! - `SHOPFRONT_SESSION_FILE` - Where the session is stored
//! - `SHOPFRONT_PAGE_SIZE` - Search results per page
//! - `SENTRY_DSN` - Optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_core::{CartItemId, Email, OrderId, ProductId, ProfileUpdate};
use shopfront_storefront::{ApiClient, AppEvent, ClientConfig, EventBus, SessionStore};

mod commands;
mod output;

use commands::CommandResult;
use commands::admin::AdminArea;

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Shopfront console")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "SHOPFRONT_API_URL")]
    api_url: Option<String>,

    /// Session file
    #[arg(long, global = true, env = "SHOPFRONT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: Email,
        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: Email,
        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List categories
    Categories,
    /// Manage your cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Your orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Your account details
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Back-office tables (admins only)
    Admin {
        #[command(subcommand)]
        area: AdminArea,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// One page of the catalog
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Product details
    Show { id: ProductId },
    /// Search by id, name, category, description or price
    Search {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Use the backend's search instead of searching locally
        #[arg(long)]
        server: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product: ProductId,
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Set a line's quantity
    Set { item: CartItemId, quantity: i64 },
    /// Remove a line
    Remove { item: CartItemId },
    /// Empty the cart
    Clear,
    /// Place an order for everything in the cart
    Checkout,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Your order history
    List,
    /// Order details
    Show { id: OrderId },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show your profile
    Show,
    /// Change profile fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Apply command-line overrides on top of the environment.
fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(path) = &cli.session_file {
        config.session_file.clone_from(path);
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            output::hint(&format!("Invalid configuration: {e}"));
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info,shop=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let events = EventBus::default();
    let mut notifications = events.subscribe();

    let result = match ApiClient::new(
        &config,
        SessionStore::from_file(&config.session_file),
        events,
    ) {
        Ok(api) => run(&api, config.page_size, cli.command).await,
        Err(e) => Err(e.into()),
    };

    // The client emits LoginRequired at most once per session expiry.
    while let Ok(event) = notifications.try_recv() {
        if event == AppEvent::LoginRequired {
            output::hint("Your session has expired. Run `shop login` to sign in again.");
        }
    }

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(api: &ApiClient, page_size: usize, command: Commands) -> CommandResult {
    use commands::{account, shop};

    match command {
        Commands::Login { email, password } => account::login(api, email, password).await,
        Commands::Register {
            name,
            email,
            password,
            confirm,
        } => account::register(api, name, email, password, confirm).await,
        Commands::Logout => account::logout(api).await,
        Commands::Whoami => account::whoami(api).await,
        Commands::Products { action } => match action {
            ProductsAction::List { page } => shop::products_list(api, page_size, page).await,
            ProductsAction::Show { id } => shop::product_show(api, id).await,
            ProductsAction::Search {
                query,
                page,
                server,
            } => shop::products_search(api, page_size, &query, page, server).await,
        },
        Commands::Categories => shop::categories(api).await,
        Commands::Cart { action } => match action {
            CartAction::Show => shop::cart_show(api).await,
            CartAction::Add { product, quantity } => shop::cart_add(api, product, quantity).await,
            CartAction::Set { item, quantity } => shop::cart_set(api, item, quantity).await,
            CartAction::Remove { item } => shop::cart_remove(api, item).await,
            CartAction::Clear => shop::cart_clear(api).await,
            CartAction::Checkout => shop::checkout(api).await,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => shop::orders_list(api).await,
            OrdersAction::Show { id } => shop::order_show(api, id).await,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Show => account::profile_show(api).await,
            ProfileAction::Update {
                name,
                phone,
                address,
                city,
                password,
            } => {
                account::profile_update(
                    api,
                    ProfileUpdate {
                        name,
                        phone,
                        address,
                        city,
                        password,
                    },
                )
                .await
            }
        },
        Commands::Admin { area } => commands::admin::run(api, page_size, area).await,
    }
}
