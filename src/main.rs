// src/main.rs
//
// Storefront command line: seed, browse and inspect a local store file.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use storefront::application::dto::{format_money, OrderTrackingDto};
use storefront::{
    get_database_stats, seed_catalog, verify_database_integrity, AppState, ProductCategory,
    RegisterRequest, StoreConfig,
};

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Local storefront store: catalog, orders and tracking")]
struct Cli {
    /// Database file, overrides the configured path
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the demo catalog (safe to run repeatedly)
    Seed,

    /// List products
    Catalog {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        search: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        password: String,
    },

    /// List a customer's orders
    Orders {
        #[arg(long)]
        email: String,
    },

    /// Show the tracking summary of an order
    Track {
        #[arg(long)]
        order: Uuid,
    },

    /// Move an order to its next delivery stage
    Advance {
        #[arg(long)]
        order: Uuid,
    },

    /// Cancel an order that has not shipped yet
    Cancel {
        #[arg(long)]
        order: Uuid,
    },

    /// Integrity check, then database size and row counts
    Stats,
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let mut config = StoreConfig::load().context("failed to load configuration")?;
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    let state = AppState::initialize(&config).context("failed to open store")?;
    let currency = state.config.currency.clone();

    match cli.command {
        Command::Seed => {
            let added = seed_catalog(&state.catalog_service)?;
            println!("{} products added", added);
        }

        Command::Catalog { category, search } => {
            let products = match (category, search) {
                (Some(_), Some(_)) => bail!("use either --category or --search, not both"),
                (Some(category), None) => {
                    let category: ProductCategory = category.parse()?;
                    state.catalog_service.products_in_category(category)?
                }
                (None, Some(query)) => state.catalog_service.search(&query)?,
                (None, None) => state.catalog_service.list_products()?,
            };

            for product in products {
                println!(
                    "{}  {:<28} {:<12} {:>12}  stock {}",
                    product.id,
                    product.name,
                    product.category,
                    format_money(product.effective_price_cents(), &currency),
                    product.stock
                );
            }
        }

        Command::Register {
            email,
            name,
            password,
        } => {
            let user = state.auth_service.register(RegisterRequest {
                email,
                display_name: name,
                password,
            })?;
            println!("Registered {} ({})", user.email, user.id);
        }

        Command::Orders { email } => {
            let user = state
                .auth_service
                .find_user_by_email(&email)
                .with_context(|| format!("no account for {}", email))?;

            for order in state.order_service.list_orders(user.id)? {
                println!(
                    "{}  {}  {:<10} {:>12}",
                    order.id,
                    order.placed_at.format("%Y-%m-%d %H:%M"),
                    order.status,
                    format_money(order.total_cents, &currency)
                );
            }
        }

        Command::Track { order } => {
            for line in state.order_service.track_order(order)? {
                print_tracking(&OrderTrackingDto::from(line));
            }
        }

        Command::Advance { order } => {
            let status = state.order_service.advance_status(order)?;
            println!("Order {} is now {}", order, status);
        }

        Command::Cancel { order } => {
            state.order_service.cancel_order(order)?;
            println!("Order {} cancelled", order);
        }

        Command::Stats => {
            let conn = state.pool.get()?;
            verify_database_integrity(&conn).context("integrity check failed")?;
            let stats = get_database_stats(&conn)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

fn print_tracking(line: &OrderTrackingDto) {
    let variant = [line.size.as_str(), line.color.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" / ");

    println!("{} x{} {}", line.product_name, line.quantity, variant);
    for stage in &line.stages {
        let mark = if stage.reached { "x" } else { " " };
        println!(
            "  [{}] {:<16} {}",
            mark,
            stage.label,
            stage.reached_at.as_deref().unwrap_or("")
        );
    }
    if line.is_cancelled {
        println!("  cancelled");
    }
}
