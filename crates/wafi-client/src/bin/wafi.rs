//! Command-line shopper for the Wafi storefront API.
//!
//! # Usage
//!
//! ```bash
//! wafi products --category "Produits de Beauté"
//! wafi login --email awa@example.sn --password secret123
//! WAFI_TOKEN=... wafi reserve 12
//! wafi order --first-name Awa --last-name Diop --phone 771234567 --item 3:2 --item 5:1
//! ```

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wafi_client::api::ApiClient;
use wafi_client::cart::Cart;
use wafi_client::forms::{CheckoutForm, RegisterForm};
use wafi_client::model::{OrderRequest, Product};
use wafi_domain::id::ProductId;
use wafi_domain::pagination::PageRequest;

#[derive(Parser)]
#[command(about = "Browse the Wafi catalog and place orders from the terminal")]
struct Args {
    /// Storefront origin, without the /api suffix
    #[arg(long, env = "WAFI_API_URL", default_value = "http://localhost:5002")]
    base_url: String,

    /// Bearer token printed by `login` or `register`
    #[arg(long, env = "WAFI_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List active products
    Products {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, default_value_t = 25)]
        per_page: u32,
    },
    /// List category summaries
    Categories,
    /// Show one product
    Product { id: i32 },
    /// Create an account and print its token
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Sign in and print the token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Place an order and print the WhatsApp link
    Order {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        /// `<product id>:<quantity>`, repeatable
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<(i32, u32)>,
    },
    /// List your orders
    Orders,
    /// Ask to be notified when an out-of-stock product returns
    Reserve { id: i32 },
    /// WhatsApp link asking the merchant about a restock
    RestockLink { id: i32 },
    /// List your notifications
    Notifications,
    /// Mark every notification as read
    MarkRead,
}

fn parse_item(s: &str) -> Result<(i32, u32), String> {
    let (id, quantity) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <id>:<quantity>, got {s}"))?;
    let id = id.parse().map_err(|e| format!("bad product id {id}: {e}"))?;
    let quantity = quantity
        .parse()
        .map_err(|e| format!("bad quantity {quantity}: {e}"))?;
    Ok((id, quantity))
}

fn print_product(p: &Product) {
    let availability = if p.purchasable() {
        format!("{} en stock", p.stock)
    } else {
        "indisponible".to_owned()
    };
    println!(
        "#{:<4} {:<40} {:>10} FCFA  [{}] {}",
        p.id, p.name, p.price, p.category, availability
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut client = ApiClient::new(&args.base_url);
    if let Some(token) = args.token {
        client = client.with_token(token);
    }

    match args.command {
        Command::Products {
            category,
            page,
            per_page,
        } => {
            let page = page.map(|page| PageRequest { per_page, page });
            for p in client.products(category.as_deref(), page).await? {
                print_product(&p);
            }
        }
        Command::Categories => {
            for c in client.categories().await? {
                println!("{:<45} {} produit(s)", c.name, c.product_count);
            }
        }
        Command::Product { id } => {
            let p = client.product(ProductId(id)).await?;
            print_product(&p);
            if !p.description.is_empty() {
                println!("\n{}", p.description);
            }
        }
        Command::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let form = RegisterForm {
                first_name,
                last_name,
                email,
                password,
            };
            let session = client.register(&form).await?;
            println!("{}", session.token);
        }
        Command::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            println!("{}", session.token);
        }
        Command::Order {
            first_name,
            last_name,
            phone,
            address,
            items,
        } => {
            let customer = CheckoutForm {
                first_name,
                last_name,
                phone,
                address,
            }
            .into_contact()?;

            let mut cart = Cart::new();
            for (id, quantity) in items {
                let product = client
                    .product(ProductId(id))
                    .await
                    .with_context(|| format!("load product {id}"))?;
                cart.add(&product)?;
                cart.update_quantity(product.id, quantity);
            }
            if cart.is_empty() {
                bail!("nothing to order");
            }

            let placed = client
                .create_order(&OrderRequest {
                    customer,
                    items: cart.order_lines(),
                })
                .await?;
            println!("order {} total {} FCFA", placed.order.id, placed.order.total);
            println!("{}", placed.whatsapp_url);
        }
        Command::Orders => {
            for o in client.my_orders().await? {
                println!(
                    "{}  {}  {:>10} FCFA  {} ligne(s)  {}",
                    o.created_at.format("%Y-%m-%d %H:%M"),
                    o.id,
                    o.total,
                    o.items.len(),
                    o.status
                );
            }
        }
        Command::Reserve { id } => {
            let r = client.reserve(ProductId(id)).await?;
            println!("reserved product {} at {}", r.product_id, r.created_at);
        }
        Command::RestockLink { id } => {
            println!("{}", client.restock_link(ProductId(id)).await?);
        }
        Command::Notifications => {
            for n in client.notifications().await? {
                let marker = if n.read { " " } else { "*" };
                println!("{marker} {}  {}", n.created_at.format("%Y-%m-%d %H:%M"), n.message);
            }
        }
        Command::MarkRead => {
            let updated = client.mark_notifications_read().await?;
            println!("{updated} notification(s) marked read");
        }
    }
    Ok(())
}
