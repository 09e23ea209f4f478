use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait as _;
use tracing::info;

use wafi_auth_types::identity::JwtSecret;
use wafi_core::config::Config as _;
use wafi_core::tracing::init_tracing;
use wafi_domain::user::UserRole;
use wafi_storefront::config::StorefrontConfig;
use wafi_storefront::domain::handoff::WhatsAppHandoff;
use wafi_storefront::infra::seed::default_catalog;
use wafi_storefront::router::build_router;
use wafi_storefront::state::AppState;
use wafi_storefront::usecase::product::SeedCatalogUseCase;
use wafi_storefront::usecase::user::{RegisterInput, RegisterUseCase};
use wafi_storefront_migration::Migrator;

#[derive(Parser)]
#[command(about = "Storefront REST API with WhatsApp order handoff")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Migrate, seed when enabled, and serve HTTP (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Insert the bundled catalog into an empty products table
    Seed,
    /// Create an admin account
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD")]
        password: String,
        #[arg(long, default_value = "Admin")]
        first_name: String,
        #[arg(long, default_value = "Belleza")]
        last_name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = StorefrontConfig::from_env().context("load storefront config")?;
    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;
    let state = AppState {
        db,
        jwt_secret: JwtSecret::new(config.jwt_secret.as_str()),
        token_ttl_secs: config.token_ttl_secs,
        handoff: WhatsAppHandoff {
            merchant_number: config.merchant_whatsapp_number.clone(),
            public_base_url: config.public_base_url.clone(),
            shop_name: config.shop_name.clone(),
        },
    };

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            migrate(&state.db).await?;
            if config.seed_catalog {
                seed(&state).await?;
            }
            serve(state, config.storefront_port).await
        }
        Command::Migrate => migrate(&state.db).await,
        Command::Seed => seed(&state).await,
        Command::CreateAdmin {
            email,
            password,
            first_name,
            last_name,
        } => {
            migrate(&state.db).await?;
            let usecase = RegisterUseCase {
                users: state.user_repo(),
                hasher: state.password_hasher(),
                tokens: state.token_settings(),
            };
            let out = usecase
                .execute(RegisterInput {
                    email,
                    password,
                    first_name,
                    last_name,
                    role: UserRole::Admin,
                })
                .await
                .context("create admin account")?;
            info!(user_id = %out.user.id, email = %out.user.email, "admin account created");
            Ok(())
        }
    }
}

async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
    Migrator::up(db, None).await.context("run migrations")?;
    info!("migrations applied");
    Ok(())
}

async fn seed(state: &AppState) -> anyhow::Result<()> {
    let usecase = SeedCatalogUseCase {
        repo: state.product_repo(),
    };
    let inserted = usecase
        .execute(default_catalog()?)
        .await
        .context("seed catalog")?;
    if inserted == 0 {
        info!("catalog already populated, seed skipped");
    }
    Ok(())
}

async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let router = build_router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("storefront service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
