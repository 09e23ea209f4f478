use sea_orm_migration::prelude::*;

use wafi_storefront_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
