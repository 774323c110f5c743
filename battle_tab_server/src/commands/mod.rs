use std::net::SocketAddr;

use tracing::info;

use crate::config::Config;
use crate::db::{self, DatabaseConfig};
use crate::state::AppState;

#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Run the HTTP server
    #[default]
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

impl Command {
    pub async fn run(&self, config: &Config) -> anyhow::Result<()> {
        match self {
            Command::Serve => {
                let addr: SocketAddr = config.address().parse()?;
                let app_state = AppState::new(config).await?;
                let app = crate::app_with_state(app_state).await;

                info!("Listening on {}", addr);
                axum::Server::bind(&addr)
                    .serve(app.into_make_service())
                    .await?;
                Ok(())
            }
            Command::Migrate => {
                let db = db::set_up_db(DatabaseConfig::new(config.db_url.clone())).await?;
                db::migrate(&db).await?;
                Ok(())
            }
        }
    }
}
