pub mod core;
pub(crate) mod routes;
pub mod token;
pub(crate) mod types;
pub(crate) mod utils;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use crate::core::config::AuthorityConfig;
pub use crate::core::credentials::CredentialStore;
use crate::core::error::ConfigError as Error;
use crate::core::{config::Args, state::AppState};
pub use crate::token::{Identity, TokenAuthority, TokenRequest};

pub async fn run() -> Result<(), Error> {
    let config = Args::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_default())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let authority = TokenAuthority::new(&AuthorityConfig::try_from(&config)?);
    let credentials = CredentialStore::parse(&config.auth_accounts);

    if credentials.is_empty() {
        tracing::warn!("No accounts configured, authentication is disabled");
    } else {
        tracing::info!("Loaded {} account(s)", credentials.len());
    }

    tracing::debug!("{:?}", authority);

    let app = routes::router::routes(AppState::new(credentials, authority));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(Error::IO)?;

    tracing::info!("listening on port {}", config.port);

    axum::serve(listener, app).await.map_err(Error::IO)?;

    Ok(())
}
