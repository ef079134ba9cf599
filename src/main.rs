//! streamgate - bootstrap binary.
//!
//! Usage: `streamgate [config.toml] [api-key path]`
//!
//! Opens the database, seeds the configured phone carriers and, when an
//! API key and a path are given, resolves the path as that device.

use std::sync::Arc;
use streamgate::bootstrap::seed_carriers;
use streamgate::config::{self, Config};
use streamgate::telemetry::{self, spans};
use streamgate::{Database, Operator, Storage};
use tracing::{Instrument, error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    telemetry::init(&config.logging);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    info!(config = %config_path, database = %config.database.path, "Starting streamgate");

    let db = Database::new(&config.database.path).await?;
    let storage: Arc<dyn Storage> = Arc::new(db);

    let admin = Operator::admin(Arc::clone(&storage));
    let seeded = seed_carriers(&admin, &config.carriers)
        .instrument(spans::operator(admin.actor()))
        .await?;
    info!(count = seeded, "Phone carriers seeded");

    let (Some(api_key), Some(path)) = (args.next(), args.next()) else {
        return Ok(());
    };

    let operator = match Operator::for_api_key(Arc::clone(&storage), &api_key).await {
        Ok(operator) => operator,
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "Could not build operator for API key");
            return Err(e.into());
        }
    };

    let span = spans::operator(operator.actor());
    match operator.resolve_path(&path).instrument(span).await {
        Ok(resolved) => {
            info!(
                user = ?resolved.user.as_ref().map(|u| &u.name),
                device = ?resolved.device.as_ref().map(|d| &d.name),
                stream = ?resolved.stream.as_ref().map(|s| (&s.name, &s.stream_type)),
                "Path resolved"
            );
            Ok(())
        }
        Err(e) => {
            warn!(path = %path, error = %e, code = e.kind().error_code(), "Path resolution failed");
            Err(e.into())
        }
    }
}
