//! bcrypt-password CLI
//!
//! Hash a password or check one against a stored hash.
//!
//! ```text
//! bcrypt-password hash <plaintext> [cost]
//! bcrypt-password verify <hash> <candidate>
//! ```

use anyhow::{bail, Context};
use bcrypt_password::config::HashingConfig;
use bcrypt_password::HashedPassword;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: bcrypt-password hash <plaintext> [cost]\n       bcrypt-password verify <hash> <candidate>";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = HashingConfig::load()?;
    debug!(cost = config.cost, "Configuration loaded");

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("hash") => {
            let plaintext = args.next().context(USAGE)?;
            if plaintext.is_empty() {
                bail!("plaintext must not be empty");
            }
            let cost = match args.next() {
                Some(raw) => raw.parse().with_context(|| format!("invalid cost: {}", raw))?,
                None => config.cost,
            };

            let mut hashed = HashedPassword::new();
            hashed.update(&plaintext, Some(cost))?;
            println!("{}", hashed);
        }
        Some("verify") => {
            let stored = args.next().context(USAGE)?;
            let candidate = args.next().context(USAGE)?;

            let mut hashed = HashedPassword::new();
            hashed.load_from_storage(stored.as_str());
            if !hashed.verify(&candidate) {
                bail!("password does not match");
            }
            info!("Password matches");
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,bcrypt_password=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
