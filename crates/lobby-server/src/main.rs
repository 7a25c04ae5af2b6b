//! Lobby server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the visitor-management API over HTTP.
//!
//! # Password hash generation
//!
//! To generate an argon2 PHC string for a staff account:
//!
//! ```
//! cargo run -p lobby-server -- --hash-password
//! ```
//!
//! # Staff bootstrap
//!
//! A fresh database has no staff accounts, so the login endpoint is useless
//! until one is created out of band:
//!
//! ```
//! cargo run -p lobby-server -- --add-staff admin --role admin --full-name "Site Admin"
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use lobby_api::{AppState, SessionKeys, api_router};
use lobby_core::{
  staff::{NewStaff, StaffRole},
  store::VisitStore as _,
};
use lobby_store_sqlite::SqliteStore;
use rand_core::OsRng;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Clone, Deserialize)]
struct ServerConfig {
  host:              String,
  port:              u16,
  store_path:        PathBuf,
  /// Secret for session-token MACs. Rotating it logs everyone out.
  session_secret:    String,
  #[serde(default = "default_session_ttl_hours")]
  session_ttl_hours: i64,
}

fn default_session_ttl_hours() -> i64 {
  8
}

// ─── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Lobby visitor-management server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Create a staff account with this username and exit. The password is
  /// read from stdin.
  #[arg(long, value_name = "USERNAME")]
  add_staff: Option<String>,

  /// Role for `--add-staff`.
  #[arg(long, value_enum, default_value = "receptionist")]
  role: CliRole,

  /// Display name for `--add-staff`. Defaults to the username.
  #[arg(long)]
  full_name: Option<String>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliRole {
  Admin,
  Receptionist,
}

impl From<CliRole> for StaffRole {
  fn from(role: CliRole) -> Self {
    match role {
      CliRole::Admin => StaffRole::Admin,
      CliRole::Receptionist => StaffRole::Receptionist,
    }
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    println!("{}", hash_password(&password)?);
    return Ok(());
  }

  let server_cfg = load_config(cli.config)?;
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: bootstrap a staff account and exit.
  if let Some(username) = cli.add_staff {
    let password = read_password()?;
    let staff = store
      .add_staff(NewStaff {
        role:          cli.role.into(),
        full_name:     cli.full_name.unwrap_or_else(|| username.clone()),
        username,
        password_hash: hash_password(&password)?,
      })
      .await
      .context("failed to create staff account")?;
    println!("created staff account {} ({})", staff.username, staff.staff_id);
    return Ok(());
  }

  let state = AppState {
    store:    Arc::new(store),
    sessions: Arc::new(SessionKeys::new(
      server_cfg.session_secret.as_bytes().to_vec(),
      chrono::Duration::hours(server_cfg.session_ttl_hours),
    )),
  };

  let app = axum::Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn load_config(path: PathBuf) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("LOBBY"))
    .build()
    .context("failed to read config file")?;
  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
    .to_string();
  Ok(hash)
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
