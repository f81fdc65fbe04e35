use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Layers, later sources winning: `config/default`, `config/{RUN_ENV}`,
/// then environment variables with the `PREFIX` prefix (default
/// `CONSULTIFY`) using `__` as the section separator, e.g.
/// `CONSULTIFY__SERVER__PORT=8086`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "CONSULTIFY".to_string());

    let root = workspace_root();
    let default_path = root.join("config/default");
    let env_path = root.join(format!("config/{}", run_env));

    debug!("config: default file: {}", default_path.display());
    debug!("config: {} file: {}", run_env, env_path.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    builder.build()?.try_deserialize()
}

/// Resolves the directory holding `config/`. Under cargo this is the
/// workspace root; otherwise the process working directory.
fn workspace_root() -> PathBuf {
    match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => {
            let dir = PathBuf::from(dir);
            // go from crates/consultify_config to the workspace root
            let root = dir.ancestors().nth(2).map(Path::to_path_buf);
            root.unwrap_or(dir)
        }
        Err(_) => PathBuf::from("."),
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is loaded at most once per process. `DOTENV_OVERRIDE` or a
/// leading `.env*` command line argument selects an alternative file;
/// otherwise `.env` is used. A missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = std::env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
