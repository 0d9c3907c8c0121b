use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tinypack_core::config::{find_config_file, BundlerConfig, CliOverrides, DEFAULT_CONFIG_FILE};
use tinypack_core::{Compiler, Container};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// tinypack - bundle CommonJS modules into a single file
#[derive(Parser, Debug, Clone)]
#[command(name = "tinypack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Entry module, relative to the root (overrides the config file)
    #[arg(value_name = "ENTRY")]
    entry: Option<String>,

    /// Path to a tinypack.config.json (or .yaml) file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<String>,

    /// Output file name; `[hash]` is replaced with a content hash
    #[arg(long, value_name = "NAME")]
    out_file: Option<String>,

    /// Working root module ids are relative to (default: current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Initialize a new project with a config file and sample sources
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug for detailed logs, RUST_LOG=info for normal output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let root = resolve_root(cli.root.as_deref())?;

    if cli.init {
        return init_project(&root);
    }

    let config = load_config(&cli, &root)?;
    debug!("Configuration: {:?}", config);

    let compiler =
        Compiler::new(Container::new(config), &root).context("Invalid configuration")?;
    let asset = compiler.run().context("Bundling failed")?;

    println!("Bundle written to {}", asset.path.display());
    Ok(())
}

fn resolve_root(root: Option<&Path>) -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
    Ok(match root {
        Some(root) => cwd.join(root),
        None => cwd,
    })
}

/// Load configuration from file (if any) and apply command-line overrides
fn load_config(cli: &Cli, root: &Path) -> anyhow::Result<BundlerConfig> {
    let config_path = match &cli.config {
        Some(path) => Some(root.join(path)),
        None => find_config_file(root),
    };

    let mut config = match config_path {
        Some(path) => {
            info!("Using config {}", path.display());
            BundlerConfig::from_file(&path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        None => BundlerConfig::default(),
    };

    config.merge(&CliOverrides {
        entry: cli.entry.clone(),
        out_dir: cli.out_dir.clone(),
        out_file: cli.out_file.clone(),
    });
    config.validate()?;

    Ok(config)
}

/// Initialize a new project with a configuration file and a two-module sample
fn init_project(root: &Path) -> anyhow::Result<()> {
    println!("Initializing new tinypack project...");

    let config_path = root.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }
    BundlerConfig::init_file(&config_path)?;
    println!("Created {}", DEFAULT_CONFIG_FILE);

    let src = root.join("src");
    std::fs::create_dir_all(&src)?;

    let index = r#"const greet = require('./greet');

console.log(greet('world'));
"#;
    let greet = r#"module.exports = function greet(name) {
  return 'Hello, ' + name + '!';
};
"#;
    std::fs::write(src.join("index.js"), index)?;
    std::fs::write(src.join("greet.js"), greet)?;
    println!("Created src/index.js and src/greet.js");

    println!("\nProject initialized successfully!");
    println!("Run 'tinypack' to write dist/bundle.js.");

    Ok(())
}
