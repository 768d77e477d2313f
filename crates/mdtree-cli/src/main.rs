use anyhow::{Context, Result};
use clap::Parser;
use mdtree_config::Config;
use mdtree_render::render_json;
use mdtree_syntax::{ParseOptions, parse_with_options};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mdtree")]
#[command(about = "Render a Markdown document as a JSON tree")]
#[command(version)]
struct Cli {
    /// Markdown file to read; stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Config file to use instead of ~/.config/mdtree/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable task lists, strikethrough and tables
    #[arg(long)]
    no_gfm: bool,

    /// Disable `$` math
    #[arg(long)]
    no_math: bool,
}

/// Effective settings after merging the config file with the flags.
#[derive(Debug, PartialEq)]
struct Settings {
    parse: ParseOptions,
    output_path: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let loaded = match &self.config {
            Some(path) => {
                let config = Config::load_from_path(path)?;
                if config.is_none() {
                    anyhow::bail!("config file {} does not exist", path.display());
                }
                config
            }
            None => Config::load()?,
        };
        Ok(loaded.unwrap_or_default())
    }

    /// Flags win over the config file.
    fn settings(&self, config: Config) -> Settings {
        let mut parse = config.parse;
        if self.no_gfm {
            parse.gfm_task_list = false;
            parse.gfm_strikethrough = false;
            parse.gfm_table = false;
        }
        if self.no_math {
            parse.math = false;
        }
        Settings {
            parse,
            output_path: self.output.clone().or(config.output.output_path),
        }
    }

    fn read_input(&self) -> Result<String> {
        match self.file.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            _ => {
                let mut source = String::new();
                std::io::stdin()
                    .read_to_string(&mut source)
                    .context("Failed to read stdin")?;
                Ok(source)
            }
        }
    }
}

fn render(source: &str, options: ParseOptions) -> Result<String> {
    let tree = parse_with_options(source, options)?;
    log::debug!("parsed {} nodes", tree.len());
    Ok(render_json(&tree)?)
}

fn write_output(json: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // stdout carries the JSON, so only warnings by default
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let settings = cli.settings(config);
    log::debug!("settings: {settings:?}");

    let source = cli.read_input()?;
    let json = render(&source, settings.parse)?;
    write_output(&json, settings.output_path.as_deref())
}
