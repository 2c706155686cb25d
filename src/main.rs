//! Inkmount - resolve editor toolbars and try them on a headless editor.
//!
//! # Usage
//!
//! ```bash
//! inkmount --list-plugins
//! inkmount --toolbar bold,link --print-config
//! inkmount --config editor.json --content '<p>Hello</p>'
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use inkmount::capability::plugin_names;
use inkmount::config::{EditorConfig, load_editor_config, save_editor_config};
use inkmount::dom::Page;
use inkmount::editor::Assembler;
use inkmount::engine::HeadlessEngine;
use inkmount::toolbar::{RemovalPolicy, Resolver};

/// Id given to the scratch form field the editor is mounted on.
const FIELD_ID: &str = "field";

/// Resolve rich-text editor toolbars into plugin lists
#[derive(Parser, Debug)]
#[command(name = "inkmount", version, about, long_about = None)]
struct Cli {
    /// JSON editor config to start from
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated toolbar buttons, overriding the config's toolbar
    #[arg(short, long, value_delimiter = ',')]
    toolbar: Option<Vec<String>>,

    /// How plugins shared between toolbar buttons are dropped
    #[arg(long, value_enum, default_value = "all-owners-reject")]
    removal_policy: RemovalPolicy,

    /// Print every known plugin and exit
    #[arg(long)]
    list_plugins: bool,

    /// Print the config the engine would receive and exit
    #[arg(long)]
    print_config: bool,

    /// Initial value of the form field the editor is mounted on
    #[arg(long, default_value = "")]
    content: String,

    /// Save the effective config (with --toolbar applied) to FILE
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
}

fn effective_config(cli: &Cli) -> Result<EditorConfig> {
    let file_config = match &cli.config {
        Some(path) => load_editor_config(path)?,
        None => EditorConfig::default(),
    };
    let cli_config = match &cli.toolbar {
        Some(buttons) => EditorConfig::new().with_toolbar(buttons.iter().map(String::as_str)),
        None => EditorConfig::new(),
    };
    Ok(file_config.union(&cli_config))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if cli.list_plugins {
        for name in plugin_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let config = effective_config(&cli)?;
    if let Some(path) = &cli.save {
        save_editor_config(path, &config)?;
    }

    let resolver = Resolver::builtin().with_policy(cli.removal_policy);
    if cli.print_config {
        let toolbar = config.toolbar().context("Invalid toolbar")?;
        let merged = config.with_plugins(&resolver.resolve(toolbar.as_deref()));
        println!("{}", serde_json::to_string_pretty(&merged)?);
        return Ok(());
    }

    let page = Page::new();
    let form = page.create_element("form");
    let field = page.create_element("textarea");
    page.append_child(form, field)?;
    page.set_id(field, FIELD_ID)?;
    page.set_value(field, &cli.content)?;

    let assembler = Assembler::new(&page, HeadlessEngine::new()).with_resolver(resolver);
    let instance = pollster::block_on(assembler.assemble(FIELD_ID, &config))
        .context("Failed to assemble editor")?;

    let report = json!({
        "plugins": instance.plugins(),
        "sourceEditing": instance.source_mode().is_some(),
        "value": page.value(instance.source_element()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
