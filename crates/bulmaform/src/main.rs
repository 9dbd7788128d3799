//! `bulmaform` - CLI for bulmaform
//!
//! This binary renders form blueprints to Bulma markup and simulates the
//! nested-row buttons against an in-memory document.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use bulmaform::blueprint::FormBlueprint;
use bulmaform::cli::{Cli, Command, ConfigCommand, RenderCommand, SimulateCommand};
use bulmaform::form::{child_object_name, template_id};
use bulmaform::simulation::RowSimulation;
use bulmaform::{init_logging, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Execute the command
    match cli.command {
        Command::Render(render_cmd) => handle_render(&config, &render_cmd),
        Command::Simulate(simulate_cmd) => handle_simulate(&config, &simulate_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_render(config: &Config, cmd: &RenderCommand) -> Result<()> {
    let blueprint = FormBlueprint::load(&cmd.file)?;
    let html = render_blueprint(config, &blueprint, &cmd.file)?;

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = html.len(), "Wrote form");
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn render_blueprint(config: &Config, blueprint: &FormBlueprint, file: &Path) -> Result<String> {
    match blueprint.render(config) {
        Ok(markup) => Ok(markup.into_string()),
        Err(err) if err.is_form_definition_error() => {
            bail!("{} defines an invalid form: {err}", file.display())
        }
        Err(err) => Err(err).with_context(|| format!("rendering {}", file.display())),
    }
}

fn handle_simulate(config: &Config, cmd: &SimulateCommand) -> Result<()> {
    let blueprint = FormBlueprint::load(&cmd.file)?;
    if blueprint.section(&cmd.association).is_none() {
        bail!(
            "blueprint {} has no nested section for '{}'",
            cmd.file.display(),
            cmd.association
        );
    }
    let html = render_blueprint(config, &blueprint, &cmd.file)?;

    let mut simulation = RowSimulation::new(&html, config)?;
    let template = template_id(
        &blueprint.object_name,
        &cmd.association,
        &config.nested.template_suffix,
    );
    for _ in 0..cmd.add {
        let outcomes = simulation
            .click_add(&template)
            .with_context(|| format!("adding a row to '{}'", cmd.association))?;
        info!(?outcomes, "Clicked add");
    }
    if let Some(index) = &cmd.mark {
        let row = child_object_name(&blueprint.object_name, &cmd.association, index);
        let outcomes = simulation
            .click_delete(&row)
            .with_context(|| format!("deleting row {index} of '{}'", cmd.association))?;
        info!(?outcomes, "Clicked delete");
    }

    println!("{}", simulation.html());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Nested]");
                println!("  Sentinel:           {}", config.nested.sentinel);
                println!("  Destroy field:      {}", config.nested.destroy_field);
                println!("  Template suffix:    {}", config.nested.template_suffix);
                println!();
                println!("[Rows]");
                println!("  Hidden class:       {}", config.rows.hidden_class);
                println!("  Destroy value:      {}", config.rows.destroy_value);
                println!("  Default position:   {}", config.rows.default_position);
                println!();
                println!("[Capabilities]");
                println!("  Icons:              {}", config.capabilities.icons);
                println!("  Row events:         {}", config.capabilities.row_events);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
