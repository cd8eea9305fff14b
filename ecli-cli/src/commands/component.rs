//! `ecli component add|remove <name>` — create or delete a component directory.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use ecli_core::{ComponentName, ComponentType};
use ecli_sync::scaffold;

use super::Globals;
use crate::ComponentTypeArg;

#[derive(Subcommand, Debug)]
pub enum ComponentCommand {
    /// Create <components-dir>/<name>/ with starter artifacts for the type.
    Add {
        /// Component name: lowercase letters, digits and hyphens.
        name: String,

        /// Component type (defaults to basic).
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        component_type: Option<ComponentTypeArg>,
    },

    /// Delete <components-dir>/<name>/ and everything in it.
    Remove {
        /// Name of an existing component.
        name: String,
    },
}

pub fn run(command: ComponentCommand, globals: &Globals) -> Result<ExitCode> {
    match command {
        ComponentCommand::Add {
            name,
            component_type,
        } => add(globals, &name, component_type.map(Into::into).unwrap_or_default()),
        ComponentCommand::Remove { name } => remove(globals, &name),
    }
}

fn add(globals: &Globals, name: &str, ty: ComponentType) -> Result<ExitCode> {
    let name = ComponentName::parse(name).context("invalid component name")?;
    let config = globals.load_config()?;
    std::fs::create_dir_all(&config.components_dir).with_context(|| {
        format!("cannot create components directory {}", config.components_dir.display())
    })?;

    let created = scaffold::scaffold(&config.components_dir, &name, ty)
        .with_context(|| format!("failed to add component '{name}'"))?;

    println!("✓ Created {ty} component '{name}' at {}", created.dir.display());
    for file in &created.files {
        println!("  ✎  {}", file.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn remove(globals: &Globals, name: &str) -> Result<ExitCode> {
    let name = ComponentName::parse(name).context("invalid component name")?;
    let config = globals.load_config()?;

    let dir = scaffold::remove(&config.components_dir, &name)
        .with_context(|| format!("failed to remove component '{name}'"))?;

    println!("✓ Removed component '{name}' ({})", dir.display());
    Ok(ExitCode::SUCCESS)
}
