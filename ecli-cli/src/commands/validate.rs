//! `ecli validate <name>` — check one component against its type's schemas.

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use ecli_core::{ComponentName, ComponentType};
use ecli_schema::validate_component;
use ecli_sync::{HttpRemote, Remote};

use super::Globals;
use crate::ComponentTypeArg;

/// Arguments for `ecli validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Component directory name under the components root.
    pub name: String,

    /// Component type. Looked up on the remote service when omitted.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub component_type: Option<ComponentTypeArg>,
}

impl ValidateArgs {
    pub fn run(self, globals: &Globals) -> Result<ExitCode> {
        let config = globals.load_config()?;
        let name = ComponentName::parse(&self.name).context("invalid component name")?;
        let dir = config.component_dir(name.as_str());
        if !dir.is_dir() {
            bail!("no component directory '{name}' under {}", config.components_dir.display());
        }

        let ty: ComponentType = match self.component_type {
            Some(ty) => ty.into(),
            None => HttpRemote::new(&config.api_url)
                .lookup(&name)
                .with_context(|| format!("could not resolve the type of '{name}'; pass --type"))?
                .component_type,
        };

        match validate_component(&dir, &name, ty) {
            Ok(component) => {
                println!(
                    "{}  {name} is a valid {ty} component ({} artifact(s))",
                    "✓".green().bold(),
                    component.artifacts.len()
                );
                Ok(ExitCode::SUCCESS)
            }
            Err(errors) => {
                println!("{}  {name} is not a valid {ty} component:", "✗".red().bold());
                for message in errors.messages() {
                    println!("   - {message}");
                }
                Ok(ExitCode::from(2))
            }
        }
    }
}
