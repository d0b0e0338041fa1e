//! `buildgen new` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use buildgen::config::UserConfig;
use buildgen::templates::scaffold::{EnvTool, ProjectScaffolder};

use crate::cli::{EnvToolArg, NewArgs};

pub fn execute(args: NewArgs) -> Result<()> {
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&args.name));

    if path.exists() {
        if path.is_file() {
            bail!("destination `{}` already exists and is a file", path.display());
        }
        let occupied = std::fs::read_dir(&path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if occupied {
            bail!(
                "destination `{}` already exists and is not empty",
                path.display()
            );
        }
    }

    let env_tool = match args.env_tool {
        EnvToolArg::Uv => EnvTool::Uv,
        EnvToolArg::Venv => EnvTool::Venv,
    };

    let project_dir = std::env::current_dir().ok();
    let scaffolder = ProjectScaffolder::new(
        &args.name,
        &args.recipe,
        &path,
        project_dir.as_deref(),
    )?
    .env_tool(env_tool)
    .user_config(UserConfig::load(None));

    let recipe = scaffolder.recipe().name;
    let created = scaffolder.generate()?;

    eprintln!(
        "     Created `{}` project ({}, {} files)",
        args.name,
        recipe,
        created.len()
    );

    Ok(())
}
