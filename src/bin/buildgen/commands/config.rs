//! `buildgen config` command

use anyhow::{bail, Context, Result};

use buildgen::config::{default_config_path, UserConfig, CONFIG_TEMPLATE};

use crate::cli::{ConfigArgs, ConfigCommands};

pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init => init(),
        ConfigCommands::Show => show(),
        ConfigCommands::Path => path(),
    }
}

fn init() -> Result<()> {
    let Some(path) = default_config_path() else {
        bail!("could not determine the home directory");
    };
    if path.exists() {
        bail!("`{}` already exists", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;

    eprintln!("     Created `{}`", path.display());
    Ok(())
}

fn show() -> Result<()> {
    let config = UserConfig::load(None);

    println!("[user]");
    println!("name = {:?}", config.user.name);
    println!("email = {:?}", config.user.email);
    println!();
    println!("[defaults]");
    for (key, value) in &config.defaults {
        println!("{} = {}", key, value);
    }

    Ok(())
}

fn path() -> Result<()> {
    let Some(path) = default_config_path() else {
        bail!("could not determine the home directory");
    };
    println!("{}", path.display());
    Ok(())
}
