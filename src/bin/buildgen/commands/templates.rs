//! `buildgen templates` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use buildgen::templates::recipes::get_recipe;
use buildgen::templates::scaffold::copy_builtin_templates;
use buildgen::TemplateResolver;

use crate::cli::{TemplatesArgs, TemplatesCommands};

pub fn execute(args: TemplatesArgs) -> Result<()> {
    match args.command {
        TemplatesCommands::List => list(),
        TemplatesCommands::Show { recipe } => show(&recipe),
        TemplatesCommands::Copy {
            recipe,
            global,
            skip_common,
        } => copy(&recipe, global, skip_common),
    }
}

fn list() -> Result<()> {
    let project_dir = std::env::current_dir().ok();
    let resolver = TemplateResolver::new(project_dir.as_deref());

    println!("Template search roots (highest priority first):");
    for root in resolver.roots() {
        match &root.path {
            Some(path) => {
                let marker = if path.is_dir() { "" } else { " (absent)" };
                println!("  {:<9} {}{}", root.tier, path.display(), marker);
            }
            None => println!("  {:<9} (not configured)", root.tier),
        }
    }

    Ok(())
}

fn show(recipe_name: &str) -> Result<()> {
    let recipe = get_recipe(recipe_name)?;
    let project_dir = std::env::current_dir().ok();
    let resolver = TemplateResolver::new(project_dir.as_deref());

    println!("{} - {}", recipe.name, recipe.description);

    let overrides = resolver.list_overrides(recipe.name);
    if overrides.is_empty() {
        println!("  no overrides, every template resolves built-in");
        return Ok(());
    }

    println!("  overridden templates:");
    for (file, tier) in overrides {
        println!("    {:<40} {}", file, tier);
    }

    Ok(())
}

fn copy(recipe_name: &str, global: bool, skip_common: bool) -> Result<()> {
    let dest = if global {
        match directories::UserDirs::new() {
            Some(dirs) => dirs.home_dir().join(".buildgen/templates"),
            None => bail!("could not determine the home directory"),
        }
    } else {
        PathBuf::from(".buildgen/templates")
    };

    let copied = copy_builtin_templates(recipe_name, &dest, !skip_common)?;

    eprintln!("     Copied {} templates to `{}`", copied.len(), dest.display());
    Ok(())
}
