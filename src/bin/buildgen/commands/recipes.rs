//! `buildgen recipes` command

use anyhow::Result;

use buildgen::templates::recipes::list_recipes;

use crate::cli::RecipesArgs;

pub fn execute(args: RecipesArgs) -> Result<()> {
    let recipes = list_recipes(args.category.as_deref());

    if recipes.is_empty() {
        eprintln!("no recipes found");
        return Ok(());
    }

    println!("Available recipes:");
    for recipe in recipes {
        println!("  {:<24} {}", recipe.name, recipe.description);
    }

    Ok(())
}
