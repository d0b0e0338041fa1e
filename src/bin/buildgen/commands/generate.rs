//! `buildgen generate` command

use std::path::Path;

use anyhow::{bail, Result};

use buildgen::{FrontendOptions, ProjectConfig, TargetConfig, TargetType};

use crate::cli::GenerateArgs;

/// A boilerplate config for `--init`, named after the target file's directory.
fn boilerplate(path: &Path) -> ProjectConfig {
    let name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("myproject")
        .to_string();

    let mut config = ProjectConfig::new(&name);
    config.cxx_standard = Some(17);
    config.compile_options = vec!["-Wall".to_string(), "-Wextra".to_string()];
    config.targets = vec![TargetConfig {
        sources: vec!["src/main.cpp".to_string()],
        install: true,
        ..TargetConfig::new(name, TargetType::Executable)
    }];
    config
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    if let Some(path) = &args.init {
        let path = if path.is_dir() {
            path.join("project.json")
        } else {
            path.clone()
        };
        if path.exists() {
            bail!("`{}` already exists", path.display());
        }
        boilerplate(&path).to_json(&path)?;
        eprintln!("     Created config `{}`", path.display());
        return Ok(());
    }

    let Some(config_path) = &args.config else {
        bail!("nothing to do: pass --init <path> or --from <config>");
    };

    let config = ProjectConfig::load(config_path)?;

    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let makefile_path = output_dir.join("Makefile");
    let cmake_path = output_dir.join("CMakeLists.txt");

    if args.frontend {
        config.generate_cmake_with_frontend(
            &makefile_path,
            &cmake_path,
            &FrontendOptions::default(),
        )?;
        eprintln!("   Generated `{}` (frontend)", makefile_path.display());
        eprintln!("   Generated `{}`", cmake_path.display());
    } else if args.makefile_only {
        config.generate_makefile(&makefile_path)?;
        eprintln!("   Generated `{}`", makefile_path.display());
    } else if args.cmake_only {
        config.generate_cmake(&cmake_path)?;
        eprintln!("   Generated `{}`", cmake_path.display());
    } else {
        config.generate_all(&makefile_path, &cmake_path)?;
        eprintln!("   Generated `{}`", makefile_path.display());
        eprintln!("   Generated `{}`", cmake_path.display());
    }

    Ok(())
}
