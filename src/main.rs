use anyhow::{Context, Result};
use clap::Parser;
use pipeline_components::config::cli::{CliCommand, InspectArgs, ManifestArgs, OutputFormat};
use pipeline_components::utils::{logger, validation::Validate};
use pipeline_components::{CliConfig, Component, ComponentLoader, ComponentManifest};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let outcome = match &config.command {
        CliCommand::Inspect(args) => inspect(args),
        CliCommand::Manifest(args) => load_manifest(args),
    };

    if let Err(e) = outcome {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn inspect(args: &InspectArgs) -> Result<()> {
    let source = args
        .source()
        .context("either --file or --url must be given")?;
    let auth = args.basic_auth();

    let loader = ComponentLoader::new();
    let component = loader
        .load(&source, auth.as_ref())
        .with_context(|| format!("failed to load component from {:?}", source))?;
    tracing::info!("✅ Loaded component '{}'", component.name());

    if args.validate {
        component.component_spec().validate()?;
        tracing::info!("✅ Component interface is consistent");
    }

    match args.format {
        OutputFormat::Summary => println!("{}", component.component_spec().summary()),
        OutputFormat::Yaml => print!("{}", component.to_yaml()?),
    }

    Ok(())
}

fn load_manifest(args: &ManifestArgs) -> Result<()> {
    tracing::info!("📁 Loading manifest from: {}", args.config.display());

    let manifest = ComponentManifest::from_file(&args.config)
        .with_context(|| format!("failed to read manifest '{}'", args.config.display()))?;
    manifest.validate()?;

    let loaded = manifest.load_all(&ComponentLoader::new())?;
    for entry in &loaded {
        if args.validate {
            entry
                .component
                .component_spec()
                .validate()
                .with_context(|| format!("component '{}' is inconsistent", entry.name))?;
        }
        println!("{}: {}", entry.name, entry.component.name());
    }

    tracing::info!("✅ Loaded {} components", loaded.len());
    Ok(())
}
