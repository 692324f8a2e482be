use crate::core::loader::ComponentSource;
use crate::domain::ports::BasicAuth;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pipeline-components")]
#[command(about = "Load and inspect containerized pipeline component definitions")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: CliCommand,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Load a single component and print it
    Inspect(InspectArgs),
    /// Load every component listed in a TOML manifest
    Manifest(ManifestArgs),
}

#[derive(Clone, Args)]
pub struct InspectArgs {
    /// Path to a component YAML file
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    pub file: Option<PathBuf>,

    /// URL of a component YAML (http, https or gs)
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long, requires = "password")]
    pub username: Option<String>,

    #[arg(long, requires = "username")]
    pub password: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Check that placeholders only reference declared inputs and outputs
    #[arg(long)]
    pub validate: bool,
}

impl fmt::Debug for InspectArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectArgs")
            .field("file", &self.file)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("format", &self.format)
            .field("validate", &self.validate)
            .finish()
    }
}

#[derive(Debug, Clone, Args)]
pub struct ManifestArgs {
    /// Path to the TOML manifest
    #[arg(short, long, default_value = "components.toml")]
    pub config: PathBuf,

    #[arg(long)]
    pub validate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Summary,
    Yaml,
}

impl InspectArgs {
    pub fn source(&self) -> Option<ComponentSource> {
        match (&self.file, &self.url) {
            (Some(file), _) => Some(ComponentSource::File(file.clone())),
            (None, Some(url)) => Some(ComponentSource::Url(url.clone())),
            (None, None) => None,
        }
    }

    pub fn basic_auth(&self) -> Option<BasicAuth> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                Some(BasicAuth::new(username.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspect_url_with_auth() {
        let config = CliConfig::try_parse_from([
            "pipeline-components",
            "inspect",
            "--url",
            "gs://bucket/c.yaml",
            "--username",
            "me",
            "--password",
            "pw",
            "--format",
            "yaml",
        ])
        .unwrap();

        let CliCommand::Inspect(args) = config.command else {
            panic!("expected inspect command");
        };
        assert_eq!(args.source(), Some(ComponentSource::Url("gs://bucket/c.yaml".to_string())));
        assert_eq!(args.basic_auth(), Some(BasicAuth::new("me", "pw")));
        assert_eq!(args.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_debug_output_hides_password() {
        let config = CliConfig::try_parse_from([
            "pipeline-components",
            "-v",
            "inspect",
            "--url",
            "https://example.com/c.yaml",
            "--username",
            "me",
            "--password",
            "hunter2",
        ])
        .unwrap();

        let rendered = format!("{:?}", config);
        assert!(rendered.contains("me"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_inspect_requires_a_source() {
        assert!(CliConfig::try_parse_from(["pipeline-components", "inspect"]).is_err());
        assert!(CliConfig::try_parse_from([
            "pipeline-components",
            "inspect",
            "--file",
            "a.yaml",
            "--url",
            "https://example.com/a.yaml",
        ])
        .is_err());
    }

    #[test]
    fn test_manifest_defaults() {
        let config = CliConfig::try_parse_from(["pipeline-components", "-v", "manifest"]).unwrap();
        assert!(config.verbose);
        match config.command {
            CliCommand::Manifest(args) => {
                assert_eq!(args.config, PathBuf::from("components.toml"));
                assert!(!args.validate);
            }
            other => panic!("expected manifest command, got {:?}", other),
        }
    }
}
