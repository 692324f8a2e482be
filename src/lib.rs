pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::HttpFetcher;
pub use crate::config::manifest::{ComponentManifest, LoadedComponent};
pub use crate::core::artifact_channel::ArtifactChannel;
pub use crate::core::builder::ContainerComponentBuilder;
pub use crate::core::loader::{
    load_component_from_file, load_component_from_text, load_component_from_url, normalize_url,
    ComponentLoader, ComponentSource,
};
pub use crate::core::yaml_component::YamlComponent;
pub use crate::domain::model::{CommandArg, ComponentSpec, ContainerSpec, InputSpec, OutputSpec};
pub use crate::domain::placeholder::{Accessor, Direction, Placeholder};
pub use crate::domain::ports::{BasicAuth, Component, FetchResponse, Fetcher};
pub use crate::utils::error::{ComponentError, ErrorCategory, Result};
