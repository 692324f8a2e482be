pub mod artifact_channel;
pub mod builder;
pub mod loader;
pub mod validation;
pub mod yaml_component;

pub use crate::domain::model::{CommandArg, ComponentSpec};
pub use crate::domain::placeholder::{Accessor, Direction, Placeholder};
pub use crate::domain::ports::{BasicAuth, Component, FetchResponse, Fetcher};
pub use crate::utils::error::Result;
