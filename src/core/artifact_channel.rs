use crate::domain::placeholder::{Accessor, Direction, Placeholder};
use crate::utils::error::Result;

/// Hands out placeholders for one declared input or output artifact.
///
/// Only `uri` and `path` can be read from an artifact; any other attribute
/// is rejected before a placeholder is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactChannel {
    direction: Direction,
    variable_name: String,
}

impl ArtifactChannel {
    /// The name is not checked here; `ContainerComponentBuilder::build` and
    /// `validate_component` reject blank input and output names.
    pub fn new(direction: Direction, variable_name: impl Into<String>) -> Self {
        Self {
            direction,
            variable_name: variable_name.into(),
        }
    }

    pub fn input(variable_name: impl Into<String>) -> Self {
        Self::new(Direction::Input, variable_name)
    }

    pub fn output(variable_name: impl Into<String>) -> Self {
        Self::new(Direction::Output, variable_name)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Looks up an artifact attribute by name.
    pub fn access(&self, attribute: &str) -> Result<Placeholder> {
        let accessor: Accessor = attribute.parse()?;
        Ok(self.resolve(accessor))
    }

    pub fn resolve(&self, accessor: Accessor) -> Placeholder {
        Placeholder::new(self.direction, accessor, self.variable_name.clone())
    }

    pub fn uri(&self) -> Placeholder {
        self.resolve(Accessor::Uri)
    }

    pub fn path(&self) -> Placeholder {
        self.resolve(Accessor::Path)
    }
}
