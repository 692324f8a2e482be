use crate::core::artifact_channel::ArtifactChannel;
use crate::core::validation;
use crate::domain::model::{
    CommandArg, ComponentSpec, ContainerSpec, ImplementationSpec, InputSpec, MetadataSpec,
    OutputSpec,
};
use crate::domain::placeholder::Direction;
use crate::utils::error::Result;
use std::collections::BTreeMap;

/// Authoring front end for container components.
///
/// Each declared artifact yields an [`ArtifactChannel`] whose `uri()` and
/// `path()` placeholders can be dropped straight into the command line.
#[derive(Debug, Clone, Default)]
pub struct ContainerComponentBuilder {
    name: String,
    description: Option<String>,
    image: String,
    inputs: Vec<InputSpec>,
    outputs: Vec<OutputSpec>,
    command: Vec<CommandArg>,
    args: Vec<CommandArg>,
    env: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
}

impl ContainerComponentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn image(&mut self, image: impl Into<String>) -> &mut Self {
        self.image = image.into();
        self
    }

    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn annotation(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Declares an input artifact.
    pub fn input(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> ArtifactChannel {
        let name = name.into();
        self.inputs.push(InputSpec::new(name.clone(), type_name));
        ArtifactChannel::new(Direction::Input, name)
    }

    /// Declares an output artifact.
    pub fn output(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> ArtifactChannel {
        let name = name.into();
        self.outputs.push(OutputSpec::new(name.clone(), type_name));
        ArtifactChannel::new(Direction::Output, name)
    }

    /// Declares a plain input value and returns its `inputValue` reference.
    pub fn parameter(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> CommandArg {
        let name = name.into();
        self.inputs.push(InputSpec::new(name.clone(), type_name));
        CommandArg::InputValue(name)
    }

    pub fn optional_parameter(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: Option<&str>,
    ) -> CommandArg {
        let name = name.into();
        let mut input = InputSpec::new(name.clone(), type_name);
        input.optional = Some(true);
        input.default = default.map(|value| serde_json::Value::String(value.to_string()));
        self.inputs.push(input);
        CommandArg::InputValue(name)
    }

    pub fn command<I, A>(&mut self, command: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<CommandArg>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn arg(&mut self, arg: impl Into<CommandArg>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<CommandArg>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Assembles and validates the component specification.
    pub fn build(&self) -> Result<ComponentSpec> {
        let metadata = if self.annotations.is_empty() {
            None
        } else {
            Some(MetadataSpec {
                annotations: self.annotations.clone(),
                labels: BTreeMap::new(),
            })
        };

        let spec = ComponentSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            metadata,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            implementation: ImplementationSpec {
                container: ContainerSpec {
                    image: self.image.clone(),
                    command: self.command.clone(),
                    args: self.args.clone(),
                    env: self.env.clone(),
                },
            },
        };

        validation::validate_component(&spec)?;
        tracing::debug!("Built component '{}'", spec.name);
        Ok(spec)
    }
}
