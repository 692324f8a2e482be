use crate::domain::model::{CommandArg, ComponentSpec};
use crate::domain::placeholder::Direction;
use crate::utils::error::{ComponentError, Result};
use crate::utils::validation::{find_duplicate, Validate};

/// Checks that a component's command template only refers to its own
/// declared inputs and outputs. Loading never calls this; authoring and the
/// CLI do.
pub fn validate_component(spec: &ComponentSpec) -> Result<()> {
    if spec.name.trim().is_empty() {
        return Err(ComponentError::validation("component name cannot be empty"));
    }
    if spec.container().image.trim().is_empty() {
        return Err(ComponentError::validation(format!(
            "component '{}' has no container image",
            spec.name
        )));
    }

    let declared = spec
        .inputs
        .iter()
        .map(|i| ("input", i.name.as_str()))
        .chain(spec.outputs.iter().map(|o| ("output", o.name.as_str())));
    for (kind, name) in declared {
        if name.trim().is_empty() {
            return Err(ComponentError::validation(format!(
                "component '{}' declares an {} with an empty name",
                spec.name, kind
            )));
        }
    }

    if let Some(name) = find_duplicate(spec.inputs.iter().map(|i| i.name.as_str())) {
        return Err(ComponentError::validation(format!(
            "input '{}' is declared more than once",
            name
        )));
    }
    if let Some(name) = find_duplicate(spec.outputs.iter().map(|o| o.name.as_str())) {
        return Err(ComponentError::validation(format!(
            "output '{}' is declared more than once",
            name
        )));
    }

    for placeholder in spec.placeholders() {
        if !spec.declares(placeholder.direction(), placeholder.variable_name()) {
            return Err(ComponentError::validation(format!(
                "placeholder {} refers to undeclared {} '{}'",
                placeholder,
                placeholder.direction(),
                placeholder.variable_name()
            )));
        }
    }

    let container = spec.container();
    for name in container
        .command
        .iter()
        .chain(container.args.iter())
        .flat_map(CommandArg::referenced_input_values)
    {
        if !spec.declares(Direction::Input, name) {
            return Err(ComponentError::validation(format!(
                "command refers to undeclared input '{}'",
                name
            )));
        }
    }

    Ok(())
}

impl Validate for ComponentSpec {
    fn validate(&self) -> Result<()> {
        validate_component(self)
    }
}
