use crate::domain::model::ComponentSpec;
use crate::domain::ports::Component;
use crate::utils::error::Result;
use std::collections::HashMap;

/// A component loaded from YAML text.
///
/// This is a definition only. Build instances through the loader functions
/// rather than constructing them by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlComponent {
    component_spec: ComponentSpec,
}

impl YamlComponent {
    pub fn new(component_spec: ComponentSpec) -> Self {
        Self { component_spec }
    }

    pub fn to_yaml(&self) -> Result<String> {
        self.component_spec.to_yaml()
    }
}

impl Component for YamlComponent {
    fn component_spec(&self) -> &ComponentSpec {
        &self.component_spec
    }

    fn execute(&self, _arguments: &HashMap<String, serde_json::Value>) -> Result<()> {
        unimplemented!("YamlComponent is a component definition and cannot be executed directly")
    }
}
