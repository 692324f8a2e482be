use crate::utils::error::{ComponentError, Result};
use std::fmt;
use std::str::FromStr;

/// Which side of a component an artifact lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }
}

impl FromStr for Direction {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "input" => Ok(Direction::Input),
            "output" => Ok(Direction::Output),
            other => Err(ComponentError::argument(format!(
                "unknown artifact direction \"{}\", expected \"input\" or \"output\"",
                other
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two readable attributes of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessor {
    Uri,
    Path,
}

impl Accessor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessor::Uri => "uri",
            Accessor::Path => "path",
        }
    }
}

impl FromStr for Accessor {
    type Err = ComponentError;

    /// Only `uri` and `path` exist; anything else is an attribute access error.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uri" => Ok(Accessor::Uri),
            "path" => Ok(Accessor::Path),
            other => Err(ComponentError::AttributeAccessError {
                attribute: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deferred reference to the URI or local path of one input or output
/// artifact. The compiler substitutes the concrete value later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    direction: Direction,
    accessor: Accessor,
    variable_name: String,
}

impl Placeholder {
    pub fn new(direction: Direction, accessor: Accessor, variable_name: impl Into<String>) -> Self {
        Self {
            direction,
            accessor,
            variable_name: variable_name.into(),
        }
    }

    pub fn input_uri(variable_name: impl Into<String>) -> Self {
        Self::new(Direction::Input, Accessor::Uri, variable_name)
    }

    pub fn input_path(variable_name: impl Into<String>) -> Self {
        Self::new(Direction::Input, Accessor::Path, variable_name)
    }

    pub fn output_uri(variable_name: impl Into<String>) -> Self {
        Self::new(Direction::Output, Accessor::Uri, variable_name)
    }

    pub fn output_path(variable_name: impl Into<String>) -> Self {
        Self::new(Direction::Output, Accessor::Path, variable_name)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn accessor(&self) -> Accessor {
        self.accessor
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Key used for this placeholder in component YAML, e.g. `inputPath`.
    pub fn yaml_key(&self) -> &'static str {
        match (self.direction, self.accessor) {
            (Direction::Input, Accessor::Uri) => "inputUri",
            (Direction::Input, Accessor::Path) => "inputPath",
            (Direction::Output, Accessor::Uri) => "outputUri",
            (Direction::Output, Accessor::Path) => "outputPath",
        }
    }

    pub fn from_yaml_key(key: &str, variable_name: impl Into<String>) -> Option<Self> {
        let (direction, accessor) = match key {
            "inputUri" => (Direction::Input, Accessor::Uri),
            "inputPath" => (Direction::Input, Accessor::Path),
            "outputUri" => (Direction::Output, Accessor::Uri),
            "outputPath" => (Direction::Output, Accessor::Path),
            _ => return None,
        };
        Some(Self::new(direction, accessor, variable_name))
    }
}

impl fmt::Display for Placeholder {
    /// Runtime form consumed by the pipeline compiler.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.direction {
            Direction::Input => "inputs",
            Direction::Output => "outputs",
        };
        write!(
            f,
            "{{{{$.{}.artifacts['{}'].{}}}}}",
            side, self.variable_name, self.accessor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_runtime_syntax() {
        assert_eq!(
            Placeholder::input_uri("dataset").to_string(),
            "{{$.inputs.artifacts['dataset'].uri}}"
        );
        assert_eq!(
            Placeholder::output_path("model").to_string(),
            "{{$.outputs.artifacts['model'].path}}"
        );
    }

    #[test]
    fn test_yaml_keys_cover_all_combinations() {
        for direction in [Direction::Input, Direction::Output] {
            for accessor in [Accessor::Uri, Accessor::Path] {
                let placeholder = Placeholder::new(direction, accessor, "x");
                let parsed = Placeholder::from_yaml_key(placeholder.yaml_key(), "x").unwrap();
                assert_eq!(parsed, placeholder);
            }
        }
        assert!(Placeholder::from_yaml_key("inputValue", "x").is_none());
    }

    #[test]
    fn test_accessor_from_str_rejects_unknown() {
        assert_eq!("uri".parse::<Accessor>().unwrap(), Accessor::Uri);
        assert_eq!("path".parse::<Accessor>().unwrap(), Accessor::Path);
        match "value".parse::<Accessor>() {
            Err(ComponentError::AttributeAccessError { attribute }) => assert_eq!(attribute, "value"),
            other => panic!("expected attribute error, got {:?}", other),
        }
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("input".parse::<Direction>().unwrap(), Direction::Input);
        assert_eq!("output".parse::<Direction>().unwrap(), Direction::Output);
        assert!(matches!(
            "inout".parse::<Direction>(),
            Err(ComponentError::ArgumentError { .. })
        ));
    }
}
