use crate::domain::placeholder::{Direction, Placeholder};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputSpec>,
    pub implementation: ImplementationSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataSpec {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    /// Either a plain type name such as `Dataset` or a structured type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationSpec {
    pub container: ContainerSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<CommandArg>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<CommandArg>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

/// One element of a container command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum CommandArg {
    Literal(String),
    /// `{inputValue: name}`
    InputValue(String),
    /// `{inputUri|inputPath|outputUri|outputPath: name}`
    Artifact(Placeholder),
    /// `{concat: [...]}`
    Concat(Vec<CommandArg>),
    /// `{if: {cond: {isPresent: name}, then: [...], else: [...]}}`
    IfPresent {
        input_name: String,
        then: Vec<CommandArg>,
        otherwise: Vec<CommandArg>,
    },
}

impl CommandArg {
    /// Visits every placeholder nested in this argument, depth first.
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut found = Vec::new();
        self.collect_placeholders(&mut found);
        found
    }

    fn collect_placeholders<'a>(&'a self, found: &mut Vec<&'a Placeholder>) {
        match self {
            CommandArg::Literal(_) | CommandArg::InputValue(_) => {}
            CommandArg::Artifact(placeholder) => found.push(placeholder),
            CommandArg::Concat(parts) => parts.iter().for_each(|p| p.collect_placeholders(found)),
            CommandArg::IfPresent {
                then, otherwise, ..
            } => then
                .iter()
                .chain(otherwise.iter())
                .for_each(|p| p.collect_placeholders(found)),
        }
    }

    /// Input names referenced through `inputValue` or `isPresent`.
    pub fn referenced_input_values(&self) -> Vec<&str> {
        match self {
            CommandArg::InputValue(name) => vec![name.as_str()],
            CommandArg::Concat(parts) => parts
                .iter()
                .flat_map(CommandArg::referenced_input_values)
                .collect(),
            CommandArg::IfPresent {
                input_name,
                then,
                otherwise,
            } => std::iter::once(input_name.as_str())
                .chain(
                    then.iter()
                        .chain(otherwise.iter())
                        .flat_map(CommandArg::referenced_input_values),
                )
                .collect(),
            CommandArg::Literal(_) | CommandArg::Artifact(_) => Vec::new(),
        }
    }

    fn from_placeholder_map(map: Map<String, Value>) -> std::result::Result<Self, String> {
        if map.len() != 1 {
            return Err(format!(
                "a placeholder must have exactly one key, found {}",
                map.len()
            ));
        }
        let (key, value) = map
            .into_iter()
            .next()
            .ok_or_else(|| "empty placeholder".to_string())?;

        match key.as_str() {
            "inputValue" => Ok(CommandArg::InputValue(expect_name(&key, value)?)),
            "concat" => Ok(CommandArg::Concat(arg_list(&key, value)?)),
            "if" => Self::from_if_map(value),
            other => {
                let name = expect_name(other, value)?;
                Placeholder::from_yaml_key(other, name)
                    .map(CommandArg::Artifact)
                    .ok_or_else(|| format!("unrecognized placeholder \"{}\"", other))
            }
        }
    }

    fn from_if_map(value: Value) -> std::result::Result<Self, String> {
        let Value::Object(mut body) = value else {
            return Err("\"if\" placeholder must be a mapping".to_string());
        };
        let cond = body
            .remove("cond")
            .ok_or_else(|| "\"if\" placeholder requires \"cond\"".to_string())?;
        let input_name = match cond {
            Value::Object(mut cond) if cond.len() == 1 => {
                let name = cond.remove("isPresent").ok_or_else(|| {
                    "\"if\" condition must be an \"isPresent\" check".to_string()
                })?;
                expect_name("isPresent", name)?
            }
            _ => return Err("\"if\" condition must be an \"isPresent\" check".to_string()),
        };
        let then = match body.remove("then") {
            Some(value) => arg_list("then", value)?,
            None => return Err("\"if\" placeholder requires \"then\"".to_string()),
        };
        let otherwise = match body.remove("else") {
            Some(value) => arg_list("else", value)?,
            None => Vec::new(),
        };
        if let Some(extra) = body.keys().next() {
            return Err(format!("unexpected key \"{}\" in \"if\" placeholder", extra));
        }
        Ok(CommandArg::IfPresent {
            input_name,
            then,
            otherwise,
        })
    }
}

fn expect_name(key: &str, value: Value) -> std::result::Result<String, String> {
    match value {
        Value::String(name) if !name.is_empty() => Ok(name),
        _ => Err(format!("\"{}\" expects a non-empty variable name", key)),
    }
}

fn arg_list(key: &str, value: Value) -> std::result::Result<Vec<CommandArg>, String> {
    match value {
        Value::Array(items) => items.into_iter().map(CommandArg::try_from).collect(),
        Value::Null => Err(format!("\"{}\" cannot be null", key)),
        single => Ok(vec![CommandArg::try_from(single)?]),
    }
}

impl TryFrom<Value> for CommandArg {
    type Error = String;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(CommandArg::Literal(s)),
            Value::Number(n) => Ok(CommandArg::Literal(n.to_string())),
            Value::Bool(b) => Ok(CommandArg::Literal(b.to_string())),
            Value::Object(map) => CommandArg::from_placeholder_map(map),
            Value::Null => Err("command argument cannot be null".to_string()),
            Value::Array(_) => Err("command argument cannot be a list".to_string()),
        }
    }
}

impl From<CommandArg> for Value {
    fn from(arg: CommandArg) -> Self {
        let single = |key: &str, value: Value| {
            let mut map = Map::new();
            map.insert(key.to_string(), value);
            Value::Object(map)
        };
        let list = |args: Vec<CommandArg>| Value::Array(args.into_iter().map(Value::from).collect());

        match arg {
            CommandArg::Literal(s) => Value::String(s),
            CommandArg::InputValue(name) => single("inputValue", Value::String(name)),
            CommandArg::Artifact(placeholder) => single(
                placeholder.yaml_key(),
                Value::String(placeholder.variable_name().to_string()),
            ),
            CommandArg::Concat(parts) => single("concat", list(parts)),
            CommandArg::IfPresent {
                input_name,
                then,
                otherwise,
            } => {
                let mut body = Map::new();
                body.insert("cond".to_string(), single("isPresent", Value::String(input_name)));
                body.insert("then".to_string(), list(then));
                if !otherwise.is_empty() {
                    body.insert("else".to_string(), list(otherwise));
                }
                single("if", Value::Object(body))
            }
        }
    }
}

impl From<&str> for CommandArg {
    fn from(s: &str) -> Self {
        CommandArg::Literal(s.to_string())
    }
}

impl From<String> for CommandArg {
    fn from(s: String) -> Self {
        CommandArg::Literal(s)
    }
}

impl From<Placeholder> for CommandArg {
    fn from(placeholder: Placeholder) -> Self {
        CommandArg::Artifact(placeholder)
    }
}

impl fmt::Display for CommandArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandArg::Literal(s) => f.write_str(s),
            CommandArg::InputValue(name) => write!(f, "{{{{$.inputs.parameters['{}']}}}}", name),
            CommandArg::Artifact(placeholder) => write!(f, "{}", placeholder),
            CommandArg::Concat(parts) => parts.iter().try_for_each(|p| write!(f, "{}", p)),
            CommandArg::IfPresent {
                input_name,
                then,
                otherwise,
            } => {
                write!(f, "[if {} is present: {}", input_name, join_args(then))?;
                if !otherwise.is_empty() {
                    write!(f, " else: {}", join_args(otherwise))?;
                }
                f.write_str("]")
            }
        }
    }
}

fn join_args(args: &[CommandArg]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl InputSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_spec: Some(Value::String(type_name.into())),
            description: None,
            default: None,
            optional: None,
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_spec.as_ref().and_then(Value::as_str)
    }

    pub fn is_optional(&self) -> bool {
        self.optional.unwrap_or(false) || self.default.is_some()
    }
}

impl OutputSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_spec: Some(Value::String(type_name.into())),
            description: None,
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_spec.as_ref().and_then(Value::as_str)
    }
}

impl ComponentSpec {
    /// 從 YAML 字串解析元件定義
    pub fn from_yaml(text: &str) -> Result<Self> {
        let spec: ComponentSpec = serde_yaml::from_str(text)?;
        Ok(spec)
    }

    /// 輸出為 YAML 字串
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn container(&self) -> &ContainerSpec {
        &self.implementation.container
    }

    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|input| input.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputSpec> {
        self.outputs.iter().find(|output| output.name == name)
    }

    /// Every placeholder in `command` followed by every placeholder in `args`.
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let container = self.container();
        container
            .command
            .iter()
            .chain(container.args.iter())
            .flat_map(CommandArg::placeholders)
            .collect()
    }

    pub fn declares(&self, direction: Direction, name: &str) -> bool {
        match direction {
            Direction::Input => self.input(name).is_some(),
            Direction::Output => self.output(name).is_some(),
        }
    }

    /// Human readable overview used by the CLI.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Component: {}", self.name)];
        if let Some(description) = &self.description {
            lines.push(format!("Description: {}", description.trim()));
        }
        lines.push(format!("Image: {}", self.container().image));
        for input in &self.inputs {
            lines.push(format!(
                "  input  {} ({}){}",
                input.name,
                input.type_name().unwrap_or("untyped"),
                if input.is_optional() { " [optional]" } else { "" }
            ));
        }
        for output in &self.outputs {
            lines.push(format!(
                "  output {} ({})",
                output.name,
                output.type_name().unwrap_or("untyped")
            ));
        }
        if !self.container().command.is_empty() {
            lines.push(format!("Command: {}", join_args(&self.container().command)));
        }
        if !self.container().args.is_empty() {
            lines.push(format!("Args: {}", join_args(&self.container().args)));
        }
        lines.join("\n")
    }
}
