use crate::core::loader::{ComponentLoader, ComponentSource};
use crate::core::yaml_component::YamlComponent;
use crate::domain::ports::{BasicAuth, Fetcher};
use crate::utils::error::{ComponentError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentManifest {
    pub components: Vec<ComponentEntry>,
    /// 相對路徑的基準目錄 (manifest 檔案所在目錄)
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub name: String,
    pub file: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub auth: Option<AuthConfig>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LoadedComponent {
    pub name: String,
    pub component: YamlComponent,
}

impl ComponentEntry {
    /// Exactly one of `file`, `url` or `text` must be set.
    pub fn source(&self, base_dir: Option<&Path>) -> Result<ComponentSource> {
        let field = |suffix: &str| format!("components.{}.{}", self.name, suffix);
        match (&self.file, &self.url, &self.text) {
            (Some(file), None, None) => {
                let path = PathBuf::from(file);
                let path = match base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path,
                };
                Ok(ComponentSource::File(path))
            }
            (None, Some(url), None) => Ok(ComponentSource::Url(url.clone())),
            (None, None, Some(text)) => Ok(ComponentSource::Text(text.clone())),
            (None, None, None) => Err(ComponentError::MissingConfigError {
                field: field("file|url|text"),
            }),
            _ => Err(ComponentError::InvalidConfigValueError {
                field: field("source"),
                value: self.name.clone(),
                reason: "only one of file, url or text may be set".to_string(),
            }),
        }
    }

    pub fn basic_auth(&self) -> Option<BasicAuth> {
        self.auth
            .as_ref()
            .map(|auth| BasicAuth::new(auth.username.clone(), auth.password.clone()))
    }
}

impl ComponentManifest {
    /// 從 TOML 檔案載入 manifest
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut manifest = Self::from_toml_str(&content)?;
        manifest.base_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// 從 TOML 字串解析 manifest
    ///
    /// `${VAR}` is only expanded in `file`, `url` and `auth`. Inline `text`
    /// bodies are kept verbatim.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut manifest: Self = toml::from_str(content).map_err(|e| ComponentError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })?;

        // 處理環境變數替換
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ComponentError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;
        for entry in &mut manifest.components {
            for value in [entry.file.as_mut(), entry.url.as_mut()].into_iter().flatten() {
                *value = Self::substitute_env_vars(&re, value);
            }
            if let Some(auth) = entry.auth.as_mut() {
                auth.username = Self::substitute_env_vars(&re, &auth.username);
                auth.password = Self::substitute_env_vars(&re, &auth.password);
            }
        }

        Ok(manifest)
    }

    /// 替換環境變數 (例如 ${REGISTRY_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(re: &Regex, content: &str) -> String {
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(ComponentError::MissingConfigError {
                field: "components".to_string(),
            });
        }

        for entry in &self.components {
            validation::validate_non_empty_string("components.name", &entry.name)?;
            match entry.source(self.base_dir.as_deref())? {
                ComponentSource::Url(url) => {
                    validation::validate_url(&format!("components.{}.url", entry.name), &url)?
                }
                ComponentSource::File(path) => validation::validate_path(
                    &format!("components.{}.file", entry.name),
                    &path.to_string_lossy(),
                )?,
                ComponentSource::Text(text) => validation::validate_non_empty_string(
                    &format!("components.{}.text", entry.name),
                    &text,
                )?,
            }
        }

        if let Some(name) = validation::find_duplicate(self.components.iter().map(|c| c.name.as_str()))
        {
            return Err(ComponentError::InvalidConfigValueError {
                field: "components.name".to_string(),
                value: name.to_string(),
                reason: "component names must be unique".to_string(),
            });
        }

        Ok(())
    }

    /// Loads every component in declaration order, stopping at the first failure.
    pub fn load_all<F: Fetcher>(&self, loader: &ComponentLoader<F>) -> Result<Vec<LoadedComponent>> {
        let mut loaded = Vec::with_capacity(self.components.len());
        for entry in &self.components {
            let source = entry.source(self.base_dir.as_deref())?;
            let auth = entry.basic_auth();
            tracing::info!("Loading component '{}'", entry.name);
            let component = loader.load(&source, auth.as_ref())?;
            loaded.push(LoadedComponent {
                name: entry.name.clone(),
                component,
            });
        }
        Ok(loaded)
    }
}

impl Validate for ComponentManifest {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CommandArg;
    use crate::domain::ports::Component;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_manifest() {
        let toml_content = r#"
[[components]]
name = "trainer"
file = "components/train.yaml"

[[components]]
name = "identity"
url = "gs://bucket/identity.yaml"

[components.auth]
username = "reader"
password = "hunter2"
"#;

        let manifest = ComponentManifest::from_toml_str(toml_content).unwrap();

        assert_eq!(manifest.components.len(), 2);
        assert_eq!(
            manifest.components[0].source(None).unwrap(),
            ComponentSource::File(PathBuf::from("components/train.yaml"))
        );
        assert_eq!(
            manifest.components[1].basic_auth(),
            Some(BasicAuth::new("reader", "hunter2"))
        );
        assert!(manifest.validate().is_ok());
        assert!(!format!("{:?}", manifest).contains("hunter2"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PIPELINE_COMPONENTS_TEST_TOKEN", "s3cr3t");

        let toml_content = r#"
[[components]]
name = "private"
url = "https://example.com/private.yaml"
auth = { username = "ci", password = "${PIPELINE_COMPONENTS_TEST_TOKEN}" }
"#;

        let manifest = ComponentManifest::from_toml_str(toml_content).unwrap();
        let auth = manifest.components[0].basic_auth().unwrap();
        assert_eq!(auth.password, "s3cr3t");

        std::env::remove_var("PIPELINE_COMPONENTS_TEST_TOKEN");
    }

    #[test]
    fn test_inline_text_keeps_env_references() {
        std::env::set_var("PIPELINE_COMPONENTS_TEST_SHELL_DIR", "/root");

        let toml_content = r#"
[[components]]
name = "shell"
url = "https://example.com/${PIPELINE_COMPONENTS_TEST_SHELL_DIR}/c.yaml"

[[components]]
name = "inline"
text = """
name: shell
implementation:
  container:
    image: alpine
    command: [sh, -c, 'echo ${PIPELINE_COMPONENTS_TEST_SHELL_DIR}']
"""
"#;

        let manifest = ComponentManifest::from_toml_str(toml_content).unwrap();
        std::env::remove_var("PIPELINE_COMPONENTS_TEST_SHELL_DIR");

        assert_eq!(
            manifest.components[0].url.as_deref(),
            Some("https://example.com//root/c.yaml")
        );
        assert!(manifest.components[1]
            .text
            .as_deref()
            .unwrap()
            .contains("'echo ${PIPELINE_COMPONENTS_TEST_SHELL_DIR}'"));

        let loaded = manifest.components[1..].to_vec();
        let manifest = ComponentManifest {
            components: loaded,
            base_dir: None,
        };
        let components = manifest.load_all(&ComponentLoader::new()).unwrap();
        let command = &components[0].component.component_spec().container().command;
        assert_eq!(
            command[2],
            CommandArg::Literal("echo ${PIPELINE_COMPONENTS_TEST_SHELL_DIR}".to_string())
        );
    }

    #[test]
    fn test_unset_env_var_left_verbatim() {
        let toml_content = r#"
[[components]]
name = "private"
url = "https://example.com/private.yaml"
auth = { username = "ci", password = "${PIPELINE_COMPONENTS_DEFINITELY_UNSET}" }
"#;

        let manifest = ComponentManifest::from_toml_str(toml_content).unwrap();
        assert_eq!(
            manifest.components[0].basic_auth().unwrap().password,
            "${PIPELINE_COMPONENTS_DEFINITELY_UNSET}"
        );
    }

    #[test]
    fn test_validation_rejects_multiple_sources() {
        let toml_content = r#"
[[components]]
name = "ambiguous"
file = "a.yaml"
url = "https://example.com/a.yaml"
"#;

        let manifest = ComponentManifest::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            manifest.validate(),
            Err(ComponentError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_missing_source_and_bad_scheme() {
        let missing = ComponentManifest::from_toml_str("[[components]]\nname = \"empty\"\n").unwrap();
        assert!(matches!(
            missing.validate(),
            Err(ComponentError::MissingConfigError { .. })
        ));

        let ftp = ComponentManifest::from_toml_str(
            "[[components]]\nname = \"ftp\"\nurl = \"ftp://example.com/c.yaml\"\n",
        )
        .unwrap();
        assert!(ftp.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_duplicate_names() {
        let toml_content = r#"
[[components]]
name = "same"
text = "name: a"

[[components]]
name = "same"
text = "name: b"
"#;

        let manifest = ComponentManifest::from_toml_str(toml_content).unwrap();
        let err = manifest.validate().unwrap_err();
        assert!(err.to_string().contains("same"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ComponentManifest::from_toml_str("[[components]\nname=").unwrap_err();
        assert!(matches!(err, ComponentError::ConfigError { .. }));
    }

    #[test]
    fn test_load_all_with_inline_text_and_relative_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("echo.yaml"),
            "name: echo\nimplementation:\n  container:\n    image: alpine\n",
        )
        .unwrap();

        let mut manifest_file = NamedTempFile::new_in(dir.path()).unwrap();
        manifest_file
            .write_all(
                br#"
[[components]]
name = "from-file"
file = "echo.yaml"

[[components]]
name = "inline"
text = """
name: inline
implementation:
  container:
    image: busybox
"""
"#,
            )
            .unwrap();

        let manifest = ComponentManifest::from_file(manifest_file.path()).unwrap();
        let loaded = manifest.load_all(&ComponentLoader::new()).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "from-file");
        assert_eq!(loaded[0].component.name(), "echo");
        assert_eq!(loaded[1].component.component_spec().container().image, "busybox");
    }
}
