use crate::adapters::http::HttpFetcher;
use crate::core::yaml_component::YamlComponent;
use crate::domain::model::ComponentSpec;
use crate::domain::ports::{BasicAuth, Fetcher};
use crate::utils::error::{ComponentError, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const GCS_SCHEME: &str = "gs://";
const GCS_PUBLIC_ENDPOINT: &str = "https://storage.googleapis.com/";

/// Where a component definition comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSource {
    Text(String),
    File(PathBuf),
    Url(String),
}

/// Rewrites `gs://bucket/object` to its public HTTPS mirror. Other URLs pass
/// through untouched. Only publicly readable objects can be fetched this way.
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    match url.strip_prefix(GCS_SCHEME) {
        Some(rest) => Cow::Owned(format!("{}{}", GCS_PUBLIC_ENDPOINT, rest)),
        None => Cow::Borrowed(url),
    }
}

pub struct ComponentLoader<F: Fetcher = HttpFetcher> {
    fetcher: F,
}

impl ComponentLoader<HttpFetcher> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::new())
    }
}

impl Default for ComponentLoader<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetcher> ComponentLoader<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn load_from_text(&self, text: &str) -> Result<YamlComponent> {
        load_component_from_text(text)
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<YamlComponent> {
        load_component_from_file(path)
    }

    /// Fetches a component over HTTP(S). `gs://` URLs are mapped to the
    /// public storage endpoint; `auth` is passed to the fetcher as is.
    ///
    /// `None` and empty or whitespace-only URLs fail with `ArgumentError`
    /// before anything is fetched. Transport failures surface as
    /// `RequestError` and non-2xx replies as `HttpStatusError`; neither is
    /// retried.
    pub fn load_from_url<'a>(
        &self,
        url: impl Into<Option<&'a str>>,
        auth: Option<&BasicAuth>,
    ) -> Result<YamlComponent> {
        let url = url
            .into()
            .ok_or_else(|| ComponentError::argument("url must be a string."))?;
        if url.trim().is_empty() {
            return Err(ComponentError::argument("url must not be empty."));
        }

        let url = normalize_url(url);
        tracing::debug!("Fetching component from {}", url);

        let response = self.fetcher.get(&url, auth)?;
        if !response.status.is_success() {
            return Err(ComponentError::HttpStatusError {
                url: url.into_owned(),
                status: response.status,
            });
        }

        let text = String::from_utf8(response.body)?;
        load_component_from_text(&text)
    }

    pub fn load(&self, source: &ComponentSource, auth: Option<&BasicAuth>) -> Result<YamlComponent> {
        match source {
            ComponentSource::Text(text) => self.load_from_text(text),
            ComponentSource::File(path) => self.load_from_file(path),
            ComponentSource::Url(url) => self.load_from_url(url.as_str(), auth),
        }
    }
}

pub fn load_component_from_text(text: &str) -> Result<YamlComponent> {
    let spec = ComponentSpec::from_yaml(text)?;
    tracing::debug!(
        "Parsed component '{}' ({} inputs, {} outputs)",
        spec.name,
        spec.inputs.len(),
        spec.outputs.len()
    );
    Ok(YamlComponent::new(spec))
}

pub fn load_component_from_file<P: AsRef<Path>>(path: P) -> Result<YamlComponent> {
    let path = path.as_ref();
    tracing::debug!("Reading component from {}", path.display());

    // The handle is closed at the end of this block, before parsing starts.
    let text = {
        let mut file = File::open(path)?;
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        text
    };

    load_component_from_text(&text)
}

pub fn load_component_from_url<'a>(
    url: impl Into<Option<&'a str>>,
    auth: Option<&BasicAuth>,
) -> Result<YamlComponent> {
    ComponentLoader::new().load_from_url(url, auth)
}
