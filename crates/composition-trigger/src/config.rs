use std::{num::NonZeroUsize, path::Path};

use crate::Error;

/// Settings of the [`Coordinator`](crate::Coordinator).
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Namespace of the requests that do not name one.
    pub default_namespace: String,
    pub composition: CompositionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: String::from("default"),
            composition: CompositionConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositionConfig {
    /// How many federated graphs of one mutation can be composed at the same time.
    pub max_parallel: NonZeroUsize,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            max_parallel: NonZeroUsize::new(4).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, Error> {
        toml::from_str(input).map_err(|error| Error::Config(error.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        let input = std::fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("could not read {}: {error}", path.display())))?;

        Self::from_toml_str(&input)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(Config::default(), config);
        assert_eq!("default", config.default_namespace);
        assert_eq!(4, config.composition.max_parallel.get());
    }

    #[test]
    fn values() {
        let input = indoc! {r#"
            default_namespace = "staging"

            [composition]
            max_parallel = 1
        "#};

        let config = Config::from_toml_str(input).unwrap();

        assert_eq!("staging", config.default_namespace);
        assert_eq!(1, config.composition.max_parallel.get());
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let input = indoc! {r#"
            [composition]
            max_parallel = 0
        "#};

        let error = Config::from_toml_str(input).unwrap_err();

        assert!(matches!(error, Error::Config(_)), "{error:?}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = Config::from_toml_str("namespace = \"x\"").unwrap_err();

        assert!(error.to_string().contains("unknown field `namespace`"), "{error}");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("composition.toml");
        std::fs::write(&path, "default_namespace = \"prod\"").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!("prod", config.default_namespace);

        let error = Config::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(error.to_string().starts_with("Invalid configuration: could not read"), "{error}");
    }
}
