use core::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::{ops::RepeatSpec, registry::OpDesc, Error, Result};

/// Configuration trait.
pub trait Config: Debug + serde::Serialize + serde::de::DeserializeOwned {
    /// Saves the configuration to a file.
    ///
    /// # Arguments
    ///
    /// * `file` - File to save the configuration to.
    fn save<P: AsRef<std::path::Path>>(&self, file: P) -> Result<()> {
        std::fs::write(file, config_to_json(self)?)?;

        Ok(())
    }

    /// Loads the configuration from a file.
    ///
    /// # Arguments
    ///
    /// * `file` - File to load the configuration from.
    fn load<P: AsRef<std::path::Path>>(file: P) -> Result<Self> {
        let content = std::fs::read_to_string(file.as_ref())?;
        config_from_str(&content)
    }

    /// Loads the configuration from a binary buffer.
    ///
    /// # Arguments
    ///
    /// * `data` - Binary buffer to load the configuration from.
    fn load_binary(data: &[u8]) -> Result<Self> {
        let content = core::str::from_utf8(data)
            .map_err(|_| Error::invalid_argument("Could not parse data as utf-8."))?;
        config_from_str(content)
    }
}

/// Converts a configuration to a JSON string.
pub fn config_to_json<C: Config>(config: &C) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

fn config_from_str<C: Config>(content: &str) -> Result<C> {
    Ok(serde_json::from_str(content)?)
}

/// Attributes of the `seq_expand` and `seq_expand_grad` operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqExpandConfig {
    /// Number of times each sequence is repeated, `0` to repeat by reference.
    #[serde(default)]
    pub repeat: i32,
}

impl Config for SeqExpandConfig {}

impl SeqExpandConfig {
    /// Attribute key of the repeat count.
    pub const REPEAT: &'static str = "repeat";

    /// Creates the default configuration, repeating by reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the repeat count.
    pub fn with_repeat(mut self, repeat: i32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Reads the configuration from the attributes of an operator.
    pub fn from_attrs(desc: &OpDesc) -> Result<Self> {
        let repeat = match desc.attr_int(Self::REPEAT)? {
            Some(repeat) => i32::try_from(repeat).map_err(|_| {
                Error::invalid_argument(format!("the repeat attribute {repeat} is out of range"))
            })?,
            None => 0,
        };

        Ok(Self::new().with_repeat(repeat))
    }

    /// The repeat specification described by the configuration.
    pub fn repeat_spec(&self) -> Result<RepeatSpec> {
        RepeatSpec::from_attr(self.repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Attribute;
    use tempfile::TempDir;

    #[test]
    fn should_default_to_reference_mode() {
        let config = SeqExpandConfig::new();

        assert_eq!(config.repeat, 0);
        assert_eq!(config.repeat_spec().unwrap(), RepeatSpec::ReferenceDriven);
    }

    #[test]
    fn should_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("seq_expand.json");
        let config = SeqExpandConfig::new().with_repeat(3);

        config.save(&file).unwrap();
        let loaded = SeqExpandConfig::load(&file).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.repeat_spec().unwrap(), RepeatSpec::Fixed(3));
    }

    #[test]
    fn should_load_missing_fields_with_defaults() {
        let config = SeqExpandConfig::load_binary(b"{}").unwrap();

        assert_eq!(config, SeqExpandConfig::new());
    }

    #[test]
    fn should_fail_to_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();

        let err = SeqExpandConfig::load(temp_dir.path().join("missing.json")).unwrap_err();

        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn should_read_attrs() {
        let desc = OpDesc::new("seq_expand").with_attr("repeat", Attribute::Int(4));

        let config = SeqExpandConfig::from_attrs(&desc).unwrap();

        assert_eq!(config.repeat, 4);
    }

    #[test]
    fn should_reject_out_of_range_attrs() {
        let desc = OpDesc::new("seq_expand").with_attr("repeat", Attribute::Int(i64::MAX));

        assert!(SeqExpandConfig::from_attrs(&desc).is_err());
    }
}
