use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to open configuration file for reading")]
    Open(#[from] std::io::Error),
    #[error("Could not decode the configuration file")]
    Decode(#[from] ron::de::SpannedError),
}

/// Everything about the inputs and the matching that can be adjusted without recompiling,
/// read from a RON file in which every key is optional.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub sales: crate::sales::Options,
    pub clients: crate::clients::Options,
    pub matcher: crate::matcher::Options,
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(ron::de::from_reader(std::fs::File::open(path)?)?)
    }
}
