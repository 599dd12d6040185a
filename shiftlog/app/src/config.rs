use serde::{Deserialize, Serialize};

/// Collection name used when no configuration file overrides it.
pub const DEFAULT_COLLECTION: &str = "product_items";

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub store: StoreConfig,
}

/// Settings for the product store collaborator.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Name of the document collection holding tracked products
    pub collection: String,
}

impl Config {
    /// Loads configuration from an optional `shiftlog/config` file layered
    /// over built-in defaults.
    pub fn new() -> anyhow::Result<Self> {
        let s = config::Config::builder()
            .set_default("store.collection", DEFAULT_COLLECTION)?
            .add_source(config::File::with_name("shiftlog/config").required(false))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}
