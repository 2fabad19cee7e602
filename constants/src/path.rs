/// Model catalog location, relative to the asset root.
pub const RELATIVE_CATALOG_PATH: &str = "models/catalog.json";
