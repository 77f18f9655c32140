// Input document: external products and the internal catalog
use crate::model::{CatalogEntry, DataError, ExternalProduct};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Dataset {
    pub external_products: Vec<ExternalProduct>,
    pub internal_catalog: Vec<CatalogEntry>,
}

pub fn parse_dataset(content: &str) -> Result<Dataset, DataError> {
    Ok(serde_json::from_str(content)?)
}

pub fn load_dataset(path: &str) -> Result<Dataset, DataError> {
    let content = fs::read_to_string(path)?;
    parse_dataset(&content)
}
