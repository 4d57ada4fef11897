use crate::essentials::*;

use std::{collections::BTreeMap, path::PathBuf};
use uuid::Uuid;

/// Account uuid to default category uuid pairs, kept in a TOML file
///
/// Starling only serves the transactions feed of an account for one of its
/// categories, so the default one has to be known before syncing.
#[derive(Debug, Clone)]
pub struct DefaultCategories {
    path: PathBuf,
}

impl DefaultCategories {
    pub fn new<T: Into<PathBuf>>(path: T) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn get(&self, account_uuid: Uuid) -> Result<Option<Uuid>> {
        self.load()?
            .get(&account_uuid.to_string())
            .map(|category| Ok(Uuid::parse_str(category)?))
            .transpose()
    }

    pub fn set(&self, account_uuid: Uuid, category_uuid: Uuid) -> Result<()> {
        let mut pairs = self.load()?;
        pairs.insert(account_uuid.to_string(), category_uuid.to_string());
        self.save(&pairs)
    }

    /// Forget the default category of the account, returns whether it was known
    pub fn remove(&self, account_uuid: Uuid) -> Result<bool> {
        let mut pairs = self.load()?;
        if pairs.remove(&account_uuid.to_string()).is_none() {
            return Ok(false);
        }
        self.save(&pairs)?;
        Ok(true)
    }

    pub fn all(&self) -> Result<Vec<(Uuid, Uuid)>> {
        self.load()?
            .iter()
            .map(|(account, category)| Ok((Uuid::parse_str(account)?, Uuid::parse_str(category)?)))
            .collect()
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        Ok(toml::from_str(&std::fs::read_to_string(&self.path)?)?)
    }

    fn save(&self, pairs: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(pairs)?)?;
        Ok(())
    }
}
