//! The fixed card catalog.
//!
//! The built-in set is the 330-card 1989 Score football checklist; a custom
//! catalog can be supplied as JSON. Entries are read-only: the viewer
//! consumes them but never mutates the catalog.

use serde::{Deserialize, Serialize};

use crate::assets::AssetRef;
use crate::errors::{Result, ViewerError};

/// Number of entries in the built-in 1989 Score set.
pub const SCORE_1989_SIZE: usize = 330;

/// Canonical (lowercased) folder name accepted by the folder lookup.
pub const SCORE_1989_FOLDER: &str = "1989 score football";

/// One catalog entry: display name plus front/back asset references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub front: AssetRef,
    pub back: AssetRef,
}

/// Read-only, fixed-length card catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCatalog {
    entries: Vec<CatalogEntry>,
}

impl CardCatalog {
    /// Builds the 1989 Score football set. Every card has its own front
    /// reference; all backs share one reference.
    #[must_use]
    pub fn score_1989() -> Self {
        let back = AssetRef::placeholder("1989 Score Back");
        let entries = (1..=SCORE_1989_SIZE)
            .map(|number| CatalogEntry {
                name: format!("Card #{number}"),
                front: AssetRef::placeholder(format!("1989 Score Card {number}")),
                back: back.clone(),
            })
            .collect();
        Self { entries }
    }

    /// Deserializes a catalog from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        if entries.is_empty() {
            return Err(ViewerError::InvalidInput("Catalog has no entries".into()));
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Resolves a folder name and 1-based card number to a catalog index.
    ///
    /// The folder name is whitespace-trimmed and compared case-insensitively
    /// against [`SCORE_1989_FOLDER`]; the card number must lie in
    /// `[1, len]`. Anything else is rejected before any state mutation.
    pub fn lookup_folder_card(&self, folder: &str, number: i64) -> Result<usize> {
        if !folder.trim().eq_ignore_ascii_case(SCORE_1989_FOLDER) {
            return Err(ViewerError::InvalidInput(format!(
                "Unknown folder; expected \"1989 Score Football\", got \"{}\"",
                folder.trim()
            )));
        }
        if number < 1 || number as usize > self.entries.len() {
            return Err(ViewerError::InvalidInput(format!(
                "Card number must be between 1 and {}, got {number}",
                self.entries.len()
            )));
        }
        Ok(number as usize - 1)
    }
}
