//! Store scopes that partition block content.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric scope identifier of a storefront or site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(u32);

impl StoreId {
    /// The all-stores scope. A block assigned here is visible in every store.
    pub const ADMIN: StoreId = StoreId(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub fn is_admin(self) -> bool {
        self == Self::ADMIN
    }
}

impl From<u32> for StoreId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: StoreId,
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_url: String,
}

impl StoreRecord {
    pub fn new(id: StoreId, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: String::new(),
            base_url: String::new(),
        }
    }

    /// Join `path` onto the store base URL with exactly one separating slash.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{path}")
        }
    }
}
