//! Query categories and the routing decision derived from them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of categories a query can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Product features, prices, specifications, warranties
    Products,
    /// Return policy, refunds, exchanges
    Returns,
    /// Contact details, business hours
    General,
    /// Out of scope or unclear
    Unknown,
}

impl Category {
    /// Every category, in prompt order
    pub const ALL: [Category; 4] = [
        Category::Products,
        Category::Returns,
        Category::General,
        Category::Unknown,
    ];

    /// Lowercase label used on the wire and in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Products => "products",
            Category::Returns => "returns",
            Category::General => "general",
            Category::Unknown => "unknown",
        }
    }

    /// Map raw classifier output onto a category
    ///
    /// Only an exact label after trimming and lowercasing is accepted.
    pub fn normalize(raw: &str) -> Option<Category> {
        let label = raw.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Where a query of this category goes next
    pub fn route(&self) -> Route {
        match self {
            Category::Products | Category::Returns => Route::Respond,
            Category::General | Category::Unknown => Route::Escalate,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next stage after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Answer from the knowledge base
    Respond,
    /// Hand off to human support
    Escalate,
}
