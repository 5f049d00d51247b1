//! Chat request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Request body for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The customer's question
    pub query: String,
}

impl ChatRequest {
    /// Create a new request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Reject empty or whitespace-only queries before they reach the workflow
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "query must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ChatRequest::new("What is the return policy?").validate().is_ok());
        assert!(ChatRequest::new("").validate().is_err());
        assert!(ChatRequest::new("   \n").validate().is_err());
    }
}
