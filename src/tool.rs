//! Retrieval tool wrapper
//!
//! Exposes the query engine as a named, described capability so callers
//! can invoke retrieval without knowing engine internals. Dispatch is
//! explicit; the name and description are a stable external contract.

use crate::errors::Result;
use crate::query::QueryEngine;
use serde::{Deserialize, Serialize};

/// Stable tool name callers dispatch on
pub const RETRIEVAL_TOOL_NAME: &str = "product_data_retriever";

/// Stable tool description, part of the external contract
pub const RETRIEVAL_TOOL_DESCRIPTION: &str =
    "Use this tool to retrieve factual data on the product 'SynapseFlow', \
including technical specs, brand voice rules, and past marketing examples. \
Always use this before writing product copy.";

/// Capability record identifying a tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
}

/// Named handle around the query engine's query operation.
/// Pure delegation; holds no state of its own.
pub struct RetrievalTool {
    metadata: ToolMetadata,
    engine: QueryEngine,
}

impl RetrievalTool {
    pub fn new(engine: QueryEngine) -> Self {
        Self {
            metadata: ToolMetadata {
                name: RETRIEVAL_TOOL_NAME.to_string(),
                description: RETRIEVAL_TOOL_DESCRIPTION.to_string(),
            },
            engine,
        }
    }

    /// Invoke retrieval: {query} -> {answer}
    pub async fn invoke(&self, query: &str) -> Result<String> {
        let result = self.engine.query(query).await?;
        Ok(result.answer)
    }

    pub fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }
}
