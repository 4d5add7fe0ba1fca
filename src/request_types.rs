//! Request-type taxonomy and the classifier system instruction built from it

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;
use tracing::{debug, info};

const ROLE: &str = "\
Context:
Commercial loan servicing teams receive a high volume of servicing requests by email, \
often with attachments. Each email becomes a service request that moves through a \
structured workflow.

Your role:
You classify the content of one email, including its attachments, into exactly one of \
the request types and sub-request types listed below.

Output:
Return only a JSON object that a JSON parser can read, with these fields:
- request_type (string): the request type that best describes the email.
- sub_request_type (string): the sub-request type that narrows it down.
- confidence_score (number): certainty of the classification, from 0 to 1.
- summary (string): a short summary of what the sender is asking for.
- priority (string): urgency of the request, one of High, Medium, Low.
Add any other important fields found in the email (for example loan numbers, amounts, \
dates, borrower names) as extra keys of the same object.

Rules:
- request_type and sub_request_type must match an entry of the list below exactly.
- Do not add explanations, prose or formatting around the JSON object.

Request types:";

/// One classification target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestType {
    pub description: String,

    /// Sub-request name to description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_requests: Option<IndexMap<String, String>>,
}

impl RequestType {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            sub_requests: None,
        }
    }

    #[must_use]
    pub fn with_sub_request(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.sub_requests
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), description.into());
        self
    }
}

/// The configured request types, keyed by name in insertion order
///
/// Owned by the caller and passed to whatever builds classifier input;
/// loading and saving are explicit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestTypes {
    types: IndexMap<String, RequestType>,
}

impl RequestTypes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON document; a missing file gives an empty set
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No request types at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        let types: Self = serde_json::from_slice(&std::fs::read(path)?)?;
        info!("Loaded {} request types from {}", types.len(), path.display());
        Ok(types)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        debug!("Saved {} request types to {}", self.len(), path.display());
        Ok(())
    }

    /// Add or replace entries
    pub fn update(&mut self, other: Self) {
        self.types.extend(other.types);
    }

    pub fn insert(&mut self, name: impl Into<String>, request_type: RequestType) -> Option<RequestType> {
        self.types.insert(name.into(), request_type)
    }

    pub fn remove(&mut self, name: &str) -> Option<RequestType> {
        self.types.shift_remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RequestType> {
        self.types.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RequestType)> {
        self.types.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Instruction that frames the classifier call
    #[must_use]
    pub fn system_instruction(&self) -> String {
        let mut context = String::new();
        for (name, details) in &self.types {
            let _ = writeln!(context, "Request Type: {name}");
            let _ = writeln!(context, "Description: {}", details.description);
            if let Some(subs) = &details.sub_requests {
                context.push_str("Sub Requests:\n");
                for (sub, description) in subs {
                    let _ = writeln!(context, "- {sub}: {description}");
                }
            }
        }
        context.push('\n');

        format!("{ROLE}\n\n{context}")
    }
}
