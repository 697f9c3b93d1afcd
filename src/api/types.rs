//! Shared DTOs for JSON requests and responses.

use serde::{Deserialize, Serialize};

use crate::narrative::NarrativeRecord;

/// Body of a successful `/analyze` call and of a `/download` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoriesPayload {
    pub stories: Vec<NarrativeRecord>,
}
