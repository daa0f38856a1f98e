use crate::types::NotionId;
use serde::{Deserialize, Serialize};

/// Common fields for all blocks.
///
/// Children are never stored inline: a block with `has_children` set has its
/// children listed lazily, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCommon {
    pub id: NotionId,
    pub has_children: bool,
}

impl BlockCommon {
    pub fn new(id: NotionId) -> Self {
        Self {
            id,
            has_children: false,
        }
    }

    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }
}
