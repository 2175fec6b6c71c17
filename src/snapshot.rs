//! Resource list snapshots exchanged with the enumerator and the state reader:
//! a JSON array of `{"id", "type", "attributes"?}` objects.

use std::path::Path;

use crate::error::DriftError;
use crate::resource::Resource;

pub fn load(path: &Path) -> Result<Vec<Resource>, DriftError> {
    let content = std::fs::read_to_string(path)?;
    let resources: Vec<Resource> =
        serde_json::from_str(&content).map_err(|source| DriftError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&resources)?;

    tracing::debug!(path = %path.display(), count = resources.len(), "snapshot loaded");
    Ok(resources)
}

/// Parses an in-memory snapshot. `origin` only labels errors.
pub fn parse(content: &str, origin: &str) -> Result<Vec<Resource>, DriftError> {
    let resources: Vec<Resource> =
        serde_json::from_str(content).map_err(|source| DriftError::Snapshot {
            path: origin.into(),
            source,
        })?;
    validate(&resources)?;
    Ok(resources)
}

fn validate(resources: &[Resource]) -> Result<(), DriftError> {
    for (index, resource) in resources.iter().enumerate() {
        if resource.resource_id.is_empty() {
            return Err(DriftError::InvalidResource {
                index,
                reason: "empty id".to_string(),
            });
        }
        if resource.resource_type.is_empty() {
            return Err(DriftError::InvalidResource {
                index,
                reason: format!("empty type for id '{}'", resource.resource_id),
            });
        }
    }
    Ok(())
}
