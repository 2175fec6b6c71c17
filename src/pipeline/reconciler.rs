use std::collections::{HashMap, HashSet};

use super::{Stage, StageError};
use crate::resource::Resource;
use crate::resource::aws::{
    AWS_API_GATEWAY_BASE_PATH_MAPPING, AWS_API_GATEWAY_DOMAIN_NAME,
    AWS_API_GATEWAY_V2_API_MAPPING, AWS_API_GATEWAY_V2_DOMAIN_NAME,
};

/// Collapses an entity that the provider lists under two API generations.
///
/// The v1 and v2 list endpoints both return every entity, so one scan yields
/// the same id under both types. When both show up, the type the
/// configuration declares wins; unmanaged duplicates keep the v1 type.
#[derive(Debug, Clone)]
pub struct RepresentationReconciler {
    name: String,
    legacy_type: &'static str,
    current_type: &'static str,
}

impl RepresentationReconciler {
    pub fn new(legacy_type: &'static str, current_type: &'static str) -> Self {
        Self {
            name: format!("{legacy_type}_reconciler"),
            legacy_type,
            current_type,
        }
    }

    pub fn domain_names() -> Self {
        Self::new(AWS_API_GATEWAY_DOMAIN_NAME, AWS_API_GATEWAY_V2_DOMAIN_NAME)
    }

    pub fn base_path_mappings() -> Self {
        Self::new(
            AWS_API_GATEWAY_BASE_PATH_MAPPING,
            AWS_API_GATEWAY_V2_API_MAPPING,
        )
    }

    fn handles(&self, resource: &Resource) -> bool {
        resource.kind() == self.legacy_type || resource.kind() == self.current_type
    }
}

impl Stage for RepresentationReconciler {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(
        &self,
        observed: &mut Vec<Resource>,
        declared: &mut Vec<Resource>,
    ) -> Result<(), StageError> {
        let mut declared_kinds: HashMap<&str, HashSet<&str>> = HashMap::new();
        for res in declared.iter().filter(|r| self.handles(r)) {
            declared_kinds
                .entry(res.identifier())
                .or_default()
                .insert(res.kind());
        }

        let mut observed_kinds: HashMap<String, HashSet<String>> = HashMap::new();
        for res in observed.iter().filter(|r| self.handles(r)) {
            observed_kinds
                .entry(res.resource_id.clone())
                .or_default()
                .insert(res.resource_type.clone());
        }

        observed.retain(|res| {
            if !self.handles(res) {
                return true;
            }
            let both_present = observed_kinds
                .get(&res.resource_id)
                .is_some_and(|kinds| kinds.len() > 1);
            if !both_present {
                return true;
            }

            let keep = match declared_kinds.get(res.identifier()) {
                Some(kinds) => kinds.contains(res.kind()),
                None => res.kind() == self.legacy_type,
            };
            if !keep {
                tracing::debug!(
                    id = %res.resource_id,
                    "type" = %res.resource_type,
                    "Dropping duplicate representation"
                );
            }
            keep
        });

        Ok(())
    }
}
