use std::sync::Arc;

use super::{Stage, StageError};
use crate::resource::aws::{
    AWS_API_GATEWAY_RESOURCE, AWS_API_GATEWAY_REST_API, RootResourceRef,
};
use crate::resource::{Attributes, Resource, ResourceFactory, contains_same};

/// Declares the root `/` resource of every declared REST API.
///
/// The provider creates that resource together with the API and only records
/// its id in `root_resource_id`, so without this stage it would always show up
/// as unmanaged.
pub struct RestApiExpander {
    factory: Arc<dyn ResourceFactory>,
}

impl RestApiExpander {
    pub fn new(factory: Arc<dyn ResourceFactory>) -> Self {
        Self { factory }
    }
}

impl Stage for RestApiExpander {
    fn name(&self) -> &str {
        "aws_api_gateway_rest_api_expander"
    }

    fn execute(
        &self,
        _observed: &mut Vec<Resource>,
        declared: &mut Vec<Resource>,
    ) -> Result<(), StageError> {
        let roots: Vec<(String, String)> = declared
            .iter()
            .filter(|r| r.kind() == AWS_API_GATEWAY_REST_API)
            .filter_map(|api| {
                let root_id = api.root_resource_id().filter(|id| !id.is_empty())?;
                Some((api.resource_id.clone(), root_id.to_string()))
            })
            .collect();

        for (api_id, root_id) in roots {
            if contains_same(declared, &Resource::new(AWS_API_GATEWAY_RESOURCE, root_id.as_str())) {
                continue;
            }

            let attributes: Attributes = [("rest_api_id", api_id.as_str()), ("path", "/")]
                .into_iter()
                .collect();
            let root = self
                .factory
                .create_abstract_resource(AWS_API_GATEWAY_RESOURCE, &root_id, attributes)?;

            tracing::debug!(
                id = %root.resource_id,
                rest_api_id = %api_id,
                "Created root resource from api gateway rest api"
            );
            declared.push(root);
        }

        Ok(())
    }
}
