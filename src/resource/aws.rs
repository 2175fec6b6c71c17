//! AWS resource kinds handled by the normalization stages, and checked
//! accessors for the kind-specific attributes those stages read.
//!
//! Every accessor first checks [`Resource::kind`] and returns `None` for any
//! other kind, so callers never read a field off the wrong resource.

use super::Resource;

pub const AWS_IAM_ROLE: &str = "aws_iam_role";
pub const AWS_IAM_ROLE_POLICY: &str = "aws_iam_role_policy";
pub const AWS_IAM_POLICY_ATTACHMENT: &str = "aws_iam_policy_attachment";

pub const AWS_API_GATEWAY_REST_API: &str = "aws_api_gateway_rest_api";
pub const AWS_API_GATEWAY_RESOURCE: &str = "aws_api_gateway_resource";

pub const AWS_API_GATEWAY_DOMAIN_NAME: &str = "aws_api_gateway_domain_name";
pub const AWS_API_GATEWAY_V2_DOMAIN_NAME: &str = "aws_apigatewayv2_domain_name";
pub const AWS_API_GATEWAY_BASE_PATH_MAPPING: &str = "aws_api_gateway_base_path_mapping";
pub const AWS_API_GATEWAY_V2_API_MAPPING: &str = "aws_apigatewayv2_api_mapping";

/// Path of an IAM role (`path` attribute).
pub trait RolePath {
    fn role_path(&self) -> Option<&str>;
}

/// Name of the single role an inline role policy belongs to (`role` attribute).
pub trait LinkedRole {
    fn linked_role(&self) -> Option<&str>;
}

/// Names of the roles a policy attachment binds (`roles` attribute).
pub trait LinkedRoles {
    fn linked_roles(&self) -> Option<Vec<&str>>;
}

/// Id of the root `/` resource the provider creates with every REST API.
pub trait RootResourceRef {
    fn root_resource_id(&self) -> Option<&str>;
}

impl RolePath for Resource {
    fn role_path(&self) -> Option<&str> {
        if self.kind() != AWS_IAM_ROLE {
            return None;
        }
        self.attr_str("path")
    }
}

impl LinkedRole for Resource {
    fn linked_role(&self) -> Option<&str> {
        if self.kind() != AWS_IAM_ROLE_POLICY {
            return None;
        }
        self.attr_str("role")
    }
}

impl LinkedRoles for Resource {
    fn linked_roles(&self) -> Option<Vec<&str>> {
        if self.kind() != AWS_IAM_POLICY_ATTACHMENT {
            return None;
        }
        self.attr_str_list("roles")
    }
}

impl RootResourceRef for Resource {
    fn root_resource_id(&self) -> Option<&str> {
        if self.kind() != AWS_API_GATEWAY_REST_API {
            return None;
        }
        self.attr_str("root_resource_id")
    }
}
