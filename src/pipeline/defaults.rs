//! Suppression of IAM resources AWS creates on its own (service-linked roles
//! and what hangs off them) when the IaC configuration does not declare them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{Stage, StageError};
use crate::matcher::PathMatcher;
use crate::resource::aws::{
    AWS_IAM_POLICY_ATTACHMENT, AWS_IAM_ROLE, AWS_IAM_ROLE_POLICY, LinkedRole, LinkedRoles,
    RolePath,
};
use crate::resource::{Resource, contains_same};

pub const SERVICE_ROLE_PATH_GLOB: &str = "/aws-service-role/*";

/// How a candidate resource leads to the role paths that decide whether it is
/// a provider default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleLinkage {
    /// The candidate is a role; its own path decides.
    OwnPath,
    /// The candidate names exactly one role.
    SingleRole,
    /// The candidate names a set of roles; every one of them must be a default.
    AllRoles,
}

impl RoleLinkage {
    /// Paths of every role the candidate depends on, or `None` when any part of
    /// the linkage cannot be read or resolved. An empty role list resolves to no
    /// paths, which every pattern accepts.
    fn resolve<'a>(
        self,
        candidate: &'a Resource,
        roles: &HashMap<&'a str, &'a Resource>,
    ) -> Option<Vec<&'a str>> {
        let path_of = |role_id: &str| roles.get(role_id).and_then(|role| role.role_path());

        match self {
            RoleLinkage::OwnPath => candidate.role_path().map(|path| vec![path]),
            RoleLinkage::SingleRole => path_of(candidate.linked_role()?).map(|path| vec![path]),
            RoleLinkage::AllRoles => candidate
                .linked_roles()?
                .into_iter()
                .map(path_of)
                .collect(),
        }
    }
}

pub struct DefaultSuppression {
    name: String,
    target_type: &'static str,
    linkage: RoleLinkage,
    pattern: String,
    matcher: Arc<dyn PathMatcher>,
}

impl DefaultSuppression {
    pub fn new(
        target_type: &'static str,
        linkage: RoleLinkage,
        pattern: impl Into<String>,
        matcher: Arc<dyn PathMatcher>,
    ) -> Self {
        Self {
            name: format!("{target_type}_defaults"),
            target_type,
            linkage,
            pattern: pattern.into(),
            matcher,
        }
    }

    pub fn roles(matcher: Arc<dyn PathMatcher>) -> Self {
        Self::new(AWS_IAM_ROLE, RoleLinkage::OwnPath, SERVICE_ROLE_PATH_GLOB, matcher)
    }

    pub fn role_policies(matcher: Arc<dyn PathMatcher>) -> Self {
        Self::new(
            AWS_IAM_ROLE_POLICY,
            RoleLinkage::SingleRole,
            SERVICE_ROLE_PATH_GLOB,
            matcher,
        )
    }

    pub fn policy_attachments(matcher: Arc<dyn PathMatcher>) -> Self {
        Self::new(
            AWS_IAM_POLICY_ATTACHMENT,
            RoleLinkage::AllRoles,
            SERVICE_ROLE_PATH_GLOB,
            matcher,
        )
    }

    fn is_default(
        &self,
        candidate: &Resource,
        roles: &HashMap<&str, &Resource>,
    ) -> Result<bool, StageError> {
        let Some(paths) = self.linkage.resolve(candidate, roles) else {
            tracing::debug!(
                id = %candidate.resource_id,
                "type" = %candidate.resource_type,
                "linked role not resolved, keeping resource"
            );
            return Ok(false);
        };

        for path in paths {
            if !self.matcher.matches(&self.pattern, path)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Stage for DefaultSuppression {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(
        &self,
        observed: &mut Vec<Resource>,
        declared: &mut Vec<Resource>,
    ) -> Result<(), StageError> {
        let mut dropped = HashSet::new();

        {
            let mut roles: HashMap<&str, &Resource> = HashMap::new();
            for role in observed.iter().filter(|r| r.kind() == AWS_IAM_ROLE) {
                roles.entry(role.identifier()).or_insert(role);
            }

            for (index, candidate) in observed.iter().enumerate() {
                if candidate.kind() != self.target_type || contains_same(declared, candidate) {
                    continue;
                }

                if self.is_default(candidate, &roles)? {
                    tracing::debug!(
                        id = %candidate.resource_id,
                        "type" = %candidate.resource_type,
                        "Ignoring default resource as it is not managed by IaC"
                    );
                    dropped.insert(index);
                }
            }
        }

        if !dropped.is_empty() {
            let mut index = 0;
            observed.retain(|_| {
                let keep = !dropped.contains(&index);
                index += 1;
                keep
            });
        }

        Ok(())
    }
}
