pub mod defaults;
#[cfg(test)]
pub(crate) mod log_capture;
pub mod reconciler;
pub mod rest_api_expander;

use std::sync::Arc;

use thiserror::Error;

use crate::matcher::{GlobMatcher, PatternError};
use crate::resource::{FactoryError, Resource, ResourceFactory};

pub use defaults::{DefaultSuppression, RoleLinkage, SERVICE_ROLE_PATH_GLOB};
pub use reconciler::RepresentationReconciler;
pub use rest_api_expander::RestApiExpander;

#[derive(Debug, Error, PartialEq)]
pub enum StageError {
    #[error(transparent)]
    PatternMatch(#[from] PatternError),

    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// One normalization step over the observed and declared resource lists.
///
/// Stages add or drop whole resources and never edit one they keep. Running a
/// stage on its own output must leave both lists unchanged.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    fn execute(
        &self,
        observed: &mut Vec<Resource>,
        declared: &mut Vec<Resource>,
    ) -> Result<(), StageError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineOptions {
    /// Report provider-created defaults instead of suppressing them.
    pub strict_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub stage: String,
    pub observed_before: usize,
    pub observed_after: usize,
    pub declared_before: usize,
    pub declared_after: usize,
}

impl StageReport {
    pub fn is_noop(&self) -> bool {
        self.observed_before == self.observed_after && self.declared_before == self.declared_after
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub stages: Vec<StageReport>,
}

impl RunReport {
    pub fn observed_removed(&self) -> usize {
        self.stages
            .iter()
            .map(|s| s.observed_before.saturating_sub(s.observed_after))
            .sum()
    }

    pub fn declared_added(&self) -> usize {
        self.stages
            .iter()
            .map(|s| s.declared_after.saturating_sub(s.declared_before))
            .sum()
    }
}

#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Production stage order: default suppression first, while the observed
    /// list is still untouched, then expansion, then reconciliation.
    pub fn standard(factory: Arc<dyn ResourceFactory>, options: PipelineOptions) -> Self {
        let mut pipeline = Self::default();

        if !options.strict_mode {
            let matcher = Arc::new(GlobMatcher);
            // NOTE: Linkage stages go before the role stage so the roles they
            // resolve are still in the observed list.
            pipeline.push(DefaultSuppression::policy_attachments(matcher.clone()));
            pipeline.push(DefaultSuppression::role_policies(matcher.clone()));
            pipeline.push(DefaultSuppression::roles(matcher));
        }

        pipeline.push(RestApiExpander::new(factory));
        pipeline.push(RepresentationReconciler::domain_names());
        pipeline.push(RepresentationReconciler::base_path_mappings());

        pipeline
    }

    pub fn push(&mut self, stage: impl Stage + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage in order. The first failing stage aborts the run and its
    /// error is returned as is; changes already applied stay in place.
    pub fn execute(
        &self,
        observed: &mut Vec<Resource>,
        declared: &mut Vec<Resource>,
    ) -> Result<RunReport, StageError> {
        let mut report = RunReport::default();

        for stage in &self.stages {
            let observed_before = observed.len();
            let declared_before = declared.len();

            stage.execute(observed, declared).inspect_err(|e| {
                tracing::debug!(stage = stage.name(), error = %e, "stage failed");
            })?;

            let stage_report = StageReport {
                stage: stage.name().to_string(),
                observed_before,
                observed_after: observed.len(),
                declared_before,
                declared_after: declared.len(),
            };

            tracing::debug!(
                stage = %stage_report.stage,
                observed_before,
                observed_after = stage_report.observed_after,
                declared_before,
                declared_after = stage_report.declared_after,
                "stage complete"
            );

            report.stages.push(stage_report);
        }

        tracing::info!(
            stages = report.stages.len(),
            observed_removed = report.observed_removed(),
            declared_added = report.declared_added(),
            "normalization complete"
        );

        Ok(report)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
