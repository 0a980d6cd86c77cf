use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AdminError, ProvisionError};
use crate::model::{PolicyModel, ValidatedModel};

use super::{PolicyAdmin, ProvisionStage};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub created: usize,
    /// Items the service already had; re-runs after a partial failure land here.
    pub already_present: usize,
    pub per_stage: BTreeMap<ProvisionStage, usize>,
}

impl ProvisionSummary {
    fn record(&mut self, stage: ProvisionStage, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Created => self.created += 1,
            ItemOutcome::AlreadyPresent => self.already_present += 1,
        }
        *self.per_stage.entry(stage).or_default() += 1;
    }

    fn merge(&mut self, other: ProvisionSummary) {
        self.created += other.created;
        self.already_present += other.already_present;
        for (stage, n) in other.per_stage {
            *self.per_stage.entry(stage).or_default() += n;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ItemOutcome {
    Created,
    AlreadyPresent,
}

pub struct Provisioner {
    admin: Arc<dyn PolicyAdmin>,
}

impl Provisioner {
    pub fn new(admin: Arc<dyn PolicyAdmin>) -> Self {
        Self { admin }
    }

    /// Applies every stage in [`ProvisionStage::ORDERED`], stopping at the
    /// first failing item. No rollback; re-running is the recovery path.
    pub async fn apply(&self, model: &ValidatedModel) -> Result<ProvisionSummary, ProvisionError> {
        tracing::info!(
            target: "finguard.provision",
            admin = %self.admin.name(),
            resources = model.resources.len(),
            roles = model.roles.len(),
            "provisioning policy model"
        );
        let mut summary = ProvisionSummary::default();
        for stage in ProvisionStage::ORDERED {
            summary.merge(self.apply_stage(stage, model).await?);
        }
        tracing::info!(
            target: "finguard.provision",
            created = summary.created,
            already_present = summary.already_present,
            "provisioning complete"
        );
        Ok(summary)
    }

    /// Applies a single stage. Calling this out of order lets the service
    /// reject dangling references, which surfaces as a stage-tagged error.
    pub async fn apply_stage(
        &self,
        stage: ProvisionStage,
        model: &PolicyModel,
    ) -> Result<ProvisionSummary, ProvisionError> {
        tracing::debug!(target: "finguard.provision", stage = %stage, "stage start");
        let mut summary = ProvisionSummary::default();
        match stage {
            ProvisionStage::Resources => {
                for r in &model.resources {
                    let res = self.admin.create_resource(r).await;
                    summary.record(stage, settle(stage, &r.key, res)?);
                }
            }
            ProvisionStage::UserAttributes => {
                for a in &model.user_attributes {
                    let res = self.admin.create_user_attribute(a).await;
                    summary.record(stage, settle(stage, &a.key, res)?);
                }
            }
            ProvisionStage::Roles => {
                for role in &model.roles {
                    let res = self.admin.create_role(role).await;
                    summary.record(stage, settle(stage, &role.key(), res)?);
                }
            }
            ProvisionStage::UserSets => {
                for set in &model.user_sets {
                    let res = self.admin.create_condition_set(set).await;
                    summary.record(stage, settle(stage, &set.key, res)?);
                }
            }
            ProvisionStage::ResourceSets => {
                for set in &model.resource_sets {
                    let res = self.admin.create_condition_set(set).await;
                    summary.record(stage, settle(stage, &set.key, res)?);
                }
            }
            ProvisionStage::ConditionSetRules => {
                for rule in &model.condition_set_rules {
                    let res = self.admin.create_condition_set_rule(rule).await;
                    summary.record(stage, settle(stage, &rule.key(), res)?);
                }
            }
        }
        tracing::info!(
            target: "finguard.provision",
            stage = %stage,
            items = summary.created + summary.already_present,
            "stage applied"
        );
        Ok(summary)
    }
}

fn settle(
    stage: ProvisionStage,
    item_key: &str,
    res: Result<(), AdminError>,
) -> Result<ItemOutcome, ProvisionError> {
    match res {
        Ok(()) => {
            tracing::debug!(target: "finguard.provision", stage = %stage, item = item_key, "created");
            Ok(ItemOutcome::Created)
        }
        Err(AdminError::Conflict { .. }) => {
            tracing::info!(
                target: "finguard.provision",
                stage = %stage,
                item = item_key,
                "already exists, skipping"
            );
            Ok(ItemOutcome::AlreadyPresent)
        }
        Err(cause) => {
            tracing::error!(
                target: "finguard.provision",
                stage = %stage,
                item = item_key,
                error = %cause,
                "provisioning aborted"
            );
            Err(ProvisionError {
                stage,
                item_key: item_key.to_string(),
                cause,
            })
        }
    }
}
