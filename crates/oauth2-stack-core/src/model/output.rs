use super::{Intrinsic, LogicalId};

/// A value exported from the stack for downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    pub logical_id: LogicalId,
    /// Cross-stack export name, unique within the account and region.
    pub export_name: String,
    pub value: Intrinsic,
    pub description: Option<String>,
}

impl StackOutput {
    /// Output whose logical id is derived from its export name.
    pub fn exported(export_name: impl Into<String>, value: impl Into<Intrinsic>) -> Self {
        let export_name = export_name.into();
        Self {
            logical_id: LogicalId::sanitized(&export_name),
            export_name,
            value: value.into(),
            description: None,
        }
    }

    pub fn with_logical_id(mut self, logical_id: LogicalId) -> Self {
        self.logical_id = logical_id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when the value is only known after deployment.
    pub fn is_deferred(&self) -> bool {
        self.value.as_literal().is_none()
    }
}
