use serde::{Deserialize, Serialize};

use crate::compare::ConceptComparison;

/// Value the annotator can pick on the modified control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlChoice {
    No,
    Yes,
}

impl ControlChoice {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn as_flag(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl std::fmt::Display for ControlChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::No => write!(f, "no"),
            Self::Yes => write!(f, "yes"),
        }
    }
}

/// Tri-state modified control of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifiedControl {
    /// Never touched; shows its default position.
    #[default]
    Unset,
    No,
    Yes,
}

impl ModifiedControl {
    pub fn explicit(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::No => Some(false),
            Self::Yes => Some(true),
        }
    }
}

impl From<ControlChoice> for ModifiedControl {
    fn from(choice: ControlChoice) -> Self {
        match choice {
            ControlChoice::No => Self::No,
            ControlChoice::Yes => Self::Yes,
        }
    }
}

/// Session-wide reconciliation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePolicy {
    /// Whether records carry an explicit override control. Without one the
    /// sticky detection rule is the whole policy.
    pub override_control: bool,
    pub concepts: ConceptComparison,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self { override_control: true, concepts: ConceptComparison::CommonPrefix }
    }
}

/// Merge the stored flag, the freshly computed flag and the control.
///
/// - Explicit control choice (override control enabled): the choice, whatever
///   detection currently says.
/// - Otherwise sticky: `stored || computed`. A raised flag is never lowered by
///   editing a field back; only an explicit "no" clears it.
pub fn reconcile(stored: bool, computed: bool, control: ModifiedControl, policy: ReconcilePolicy) -> bool {
    if policy.override_control {
        if let Some(choice) = control.explicit() {
            return choice;
        }
    }
    stored || computed
}

/// Position an untouched control shows for a record with flag `stored`.
pub fn control_default(stored: bool) -> ControlChoice {
    ControlChoice::from_flag(stored)
}
