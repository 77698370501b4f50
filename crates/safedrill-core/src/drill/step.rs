use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single timed instruction within a drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub safety_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Nominal time budget in milliseconds. Zero completes on the first non-zero tick.
    pub duration_ms: u64,
}

impl Step {
    /// Get step duration in whole seconds, rounded up.
    pub fn duration_secs(&self) -> u64 {
        self.duration_ms.div_ceil(1000)
    }
}

/// Step definition as it appears in user-supplied configuration.
///
/// Durations are signed here so that a negative value is reported as a
/// validation error instead of a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub safety_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub duration_ms: i64,
}

impl TryFrom<StepDef> for Step {
    type Error = ValidationError;

    fn try_from(def: StepDef) -> Result<Self, Self::Error> {
        let duration_ms = u64::try_from(def.duration_ms).map_err(|_| {
            ValidationError::NegativeDuration {
                id: def.id.clone(),
                duration_ms: def.duration_ms,
            }
        })?;
        Ok(Self {
            id: def.id,
            title: def.title,
            description: def.description,
            safety_note: def.safety_note,
            icon: def.icon,
            duration_ms,
        })
    }
}

impl From<Step> for StepDef {
    fn from(step: Step) -> Self {
        Self {
            id: step.id,
            title: step.title,
            description: step.description,
            safety_note: step.safety_note,
            icon: step.icon,
            duration_ms: i64::try_from(step.duration_ms).unwrap_or(i64::MAX),
        }
    }
}

/// Drill definition as it appears in user-supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillDef {
    pub id: String,
    pub name: String,
    pub steps: Vec<StepDef>,
}

/// An ordered, validated, non-empty sequence of steps for one disaster type.
///
/// The step list is fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DrillDef", into = "DrillDef")]
pub struct Drill {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) steps: Vec<Step>,
}

impl Drill {
    /// Build a drill, rejecting an empty step list and duplicate step ids.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if steps.is_empty() {
            return Err(ValidationError::EmptyCollection(format!(
                "drill '{id}' has no steps"
            )));
        }
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(ValidationError::DuplicateStepId {
                    drill: id,
                    id: step.id.clone(),
                });
            }
        }
        Ok(Self {
            id,
            name: name.into(),
            steps,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Never true for a constructed drill.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.steps
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration_ms))
    }
}

impl TryFrom<DrillDef> for Drill {
    type Error = ValidationError;

    fn try_from(def: DrillDef) -> Result<Self, Self::Error> {
        let steps = def
            .steps
            .into_iter()
            .map(Step::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Drill::new(def.id, def.name, steps)
    }
}

impl From<Drill> for DrillDef {
    fn from(drill: Drill) -> Self {
        Self {
            id: drill.id,
            name: drill.name,
            steps: drill.steps.into_iter().map(StepDef::from).collect(),
        }
    }
}
