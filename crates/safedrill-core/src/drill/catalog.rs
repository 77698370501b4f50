//! Built-in drill content and lookup by disaster type.

use super::step::{Drill, DrillDef, Step};
use crate::error::ValidationError;

/// Disaster type used when a requested kind is unknown.
pub const FALLBACK_KIND: &str = "earthquake";

/// (id, title, description, safety note, icon, duration ms)
type StepRow = (&'static str, &'static str, &'static str, &'static str, &'static str, u64);

const EARTHQUAKE: &[StepRow] = &[
    (
        "drop",
        "Drop",
        "Immediately drop to your hands and knees",
        "This protects you from being knocked over",
        "⬇️",
        3000,
    ),
    (
        "cover",
        "Cover",
        "Take cover under a strong desk or table",
        "Protects your head and torso from falling debris",
        "🏠",
        4000,
    ),
    (
        "hold-on",
        "Hold On",
        "Hold on to your shelter and protect your head",
        "Stay protected until shaking stops completely",
        "🤝",
        3000,
    ),
    (
        "evacuate",
        "Evacuate",
        "Exit building carefully using stairs, not elevators",
        "Check for hazards and proceed to assembly point",
        "🚶",
        4000,
    ),
];

const FIRE: &[StepRow] = &[
    (
        "alert",
        "Alert",
        "Sound the fire alarm and alert others",
        "Early warning saves lives",
        "🔔",
        2000,
    ),
    (
        "stay-low",
        "Stay Low",
        "Crawl under smoke to breathe cleaner air",
        "Heat and toxic gases rise, clean air is near floor",
        "⬇️",
        3000,
    ),
    (
        "check-doors",
        "Check Doors",
        "Feel doors before opening - if hot, find another route",
        "Hot doors indicate fire on other side",
        "🚪",
        3000,
    ),
    (
        "exit-safely",
        "Exit Safely",
        "Use nearest exit, close doors behind you",
        "Closing doors slows fire spread",
        "🏃",
        3000,
    ),
];

fn builtin(id: &str, name: &str, rows: &[StepRow]) -> Drill {
    Drill {
        id: id.into(),
        name: name.into(),
        steps: rows
            .iter()
            .map(|&(id, title, description, safety_note, icon, duration_ms)| Step {
                id: id.into(),
                title: title.into(),
                description: description.into(),
                safety_note: safety_note.into(),
                icon: Some(icon.into()),
                duration_ms,
            })
            .collect(),
    }
}

/// Collection of drills available to the application.
#[derive(Debug, Clone)]
pub struct DrillCatalog {
    drills: Vec<Drill>,
}

impl DrillCatalog {
    /// The built-in earthquake and fire drills.
    pub fn builtin() -> Self {
        Self {
            drills: vec![
                builtin(FALLBACK_KIND, "Earthquake", EARTHQUAKE),
                builtin("fire", "Fire", FIRE),
            ],
        }
    }

    /// Built-in drills plus custom definitions. A custom drill with the same
    /// id as an existing one replaces it.
    pub fn with_custom(defs: &[DrillDef]) -> Result<Self, ValidationError> {
        let mut catalog = Self::builtin();
        for def in defs {
            catalog.insert(Drill::try_from(def.clone())?);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, drill: Drill) {
        match self.drills.iter_mut().find(|d| d.id == drill.id) {
            Some(existing) => *existing = drill,
            None => self.drills.push(drill),
        }
    }

    pub fn find(&self, kind: &str) -> Option<&Drill> {
        self.drills.iter().find(|d| d.id == kind)
    }

    /// Look up a drill, falling back to the earthquake drill for unknown kinds.
    pub fn get(&self, kind: &str) -> &Drill {
        self.find(kind)
            .or_else(|| self.find(FALLBACK_KIND))
            .unwrap_or(&self.drills[0])
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.drills.iter().map(|d| d.id.as_str())
    }

    pub fn drills(&self) -> &[Drill] {
        &self.drills
    }
}

impl Default for DrillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
