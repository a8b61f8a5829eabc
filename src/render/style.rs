//! Per-persona presentation lookups: colour, board column and icon.

use console::Style;

use crate::persona::PersonaKind;

/// Tone of a persona's panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStyle {
    /// Green
    Affirmative,
    /// Yellow
    Cautionary,
    /// Blue
    Informational,
}

impl DisplayStyle {
    pub fn for_kind(kind: PersonaKind) -> Self {
        match kind {
            PersonaKind::Mentor => DisplayStyle::Affirmative,
            PersonaKind::Finance | PersonaKind::Legal => DisplayStyle::Cautionary,
            PersonaKind::Warehouse | PersonaKind::Supplier | PersonaKind::Logistics => {
                DisplayStyle::Informational
            }
        }
    }

    pub fn style(&self) -> Style {
        match self {
            DisplayStyle::Affirmative => Style::new().green(),
            DisplayStyle::Cautionary => Style::new().yellow(),
            DisplayStyle::Informational => Style::new().blue(),
        }
    }
}

/// Side of the two-column feedback board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    pub fn for_kind(kind: PersonaKind) -> Self {
        match kind {
            PersonaKind::Finance | PersonaKind::Warehouse | PersonaKind::Legal => Column::Left,
            PersonaKind::Supplier | PersonaKind::Logistics | PersonaKind::Mentor => Column::Right,
        }
    }
}

pub fn icon(kind: PersonaKind) -> &'static str {
    match kind {
        PersonaKind::Finance => "💰",
        PersonaKind::Warehouse => "📦",
        PersonaKind::Supplier => "🛒",
        PersonaKind::Logistics => "🚚",
        PersonaKind::Legal => "⚖️",
        PersonaKind::Mentor => "🎓",
    }
}
