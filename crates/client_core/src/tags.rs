use std::fmt;

/// Display color for a stop/box tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagColor {
    Orange,
    Green,
    Blue,
    Purple,
    Pink,
    Yellow,
    Teal,
    Red,
    Neutral,
}

impl TagColor {
    pub fn hex(self) -> &'static str {
        match self {
            Self::Orange => "#F97316",
            Self::Green => "#22C55E",
            Self::Blue => "#3B82F6",
            Self::Purple => "#A855F7",
            Self::Pink => "#EC4899",
            Self::Yellow => "#EAB308",
            Self::Teal => "#14B8A6",
            Self::Red => "#EF4444",
            Self::Neutral => "#9CA3AF",
        }
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

/// Maps a tag color code (1..=8) to its color. Anything else, including a
/// missing code, is neutral.
pub fn resolve_tag_color(code: Option<i64>) -> TagColor {
    match code {
        Some(1) => TagColor::Orange,
        Some(2) => TagColor::Green,
        Some(3) => TagColor::Blue,
        Some(4) => TagColor::Purple,
        Some(5) => TagColor::Pink,
        Some(6) => TagColor::Yellow,
        Some(7) => TagColor::Teal,
        Some(8) => TagColor::Red,
        _ => TagColor::Neutral,
    }
}
