use std::fmt;

use serde::Serialize;

/// Presentation color tag paired with every derived level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Gray,
    Red,
    Yellow,
    Blue,
    Green,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Green => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityLevel {
    Unknown,
    Abnormal,
    Low,
    Active,
    High,
}

impl ActivityLevel {
    /// Position on the shared weakest-link scale; `None` for `Unknown`.
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Unknown => None,
            Self::Abnormal => Some(1),
            Self::Low => Some(2),
            Self::Active => Some(4),
            Self::High => Some(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegularityLevel {
    Unknown,
    Abnormal,
    Low,
    Normal,
    High,
}

impl RegularityLevel {
    /// Position on the shared weakest-link scale; `None` for `Unknown`.
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Unknown => None,
            Self::Abnormal => Some(1),
            Self::Low => Some(2),
            Self::Normal => Some(3),
            Self::High => Some(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Unknown,
    Attention,
    Normal,
    Active,
    High,
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for RegularityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A derived level together with the color it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indicator<L> {
    pub level: L,
    pub color: Color,
}

impl<L> From<(L, Color)> for Indicator<L> {
    fn from((level, color): (L, Color)) -> Self {
        Self { level, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub activity: Indicator<ActivityLevel>,
    pub regularity: Indicator<RegularityLevel>,
    pub status: Indicator<Status>,
}
