//! Resolution tags and the order in which they are trusted.
//!
//! Parsers report every resolution-like field they find as a
//! [`ResolutionTag`]. [`resolve_dpi`] walks them by priority and the first
//! tag that yields a usable value wins; no tag at all means "unknown",
//! which is kept apart from any numeric value.

pub const CM_PER_INCH: f64 = 2.54;

/// JFIF density unit: dots per inch.
pub const UNIT_PER_INCH: u8 = 1;
/// JFIF density unit: dots per centimetre.
pub const UNIT_PER_CM: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Density {
    Pair(f64, f64),
    /// One value applied to both axes.
    Scalar(f64),
}

impl Density {
    pub fn axes(self) -> (f64, f64) {
        match self {
            Density::Pair(x, y) => (x, y),
            Density::Scalar(v) => (v, v),
        }
    }

    fn scaled(self, factor: f64) -> Self {
        match self {
            Density::Pair(x, y) => Density::Pair(x * factor, y * factor),
            Density::Scalar(v) => Density::Scalar(v * factor),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionTag {
    /// Explicit dots-per-inch value.
    Dpi(Density),
    /// Density with a JFIF-style unit code.
    UnitDensity { density: Density, unit: u8 },
    /// Resolution of unspecified unit, reported as-is.
    Resolution(Density),
}

impl ResolutionTag {
    /// Lower is tried first.
    pub const fn priority(&self) -> u8 {
        match self {
            ResolutionTag::Dpi(_) => 0,
            ResolutionTag::UnitDensity { .. } => 1,
            ResolutionTag::Resolution(_) => 2,
        }
    }

    /// The value this tag contributes, or `None` to fall through to the next tag.
    pub fn to_dpi(&self) -> Option<Dpi> {
        let density = match *self {
            ResolutionTag::Dpi(density) | ResolutionTag::Resolution(density) => density,
            ResolutionTag::UnitDensity { density, unit } => match unit {
                UNIT_PER_INCH => density,
                UNIT_PER_CM => density.scaled(CM_PER_INCH),
                _ => return None,
            },
        };
        Dpi::new(density)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dpi {
    pub x: f64,
    pub y: f64,
}

impl Dpi {
    /// A stated value is kept as is, zero included; only non-finite
    /// values are rejected.
    fn new(density: Density) -> Option<Self> {
        let (x, y) = density.axes();
        (x.is_finite() && y.is_finite()).then_some(Self { x, y })
    }
}

pub fn resolve_dpi(tags: &[ResolutionTag]) -> Option<Dpi> {
    let mut ordered: Vec<&ResolutionTag> = tags.iter().collect();
    ordered.sort_by_key(|tag| tag.priority());
    ordered.into_iter().find_map(ResolutionTag::to_dpi)
}
