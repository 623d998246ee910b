use std::collections::BTreeSet;
use std::fmt;

use crate::foundation::error::{ReelError, ReelResult};

/// Outcome of a one-time readiness check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// Not ready, with a human-readable reason.
    Pending(String),
}

/// Something that must hold before the first frame is evaluated.
pub trait Precondition {
    fn name(&self) -> &str;
    fn check(&self) -> Readiness;
}

/// One font family at one weight.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontFace {
    pub family: String,
    pub weight: u16,
}

impl FontFace {
    pub fn new(family: impl Into<String>, weight: u16) -> Self {
        Self {
            family: family.into(),
            weight,
        }
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.weight)
    }
}

/// Inter at every weight from 400 to 900.
pub fn inter_faces() -> Vec<FontFace> {
    (4..=9).map(|w| FontFace::new("Inter", w * 100)).collect()
}

/// Font faces the rasterizer has been provisioned with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontCatalog {
    faces: BTreeSet<FontFace>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::empty().with_faces(inter_faces())
    }
}

impl FontCatalog {
    pub fn empty() -> Self {
        Self {
            faces: BTreeSet::new(),
        }
    }

    pub fn with_face(mut self, face: FontFace) -> Self {
        self.faces.insert(face);
        self
    }

    pub fn with_faces(mut self, faces: impl IntoIterator<Item = FontFace>) -> Self {
        self.faces.extend(faces);
        self
    }

    pub fn contains(&self, face: &FontFace) -> bool {
        self.faces.contains(face)
    }

    /// Gate requiring every face in `required`.
    pub fn require<'a>(&'a self, required: &'a [FontFace]) -> FontsLoaded<'a> {
        FontsLoaded {
            catalog: self,
            required,
        }
    }
}

/// [`Precondition`] over a [`FontCatalog`].
pub struct FontsLoaded<'a> {
    catalog: &'a FontCatalog,
    required: &'a [FontFace],
}

impl Precondition for FontsLoaded<'_> {
    fn name(&self) -> &str {
        "fonts"
    }

    fn check(&self) -> Readiness {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|f| !self.catalog.contains(f))
            .map(ToString::to_string)
            .collect();
        if missing.is_empty() {
            Readiness::Ready
        } else {
            Readiness::Pending(format!("missing font faces: {}", missing.join(", ")))
        }
    }
}

/// Check every precondition once; any `Pending` aborts with a validation error.
pub fn ensure_ready(preconditions: &[&dyn Precondition]) -> ReelResult<()> {
    let pending: Vec<String> = preconditions
        .iter()
        .filter_map(|p| match p.check() {
            Readiness::Ready => None,
            Readiness::Pending(reason) => Some(format!("{}: {reason}", p.name())),
        })
        .collect();
    if pending.is_empty() {
        return Ok(());
    }
    Err(ReelError::validation(format!(
        "render session is not ready ({})",
        pending.join("; ")
    )))
}
