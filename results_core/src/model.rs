//! # Structural Model
//!
//! Geometry and loading descriptors as handed over by the host analysis
//! application. The engine never creates or destroys these; it only reads
//! them.
//!
//! ```text
//! Member
//! ├── id, name, construction
//! └── spans: Vec<Span>   (ordered by `index`)
//!     ├── length_mm, rotation_deg, section
//!     └── start_releases / end_releases: Option<SpanReleases>
//!                                         └── restrained: DofSet
//! ```
//!
//! ## Example
//!
//! ```rust
//! use results_core::model::{Dof, DofSet, Member, MemberConstruction, Span, SpanReleases};
//!
//! let fixed = SpanReleases::new(DofSet::ALL_ROTATIONS);
//! let span = Span::new(0, "S1", 3048.0).with_end_releases(fixed);
//! let member = Member::new("C1", MemberConstruction::TimberColumn).with_span(span);
//!
//! assert!(member.spans[0].end_releases.as_ref().unwrap().restrained.contains(Dof::Mz));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::mm_to_ft;

// =============================================================================
// DEGREES OF FREEDOM
// =============================================================================

/// A single degree of freedom at a span end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dof {
    Fx,
    Fy,
    Fz,
    Mx,
    My,
    Mz,
}

impl Dof {
    pub const ALL: [Dof; 6] = [Dof::Fx, Dof::Fy, Dof::Fz, Dof::Mx, Dof::My, Dof::Mz];

    fn bit(self) -> u8 {
        match self {
            Dof::Fx => 1 << 0,
            Dof::Fy => 1 << 1,
            Dof::Fz => 1 << 2,
            Dof::Mx => 1 << 3,
            Dof::My => 1 << 4,
            Dof::Mz => 1 << 5,
        }
    }

    /// Returns true for the three rotational degrees of freedom
    pub fn is_rotational(self) -> bool {
        matches!(self, Dof::Mx | Dof::My | Dof::Mz)
    }
}

/// Bitmask of degrees of freedom.
///
/// Serializes as a list, e.g. `["Mx", "My", "Mz"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Dof>", into = "Vec<Dof>")]
pub struct DofSet {
    bits: u8,
}

impl DofSet {
    pub const EMPTY: DofSet = DofSet { bits: 0 };
    pub const ALL_ROTATIONS: DofSet = DofSet { bits: 0b111000 };
    pub const ALL: DofSet = DofSet { bits: 0b111111 };

    pub fn with(mut self, dof: Dof) -> Self {
        self.bits |= dof.bit();
        self
    }

    pub fn contains(&self, dof: Dof) -> bool {
        self.bits & dof.bit() != 0
    }

    pub fn contains_all(&self, other: DofSet) -> bool {
        self.bits & other.bits == other.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Dof> + '_ {
        Dof::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Dof> for DofSet {
    fn from_iter<I: IntoIterator<Item = Dof>>(iter: I) -> Self {
        iter.into_iter().fold(DofSet::EMPTY, DofSet::with)
    }
}

impl From<Vec<Dof>> for DofSet {
    fn from(dofs: Vec<Dof>) -> Self {
        dofs.into_iter().collect()
    }
}

impl From<DofSet> for Vec<Dof> {
    fn from(set: DofSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for DofSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Free");
        }
        let names: Vec<String> = self.iter().map(|d| format!("{:?}", d)).collect();
        write!(f, "{}", names.join(" "))
    }
}

/// End condition of a span: which degrees of freedom are restrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpanReleases {
    pub restrained: DofSet,
}

impl SpanReleases {
    pub fn new(restrained: DofSet) -> Self {
        SpanReleases { restrained }
    }

    /// No restraint at all
    pub fn free() -> Self {
        SpanReleases::default()
    }

    /// Translations restrained, rotations free
    pub fn pinned() -> Self {
        SpanReleases::new([Dof::Fx, Dof::Fy, Dof::Fz].into_iter().collect())
    }

    /// Everything restrained
    pub fn fixed() -> Self {
        SpanReleases::new(DofSet::ALL)
    }
}

// =============================================================================
// MEMBERS AND SPANS
// =============================================================================

/// Construction kind of a member, used to pick which members an extraction
/// covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MemberConstruction {
    SteelBeam,
    SteelColumn,
    SteelBrace,
    TimberBeam,
    TimberColumn,
    #[default]
    #[serde(other)]
    Other,
}

impl MemberConstruction {
    pub fn display_name(&self) -> &'static str {
        match self {
            MemberConstruction::SteelBeam => "Steel Beam",
            MemberConstruction::SteelColumn => "Steel Column",
            MemberConstruction::SteelBrace => "Steel Brace",
            MemberConstruction::TimberBeam => "Timber Beam",
            MemberConstruction::TimberColumn => "Timber Column",
            MemberConstruction::Other => "Other",
        }
    }
}

/// One segment of a member between two connection points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Ordering key, unique within the member
    pub index: usize,

    pub name: String,

    /// Length in mm
    pub length_mm: f64,

    #[serde(default)]
    pub start_releases: Option<SpanReleases>,

    #[serde(default)]
    pub end_releases: Option<SpanReleases>,

    /// Rotation angle in degrees
    #[serde(default)]
    pub rotation_deg: f64,

    #[serde(default)]
    pub section: Option<String>,
}

impl Span {
    pub fn new(index: usize, name: impl Into<String>, length_mm: f64) -> Self {
        Span {
            index,
            name: name.into(),
            length_mm,
            start_releases: None,
            end_releases: None,
            rotation_deg: 0.0,
            section: None,
        }
    }

    pub fn with_start_releases(mut self, releases: SpanReleases) -> Self {
        self.start_releases = Some(releases);
        self
    }

    pub fn with_end_releases(mut self, releases: SpanReleases) -> Self {
        self.end_releases = Some(releases);
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_deg = degrees;
        self
    }

    pub fn length_ft(&self) -> f64 {
        mm_to_ft(self.length_mm)
    }
}

/// A structural member and its spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub construction: MemberConstruction,
    pub spans: Vec<Span>,
}

impl Member {
    pub fn new(name: impl Into<String>, construction: MemberConstruction) -> Self {
        Member {
            id: Uuid::new_v4(),
            name: name.into(),
            construction,
            spans: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    /// Spans sorted by index
    pub fn ordered_spans(&self) -> Vec<&Span> {
        let mut spans: Vec<&Span> = self.spans.iter().collect();
        spans.sort_by_key(|s| s.index);
        spans
    }
}

// =============================================================================
// LOADING
// =============================================================================

/// Kind of loading condition a result is reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadingKind {
    Case,
    Combination,
    Envelope,
}

/// Analysis type results are requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnalysisType {
    #[default]
    FirstOrderLinear,
    SecondOrderLinear,
    FirstOrderNonLinear,
    SecondOrderNonLinear,
}

/// A loading case, combination or envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingCase {
    pub id: Uuid,
    pub name: String,
    pub kind: LoadingKind,
    /// Whether results exist for this loading
    #[serde(default)]
    pub solved: bool,
}

impl LoadingCase {
    pub fn new(name: impl Into<String>, kind: LoadingKind) -> Self {
        LoadingCase {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            solved: true,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn unsolved(mut self) -> Self {
        self.solved = false;
        self
    }

    /// Name safe for comma-separated output
    pub fn csv_safe_name(&self) -> String {
        self.name.replace(',', "`")
    }
}

/// Counts of loadings found vs. solved, per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadingSummary {
    pub cases: usize,
    pub solved_cases: usize,
    pub combinations: usize,
    pub solved_combinations: usize,
    pub envelopes: usize,
    pub solved_envelopes: usize,
}

impl LoadingSummary {
    pub fn from_loadings(loadings: &[LoadingCase]) -> Self {
        let mut summary = LoadingSummary::default();
        for loading in loadings {
            let (total, solved) = match loading.kind {
                LoadingKind::Case => (&mut summary.cases, &mut summary.solved_cases),
                LoadingKind::Combination => (&mut summary.combinations, &mut summary.solved_combinations),
                LoadingKind::Envelope => (&mut summary.envelopes, &mut summary.solved_envelopes),
            };
            *total += 1;
            if loading.solved {
                *solved += 1;
            }
        }
        summary
    }

    pub fn total_solved(&self) -> usize {
        self.solved_cases + self.solved_combinations + self.solved_envelopes
    }
}
