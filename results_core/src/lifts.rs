//! # Lift Segmentation
//!
//! A *lift* is a maximal run of consecutive spans joined by fully
//! moment-continuous connections. Any rotational release at a joint (on
//! either side) starts a new lift.
//!
//! A connection end is moment-continuous only when all three rotational
//! degrees of freedom (`Mx`, `My`, `Mz`) are restrained. A span end with no
//! release descriptor counts as not fixed.
//!
//! ## Example
//!
//! ```rust
//! use results_core::lifts::segment;
//! use results_core::model::{Member, MemberConstruction, Span, SpanReleases};
//!
//! let member = Member::new("C1", MemberConstruction::TimberColumn)
//!     .with_span(Span::new(0, "S1", 3000.0).with_end_releases(SpanReleases::fixed()))
//!     .with_span(Span::new(1, "S2", 3000.0).with_start_releases(SpanReleases::fixed()))
//!     .with_span(Span::new(2, "S3", 3000.0).with_start_releases(SpanReleases::free()));
//!
//! let lifts = segment(&member);
//! assert_eq!(lifts.len(), 2);
//! assert_eq!(lifts[0].name, "L1");
//! assert_eq!(lifts[0].spans.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::model::{DofSet, Member, Span, SpanReleases};

/// Consecutive spans of one member treated as one continuous segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lift {
    /// `L1`, `L2`, ... in member order
    pub name: String,
    pub spans: Vec<Span>,
}

impl Lift {
    fn start(number: usize, span: &Span) -> Self {
        Lift {
            name: format!("L{}", number),
            spans: vec![span.clone()],
        }
    }

    /// `"{member}-{lift}"`, e.g. `C1-L2`
    pub fn display_name(&self, member: &Member) -> String {
        format!("{}-{}", member.name, self.name)
    }

    /// `"(n): S1; S2"`
    pub fn included_spans(&self) -> String {
        let names: Vec<&str> = self.spans.iter().map(|s| s.name.as_str()).collect();
        format!("({}): {}", self.spans.len(), names.join("; "))
    }

    pub fn length_ft(&self) -> f64 {
        self.spans.iter().map(Span::length_ft).sum()
    }

    /// First non-empty section in span order
    pub fn section(&self) -> Option<&str> {
        self.spans
            .iter()
            .filter_map(|s| s.section.as_deref())
            .find(|s| !s.is_empty())
    }

    /// Distance from the lift start to the start of each span, in ft
    pub fn span_offsets_ft(&self) -> Vec<f64> {
        self.spans
            .iter()
            .scan(0.0, |running, span| {
                let offset = *running;
                *running += span.length_ft();
                Some(offset)
            })
            .collect()
    }
}

/// True when `releases` restrains every rotational degree of freedom.
pub fn is_fully_fixed(releases: Option<&SpanReleases>) -> bool {
    releases.is_some_and(|r| r.restrained.contains_all(DofSet::ALL_ROTATIONS))
}

/// Partition the member's spans into lifts.
pub fn segment(member: &Member) -> Vec<Lift> {
    let mut lifts: Vec<Lift> = Vec::new();
    let mut previous_top_fixed = false;

    for span in member.ordered_spans() {
        let bottom_fixed = is_fully_fixed(span.start_releases.as_ref());
        let top_fixed = is_fully_fixed(span.end_releases.as_ref());

        if !bottom_fixed || !previous_top_fixed || lifts.is_empty() {
            lifts.push(Lift::start(lifts.len() + 1, span));
        } else if let Some(lift) = lifts.last_mut() {
            lift.spans.push(span.clone());
        }

        previous_top_fixed = top_fixed;
    }

    lifts
}
