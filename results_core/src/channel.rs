//! # Response Channels
//!
//! The ten physical responses reported for every span, and the query
//! descriptor the host application expects for each.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::QuantityKind;

/// Local axis a response acts about or along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadingDirection {
    Major,
    Minor,
    Axial,
}

/// A physical response channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    ShearMajor,
    ShearMinor,
    MomentMajor,
    MomentMinor,
    Axial,
    Torsion,
    DeflectionMajor,
    DeflectionMinor,
    DisplacementMajor,
    DisplacementMinor,
}

impl Channel {
    /// All channels in report order
    pub const ALL: [Channel; 10] = [
        Channel::ShearMajor,
        Channel::ShearMinor,
        Channel::MomentMajor,
        Channel::MomentMinor,
        Channel::Axial,
        Channel::Torsion,
        Channel::DeflectionMajor,
        Channel::DeflectionMinor,
        Channel::DisplacementMajor,
        Channel::DisplacementMinor,
    ];

    pub fn quantity_kind(&self) -> QuantityKind {
        match self {
            Channel::ShearMajor | Channel::ShearMinor | Channel::Axial => QuantityKind::Force,
            Channel::MomentMajor | Channel::MomentMinor | Channel::Torsion => QuantityKind::Moment,
            Channel::DeflectionMajor | Channel::DeflectionMinor => QuantityKind::Deflection,
            Channel::DisplacementMajor | Channel::DisplacementMinor => QuantityKind::Displacement,
        }
    }

    pub fn direction(&self) -> LoadingDirection {
        match self {
            Channel::ShearMajor
            | Channel::MomentMajor
            | Channel::DeflectionMajor
            | Channel::DisplacementMajor => LoadingDirection::Major,
            Channel::ShearMinor
            | Channel::MomentMinor
            | Channel::DeflectionMinor
            | Channel::DisplacementMinor => LoadingDirection::Minor,
            Channel::Axial | Channel::Torsion => LoadingDirection::Axial,
        }
    }

    /// Query descriptor for this channel
    pub fn query(&self, reduced: bool) -> ChannelQuery {
        ChannelQuery {
            kind: self.quantity_kind(),
            direction: self.direction(),
            reduced,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Channel::ShearMajor => "Shear Major",
            Channel::ShearMinor => "Shear Minor",
            Channel::MomentMajor => "Moment Major",
            Channel::MomentMinor => "Moment Minor",
            Channel::Axial => "Axial Force",
            Channel::Torsion => "Torsion",
            Channel::DeflectionMajor => "Deflection Major",
            Channel::DeflectionMinor => "Deflection Minor",
            Channel::DisplacementMajor => "Displacement Major",
            Channel::DisplacementMinor => "Displacement Minor",
        }
    }

    /// Column label with display unit, e.g. `"Moment Major [k-ft]"`
    pub fn label(&self) -> String {
        format!("{} [{}]", self.display_name(), self.quantity_kind().display_unit())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// What the host application needs to identify a result series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelQuery {
    pub kind: QuantityKind,
    pub direction: LoadingDirection,
    /// Live load reduction applied
    pub reduced: bool,
}

/// Fixed-size per-channel storage indexed by [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelMap<T> {
    values: [T; 10],
}

impl<T> ChannelMap<T> {
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        ChannelMap {
            values: Channel::ALL.map(&mut f),
        }
    }

    pub fn get(&self, channel: Channel) -> &T {
        &self.values[channel as usize]
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.values[channel as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().zip(self.values.iter())
    }

    /// Keyed copy for serialized reports
    pub fn to_map(&self) -> BTreeMap<Channel, T>
    where
        T: Clone,
    {
        self.iter().map(|(c, v)| (c, v.clone())).collect()
    }
}

impl<T> std::ops::Index<Channel> for ChannelMap<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        self.get(channel)
    }
}

impl<T> std::ops::IndexMut<Channel> for ChannelMap<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        self.get_mut(channel)
    }
}
