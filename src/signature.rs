// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
/// Time signature (numerator/denominator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    /// Beats per measure.
    pub numerator: u32,
    /// The note value that receives one beat (4 = quarter, 8 = eighth).
    pub denominator: u32,
}

impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> TimeSignature {
        TimeSignature {
            numerator,
            denominator,
        }
    }

    /// Common time, the fallback for measures with no explicit signature.
    pub fn common_time() -> TimeSignature {
        TimeSignature::new(4, 4)
    }

    /// Get beats per measure.
    pub fn beats_per_measure(&self) -> u32 {
        self.numerator
    }

    /// The length of one beat relative to a quarter note. BPM counts quarter
    /// notes, so a beat in x/8 time lasts half as long as the same tempo's
    /// quarter-note beat.
    pub fn beat_scale(&self) -> f64 {
        4.0 / self.denominator as f64
    }
}

impl Default for TimeSignature {
    fn default() -> TimeSignature {
        TimeSignature::common_time()
    }
}

/// A time signature taking effect at a specific measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureChange {
    /// The 1-based measure this signature applies to.
    pub measure: u32,
    /// The signature for that measure.
    pub signature: TimeSignature,
}

/// An ordered timeline of time signature changes, queryable by measure.
///
/// An entry applies to the measure it names; measures without an entry fall
/// back to common time. Producers that want a signature to persist across
/// measures emit an entry for each measure it covers.
#[derive(Debug, Clone, Default)]
pub struct SignatureTrack {
    /// Changes sorted ascending by measure, unique by measure.
    changes: Vec<SignatureChange>,
}

impl SignatureTrack {
    pub fn new() -> SignatureTrack {
        SignatureTrack::default()
    }

    /// Inserts a single change, keeping the timeline sorted by measure. A
    /// second change for the same measure replaces the first.
    pub fn push(&mut self, change: SignatureChange) {
        match self
            .changes
            .binary_search_by_key(&change.measure, |c| c.measure)
        {
            Ok(index) => self.changes[index] = change,
            Err(index) => self.changes.insert(index, change),
        }
    }

    /// Inserts a batch of changes. The result is sorted ascending by measure
    /// regardless of the input order.
    pub fn extend(&mut self, changes: impl IntoIterator<Item = SignatureChange>) {
        for change in changes {
            self.push(change);
        }
    }

    /// Returns the signature active at the given 1-based measure.
    pub fn signature_at(&self, measure: u32) -> TimeSignature {
        self.changes
            .binary_search_by_key(&measure, |c| c.measure)
            .map(|index| self.changes[index].signature)
            .unwrap_or_default()
    }

    /// Returns the number of beats in the given 1-based measure.
    pub fn beats_per_measure(&self, measure: u32) -> u32 {
        self.signature_at(measure).beats_per_measure()
    }

    /// Returns the number of signature changes on the timeline.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
