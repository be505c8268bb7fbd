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

/// The tempo assumed before the first marker's position, and for tracks with
/// no tempo markers at all.
pub const DEFAULT_BPM: f64 = 100.0;

/// A tempo change: from `position` onward, `bpm` applies. Piecewise constant,
/// no interpolation between markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoMarker {
    /// Seconds from track start at which this tempo takes effect.
    pub position: f64,
    /// Beats per minute, counted in quarter notes. Must be positive.
    pub bpm: f64,
}

impl TempoMarker {
    pub fn new(position: f64, bpm: f64) -> TempoMarker {
        TempoMarker { position, bpm }
    }
}

/// Returns the tempo active at the given position: the marker with the
/// greatest position at or before it, or [DEFAULT_BPM] when the position
/// precedes every marker.
///
/// Markers must be sorted ascending by position. This is a precondition of
/// the whole crate, enforced at the config boundary rather than re-checked
/// here.
pub fn bpm_at(markers: &[TempoMarker], position: f64) -> f64 {
    markers
        .iter()
        .take_while(|marker| marker.position <= position)
        .last()
        .map(|marker| marker.bpm)
        .unwrap_or(DEFAULT_BPM)
}

/// Returns the first marker strictly after the given position, if any.
pub fn next_change_after(markers: &[TempoMarker], position: f64) -> Option<&TempoMarker> {
    markers.iter().find(|marker| marker.position > position)
}
