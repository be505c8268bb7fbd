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
use serde::Serialize;
use tracing::debug;

use crate::signature::SignatureTrack;
use crate::tempo::{self, TempoMarker};

/// A single beat of the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeatMarker {
    /// Seconds from track start.
    pub position: f64,
    /// 1-based measure number.
    pub measure: u32,
    /// 1-based beat within the measure, wrapping at the active signature's
    /// beats-per-measure.
    pub beat: u32,
}

/// Computes the beat grid of a track: the time position of every beat,
/// labeled with its measure and beat number.
///
/// Single-writer: a call to [MarkerCalculator::calculate_markers] replaces
/// the previous grid wholesale. Callers read the result back through
/// [MarkerCalculator::markers] once the call returns.
#[derive(Debug, Clone, Default)]
pub struct MarkerCalculator {
    markers: Vec<BeatMarker>,
}

impl MarkerCalculator {
    pub fn new() -> MarkerCalculator {
        MarkerCalculator::default()
    }

    /// The grid produced by the most recent calculation, sorted strictly
    /// ascending by position.
    pub fn markers(&self) -> &[BeatMarker] {
        &self.markers
    }

    /// Walks the track from position 0, measure 1, beat 1, emitting one
    /// marker per beat until the next beat would start at or past
    /// `duration_seconds`. A non-positive duration produces an empty grid.
    ///
    /// `tempo_markers` must be sorted ascending by position with positive
    /// BPM values; the config layer validates this before domain types are
    /// built.
    pub fn calculate_markers(
        &mut self,
        tempo_markers: &[TempoMarker],
        signatures: &SignatureTrack,
        duration_seconds: f64,
    ) {
        self.markers.clear();
        if duration_seconds <= 0.0 {
            return;
        }

        let mut position = 0.0;
        let mut measure: u32 = 1;
        let mut beat: u32 = 1;

        while position < duration_seconds {
            self.markers.push(BeatMarker {
                position,
                measure,
                beat,
            });

            // The beat's length is governed by the signature of the measure
            // it starts in, even when it carries across a measure boundary.
            let scale = signatures.signature_at(measure).beat_scale();
            position = advance_one_beat(tempo_markers, position, scale);

            beat += 1;
            if beat > signatures.beats_per_measure(measure) {
                beat = 1;
                measure += 1;
            }
        }

        debug!(
            beats = self.markers.len(),
            duration_seconds, "calculated beat markers"
        );
    }
}

/// Advances exactly one beat from `start`, integrating through any tempo
/// changes the beat spans: wall time spent at each tempo consumes the
/// corresponding fraction of the beat, so a mid-beat change shifts where the
/// beat ends.
fn advance_one_beat(tempo_markers: &[TempoMarker], start: f64, scale: f64) -> f64 {
    let mut position = start;
    let mut remaining = 1.0;

    loop {
        let beat_length = 60.0 / tempo::bpm_at(tempo_markers, position) * scale;
        match tempo::next_change_after(tempo_markers, position) {
            Some(change) => {
                let consumed = (change.position - position) / beat_length;
                if consumed >= remaining {
                    return position + remaining * beat_length;
                }
                remaining -= consumed;
                position = change.position;
            }
            None => return position + remaining * beat_length,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{BeatMarker, MarkerCalculator};
    use crate::signature::{SignatureChange, SignatureTrack, TimeSignature};
    use crate::tempo::TempoMarker;

    // Expected positions are stated to millisecond precision.
    const TOLERANCE: f64 = 5e-3;

    fn assert_marker(marker: &BeatMarker, position: f64, measure: u32, beat: u32) {
        assert!(
            (marker.position - position).abs() < TOLERANCE,
            "expected position {}, got {}",
            position,
            marker.position
        );
        assert_eq!(measure, marker.measure, "measure at position {}", position);
        assert_eq!(beat, marker.beat, "beat at position {}", position);
    }

    #[test]
    fn zero_length_track_produces_no_markers() {
        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&[], &SignatureTrack::new(), 0.0);

        assert!(calculator.markers().is_empty());
    }

    #[test]
    fn zero_length_track_with_tempo_markers_produces_no_markers() {
        let tempo_markers = vec![TempoMarker::new(0.0, 60.0), TempoMarker::new(4.0, 120.0)];

        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&tempo_markers, &SignatureTrack::new(), 0.0);

        assert!(calculator.markers().is_empty());
    }

    #[test]
    fn negative_duration_produces_no_markers() {
        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&[TempoMarker::new(0.0, 60.0)], &SignatureTrack::new(), -1.0);

        assert!(calculator.markers().is_empty());
    }

    #[test]
    fn four_second_track_contains_four_markers_at_expected_locations() {
        let tempo_markers = vec![TempoMarker::new(0.0, 60.0)];

        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&tempo_markers, &SignatureTrack::new(), 4.0);

        let markers = calculator.markers();
        assert_eq!(4, markers.len());
        assert_marker(&markers[0], 0.0, 1, 1);
        assert_marker(&markers[1], 1.0, 1, 2);
        assert_marker(&markers[2], 2.0, 1, 3);
        assert_marker(&markers[3], 3.0, 1, 4);
    }

    #[test]
    fn thirty_two_second_track_contains_thirty_two_markers_with_expected_info() {
        let tempo_markers = vec![TempoMarker::new(0.0, 60.0)];

        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&tempo_markers, &SignatureTrack::new(), 32.0);

        let markers = calculator.markers();
        assert_eq!(32, markers.len());
        for (i, marker) in markers.iter().enumerate() {
            assert_marker(marker, i as f64, i as u32 / 4 + 1, i as u32 % 4 + 1);
        }
    }

    #[test]
    fn switches_between_60_and_120_bpm() {
        let tempo_markers = vec![
            TempoMarker::new(0.0, 60.0),
            TempoMarker::new(2.0, 120.0),
            TempoMarker::new(3.0, 60.0),
            TempoMarker::new(5.0, 120.0),
        ];

        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&tempo_markers, &SignatureTrack::new(), 6.0);

        let markers = calculator.markers();
        assert_eq!(8, markers.len());
        assert_marker(&markers[0], 0.0, 1, 1);
        assert_marker(&markers[1], 1.0, 1, 2);
        assert_marker(&markers[2], 2.0, 1, 3);
        assert_marker(&markers[3], 2.5, 1, 4);
        assert_marker(&markers[4], 3.0, 2, 1);
        assert_marker(&markers[5], 4.0, 2, 2);
        assert_marker(&markers[6], 5.0, 2, 3);
        assert_marker(&markers[7], 5.5, 2, 4);
    }

    #[test]
    fn switches_between_randomly_spaced_tempos_with_off_beat_markers() {
        // Changes land mid-beat; beats that span them end earlier than they
        // would at their starting tempo. Before 1.483 the 100 BPM fallback
        // applies, hence the 0.6 second beat spacing.
        let tempo_markers = vec![
            TempoMarker::new(1.483, 113.0),
            TempoMarker::new(2.374, 94.0),
            TempoMarker::new(4.723, 119.0),
        ];

        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&tempo_markers, &SignatureTrack::new(), 4.808);

        let markers = calculator.markers();
        assert_eq!(8, markers.len());
        assert_marker(&markers[0], 0.0, 1, 1);
        assert_marker(&markers[1], 0.6, 1, 2);
        assert_marker(&markers[2], 1.2, 1, 3);
        assert_marker(&markers[3], 1.763, 1, 4);
        assert_marker(&markers[4], 2.294, 2, 1);
        assert_marker(&markers[5], 2.916, 2, 2);
        assert_marker(&markers[6], 3.554, 2, 3);
        assert_marker(&markers[7], 4.193, 2, 4);
    }

    #[test]
    fn varying_tempos_in_the_midst_of_time_signature_changes() {
        let mut signatures = SignatureTrack::new();
        signatures.extend(vec![
            SignatureChange {
                measure: 1,
                signature: TimeSignature::new(4, 4),
            },
            SignatureChange {
                measure: 2,
                signature: TimeSignature::new(3, 8),
            },
        ]);

        let tempo_markers = vec![
            TempoMarker::new(0.0, 120.0),
            TempoMarker::new(0.296, 96.0),
            TempoMarker::new(0.935, 135.0),
            TempoMarker::new(1.734, 92.0),
            TempoMarker::new(2.548, 115.0),
            TempoMarker::new(3.324, 134.0),
        ];

        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&tempo_markers, &signatures, 4.337);

        let markers = calculator.markers();
        assert_eq!(10, markers.len());
        assert_marker(&markers[0], 0.0, 1, 1);
        assert_marker(&markers[1], 0.550, 1, 2);
        assert_marker(&markers[2], 1.106, 1, 3);
        assert_marker(&markers[3], 1.550, 1, 4);
        // Measure 2 runs in 3/8: three beats, each half a quarter note.
        assert_marker(&markers[4], 2.117, 2, 1);
        assert_marker(&markers[5], 2.443, 2, 2);
        assert_marker(&markers[6], 2.725, 2, 3);
        // No entry for measure 3, so it reverts to common time.
        assert_marker(&markers[7], 2.986, 3, 1);
        assert_marker(&markers[8], 3.481, 3, 2);
        assert_marker(&markers[9], 3.929, 3, 3);
    }

    #[test]
    fn positions_are_strictly_ascending_and_beats_cycle() {
        let mut signatures = SignatureTrack::new();
        signatures.extend(vec![
            SignatureChange {
                measure: 3,
                signature: TimeSignature::new(7, 8),
            },
            SignatureChange {
                measure: 4,
                signature: TimeSignature::new(3, 4),
            },
        ]);
        let tempo_markers = vec![
            TempoMarker::new(0.0, 97.0),
            TempoMarker::new(3.1, 141.0),
            TempoMarker::new(8.4, 62.0),
        ];

        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&tempo_markers, &signatures, 30.0);

        let markers = calculator.markers();
        assert!(!markers.is_empty());
        assert_marker(&markers[0], 0.0, 1, 1);
        for pair in markers.windows(2) {
            assert!(pair[0].position < pair[1].position);
            if pair[1].beat == 1 {
                assert_eq!(pair[0].measure + 1, pair[1].measure);
                assert_eq!(
                    signatures.beats_per_measure(pair[0].measure),
                    pair[0].beat
                );
            } else {
                assert_eq!(pair[0].measure, pair[1].measure);
                assert_eq!(pair[0].beat + 1, pair[1].beat);
            }
        }
    }

    #[test]
    fn recalculation_replaces_the_previous_grid() {
        let mut calculator = MarkerCalculator::new();
        calculator.calculate_markers(&[TempoMarker::new(0.0, 60.0)], &SignatureTrack::new(), 4.0);
        assert_eq!(4, calculator.markers().len());

        calculator.calculate_markers(&[TempoMarker::new(0.0, 120.0)], &SignatureTrack::new(), 4.0);
        assert_eq!(8, calculator.markers().len());

        calculator.calculate_markers(&[], &SignatureTrack::new(), 0.0);
        assert!(calculator.markers().is_empty());
    }

    #[test]
    fn constant_tempo_marker_count_is_floor_of_duration_times_bpm() {
        for (bpm, duration, expected) in [(60.0, 4.0, 4), (120.0, 4.0, 8), (240.0, 2.5, 10)] {
            let mut calculator = MarkerCalculator::new();
            calculator.calculate_markers(
                &[TempoMarker::new(0.0, bpm)],
                &SignatureTrack::new(),
                duration,
            );
            assert_eq!(
                expected,
                calculator.markers().len(),
                "bpm {} duration {}",
                bpm,
                duration
            );
        }
    }
}
