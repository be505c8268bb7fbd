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

/// Outputs the given position in seconds in a minutes:seconds format,
/// truncating fractional seconds.
pub fn position_minutes_seconds(seconds: f64) -> String {
    let whole_seconds = seconds.max(0.0).floor() as u64;
    let minutes = whole_seconds / 60;
    let secs = whole_seconds - minutes * 60;
    format!("{}:{:02}", minutes, secs)
}
