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
mod config;
mod markers;
mod signature;
mod tempo;
mod track;
mod util;

use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};

use crate::markers::MarkerCalculator;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A beat and measure marker calculator for tempo-mapped tracks."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Computes and prints the beat grid for a track file.
    Markers {
        /// The path to the track metadata file.
        path: String,
        /// Print the beat grid as JSON rather than a table.
        #[arg(short, long)]
        json: bool,
    },
    /// Prints a summary of a track file.
    Info {
        /// The path to the track metadata file.
        path: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Markers { path, json } => {
            let track = config::parse_track(&PathBuf::from(&path))?;

            let mut calculator = MarkerCalculator::new();
            calculator.calculate_markers(
                track.tempo_markers(),
                track.signatures(),
                track.duration_seconds(),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(calculator.markers())?);
                return Ok(());
            }

            if calculator.markers().is_empty() {
                println!("No beats in {}.", track.name());
                return Ok(());
            }

            println!("{} (beats: {}):", track.name(), calculator.markers().len());
            for marker in calculator.markers() {
                println!(
                    "- {:>9.3}s  measure {:>3}, beat {}",
                    marker.position, marker.measure, marker.beat
                );
            }
        }
        Commands::Info { path } => {
            let track = config::parse_track(&PathBuf::from(&path))?;

            let mut calculator = MarkerCalculator::new();
            calculator.calculate_markers(
                track.tempo_markers(),
                track.signatures(),
                track.duration_seconds(),
            );

            let last = calculator.markers().last();
            println!("{}:", track.name());
            println!(
                "- duration: {}",
                util::position_minutes_seconds(track.duration_seconds())
            );
            println!("- tempo markers: {}", track.tempo_markers().len());
            println!("- signature changes: {}", track.signatures().len());
            println!("- beats: {}", calculator.markers().len());
            println!(
                "- measures: {}",
                last.map(|marker| marker.measure).unwrap_or(0)
            );
        }
    }

    Ok(())
}
