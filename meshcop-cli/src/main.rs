// Copyright (c) 2025 Jake Swensen
// SPDX-License-Identifier: MPL-2.0
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use clap::{Parser, Subcommand};
use env_logger::Env;

use meshcop_codec::dataset::OperationalDataset;

#[derive(Debug, Parser)]
#[command(version, about = "Inspect and generate Thread MeshCoP Operational Datasets", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a hex-encoded TLV stream and pretty-print every TLV it contains.
    Decode {
        /// The Dataset as a contiguous hex string, e.g. from `meshcop-cli random`.
        hex: String,
    },
    /// Generate a fresh random Active Dataset and print it.
    Random,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let dataset = match args.command {
        Command::Decode { hex } => match OperationalDataset::from_str(&hex) {
            Ok(dataset) => dataset,
            Err(err) => {
                eprintln!("failed to decode dataset: {err}");
                std::process::exit(1);
            }
        },
        Command::Random => match OperationalDataset::random() {
            Ok(dataset) => dataset,
            Err(err) => {
                eprintln!("failed to generate dataset: {err}");
                std::process::exit(1);
            }
        },
    };

    println!("Hex: {}", dataset.as_hex_string());
    dataset.pretty_fmt();
}
