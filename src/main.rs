/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use anyhow::Result;
use clap::Parser as ClapParser;
use ddcg::file_reader::SourceFileReader;
use ddcg::{compile_path, Dialect};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    /// Source file to compile.
    input: PathBuf,

    /// Target dialect: `z80` or `m65816`.
    #[clap(short, long, value_enum, default_value = "z80")]
    dialect: Dialect,

    /// Where to write the assembly listing; defaults to stdout.
    #[clap(short, long)]
    output: Option<PathBuf>,
}

impl clap::ValueEnum for Dialect {
    fn value_variants<'a>() -> &'a [Self] {
        &[Dialect::Z80, Dialect::M65816]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Dialect::Z80 => clap::builder::PossibleValue::new("z80"),
            Dialect::M65816 => clap::builder::PossibleValue::new("m65816"),
        })
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let opts = Opts::parse();
    let reader = SourceFileReader;
    let listing = compile_path(&opts.input, opts.dialect, &reader)?;
    let text = listing.join("\n") + "\n";

    match &opts.output {
        Some(path) => fs::write(path, text)?,
        None => print!("{}", text),
    }
    Ok(())
}
