use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{crate_version, value_t, App, AppSettings, Arg, ArgMatches, SubCommand};
use tracing::{info, Level};

use spc_toolbox::headers::File;
use spc_toolbox::parsers::spc::SPCFile;
use spc_toolbox::spc_tools::channels::ChannelInput;
use spc_toolbox::spc_tools::coincidence::coincidences;
use spc_toolbox::spc_tools::export::{write_ascii, write_npz};

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn open(m: &ArgMatches) -> Result<SPCFile> {
    let path = PathBuf::from(m.value_of("FILE").unwrap_or_default());
    SPCFile::new(path.clone()).with_context(|| format!("failed to open {}", path.display()))
}

fn info_cmd(m: &ArgMatches) -> Result<()> {
    let f = open(m)?;
    println!("{}", f);
    if let Some(advisory) = f.format_advisory {
        println!("{:<35}: {}", "Advisory", advisory);
    }

    let decoded = f.decode()?;
    println!("{:<35}: {}", "NumberOfEvents", decoded.events.len());
    println!("{:<35}: {}", "NumberOfGaps", decoded.gap_notices.len());

    let table = decoded.coincidences();
    println!("{:<35}: {}", "DistinctTimestamps", table.n_rows());
    println!("{:<35}: {}", "CoincidentTimestamps", table.multi_click_rows().len());
    for (ch, count) in table.column_counts() {
        let input = ChannelInput::from_channel(ch)
            .map(|x| x.to_string())
            .unwrap_or_else(|| String::from("unknown input"));
        println!("{:<35}: {} ({})", format!("Channel{}", ch), count, input);
    }
    Ok(())
}

fn events_cmd(m: &ArgMatches) -> Result<()> {
    let f = open(m)?;
    let channel = value_t!(m, "channel", i32)?;

    let start = Instant::now();
    let events = f.decode()?.select_channel(channel)?;
    info!("decoded {} events in {:?}", events.len(), start.elapsed());

    match m.value_of("output") {
        Some(path) => {
            let out = BufWriter::new(fs::File::create(path)?);
            write_ascii(&events, out)?;
        }
        None => {
            let stdout = io::stdout();
            write_ascii(&events, stdout.lock())?;
        }
    }
    Ok(())
}

fn coincidences_cmd(m: &ArgMatches) -> Result<()> {
    let spc_file = File::SPC(open(m)?);

    let start = Instant::now();
    let table = coincidences(&spc_file)?;
    info!(
        "built {} x {} coincidence table in {:?}",
        table.n_rows(),
        table.channels().len(),
        start.elapsed()
    );

    let path = m.value_of("output").unwrap_or_default();
    let out = BufWriter::new(fs::File::create(path)?);
    write_npz(&table, out)?;
    Ok(())
}

pub fn main() -> Result<()> {
    let file_arg = Arg::with_name("FILE")
        .help("SPC file written by a DPC-230 in FIFO mode")
        .required(true)
        .index(1);

    let matches = App::new("spc")
        .version(crate_version!())
        .about("Decode DPC-230 SPC time-tag files.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increase log verbosity"),
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Print header and event statistics")
                .arg(file_arg.clone()),
        )
        .subcommand(
            SubCommand::with_name("events")
                .about("Write `timestamp channel` lines, timestamps in fs")
                .arg(file_arg.clone())
                .arg(
                    Arg::with_name("channel")
                        .short("c")
                        .long("channel")
                        .takes_value(true)
                        .default_value("0")
                        .help("Only this channel (1-20). 0 selects all channels"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .help("Output text file. Defaults to stdout"),
                ),
        )
        .subcommand(
            SubCommand::with_name("coincidences")
                .about("Write the coincidence table as an npz archive")
                .arg(file_arg)
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .required(true)
                        .help("Output .npz file"),
                ),
        )
        .get_matches();

    let verbosity = match matches.subcommand() {
        (_, Some(m)) => m.occurrences_of("verbose").max(matches.occurrences_of("verbose")),
        _ => matches.occurrences_of("verbose"),
    };
    init_logging(verbosity);

    match matches.subcommand() {
        ("info", Some(m)) => info_cmd(m),
        ("events", Some(m)) => events_cmd(m),
        ("coincidences", Some(m)) => coincidences_cmd(m),
        _ => unreachable!(),
    }
}
