use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use mtrk::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about = "Dump the events of a Standard MIDI File")]
struct Args {
    /// The MIDI file to decode
    file: PathBuf,

    /// Only print this track (by its position in the file, from 0)
    #[arg(short, long)]
    track: Option<usize>,

    /// Print per-track summaries without the event listing
    #[arg(short, long)]
    summary: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let bytes =
        fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let file = MidiFile::parse(&bytes)
        .with_context(|| format!("decoding {}", args.file.display()))?;

    println!(
        "format: {:?}, tracks: {}, division: {}",
        file.format_type(),
        file.tracks().len(),
        describe_timing(file.timing()),
    );

    for track in file.tracks() {
        if args.track.is_some_and(|wanted| wanted != track.id()) {
            continue;
        }
        print_track(track, args.summary);
    }

    Ok(())
}

fn describe_timing(timing: Timing) -> String {
    match timing {
        Timing::TicksPerQuarterNote(tpqn) => format!("{tpqn} ticks/quarter"),
        Timing::Smpte(smpte) => format!(
            "SMPTE {} fps, {} ticks/frame",
            smpte.fps.as_division(),
            smpte.ticks_per_frame
        ),
    }
}

fn print_track(track: &Track<'_>, summary: bool) {
    for diagnostic in track.diagnostics() {
        warn!("track {}: {}", track.id(), diagnostic);
    }

    match track.name() {
        Some(name) => println!("track {} ({name}): {} events", track.id(), track.events().len()),
        None => println!("track {}: {} events", track.id(), track.events().len()),
    }
    if summary {
        return;
    }

    let mut ticks = 0u64;
    for event in track.events() {
        ticks += u64::from(event.delta_time());
        println!("  {ticks:>8} {}", describe_event(event));
    }
}

fn describe_event(event: &TrackEvent<'_>) -> String {
    match event.kind() {
        TrackEventKind::ChannelVoice(voice) => {
            let mut out = format!(
                "{:?} ch={} data=[{}]",
                voice.kind(),
                voice.channel(),
                hex(voice.payload())
            );
            if let Some(note) = voice.note() {
                let _ = write!(out, " note={note}");
            }
            out
        }
        TrackEventKind::SystemExclusive(sysex) => {
            let form = if sysex.is_escape() { "escape" } else { "sysex" };
            format!("{form} {} bytes [{}]", sysex.payload_len(), hex(sysex.payload()))
        }
        TrackEventKind::Meta(meta) => match meta.text() {
            Some(text) => format!("{} {text:?}", meta.kind()),
            None => format!("{} [{}]", meta.kind(), hex(meta.payload())),
        },
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}
