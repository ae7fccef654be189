extern crate clap;
use crossbeam_channel::{bounded, Receiver}; // Inter-thread communication
use log::{error, info, warn};
use std::process;
use std::time::{Duration, Instant};

use mako_core::error::VmError;
use mako_core::memory::mods::{AudioSink, FrameSink};
use mako_core::{FrameState, Machine, MachineConfig};
use mako_peripherals::console::StdioConsole;
use mako_peripherals::framedump::FrameDumper;
use mako_peripherals::pcmdump::PcmDumper;

const EXIT_OK: i32 = 0;
const EXIT_FAULT: i32 = 1;
const EXIT_SYNC: i32 = 2;
const EXIT_USAGE: i32 = 64;

/// Instructions between Ctrl-C polls in headless mode
const HEADLESS_BATCH: usize = 4096;

const FRAME_PERIOD: Duration = Duration::from_micros(1_000_000 / 60);

/// Configures command-line interface using clap
fn get_cli_config<'a>() -> clap::ArgMatches<'a> {
    let description = "Mako virtual game console";
    let result = clap::App::new("mako")
        .version("0.1")
        .about(description)
        .arg(
            clap::Arg::with_name("ROM")
                .help("Big-endian 32-bit word image to run")
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::with_name("frames")
                .long("frames")
                .takes_value(true)
                .value_name("N")
                .help("Run N display frames instead of headless console mode"),
        )
        .arg(
            clap::Arg::with_name("dump")
                .long("dump")
                .takes_value(true)
                .value_name("DIR")
                .help("Save every frame as a PPM image in DIR"),
        )
        .arg(
            clap::Arg::with_name("audio")
                .long("audio")
                .takes_value(true)
                .value_name("FILE")
                .help("Append each frame's samples to FILE as unsigned 8-bit PCM"),
        )
        .arg(
            clap::Arg::with_name("sample-rate")
                .long("sample-rate")
                .takes_value(true)
                .value_name("HZ")
                .help("Host audio rate (default 44100)"),
        )
        .arg(
            clap::Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .value_name("N")
                .help("Seed for the RN port"),
        )
        .arg(
            clap::Arg::with_name("unthrottled")
                .long("unthrottled")
                .help("Do not pace frames at 60hz"),
        )
        .get_matches_safe();

    match result {
        Ok(matches) => matches,
        Err(e) => match e.kind {
            clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => e.exit(),
            _ => {
                eprintln!("{}", e.message);
                process::exit(EXIT_USAGE);
            }
        },
    }
}

fn parse_arg<T: std::str::FromStr>(matches: &clap::ArgMatches, name: &str) -> Option<T> {
    let raw = matches.value_of(name)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            error!("Invalid value for --{}: {}", name, raw);
            process::exit(EXIT_USAGE);
        }
    }
}

/// Sink for frames and samples nobody asked to keep
struct Discard;

impl FrameSink for Discard {
    fn present(&mut self, _frame: &[u8]) {}
}

impl AudioSink for Discard {
    fn submit(&mut self, _samples: &[f32]) {}
}

fn exit_code(err: &VmError) -> i32 {
    match err {
        VmError::UnsupportedSync { .. } => {
            error!("The 'SYNC' opcode cannot be used in headless mode. Halting.");
            EXIT_SYNC
        }
        e => {
            error!("Machine fault: {}", e);
            EXIT_FAULT
        }
    }
}

fn run_headless(machine: &mut Machine, shutdown: &Receiver<()>) -> i32 {
    machine.attach_console(Box::new(StdioConsole::new()));
    loop {
        if !shutdown.is_empty() {
            info!("Interrupted");
            return EXIT_OK;
        }
        match machine.run_headless(HEADLESS_BATCH) {
            Ok(FrameState::Running) => {}
            Ok(FrameState::Halted) => return EXIT_OK,
            Err(e) => return exit_code(&e),
        }
    }
}

fn run_frames(
    machine: &mut Machine,
    shutdown: &Receiver<()>,
    frames: u64,
    throttle: bool,
    display: &mut dyn FrameSink,
    speaker: &mut dyn AudioSink,
) -> i32 {
    let mut deadline = Instant::now();
    for _ in 0..frames {
        if !shutdown.is_empty() {
            info!("Interrupted after {} frames", machine.frames);
            return EXIT_OK;
        }

        match machine.run_frame_into(display, speaker) {
            Ok(FrameState::Running) => {}
            Ok(FrameState::Halted) => return EXIT_OK,
            Err(e) => return exit_code(&e),
        }

        if throttle {
            // Pace against an absolute schedule so short sleeps do not drift
            deadline += FRAME_PERIOD;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                deadline = now;
            }
        }
    }
    info!("Ran {} frames", machine.frames);
    EXIT_OK
}

/// Main entry point for the console host
fn main() {
    env_logger::init();

    // Set up Ctrl-C handler with channel communication
    let (signal_sender, signal_receiver) = bounded(1);
    let handler_result = ctrlc::set_handler(move || {
        if signal_sender.is_full() {
            process::exit(EXIT_FAULT); // Second Ctrl-C while the first is pending
        }
        let _send_result = signal_sender.send(());
    });

    if let Err(e) = handler_result {
        error!("Signal handler failed: {:?}", e);
        process::exit(EXIT_FAULT);
    }

    let cli_matches = get_cli_config();

    let rom_path = cli_matches.value_of("ROM").unwrap_or_default();
    let image = match mako_rom::load(rom_path) {
        Ok(words) => words,
        Err(e) => {
            error!("{}", e);
            process::exit(EXIT_FAULT);
        }
    };

    let mut config = MachineConfig::default();
    if let Some(rate) = parse_arg::<u32>(&cli_matches, "sample-rate") {
        config.sample_rate = rate;
    }
    config.seed = parse_arg::<u64>(&cli_matches, "seed");

    let mut machine = Machine::new(image, &config);

    let code = match parse_arg::<u64>(&cli_matches, "frames") {
        None => {
            for flag in ["dump", "audio", "unthrottled"] {
                if cli_matches.is_present(flag) {
                    warn!("--{} has no effect in headless mode", flag);
                }
            }
            run_headless(&mut machine, &signal_receiver)
        }
        Some(frames) => {
            let mut display: Box<dyn FrameSink> = match cli_matches.value_of("dump") {
                Some(dir) => match FrameDumper::new(dir) {
                    Ok(dumper) => Box::new(dumper),
                    Err(e) => {
                        error!("Unable to create {}: {}", dir, e);
                        process::exit(EXIT_FAULT);
                    }
                },
                None => Box::new(Discard),
            };
            let mut speaker: Box<dyn AudioSink> = match cli_matches.value_of("audio") {
                Some(path) => match PcmDumper::create(path) {
                    Ok(dumper) => Box::new(dumper),
                    Err(e) => {
                        error!("Unable to create {}: {}", path, e);
                        process::exit(EXIT_FAULT);
                    }
                },
                None => Box::new(Discard),
            };
            run_frames(
                &mut machine,
                &signal_receiver,
                frames,
                !cli_matches.is_present("unthrottled"),
                display.as_mut(),
                speaker.as_mut(),
            )
        }
    };

    process::exit(code);
}
