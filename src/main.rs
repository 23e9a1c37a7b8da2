use std::io::{self, Write};
use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use chip8vm::consts::{EXIT_ADDRESS, INITIAL_PC};
use chip8vm::{Config, Interpreter, Quirks};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chip8vm", about = "Run a CHIP-8 program image in the terminal.")]
struct Args {
    /// Program image, a flat sequence of big-endian 16-bit words
    rom: PathBuf,

    /// Load address of the program (hex with 0x prefix, or decimal)
    #[arg(long, value_name = "ADDR", value_parser = parse_address, default_value_t = INITIAL_PC)]
    base: u16,

    /// Instructions executed between two frames
    #[arg(long, default_value_t = 11)]
    cycles_per_frame: u32,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Stop after this many instructions
    #[arg(long, value_name = "N")]
    max_cycles: Option<u64>,

    /// Instruction pointer value that ends the program
    #[arg(long, value_name = "ADDR", value_parser = parse_address, default_value_t = EXIT_ADDRESS)]
    exit_address: u16,

    /// Do not draw the display
    #[arg(long, action = clap::ArgAction::SetTrue)]
    headless: bool,

    /// Use the legacy 8XY4 carry test
    #[arg(long, action = clap::ArgAction::SetTrue)]
    legacy_carry: bool,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|err| format!("invalid address {s:?}: {err}"))
}

enum Exit {
    Finished,
    CycleLimit,
}

fn run(interpreter: &mut Interpreter, args: &Args) -> anyhow::Result<Exit> {
    if args.fps == 0 {
        bail!("--fps must be at least 1");
    }
    let frame_duration = Duration::from_secs_f32(1.0 / args.fps as f32);
    let mut executed: u64 = 0;

    loop {
        let frame_start = Instant::now();
        let mut redraw = false;

        for _ in 0..args.cycles_per_frame {
            if interpreter.pc() == args.exit_address {
                return Ok(Exit::Finished);
            }
            if args.max_cycles.is_some_and(|max| executed >= max) {
                return Ok(Exit::CycleLimit);
            }

            if let Err(err) = interpreter.step(1) {
                tracing::error!(
                    pc = format_args!("{:#06X}", interpreter.pc()),
                    i = format_args!("{:#06X}", interpreter.index_register()),
                    registers = %interpreter.registers(),
                    stack = ?interpreter.stack().frames(),
                    "execution halted"
                );
                return Err(err).context("execution error");
            }
            executed += 1;
            redraw |= interpreter.is_drawing();
        }

        if redraw && !args.headless {
            show(interpreter)?;
        }

        let elapsed = frame_start.elapsed();
        if let Some(sleep_time) = frame_duration.checked_sub(elapsed) {
            sleep(sleep_time);
        }
    }
}

fn show(interpreter: &Interpreter) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "\x1B[2J\x1B[H{}", interpreter.display().render())?;
    stdout.flush()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = Config {
        base_address: args.base,
        quirks: Quirks {
            legacy_carry: args.legacy_carry,
        },
    };
    let mut interpreter = Interpreter::with_config(config);
    interpreter
        .load_file(&args.rom)
        .with_context(|| format!("failed to load {}", args.rom.display()))?;

    tracing::info!(
        rom = %args.rom.display(),
        base = format_args!("{:#06X}", interpreter.config().base_address),
        legacy_carry = interpreter.config().quirks.legacy_carry,
        "starting"
    );

    match run(&mut interpreter, &args)? {
        Exit::Finished => println!("\nProgram finished. Exiting."),
        Exit::CycleLimit => println!("\nCycle limit reached. Exiting."),
    }

    Ok(())
}
