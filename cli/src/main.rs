//! Assemble and simulate MIX programs from the command line.
//!
//! Three subcommands: `assemble` translates MIXAL source into a
//! memory-image file, `run` executes such an image, and `exec` does
//! both in one step.  Exit code 0 means success; any failure prints
//! its message (assembly failures begin with the source line) and
//! exits non-zero.

use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{event, Level};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

use assembler::{assemble, read_image, write_image, Assembly};
use base::prelude::Word;
use cpu::Machine;

/// Command-line MIX assembler and simulator
#[derive(Parser, Debug)]
#[command(name = "mixsim", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble MIXAL source into a memory image
    Assemble {
        /// MIXAL source file
        src: PathBuf,
        /// Where to write the image (default: source path with .img)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Execute a previously assembled memory image
    Run {
        /// Image file produced by `assemble`
        image: PathBuf,
    },
    /// Assemble MIXAL source and execute it immediately
    Exec {
        /// MIXAL source file
        src: PathBuf,
    },
}

fn assemble_file(src: &Path) -> Result<Assembly, Box<dyn Error>> {
    let text = std::fs::read_to_string(src)?;
    let assembly = assemble(&text)?;
    event!(
        Level::INFO,
        "assembled {} with entry point {}",
        src.display(),
        assembly.entry
    );
    Ok(assembly)
}

fn execute(image: &[Word], entry: u16) -> Result<(), Box<dyn Error>> {
    let mut machine = Machine::new();
    machine.load_image(image, entry)?;
    machine.run()?;
    event!(
        Level::INFO,
        "halted at {} after {} instructions",
        machine.pc(),
        machine.instructions_executed()
    );
    event!(Level::INFO, "rA = {}", machine.regs.a);
    event!(Level::INFO, "rX = {}", machine.regs.x);
    for n in 1..=6u8 {
        event!(Level::INFO, "rI{n} = {}", machine.regs.index_value(n));
    }
    event!(
        Level::INFO,
        "rJ = {}, overflow = {}, comparison = {}",
        machine.regs.j(),
        machine.regs.overflow,
        machine.regs.comparison
    );
    Ok(())
}

fn run_command(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Assemble { src, output } => {
            let assembly = assemble_file(&src)?;
            let out_path = output.unwrap_or_else(|| src.with_extension("img"));
            let mut writer = BufWriter::new(File::create(&out_path)?);
            write_image(&assembly.image, assembly.entry, &mut writer)?;
            writer.flush()?;
            event!(Level::INFO, "wrote {}", out_path.display());
            Ok(())
        }
        Command::Run { image } => {
            let reader = BufReader::new(File::open(&image)?);
            let (words, entry) = read_image(reader)?;
            execute(&words, entry)
        }
        Command::Exec { src } => {
            let assembly = assemble_file(&src)?;
            execute(&assembly.image, assembly.entry)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // By default, display info messages; RUST_LOG overrides.
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    if let Err(e) = run_command(cli.command) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
