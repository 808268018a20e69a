use std::io::Write;

use anyhow::Error;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use dmap_core::{io::Compression, Format};

mod check;
use check::Check;

mod convert;
use convert::Convert;

mod view;
use view::View;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tools for working with SuperDARN DMap files.
#[derive(Debug, Parser)]
#[clap(name = NAME, version = VERSION, about)]
#[clap(subcommand_required = true)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiply times to increase verbosity, or left unset for quiet mode.
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print CLI arguments for debugging.
    #[clap(long, hide = true, global = true)]
    debug: bool,
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        if self.debug {
            eprintln!("{self:#?}");
        }

        let level = if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[dmap {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        self.command.run()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Check(Check),
    Convert(Convert),
    View(View),
}

impl Command {
    fn run(self) -> Result<(), Error> {
        match self {
            Command::Check(check) => check.run(),
            Command::Convert(convert) => convert.run(),
            Command::View(view) => view.run(),
        }
    }
}

macro_rules! impl_try_from_command {
    ($($variant:ident),*) => {
        $(
            impl TryFrom<Command> for $variant {
                type Error = Command;

                fn try_from(command: Command) -> Result<Self, Self::Error> {
                    match command {
                        Command::$variant(cmd) => Ok(cmd),
                        command => Err(command),
                    }
                }
            }
        )*
    };
}

impl_try_from_command!(Check, Convert, View);

/// SuperDARN format of records.
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormatArg {
    /// I&Q sample data.
    Iqdat,
    /// Raw auto-correlation functions.
    Rawacf,
    /// Fitted auto-correlation functions.
    Fitacf,
    /// Gridded velocities.
    Grid,
    /// Convection maps.
    Map,
    /// Sounding mode data.
    Snd,
}

impl From<FormatArg> for Format {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Iqdat => Format::Iqdat,
            FormatArg::Rawacf => Format::Rawacf,
            FormatArg::Fitacf => Format::Fitacf,
            FormatArg::Grid => Format::Grid,
            FormatArg::Map => Format::Map,
            FormatArg::Snd => Format::Snd,
        }
    }
}

/// Compression of output.
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionArg {
    /// No compression.
    None,
    /// bzip2 compression.
    Bzip2,
    /// gzip compression.
    Gzip,
}

impl From<CompressionArg> for Option<Compression> {
    fn from(compression: CompressionArg) -> Self {
        match compression {
            CompressionArg::None => None,
            CompressionArg::Bzip2 => Some(Compression::Bzip2),
            CompressionArg::Gzip => Some(Compression::Gzip),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
