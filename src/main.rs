use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use underline_contrast::{fix_underline_contrast, Config, Error, Package};

/// Lightens paragraph style underlines until they contrast enough with their text.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding an IDML package obtained by unzipping the target `.idml` file.
    /// `Resources/Styles.xml` is updated in place.
    #[arg(short, long)]
    input: PathBuf,

    /// Contrast ratio the underline must reach against the text.
    #[arg(long, default_value_t = underline_contrast::tint::DEFAULT_MIN_CONTRAST)]
    min_contrast: f64,

    /// Distance between two tried tints, in percentage points.
    #[arg(long, default_value_t = underline_contrast::tint::DEFAULT_TINT_STEP)]
    tint_step: f64,

    /// Print the report without touching the package.
    #[arg(long)]
    dry_run: bool,
}

fn run(args: Args) -> Result<(), Error> {
    let config = Config::new(args.min_contrast, args.tint_step)?;
    log::debug!("{config:?}");

    let mut package = Package::open(&args.input)?;
    let report = fix_underline_contrast(&mut package.styles, &config)?;

    if args.dry_run {
        log::info!("Dry run, {:?} left untouched", args.input);
    } else {
        package.save()?;
    }
    println!("{report}");
    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    log::info!("Entered 'main'");

    let args = Args::parse();
    log::debug!("Input directory is {:?}", args.input);

    let code = match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:?}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    };

    log::info!("Exiting 'main'");

    code
}
