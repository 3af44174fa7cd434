use chordkey::{
    analyze_with_config, nashville_text, spelling_after, transpose_text, DetectorConfig, Spelling,
};
use clap::{ArgAction, Parser};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// chordkey - key, Nashville numbers and transposition for chord sheets
///
/// Reads a song in bracket notation ([G]Hello [C]world) with optional YAML
/// frontmatter and prints its analysis, or the song rewritten.
#[derive(Parser, Debug)]
#[command(name = "chordkey")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Song file (`-` reads stdin)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print the song transposed by N semitones
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    transpose: Option<i32>,

    /// Spell transposed chords with flats
    #[arg(long, conflicts_with = "sharps")]
    flats: bool,

    /// Spell transposed chords with sharps
    #[arg(long)]
    sharps: bool,

    /// Print the song with Nashville numerals instead of chords
    #[arg(long, conflicts_with = "transpose")]
    nashville: bool,

    /// Print the analysis as JSON instead of YAML
    #[arg(long)]
    json: bool,

    /// Key detector configuration (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let output = match run(&cli) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Error writing to '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", output),
    }
    ExitCode::SUCCESS
}

fn init_logging(cli: &Cli) {
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if cli.quiet { "error" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<String, String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("reading stdin: {}", e))?;
        return Ok(source);
    }
    fs::read_to_string(path).map_err(|e| format!("reading file '{}': {}", path.display(), e))
}

fn load_config(path: Option<&Path>) -> Result<DetectorConfig, String> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("reading config '{}': {}", path.display(), e))?;
            DetectorConfig::from_yaml_str(&content).map_err(|e| e.to_string())
        }
        None => Ok(DetectorConfig::default()),
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let source = read_input(&cli.input)?;
    let config = load_config(cli.config.as_deref())?;
    let analysis = analyze_with_config(&source, &config).map_err(|e| e.to_string())?;

    if let Some(semitones) = cli.transpose {
        let spelling = if cli.flats {
            Spelling::Flats
        } else if cli.sharps {
            Spelling::Sharps
        } else {
            analysis
                .effective_key
                .as_deref()
                .map(|key| spelling_after(key, semitones))
                .unwrap_or_default()
        };
        return Ok(transpose_text(&source, semitones, spelling));
    }

    if cli.nashville {
        let key = analysis
            .effective_key
            .as_deref()
            .ok_or_else(|| "no chords to determine a key from".to_string())?;
        return Ok(nashville_text(&source, key));
    }

    if cli.json {
        serde_json::to_string_pretty(&analysis)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string())
    } else {
        serde_yaml::to_string(&analysis).map_err(|e| e.to_string())
    }
}
