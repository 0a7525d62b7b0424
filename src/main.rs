use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use rabin_karp::alphabet::{Alphabet, Bytes, LowercaseLatin};
use rabin_karp::match_search::{find_first, find_first_parallel};
use rabin_karp::{Position, RollingWindow};

#[derive(Parser, Debug)]
#[clap(version, about)]
/// Finds substrings with a rolling-hash (Rabin-Karp) search
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum AlphabetKind {
    /// Lowercase latin letters a-z, base 26
    Lowercase,
    /// Any byte, base 257
    Bytes,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Prints the offset of the first occurrence of --needle=<NEEDLE> in the haystack
    Find {
        #[clap(long)]
        /// The text to look for
        needle: String,
        #[clap(long)]
        /// The text to search in
        haystack: Option<String>,
        #[clap(long)]
        /// A file whose content is searched instead of --haystack
        haystack_file: Option<PathBuf>,
        #[clap(long, value_enum, default_value = "lowercase")]
        /// The symbols both texts are made of
        alphabet: AlphabetKind,
        #[clap(long)]
        /// Splits the haystack across threads
        parallel: bool,
        #[clap(long, default_value_t = 0)]
        /// Candidate positions per thread chunk, 0 picks one from the haystack size
        chunk_len: usize,
    },
    /// Slides a --window-size=<WINDOW_SIZE> window over --text=<TEXT> and prints every fingerprint
    Fingerprints {
        #[clap(long)]
        /// The text to slide over
        text: String,
        #[clap(long)]
        /// The number of symbols each fingerprint covers
        window_size: usize,
        #[clap(long, value_enum, default_value = "lowercase")]
        /// The symbols the text is made of
        alphabet: AlphabetKind,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli: Cli = Cli::parse();

    return match cli.command {
        Commands::Find {
            needle,
            haystack,
            haystack_file,
            alphabet,
            parallel,
            chunk_len,
        } => {
            let haystack = match (haystack, haystack_file) {
                (Some(haystack), _) => haystack.into_bytes(),
                (None, Some(haystack_file)) => {
                    info!("Reading haystack from {}", haystack_file.display());
                    let mut file = File::open(&haystack_file)
                        .with_context(|| format!("opening {}", haystack_file.display()))?;
                    let mut content = Vec::<u8>::new();
                    file.read_to_end(&mut content)
                        .with_context(|| format!("reading {}", haystack_file.display()))?;
                    content
                }
                (None, None) => anyhow::bail!("either --haystack or --haystack-file is required"),
            };
            info!(
                "Searching {} bytes for a {} byte needle",
                haystack.len(),
                needle.len()
            );

            let found = match alphabet {
                AlphabetKind::Lowercase => {
                    search::<LowercaseLatin>(needle.as_bytes(), &haystack, parallel, chunk_len)
                }
                AlphabetKind::Bytes => {
                    search::<Bytes>(needle.as_bytes(), &haystack, parallel, chunk_len)
                }
            };
            match found {
                Some(position) => println!("{}", position),
                None => println!("no match"),
            }
            Ok(())
        }
        Commands::Fingerprints {
            text,
            window_size,
            alphabet,
        } => match alphabet {
            AlphabetKind::Lowercase => {
                print_fingerprints::<LowercaseLatin>(text.as_bytes(), window_size)
            }
            AlphabetKind::Bytes => print_fingerprints::<Bytes>(text.as_bytes(), window_size),
        },
    };
}

fn search<A: Alphabet>(
    needle: &[u8],
    haystack: &[u8],
    parallel: bool,
    chunk_len: usize,
) -> Option<Position> {
    if parallel {
        find_first_parallel::<A>(needle, haystack, chunk_len)
    } else {
        find_first::<A>(needle, haystack)
    }
}

fn print_fingerprints<A: Alphabet>(text: &[u8], window_size: usize) -> anyhow::Result<()> {
    let mut window = RollingWindow::<A>::new(text, window_size)?;
    loop {
        println!(
            "{}\t{}\t{}",
            window.start(),
            String::from_utf8_lossy(window.window_text()),
            window.fingerprint()
        );
        if !window.can_advance() {
            break;
        }
        window.advance();
    }
    Ok(())
}
