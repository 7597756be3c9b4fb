use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use splay_map::benchmark::Benchmark;
use splay_map::SplayMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Times inserts and lookups of corpus words in a splay map and in a `BTreeMap`.
#[derive(Parser, Debug)]
#[command(name = "splay-map", version, about, long_about = None)]
struct Cli {
    /// Text corpus to read words from
    #[arg(value_name = "CORPUS")]
    corpus: PathBuf,

    /// Number of words to read; negative values are treated as their absolute value
    #[arg(value_name = "COUNT", allow_negative_numbers = true)]
    count: i64,

    /// Seed for the random keys; a random seed is used if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn read_words(cli: &Cli, count: u64, rng: &mut StdRng) -> Result<Vec<(u64, String)>> {
    let text = fs::read_to_string(&cli.corpus)
        .with_context(|| format!("cannot open {}", cli.corpus.display()))?;
    Ok(text
        .split_whitespace()
        .take(count as usize)
        .map(|word| (rng.gen_range(0..count), word.to_string()))
        .collect())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    let count = cli.count.unsigned_abs();
    if count == 0 {
        bail!("COUNT must be non-zero");
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let words = read_words(&cli, count, &mut rng)?;
    info!("read {} words from {}", words.len(), cli.corpus.display());

    info!("inserting");
    let mut splay_map = SplayMap::new();
    {
        let _b = Benchmark::reporting("SplayMap");
        for pair in &words {
            splay_map.insert_pair(pair.clone());
        }
    }
    let mut btree_map = BTreeMap::new();
    {
        let _b = Benchmark::reporting("BTreeMap");
        for (key, word) in &words {
            btree_map.insert(*key, word.clone());
        }
    }
    info!("{} distinct keys", splay_map.len());

    info!("searching");
    let mut hits = 0;
    {
        let _b = Benchmark::reporting("SplayMap");
        for key in 0..count {
            if splay_map.contains(&key) {
                hits += 1;
            }
        }
    }
    let mut btree_hits = 0;
    {
        let _b = Benchmark::reporting("BTreeMap");
        for key in 0..count {
            if btree_map.contains_key(&key) {
                btree_hits += 1;
            }
        }
    }
    info!(
        "{} of {} keys found ({} in BTreeMap)",
        hits, count, btree_hits
    );

    Ok(())
}
