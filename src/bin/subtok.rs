use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::ThreadPoolBuilder;
use serde_json::{self, json};
use subtok::bleu::{calculate_bleu, DEFAULT_MAX_ORDER};
use subtok::config::{IngestConfig, TrainerConfig, DEFAULT_END_OF_WORD, DEFAULT_UNKNOWN_TOKEN};
use subtok::corpus::load_text_corpus;
use subtok::model::TokenId;
use subtok::serialization::{load_vocabulary, save_vocabulary};
use subtok::{decode, encode, Trainer};

const DEFAULT_OUTPUT: &str = "vocab.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Subword BPE toolkit", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train a subword vocabulary from text inputs
    Train(TrainArgs),
    /// Encode text into token ids with a trained vocabulary
    Encode(EncodeArgs),
    /// Decode token ids back into text
    Decode(DecodeArgs),
    /// Score a candidate against a reference with BLEU
    Score(ScoreArgs),
    /// Inspect vocabulary metadata
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Files or directories to ingest
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the vocabulary JSON
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Number of merge iterations
    #[arg(long, value_name = "COUNT")]
    merges: Option<usize>,

    /// Marker prepended to every word
    #[arg(long, value_name = "TOKEN")]
    start_token: Option<String>,

    /// Marker appended to every word
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_END_OF_WORD)]
    end_token: String,

    /// Fallback token appended to the trained vocabulary
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_UNKNOWN_TOKEN)]
    unknown_token: String,

    /// Disable per-iteration logging/progress
    #[arg(long)]
    no_progress: bool,

    /// Emit pretty JSON
    #[arg(long)]
    pretty: bool,

    /// Optional path for a training metrics JSON report
    #[arg(long, value_name = "PATH")]
    metrics: Option<PathBuf>,

    /// Limit Rayon worker threads
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Disable recursive directory traversal
    #[arg(long)]
    no_recursive: bool,

    /// Follow symlinks during traversal
    #[arg(long)]
    follow_symlinks: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Vocabulary JSON to load
    #[arg(short = 'm', long, value_name = "PATH")]
    vocab: PathBuf,

    /// Text file to encode
    #[arg(value_name = "FILE", required_unless_present = "text")]
    input: Option<PathBuf>,

    /// Literal text to encode instead of a file
    #[arg(long, value_name = "STRING", conflicts_with = "input")]
    text: Option<String>,

    /// Marker prepended to every word
    #[arg(long, value_name = "TOKEN")]
    start_token: Option<String>,

    /// Marker appended to every word
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_END_OF_WORD)]
    end_token: String,

    /// Fallback token for unmatched input
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_UNKNOWN_TOKEN)]
    unknown_token: String,

    /// Emit a JSON record instead of plain ids
    #[arg(long)]
    json: bool,

    /// Output file for the id sequence (defaults to stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Vocabulary JSON to load
    #[arg(short = 'm', long, value_name = "PATH")]
    vocab: PathBuf,

    /// Path to whitespace separated token ids
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Token ids to decode when --input is omitted
    #[arg(value_name = "ID", required_unless_present = "input")]
    ids: Vec<TokenId>,

    /// Marker interpreted as the word boundary
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_END_OF_WORD)]
    end_token: String,

    /// Output file for decoded text (defaults to stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Candidate translation (file path, or literal text with --text)
    #[arg(value_name = "ACTUAL")]
    actual: String,

    /// Reference translation (file path, or literal text with --text)
    #[arg(value_name = "REFERENCE")]
    reference: String,

    /// Highest n-gram order scored
    #[arg(long, value_name = "ORDER", default_value_t = DEFAULT_MAX_ORDER)]
    max_order: usize,

    /// Treat the arguments as literal text instead of file paths
    #[arg(long)]
    text: bool,

    /// Emit a JSON record instead of a plain score
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Vocabulary JSON to inspect
    #[arg(short = 'm', long, value_name = "PATH")]
    vocab: PathBuf,

    /// Emit machine-readable JSON summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Encode(args) => run_encode(args),
        Commands::Decode(args) => run_decode(args),
        Commands::Score(args) => run_score(args),
        Commands::Info(args) => run_info(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run_train(args: TrainArgs) -> Result<()> {
    if let Some(threads) = args.threads {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("unable to configure Rayon thread pool")?;
    }

    let mut cfg = TrainerConfig::builder()
        .start_of_word(args.start_token.as_deref())
        .end_of_word(args.end_token.as_str())
        .unknown_token(args.unknown_token.as_str())
        .show_progress(!args.no_progress);
    if let Some(merges) = args.merges {
        cfg = cfg.num_merges(merges);
    }
    let trainer_cfg = cfg.build()?;

    let ingest_cfg = IngestConfig {
        recursive: !args.no_recursive,
        follow_symlinks: args.follow_symlinks,
    };

    let corpus =
        load_text_corpus(&args.inputs, &ingest_cfg).with_context(|| "failed to load text corpus")?;
    let corpus_bytes = corpus.len();
    info!(
        "loaded {:.2} MiB of corpus text",
        bytes_to_mebibytes(corpus_bytes)
    );

    let spinner = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} training merges... {elapsed}")
            .unwrap()
            .tick_chars("⠋⠙⠺⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let trainer = Trainer::new(trainer_cfg);
    let start = Instant::now();
    let artifacts = trainer.train_from_text(&corpus)?;
    drop(corpus);
    if let Some(pb) = spinner {
        pb.finish_with_message("training complete");
    }

    let elapsed = start.elapsed();
    let merges = artifacts.metrics.merge_count();
    let vocab_size = artifacts.vocabulary.len();
    let throughput = if elapsed.as_secs_f64() > 0.0 {
        bytes_to_mebibytes(corpus_bytes) / elapsed.as_secs_f64()
    } else {
        0.0
    };

    save_vocabulary(&artifacts.vocabulary, &args.output, args.pretty)
        .with_context(|| format!("failed to save vocabulary to {}", args.output.display()))?;

    if let Some(metrics_path) = &args.metrics {
        let report = serde_json::to_string_pretty(&artifacts.metrics)?;
        fs::write(metrics_path, report)
            .with_context(|| format!("failed to write metrics to {}", metrics_path.display()))?;
    }

    info!(
        "training complete: merges={merges} vocab={vocab_size} duration={elapsed:.2?} throughput={throughput:.2} MiB/s"
    );
    println!(
        "✅ wrote vocabulary of {} tokens ({} merges) to {}",
        vocab_size,
        merges,
        args.output.display()
    );
    println!(
        "   corpus {:.2} MiB | duration {:.2?} | throughput {:.2} MiB/s",
        bytes_to_mebibytes(corpus_bytes),
        elapsed,
        throughput
    );

    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let vocabulary = load_vocabulary(&args.vocab)
        .with_context(|| format!("failed to load vocabulary from {}", args.vocab.display()))?;

    let text = if let Some(text) = &args.text {
        text.clone()
    } else if let Some(path) = &args.input {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        return Err(anyhow!("either an input file or --text must be provided"));
    };

    let ids = encode(
        &text,
        &vocabulary,
        args.start_token.as_deref(),
        &args.end_token,
        &args.unknown_token,
    )?;

    if let Some(path) = &args.output {
        let mut file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        write_id_sequence(&mut file, &ids)?;
        println!("wrote {} ids to {}", ids.len(), path.display());
    } else if args.json {
        let record = json!({
            "vocab": args.vocab.display().to_string(),
            "ids": ids
        });
        println!("{}", serde_json::to_string(&record)?);
    } else {
        let mut stdout = io::stdout();
        write_id_sequence(&mut stdout, &ids)?;
    }

    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let vocabulary = load_vocabulary(&args.vocab)
        .with_context(|| format!("failed to load vocabulary from {}", args.vocab.display()))?;

    let ids = if let Some(input_path) = &args.input {
        let contents = fs::read_to_string(input_path)
            .with_context(|| format!("failed to read {}", input_path.display()))?;
        parse_id_list(&contents)?
    } else {
        args.ids
    };

    let text = decode(&ids, &vocabulary, &args.end_token)?;

    if let Some(path) = &args.output {
        fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
        println!(
            "wrote {} characters to {}",
            text.chars().count(),
            path.display()
        );
    } else {
        println!("{text}");
    }

    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let (actual, reference) = if args.text {
        (args.actual.clone(), args.reference.clone())
    } else {
        let actual = fs::read_to_string(&args.actual)
            .with_context(|| format!("failed to read {}", args.actual))?;
        let reference = fs::read_to_string(&args.reference)
            .with_context(|| format!("failed to read {}", args.reference))?;
        (actual, reference)
    };

    let bleu = calculate_bleu(&actual, &reference, args.max_order)?;

    if args.json {
        let record = json!({
            "bleu": bleu,
            "max_order": args.max_order
        });
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("BLEU-{}: {bleu:.4}", args.max_order);
    }

    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let vocabulary = load_vocabulary(&args.vocab)
        .with_context(|| format!("failed to load vocabulary from {}", args.vocab.display()))?;

    let mut min_id: Option<TokenId> = None;
    let mut max_id: Option<TokenId> = None;
    let mut longest: Option<(&str, usize)> = None;
    for (token, id) in vocabulary.iter() {
        min_id = Some(min_id.map_or(id, |current| current.min(id)));
        max_id = Some(max_id.map_or(id, |current| current.max(id)));
        let chars = token.chars().count();
        let replace = longest.map_or(true, |(best, best_chars)| {
            chars > best_chars || (chars == best_chars && token.as_str() < best)
        });
        if replace {
            longest = Some((token.as_str(), chars));
        }
    }

    let summary = json!({
        "path": args.vocab.display().to_string(),
        "vocab_size": vocabulary.len(),
        "min_id": min_id,
        "max_id": max_id,
        "longest_token": longest.map(|(token, _)| token),
        "longest_token_chars": longest.map(|(_, chars)| chars),
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Vocab size    : {}", vocabulary.len());
        match (min_id, max_id) {
            (Some(lo), Some(hi)) => println!("Id range      : {lo}..={hi}"),
            _ => println!("Id range      : (empty)"),
        }
        match longest {
            Some((token, chars)) => println!("Longest token : {token:?} ({chars} chars)"),
            None => println!("Longest token : (none)"),
        }
    }

    Ok(())
}

#[must_use]
fn bytes_to_mebibytes(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

fn write_id_sequence<W: Write>(writer: &mut W, ids: &[TokenId]) -> Result<()> {
    for (idx, id) in ids.iter().enumerate() {
        if idx > 0 {
            writer.write_all(b" ")?;
        }
        write!(writer, "{id}")?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

fn parse_id_list(text: &str) -> Result<Vec<TokenId>> {
    text.split_whitespace()
        .map(|part| {
            part.parse::<TokenId>()
                .map_err(|err| anyhow!("invalid token id `{part}`: {err}"))
        })
        .collect()
}
