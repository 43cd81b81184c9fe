// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Subcommands:
//   translate    - translate a sentence (or one per line with --batch)
//   rescore      - MBR-select from a list of candidate lines
//   languages    - list the codes in languages.json
//   init-config  - write a default translator config

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::translate_use_case::{EngineConfig, TranslatorConfig};
use crate::domain::request::DecodingStrategy;
use crate::infra::http_engine::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_TEMPERATURE: f32 = 1.0;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate text with MBR selection over N beam candidates
    Translate(TranslateArgs),

    /// Pick the consensus line from a list of candidate translations
    Rescore(RescoreArgs),

    /// List the available languages
    Languages(LanguagesArgs),

    /// Write a default config file
    InitConfig(InitConfigArgs),
}

/// Every field is optional: unset fields keep the value from
/// --config (or the built-in defaults).
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Text to translate; read from stdin when omitted
    pub text: Option<String>,

    /// JSON config written by `init-config`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source language code, e.g. eng_Latn
    #[arg(long)]
    pub src: Option<String>,

    /// Target language code, e.g. zul_Latn
    #[arg(long)]
    pub tgt: Option<String>,

    /// Beams searched, and candidates compared by MBR
    #[arg(long)]
    pub num_beams: Option<usize>,

    /// Maximum generated tokens per candidate
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Sample candidates instead of beam search
    #[arg(long)]
    pub sample: bool,

    /// Sampling temperature
    #[arg(long, requires = "sample")]
    pub temperature: Option<f32>,

    /// Seed for sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding tokenizer.json
    #[arg(long)]
    pub model_dir: Option<String>,

    /// Base URL of the model server
    #[arg(long, conflicts_with = "echo")]
    pub engine_url: Option<String>,

    /// Use the offline echo engine
    #[arg(long)]
    pub echo: bool,

    /// Language list used to validate codes
    #[arg(long)]
    pub languages: Option<String>,

    /// Compare each candidate with at most this many others
    #[arg(long)]
    pub reference_limit: Option<usize>,

    /// Seed for picking the others when --reference-limit is set
    #[arg(long, requires = "reference_limit")]
    pub subset_seed: Option<u64>,

    /// Translate every input line as its own sentence
    #[arg(long)]
    pub batch: bool,

    /// Print every candidate with its MBR score
    #[arg(long)]
    pub show_candidates: bool,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl TranslateArgs {
    /// Overlay the flags that were given onto `cfg`
    pub fn apply_to(&self, cfg: &mut TranslatorConfig) {
        if let Some(src) = &self.src {
            cfg.default_source = src.clone();
        }
        if let Some(tgt) = &self.tgt {
            cfg.default_target = tgt.clone();
        }
        if let Some(n) = self.num_beams {
            cfg.decoding.num_beams = n;
        }
        if let Some(max_length) = self.max_length {
            cfg.decoding.max_length = max_length;
        }
        if self.sample {
            let temperature = self.temperature
                .or_else(|| cfg.decoding.strategy.temperature())
                .unwrap_or(DEFAULT_TEMPERATURE);
            cfg.decoding.strategy = DecodingStrategy::Sample { temperature };
        }
        if let Some(seed) = self.seed {
            cfg.decoding.seed = Some(seed);
        }
        if let Some(dir) = &self.model_dir {
            cfg.model_dir = dir.clone();
        }
        if let Some(url) = &self.engine_url {
            let timeout_secs = match cfg.engine {
                EngineConfig::Http { timeout_secs, .. } => timeout_secs,
                EngineConfig::Echo => DEFAULT_TIMEOUT_SECS,
            };
            cfg.engine = EngineConfig::Http { url: url.clone(), timeout_secs };
        }
        if self.echo {
            cfg.engine = EngineConfig::Echo;
        }
        if let Some(path) = &self.languages {
            cfg.languages_file = path.clone();
        }
        if let Some(limit) = self.reference_limit {
            cfg.reference_limit = Some(limit);
        }
        if let Some(seed) = self.subset_seed {
            cfg.subset_seed = Some(seed);
        }
    }
}

#[derive(Args, Debug)]
pub struct RescoreArgs {
    /// File with one candidate per line; stdin when omitted
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Compare each candidate with at most this many others
    #[arg(long)]
    pub reference_limit: Option<usize>,

    /// Seed for picking the others when --reference-limit is set
    #[arg(long, requires = "reference_limit")]
    pub subset_seed: Option<u64>,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LanguagesArgs {
    #[arg(long, default_value = "languages.json")]
    pub languages: String,
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    #[arg(long, default_value = "translator.json")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
