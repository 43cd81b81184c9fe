// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments, reads input, prints results. All decoding
// work is delegated to Layer 2.
//
// stdout carries only results (translations, reports); logs go
// to stderr through tracing.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use commands::{Commands, InitConfigArgs, LanguagesArgs, RescoreArgs, TranslateArgs};

use crate::application::{
    rescore_use_case::RescoreUseCase,
    translate_use_case::{TranslateUseCase, TranslatorConfig},
};
use crate::domain::candidates::{CandidateSet, MbrResult};
use crate::domain::language::LanguageCode;
use crate::domain::request::{TranslationBatch, TranslationRequest};
use crate::infra::{config_store::ConfigStore, language_map::LanguageMap};
use crate::ml::mbr::MbrSelector;

#[derive(Parser, Debug)]
#[command(
    name = "polyglot-mbr",
    version,
    about = "Translate sentences with minimum-Bayes-risk selection over beam candidates."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// JSON output of `translate` and `rescore`
#[derive(Serialize)]
struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source:      Option<&'a str>,
    candidates:  &'a [String],
    selection:   &'a MbrResult,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Translate(args)  => Self::run_translate(args),
            Commands::Rescore(args)    => Self::run_rescore(args),
            Commands::Languages(args)  => Self::run_languages(args),
            Commands::InitConfig(args) => Self::run_init_config(args),
        }
    }

    fn run_translate(args: TranslateArgs) -> Result<()> {
        let mut cfg = match &args.config {
            Some(path) => ConfigStore::load(path)?,
            None       => TranslatorConfig::default(),
        };
        args.apply_to(&mut cfg);

        let languages = LanguageMap::load_or_empty(&cfg.languages_file)?;
        let src = LanguageCode::new(cfg.default_source.as_str())?;
        let tgt = LanguageCode::new(cfg.default_target.as_str())?;
        languages.ensure_offered(&src)?;
        languages.ensure_offered(&tgt)?;

        let text = match &args.text {
            Some(text) => text.clone(),
            None       => read_input(None)?,
        };

        let service = TranslateUseCase::from_config(&cfg)?;
        tracing::info!(
            "Translating {} -> {} ({} candidates)",
            languages.label(&src),
            languages.label(&tgt),
            cfg.decoding.num_beams
        );

        if args.batch {
            let requests = text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| TranslationRequest::new(line, src.clone(), tgt.clone(), cfg.decoding.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            let batch   = TranslationBatch::new(requests)?;
            let results = service.translate_batch(&batch)?;
            for result in &results {
                println!("{}", result.text);
            }
            return Ok(());
        }

        let request = TranslationRequest::new(text.trim_end_matches(['\r', '\n']), src, tgt, cfg.decoding.clone())?;
        if args.json || args.show_candidates {
            let (candidates, result) = service.translate_with_candidates(&request)?;
            print_selection(Some(request.source_text()), &candidates, &result, args.json)
        } else {
            println!("{}", service.translate(&request)?.text);
            Ok(())
        }
    }

    fn run_rescore(args: RescoreArgs) -> Result<()> {
        let text     = read_input(args.input.as_deref())?;
        let selector = MbrSelector::configured(args.reference_limit, args.subset_seed);
        let (candidates, result) = RescoreUseCase::new(selector).rescore(&text)?;
        print_selection(None, &candidates, &result, args.json)
    }

    fn run_languages(args: LanguagesArgs) -> Result<()> {
        let languages = LanguageMap::load(&args.languages)?;
        for code in languages.codes() {
            println!("{:<10} {}", code, languages.label(code));
        }
        Ok(())
    }

    fn run_init_config(args: InitConfigArgs) -> Result<()> {
        ConfigStore::save(&args.output, &TranslatorConfig::default(), args.force)?;
        println!("Wrote default config to '{}'", args.output.display());
        Ok(())
    }
}

/// Whole file, or all of stdin when no path is given
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Cannot read stdin")?;
            Ok(text)
        }
    }
}

fn print_selection(
    source:     Option<&str>,
    candidates: &CandidateSet,
    result:     &MbrResult,
    json:       bool,
) -> Result<()> {
    if json {
        let report = Report { source, candidates: candidates.as_slice(), selection: result };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (i, candidate) in candidates.iter().enumerate() {
        let marker = if i == result.index { "*" } else { " " };
        match result.scores.get(i) {
            Some(score) => println!("{marker} [{i}] {score:>6.2}  {candidate}"),
            None        => println!("{marker} [{i}]     -   {candidate}"),
        }
    }
    println!("\n{}", result.text);
    Ok(())
}
