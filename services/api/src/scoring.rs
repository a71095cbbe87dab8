use clap::Args;
use mfd_crm::error::AppError;
use mfd_crm::scoring::{parse_framework, score_submission, try_score, Answers, ScoringResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Framework configuration JSON file
    #[arg(long)]
    pub(crate) framework: PathBuf,
    /// Answers JSON object keyed by question key
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Fail on configuration errors instead of printing the null result
    #[arg(long)]
    pub(crate) strict: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let result = score_files(&args)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn score_files(args: &ScoreArgs) -> Result<ScoringResult, AppError> {
    let config: Value = read_json(&args.framework)?;
    let answers: Answers = read_json(&args.answers)?;

    if args.strict {
        let framework = parse_framework(&config)?;
        Ok(try_score(&framework, &answers)?)
    } else {
        Ok(score_submission(&config, &answers))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
