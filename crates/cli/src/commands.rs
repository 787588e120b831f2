use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use imaginex_core::{
    clean_name, collect_files, suggest_many, AppConfig, BatchPlan, NameSpec, RenameEngine,
    RenameError, SuggesterKind, Suggestion, UndoHistory, UndoOutcome,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SuggesterArg {
    Exif,
    Visual,
    None,
}

impl From<SuggesterArg> for SuggesterKind {
    fn from(value: SuggesterArg) -> Self {
        match value {
            SuggesterArg::Exif => SuggesterKind::Exif,
            SuggesterArg::Visual => SuggesterKind::Visual,
            SuggesterArg::None => SuggesterKind::None,
        }
    }
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    pub path: PathBuf,
    /// New name without extension; suggested from the file when omitted.
    pub name: Option<String>,
    #[arg(long, value_enum)]
    pub suggester: Option<SuggesterArg>,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    pub path: PathBuf,
    /// New name without extension; suggested from the file when omitted.
    pub name: Option<String>,
    #[arg(long, value_enum)]
    pub suggester: Option<SuggesterArg>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Files or folders, in rename order.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// A base name ("Trip" gives Trip_1, Trip_2, ...) or a comma separated
    /// list of names. Suggested from the first file when omitted.
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_enum)]
    pub suggester: Option<SuggesterArg>,
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
    #[arg(long, default_value_t = false)]
    pub include_hidden: bool,
    #[arg(long, default_value_t = false)]
    pub apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    #[arg(long, value_enum)]
    pub suggester: Option<SuggesterArg>,
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
    #[arg(long, default_value_t = false)]
    pub include_hidden: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

pub fn cmd_clean(args: &CleanArgs) {
    println!("{}", clean_name(&args.name));
}

pub fn cmd_preview(engine: &RenameEngine, config: &AppConfig, args: &PreviewArgs) -> Result<()> {
    let name = resolve_name(args.name.as_deref(), &args.path, args.suggester, config)?;
    let target = engine.preview(&args.path, &clean_name(&name));
    println!("{} -> {}", args.path.display(), target.display());
    Ok(())
}

pub fn cmd_rename(engine: &mut RenameEngine, config: &AppConfig, args: &RenameArgs) -> Result<()> {
    let name = resolve_name(args.name.as_deref(), &args.path, args.suggester, config)?;
    let new_path = engine.rename_one(&args.path, &name)?;
    println!("{} -> {}", args.path.display(), new_path.display());
    Ok(())
}

pub fn cmd_batch(engine: &mut RenameEngine, config: &AppConfig, args: &BatchArgs) -> Result<()> {
    let files = collect_files(
        &args.inputs,
        args.recursive || config.recursive_default,
        args.include_hidden || config.include_hidden_default,
    )?;
    let Some(first) = files.first() else {
        return Err(RenameError::InvalidInput("no files selected".to_string()).into());
    };

    let raw_name = resolve_name(args.name.as_deref(), first, args.suggester, config)?;
    let spec = NameSpec::parse(&raw_name)?;
    let plan = engine.plan_batch(&files, &spec)?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Table => print_plan(&plan),
    }

    if args.apply {
        let renamed = engine.apply_plan(plan)?;
        eprintln!("renamed {} files", renamed.len());
    } else {
        eprintln!("dry run: no files were changed. Pass --apply to rename.");
    }
    Ok(())
}

pub fn cmd_suggest(config: &AppConfig, args: &SuggestArgs) -> Result<()> {
    let files = collect_files(
        &args.inputs,
        args.recursive || config.recursive_default,
        args.include_hidden || config.include_hidden_default,
    )?;
    let kind = args.suggester.map(SuggesterKind::from).unwrap_or(config.suggester);
    let suggester = kind.build(config.visual_options());
    let suggestions = suggest_many(suggester.as_ref(), &files);

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&suggestions)?),
        OutputFormat::Table => print_suggestions(&suggestions),
    }
    Ok(())
}

pub fn cmd_undo(engine: &mut RenameEngine) -> Result<()> {
    let outcome = engine.undo()?;
    print_undo(&outcome);
    Ok(())
}

pub fn cmd_history(history: &UndoHistory) {
    if history.is_empty() {
        println!("history is empty");
        return;
    }
    for (n, batch) in history.iter().enumerate() {
        println!("#{} ({} files)", n + 1, batch.len());
        for record in batch.records() {
            println!(
                "  {} -> {}",
                record.old_path.display(),
                record.new_path.display()
            );
        }
    }
}

fn resolve_name(
    name: Option<&str>,
    path: &Path,
    suggester: Option<SuggesterArg>,
    config: &AppConfig,
) -> Result<String> {
    if let Some(name) = name {
        return Ok(name.to_string());
    }
    let kind = suggester.map(SuggesterKind::from).unwrap_or(config.suggester);
    kind.build(config.visual_options())
        .suggest(path)
        .with_context(|| {
            format!(
                "no name given and no suggestion available for {}",
                path.display()
            )
        })
}

fn print_plan(plan: &BatchPlan) {
    println!("source -> target");
    for entry in &plan.entries {
        println!("{} -> {}", entry.from.display(), entry.to.display());
    }
    println!("\nplanned={}", plan.len());
}

fn print_suggestions(suggestions: &[Suggestion]) {
    for suggestion in suggestions {
        println!(
            "{} -> {}",
            suggestion.path.display(),
            suggestion.name.as_deref().unwrap_or("(none)")
        );
    }
}

fn print_undo(outcome: &UndoOutcome) {
    println!(
        "undo: restored {} of {} files",
        outcome.restored, outcome.requested
    );
    for path in &outcome.skipped {
        println!("  skipped {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::{cmd_batch, resolve_name, BatchArgs, OutputFormat, SuggesterArg};
    use imaginex_core::{AppConfig, RenameEngine};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, name.as_bytes()).expect("write file");
        path
    }

    fn batch_args(dir: &Path, apply: bool) -> BatchArgs {
        BatchArgs {
            inputs: vec![dir.to_path_buf()],
            name: Some("trip".to_string()),
            suggester: None,
            recursive: false,
            include_hidden: false,
            apply,
            output: OutputFormat::Table,
        }
    }

    #[test]
    fn batch_without_apply_changes_nothing() {
        let temp = tempdir().expect("tempdir");
        let a = touch(temp.path(), "a.jpg");
        let b = touch(temp.path(), "b.jpg");
        let mut engine = RenameEngine::new();

        cmd_batch(&mut engine, &AppConfig::default(), &batch_args(temp.path(), false))
            .expect("dry run");

        assert!(a.exists() && b.exists());
        assert!(!temp.path().join("Trip_1.jpg").exists());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn batch_with_apply_renames_and_records_one_batch() {
        let temp = tempdir().expect("tempdir");
        let a = touch(temp.path(), "a.jpg");
        let b = touch(temp.path(), "b.jpg");
        let mut engine = RenameEngine::new();

        cmd_batch(&mut engine, &AppConfig::default(), &batch_args(temp.path(), true))
            .expect("apply");

        assert!(!a.exists() && !b.exists());
        assert!(temp.path().join("Trip_1.jpg").exists());
        assert!(temp.path().join("Trip_2.jpg").exists());
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn batch_of_empty_folder_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let mut engine = RenameEngine::new();

        let err = cmd_batch(&mut engine, &AppConfig::default(), &batch_args(temp.path(), true))
            .expect_err("no files");
        assert!(format!("{err:#}").contains("no files selected"));
    }

    #[test]
    fn explicit_name_wins_over_suggester() {
        let name = resolve_name(
            Some("Beach"),
            Path::new("missing.jpg"),
            Some(SuggesterArg::None),
            &AppConfig::default(),
        )
        .expect("explicit name");
        assert_eq!(name, "Beach");
    }

    #[test]
    fn missing_name_without_suggestion_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let path = touch(temp.path(), "a.jpg");

        let err = resolve_name(None, &path, Some(SuggesterArg::None), &AppConfig::default())
            .expect_err("no suggestion");
        assert!(format!("{err:#}").contains("no suggestion available"));
    }
}
