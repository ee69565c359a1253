use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Local, Utc};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use civic_opinion_core::category::{CategoryClassifier, CategoryDef};
use civic_opinion_core::config::Config;
use civic_opinion_core::store::OpinionStore;
use civic_opinion_core::summary::SummaryGenerator;
use civic_opinion_core::{NewComment, NewOpinion, Opinion, OpinionError, ReactionAction, Result};

mod args;
use args::{Cli, Commands, CommentAction, ConfigAction, Shell};

const DEFAULT_USER: &str = "anonymous";

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);
    let user = resolve_user(cli.user);

    let result = match cli.command {
        Some(Commands::Classify {
            title,
            content,
            json,
            explain,
        }) => handle_classify(&base_dir, &title, &content, json, explain),
        Some(Commands::Submit {
            title,
            content,
            author,
            tags,
            no_classify,
        }) => handle_submit(
            &base_dir,
            NewOpinion {
                title,
                content,
                author_name: author,
                tags,
            },
            no_classify,
        ),
        Some(Commands::Reclassify { id, all }) => handle_reclassify(&base_dir, id.as_deref(), all),
        Some(Commands::List { limit, category }) => {
            handle_list(&base_dir, limit, category.as_deref())
        }
        Some(Commands::Show { id }) => handle_show(&base_dir, &id),
        Some(Commands::Summarize { limit }) => handle_summarize(&base_dir, limit),
        Some(Commands::Categories) => handle_categories(&base_dir),
        Some(Commands::Comment { action }) => handle_comment(action, &base_dir, &user),
        Some(Commands::React { id, reaction_type }) => {
            handle_react(&base_dir, &id, &reaction_type, &user)
        }
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "civic-opinion", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("CIVIC_OPINION_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".civic-opinion"))
        .unwrap_or_else(|| PathBuf::from(".civic-opinion"))
}

fn resolve_user(cli_user: Option<String>) -> String {
    cli_user
        .or_else(|| std::env::var("CIVIC_OPINION_USER").ok())
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_string())
}

/// Build the classifier once for this process from config
fn load_classifier(base_dir: &Path) -> Result<CategoryClassifier> {
    let config = Config::load(base_dir)?;
    let registry = config.category_registry(base_dir)?;
    Ok(CategoryClassifier::new(registry))
}

fn handle_classify(
    base_dir: &Path,
    title: &str,
    content: &str,
    json: bool,
    explain: bool,
) -> Result<()> {
    let classifier = load_classifier(base_dir)?;
    let result = classifier.classify(title, content);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} {}", "Category:".cyan().bold(), result.category);
    println!("{} {}", "Tags:".cyan().bold(), result.tags.join(", "));

    if explain {
        println!();
        for score in classifier.score(title, content) {
            let line = format!("  {:>2}  {}", score.score, score.name);
            if score.score > 0 {
                println!("{}  {}", line.green(), score.matched.join(", ").dimmed());
            } else {
                println!("{}", line.dimmed());
            }
        }
    }

    Ok(())
}

fn handle_submit(base_dir: &Path, new: NewOpinion, no_classify: bool) -> Result<()> {
    let mut store = OpinionStore::load(base_dir)?;
    let (title, content) = (new.title.clone(), new.content.clone());
    let id = store.insert(new).id.clone();

    if !no_classify {
        let classifier = load_classifier(base_dir)?;
        let result = classifier.classify(&title, &content);
        store.set_classification(&id, &result)?;
    }

    store.save(base_dir)?;

    println!("{} {}", "Submitted:".green(), id.cyan());
    if let Some(opinion) = store.get(&id) {
        print_classification(opinion);
    }
    Ok(())
}

fn handle_reclassify(base_dir: &Path, id: Option<&str>, all: bool) -> Result<()> {
    let classifier = load_classifier(base_dir)?;
    let mut store = OpinionStore::load(base_dir)?;

    let targets: Vec<(String, String, String)> = if all {
        store
            .opinions
            .iter()
            .map(|o| (o.id.clone(), o.title.clone(), o.content.clone()))
            .collect()
    } else {
        let id = id.unwrap_or_default();
        let opinion = store
            .get(id)
            .ok_or_else(|| OpinionError::OpinionNotFound { id: id.to_string() })?;
        vec![(
            opinion.id.clone(),
            opinion.title.clone(),
            opinion.content.clone(),
        )]
    };

    let mut changed = 0;
    for (id, title, content) in &targets {
        let result = classifier.classify(title, content);
        let before = store.get(id).and_then(|o| o.ai_category.clone());
        if before.as_deref() != Some(result.category.as_str()) {
            changed += 1;
        }
        store.set_classification(id, &result)?;
        println!("{} {} {}", id.dimmed(), "->".dimmed(), result.category);
    }

    store.save(base_dir)?;
    println!(
        "{} {} opinion(s) classified, {} changed category.",
        "Done:".green(),
        targets.len(),
        changed
    );
    Ok(())
}

fn handle_list(base_dir: &Path, limit: usize, category: Option<&str>) -> Result<()> {
    let classifier = load_classifier(base_dir)?;
    let fallback = classifier.registry().catch_all_name();
    let store = OpinionStore::load(base_dir)?;

    let opinions: Vec<&Opinion> = store
        .recent(usize::MAX)
        .into_iter()
        .filter(|o| category.map_or(true, |c| o.category_or(fallback) == c))
        .take(limit)
        .collect();

    if opinions.is_empty() {
        println!("{}", "No opinions found.".yellow());
        return Ok(());
    }

    println!();
    for opinion in opinions {
        println!(
            "{}  {}  {}",
            opinion.id.dimmed(),
            format_timestamp(&opinion.created_at),
            opinion.title.bold()
        );
        println!(
            "    {} [{}]",
            opinion.category_or(fallback).cyan(),
            opinion.ai_tags.as_deref().unwrap_or_default().join(", ")
        );
    }
    println!();
    Ok(())
}

fn handle_show(base_dir: &Path, id: &str) -> Result<()> {
    let store = OpinionStore::load(base_dir)?;
    let opinion = store
        .get(id)
        .ok_or_else(|| OpinionError::OpinionNotFound { id: id.to_string() })?;

    println!();
    println!("{}", opinion.title.bold());
    println!(
        "{} {}  {}",
        "by".dimmed(),
        opinion.author_name.as_deref().unwrap_or("(anonymous)"),
        format_timestamp(&opinion.created_at).dimmed()
    );
    println!();
    println!("{}", opinion.content);
    println!();
    print_classification(opinion);
    if let Some(tags) = opinion.tags.as_deref() {
        println!("{} {}", "User tags:".cyan(), tags.join(", "));
    }

    let reactions = store.reaction_counts(id);
    if !reactions.is_empty() {
        let line: Vec<String> = reactions
            .iter()
            .map(|(kind, count)| format!("{} {}", kind, count))
            .collect();
        println!("{} {}", "Reactions:".cyan(), line.join("  "));
    }

    let comments = store.comments_for(id);
    if !comments.is_empty() {
        println!();
        println!("{} ({})", "Comments".cyan().bold(), comments.len());
        for comment in comments {
            println!(
                "  {} {}: {}",
                format_timestamp(&comment.created_at).dimmed(),
                comment.author_name.as_deref().unwrap_or(&comment.user_identifier),
                comment.content
            );
        }
    }
    println!();
    Ok(())
}

fn handle_summarize(base_dir: &Path, limit: Option<usize>) -> Result<()> {
    let config = Config::load(base_dir)?;
    let registry = config.category_registry(base_dir)?;
    let store = OpinionStore::load(base_dir)?;

    let limit = limit.unwrap_or(config.summary.limit);
    let batch = store.recent(limit);
    tracing::debug!(limit, batch = batch.len(), "summarizing recent opinions");

    let summary = SummaryGenerator::from_registry(&registry).generate(batch);
    println!("{}", summary);
    Ok(())
}

fn handle_categories(base_dir: &Path) -> Result<()> {
    let classifier = load_classifier(base_dir)?;
    let registry = classifier.registry();

    println!();
    for (i, cat) in registry.all().iter().enumerate() {
        let keywords = if cat.is_catch_all() {
            "(catch-all)".dimmed().to_string()
        } else {
            cat.keywords.join(", ")
        };
        println!("{:>2}. {} {}  {}", i + 1, swatch(cat), cat.name.bold(), keywords);
    }
    println!();
    Ok(())
}

fn handle_comment(action: CommentAction, base_dir: &Path, user: &str) -> Result<()> {
    match action {
        CommentAction::Add {
            id,
            content,
            author,
        } => {
            let mut store = OpinionStore::load(base_dir)?;
            let comment_id = store
                .add_comment(
                    &id,
                    NewComment {
                        content,
                        author_name: author,
                        user_identifier: user.to_string(),
                    },
                )?
                .id
                .clone();
            store.save(base_dir)?;
            println!("{} {}", "Commented:".green(), comment_id.cyan());
        }
        CommentAction::List { id } => {
            let store = OpinionStore::load(base_dir)?;
            if store.get(&id).is_none() {
                return Err(OpinionError::OpinionNotFound { id });
            }
            let comments = store.comments_for(&id);
            if comments.is_empty() {
                println!("{}", "No comments yet.".yellow());
            }
            for comment in comments {
                println!(
                    "{}  {}: {}",
                    format_timestamp(&comment.created_at).dimmed(),
                    comment.author_name.as_deref().unwrap_or(&comment.user_identifier),
                    comment.content
                );
            }
        }
    }

    Ok(())
}

fn handle_react(base_dir: &Path, id: &str, reaction_type: &str, user: &str) -> Result<()> {
    let mut store = OpinionStore::load(base_dir)?;
    let action = store.toggle_reaction(id, reaction_type, user)?;
    store.save(base_dir)?;

    let count = store.reaction_counts(id).get(reaction_type).copied().unwrap_or(0);
    match action {
        ReactionAction::Added => println!("{} {} ({})", "Added:".green(), reaction_type, count),
        ReactionAction::Removed => println!("{} {} ({})", "Removed:".red(), reaction_type, count),
    }
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(OpinionError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

fn print_classification(opinion: &Opinion) {
    match (&opinion.ai_category, &opinion.ai_tags) {
        (Some(category), tags) => {
            println!("{} {}", "Category:".cyan(), category);
            println!(
                "{} {}",
                "Tags:".cyan(),
                tags.as_deref().unwrap_or_default().join(", ")
            );
        }
        (None, _) => println!("{}", "(not classified)".yellow()),
    }
}

/// Local time as `YYYY-MM-DD HH:MM`
fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Color swatch from a `#RRGGBB` category color
fn swatch(cat: &CategoryDef) -> String {
    let rgb = cat
        .color
        .as_deref()
        .and_then(|c| c.strip_prefix('#'))
        .filter(|hex| hex.len() == 6)
        .and_then(|hex| {
            let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        });

    match rgb {
        Some((r, g, b)) => "■".truecolor(r, g, b).to_string(),
        None => "■".dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_layout() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let formatted = format_timestamp(&at);
        let expected = at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();

        assert_eq!(formatted, expected);
        assert_eq!(formatted.len(), "2024-05-01 09:30".len());
    }
}
