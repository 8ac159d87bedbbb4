use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use typecoach::config::Config;
use typecoach::engine::{
    CourseKind, LessonPresentation, PracticePhase, SkillTier, Stats, open_course, skill,
};
use typecoach::generator::entropy_source;
use typecoach::generator::material::MaterialGenerator;
use typecoach::generator::practice::PracticeTextGenerator;
use typecoach::store::catalog::LessonCatalog;
use typecoach::store::source::{DirSource, EmbeddedSource, LayeredSource};

#[derive(Parser)]
#[command(name = "typecoach", version, about = "Typing curriculum engine: skill tiers, lesson progression and drill text")]
struct Cli {
    #[arg(long, global = true, help = "Log filter, e.g. debug or typecoach=trace (overrides RUST_LOG)")]
    log_level: Option<String>,

    #[arg(long, global = true, help = "Config file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a typing attempt into a skill tier
    Classify {
        #[arg(long)]
        wpm: f64,
        #[arg(long)]
        accuracy: f64,
    },
    /// Choose the next lesson for a learner
    Lesson {
        #[arg(short, long, help = "Course kind (beginner, advanced-level)")]
        course: Option<String>,
        #[arg(short, long, default_value_t = 0, help = "Current lesson id, 0 to start")]
        lesson: u32,
        #[arg(long)]
        wpm: Option<f64>,
        #[arg(long)]
        accuracy: Option<f64>,
        #[arg(short, long, help = "Current phase (repetition, patterns, words)")]
        phase: Option<String>,
    },
    /// Generate drill text for a set of keys
    Generate {
        #[arg(short, long)]
        keys: String,
        #[arg(short, long, default_value = "repetition")]
        phase: String,
        #[arg(short, long, value_delimiter = ',', help = "Comma-separated common words")]
        words: Vec<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Generate placement-test material for a skill tier
    Material {
        #[arg(short, long, default_value = "beginner")]
        tier: String,
        #[arg(short, long, default_value_t = 30)]
        words: usize,
        #[arg(long, help = "Build pseudo-words over these keys instead")]
        keys: Option<String>,
        #[arg(long, value_delimiter = ',', help = "Comma-separated keywords to mix in")]
        keywords: Vec<String>,
    },
    /// List the lessons in a course catalog
    Lessons {
        #[arg(short, long)]
        course: Option<String>,
    },
}

fn init_tracing(log_level: Option<&str>) {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load config")?;

    match cli.command {
        Command::Classify { wpm, accuracy } => {
            let stats = Stats::new(wpm, accuracy);
            let tier = skill::classify(&stats)?;
            println!("{} (score {:.1})", tier.to_key(), skill::composite_score(&stats));
        }
        Command::Lesson {
            course,
            lesson,
            wpm,
            accuracy,
            phase,
        } => {
            let kind = parse_course(course.as_deref(), &config)?;
            let phase = match phase {
                Some(name) => parse_phase(&name)?,
                None => PracticePhase::NotSet,
            };
            let stats = wpm.zip(accuracy).map(|(w, a)| Stats::new(w, a));

            let catalog = lesson_catalog(&config);
            let mut progression =
                open_course(&catalog, kind, config.course_setting(), entropy_source())?;
            let presentation = progression.practice_lesson(lesson, stats.as_ref(), phase)?;
            print_presentation(&presentation);
        }
        Command::Generate {
            keys,
            phase,
            words,
            limit,
        } => {
            let phase = parse_phase(&phase)?;
            let keys: Vec<char> = keys.chars().filter(|c| !c.is_whitespace()).collect();
            let limit = limit.unwrap_or(config.practice_text_length);
            let mut generator = PracticeTextGenerator::new(entropy_source());
            println!("{}", generator.generate(&keys, &words, phase, limit)?);
        }
        Command::Material {
            tier,
            words,
            keys,
            keywords,
        } => {
            let mut generator = MaterialGenerator::new(entropy_source());
            let text = if let Some(keys) = keys {
                let keys: Vec<char> = keys.chars().filter(|c| !c.is_whitespace()).collect();
                generator.key_practice_text(&keys, words, 2, 5)?
            } else if !keywords.is_empty() {
                generator.keyword_material(&keywords, words)?
            } else {
                let Some(tier) = SkillTier::from_key(&tier) else {
                    bail!("unknown skill tier '{tier}'");
                };
                generator.test_material(tier, words)
            };
            println!("{text}");
        }
        Command::Lessons { course } => {
            let kind = parse_course(course.as_deref(), &config)?;
            let catalog = lesson_catalog(&config);
            let lessons = catalog.load(kind.catalog_id())?;
            println!("{}: {}", kind.to_key(), kind.description());
            for lesson in lessons.iter() {
                let keys: String = lesson.target_keys.iter().collect();
                println!(
                    "{:>3}  [{}] point {}  {}",
                    lesson.id, keys, lesson.point_weight, lesson.description
                );
            }
        }
    }
    Ok(())
}

/// User catalogs override the bundled ones.
fn lesson_catalog(config: &Config) -> LessonCatalog {
    info!(lesson_dir = %config.lesson_dir, "using lesson directory");
    LessonCatalog::new(
        LayeredSource::new()
            .with(DirSource::new(&config.lesson_dir))
            .with(EmbeddedSource),
    )
}

fn parse_course(name: Option<&str>, config: &Config) -> Result<CourseKind> {
    match name {
        Some(name) => {
            CourseKind::from_name(name).with_context(|| format!("unknown course '{name}'"))
        }
        None => Ok(config.course_kind()),
    }
}

fn parse_phase(name: &str) -> Result<PracticePhase> {
    PracticePhase::from_key(name).with_context(|| format!("unknown phase '{name}'"))
}

fn print_presentation(presentation: &LessonPresentation) {
    if presentation.is_course_complete {
        println!("{}", presentation.instruction);
        return;
    }
    println!(
        "Lesson {}/{} ({})",
        presentation.lesson_id,
        presentation.lesson_count,
        presentation.phase.to_key()
    );
    println!("{}", presentation.instruction);
    println!();
    println!("{}", presentation.practice_text);
}
