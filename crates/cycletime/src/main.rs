//! cycletime - Tracker cycle-time analyzer

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cycletime_core::{
    calendar, cycle_time, default_buckets, summarize, BusinessCalendar, CalendarConfig,
    ScoredStory, TrackerClient, WorktimeEngine,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cycletime",
    version,
    about = "Tracker cycle-time analyzer",
    long_about = "Measures how long completed tracker stories were actively worked on,\n\
                  in business hours rather than wall-clock time.\n\
                  \n\
                  Fetches completed stories and their transition logs from the tracker API,\n\
                  replays each log through a business-calendar-aware state machine, and\n\
                  prints a per-bucket summary (counts, percentages, total and average\n\
                  worktime).\n\
                  \n\
                  Examples:\n\
                    cycletime report                     # Last 3 weeks (default)\n\
                    cycletime report -w 3 -w 6 -w 9      # One summary per window\n\
                    cycletime report --json              # Machine-readable output\n\
                    cycletime story 160005662            # One story's log and cycle time\n\
                  \n\
                  Environment Variables:\n\
                    TRACKER_API_TOKEN                    # Tracker API token (required)\n\
                    TRACKER_PROJECT_ID                   # Tracker project ID (required)\n\
                    CYCLETIME_TIMEZONE                   # Business calendar timezone\n\
                    CYCLETIME_NO_COLOR                   # Disable ANSI colors"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Tracker API token
    #[arg(long, env = "TRACKER_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Tracker project ID
    #[arg(long, env = "TRACKER_PROJECT_ID")]
    project_id: String,

    /// IANA timezone for the business calendar
    #[arg(long, env = "CYCLETIME_TIMEZONE", default_value = calendar::DEFAULT_TIMEZONE)]
    timezone: String,

    /// Hour of day the workday opens (0-23)
    #[arg(long, default_value_t = calendar::DEFAULT_START_HOUR)]
    workday_start: u32,

    /// Hour of day the workday closes (1-23)
    #[arg(long, default_value_t = calendar::DEFAULT_END_HOUR)]
    workday_end: u32,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "CYCLETIME_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Print the cycle-time summary for completed stories (default)
    Report {
        /// Reporting window in weeks (repeatable: -w 3 -w 6)
        #[arg(long, short = 'w', default_values_t = [3u32])]
        weeks: Vec<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one story's transition log and cycle time
    Story {
        /// Numeric story ID
        story_id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = CalendarConfig {
        timezone: cli.timezone.clone(),
        start_hour: cli.workday_start,
        end_hour: cli.workday_end,
    };
    let calendar =
        BusinessCalendar::new(&config).context("Invalid business calendar configuration")?;
    let engine = WorktimeEngine::new(calendar);
    let client = TrackerClient::new(cli.api_token.clone(), cli.project_id.clone());

    match cli.mode.unwrap_or(Mode::Report {
        weeks: vec![3],
        json: false,
    }) {
        Mode::Report { weeks, json } => {
            run_report(&client, &engine, &weeks, json, cli.no_color).await
        }
        Mode::Story { story_id, json } => run_story(&client, &engine, story_id, json).await,
    }
}

async fn run_report(
    client: &TrackerClient,
    engine: &WorktimeEngine,
    weeks: &[u32],
    json: bool,
    no_color: bool,
) -> Result<()> {
    for &num_weeks in weeks {
        let window = chrono::Duration::weeks(i64::from(num_weeks));
        let stories = client
            .completed_stories(window)
            .await
            .context("Failed to fetch completed stories")?;

        if !json {
            eprintln!("{} stories accepted in the last {} weeks", stories.len(), num_weeks);
        }

        let mut scored = Vec::with_capacity(stories.len());
        let mut failed = 0usize;
        for story in stories {
            let transitions = client
                .story_transitions(story.id)
                .await
                .with_context(|| format!("Failed to fetch transitions for story {}", story.id))?;

            match cycle_time(engine, &story, &transitions) {
                Ok(cycle_time) => scored.push(ScoredStory { story, cycle_time }),
                Err(err) => {
                    tracing::warn!(
                        story_id = story.id,
                        error = %err,
                        "excluding story with fatal cycle-time error"
                    );
                    failed += 1;
                }
            }
        }

        let summaries = summarize(&scored, &default_buckets());
        println!(
            "{}",
            cli::format_report(num_weeks, &summaries, failed, json, no_color)?
        );
    }

    Ok(())
}

async fn run_story(
    client: &TrackerClient,
    engine: &WorktimeEngine,
    story_id: u64,
    json: bool,
) -> Result<()> {
    let story = client
        .story(story_id)
        .await
        .with_context(|| format!("Failed to fetch story {story_id}"))?;
    let transitions = client
        .story_transitions(story_id)
        .await
        .with_context(|| format!("Failed to fetch transitions for story {story_id}"))?;

    let result = cycle_time(engine, &story, &transitions);
    println!("{}", cli::format_story(&story, &transitions, &result, json)?);

    Ok(())
}
