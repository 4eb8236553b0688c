#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

mod cli;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use endomondo_sync::config::ApiConfig;
use endomondo_sync::gateway::Workouts;
use endomondo_sync::gpx::read_gpx_track;
use endomondo_sync::mapper::summary_to_json;
use endomondo_sync::sport::{Sport, code_from_sport};
use endomondo_sync::transport::ReqwestTransport;
use endomondo_sync::types::{Workout, WorkoutId};
use endomondo_sync::{EndomondoTracker, Session, utils};
use std::time::Duration;

#[macro_use]
extern crate endomondo_sync;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let config = ApiConfig {
        base_url: cli.base_url,
        country: cli.country,
        timeout: Duration::from_secs(cli.timeout),
        ..ApiConfig::default()
    };
    let transport = ReqwestTransport::new(&config).context("building HTTP client")?;
    dlog!("base_url={} country={}", config.base_url, config.country);

    match cli.cmd {
        cli::Cmd::Login { username, password } => {
            let session = Session::with_username_and_password(&username, &password, &transport, &config)
                .context("logging in")?;
            println!("{}", session.token());
        }
        cli::Cmd::List {
            token,
            from,
            to,
            json,
        } => {
            let start = parse_date_arg(&from)?;
            let end = parse_date_arg(&to)?;
            let tracker = tracker(token, transport, config);
            let summaries = tracker.workouts(start, end).context("listing workouts")?;
            tracing::info!(count = summaries.len(), "workouts listed");

            for s in &summaries {
                if json {
                    println!("{}", summary_to_json(s));
                } else {
                    println!("{}\t{}\t{}", s.id, s.sport, s.start.to_rfc3339());
                }
            }
        }
        cli::Cmd::Show { token, id } => {
            let tracker = tracker(token, transport, config);
            let workout = tracker
                .workout(&WorkoutId::new(id.as_str()))
                .with_context(|| format!("fetching workout {id}"))?;

            for track in workout.tracks() {
                let start = track
                    .start_time()
                    .map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
                println!(
                    "{}\t{}\t{start}\t{}\t{:.3} km",
                    track.sport(),
                    track.points().len(),
                    utils::format_duration(track.duration()),
                    track.length() / 1000.0
                );
            }
        }
        cli::Cmd::Upload { token, sport, gpx } => {
            let sport: Sport = sport.parse().map_err(anyhow::Error::msg)?;
            let track = read_gpx_track(&gpx, sport)?;
            dlog!(
                "upload gpx={} points={} sport_code={}",
                gpx.display(),
                track.points().len(),
                code_from_sport(sport)
            );

            let mut workout = Workout::new();
            workout.add_track(track);

            let tracker = tracker(token, transport, config);
            let ids = tracker.post(&workout).context(
                "uploading track (earlier batches may already be stored remotely)",
            )?;
            for id in ids {
                println!("{id}");
            }
        }
    }

    Ok(())
}

fn tracker(
    token: String,
    transport: ReqwestTransport,
    config: ApiConfig,
) -> EndomondoTracker<ReqwestTransport> {
    EndomondoTracker::new(Workouts::new(Session::with_token(token), transport, config))
}

/// RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
fn parse_date_arg(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?}, expected RFC 3339 or YYYY-MM-DD"))?;
    Ok(day.and_time(chrono::NaiveTime::MIN).and_utc())
}
