mod report;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::services::activity_grid::{
    build_month_labels, build_weeks, max_solved, parse_day_key, today_utc,
};
use crate::services::tooltip::compute_position;
use crate::services::{
    load_activity, ActivityCacheService, ActivitySource, Config, DayWindow, FileActivitySource,
    HttpActivitySource,
};
use crate::tui;
use crate::types::{ActivityDay, ActivityStats, Placement, RadquizError, Rect};

use report::{render_grid, render_stats, GridReport};

/// Solved-case activity heatmap for the diagnostic imaging quiz
#[derive(Parser)]
#[command(name = "radquiz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
struct SourceArgs {
    /// Read activity from a JSON export instead of the backend
    #[arg(long)]
    input: Option<PathBuf>,

    /// Trailing window in days (default: windowDays from config)
    #[arg(long)]
    days: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive heatmap (default)
    Tui {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the week grid with month labels and intensity levels
    Grid {
        #[command(flatten)]
        source: SourceArgs,

        /// Treat this day as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show activity statistics
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Treat this day as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute a tooltip position next to an anchor rectangle
    Place {
        /// Anchor rectangle as LEFT,TOP,WIDTH,HEIGHT
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        anchor: Rect,

        /// Tooltip size as WIDTH,HEIGHT
        #[arg(long, value_parser = parse_size)]
        tooltip: Rect,

        /// Container rectangle as LEFT,TOP,WIDTH,HEIGHT (default: terminal size)
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        container: Option<Rect>,

        /// Gap between anchor and tooltip (default: tooltipOffset from config)
        #[arg(long)]
        offset: Option<f64>,

        /// Placements to try, in order
        #[arg(long, value_enum, value_delimiter = ',')]
        order: Vec<Placement>,
    },

    /// Delete cached backend activity
    ClearCache,
}

fn parse_today(value: &str) -> Result<NaiveDate, String> {
    parse_day_key(value).map_err(|e| e.to_string())
}

fn parse_numbers<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", p.trim()))
        })
        .collect::<Result<_, _>>()?;

    let parts: [f64; N] = parts
        .try_into()
        .map_err(|parts: Vec<f64>| format!("expected {} values, got {}", N, parts.len()))?;
    if parts.iter().any(|n| !n.is_finite()) {
        return Err("values must be finite".to_string());
    }
    Ok(parts)
}

fn parse_rect(value: &str) -> Result<Rect, String> {
    let [left, top, width, height] = parse_numbers::<4>(value)?;
    Ok(Rect::new(left, top, width, height))
}

fn parse_size(value: &str) -> Result<Rect, String> {
    let [width, height] = parse_numbers::<2>(value)?;
    Ok(Rect::sized(width, height))
}

/// Resolve the activity source: `--input` wins, then the configured backend.
/// `open_cache` is only called for the backend.
fn resolve_source(
    args: &SourceArgs,
    config: &Config,
    open_cache: impl FnOnce() -> crate::types::Result<ActivityCacheService>,
) -> anyhow::Result<(Box<dyn ActivitySource>, Option<ActivityCacheService>)> {
    if let Some(path) = &args.input {
        return Ok((Box::new(FileActivitySource::new(path.clone())), None));
    }

    let Some(url) = &config.api_base_url else {
        return Err(RadquizError::Config(
            "no activity source: pass --input or set apiBaseUrl in ~/.radquiz/config.json"
                .to_string(),
        )
        .into());
    };

    let cache = match open_cache() {
        Ok(cache) => Some(cache),
        Err(e) => {
            eprintln!("[radquiz] Warning: cache disabled: {}", e);
            None
        }
    };
    Ok((Box::new(HttpActivitySource::new(url.clone())), cache))
}

fn window_for(args: &SourceArgs, config: &Config, today: NaiveDate) -> DayWindow {
    DayWindow::trailing(today, args.days.unwrap_or(config.window_days))
}

fn fetch_days(
    args: &SourceArgs,
    config: &Config,
    today: NaiveDate,
) -> anyhow::Result<Vec<ActivityDay>> {
    let (source, cache) = resolve_source(args, config, ActivityCacheService::new)?;
    let window = window_for(args, config, today);
    load_activity(source.as_ref(), cache.as_ref(), window)
        .with_context(|| format!("Failed to load activity from {}", source.name()))
}

/// Remove the backend snapshot; returns whether one existed
fn clear_cache(cache: &ActivityCacheService) -> anyhow::Result<bool> {
    let existed = cache.cache_path(HttpActivitySource::NAME).exists();
    cache
        .clear(HttpActivitySource::NAME)
        .context("Failed to clear activity cache")?;
    Ok(existed)
}

fn terminal_viewport() -> anyhow::Result<Rect> {
    let (cols, rows) = crossterm::terminal::size()
        .context("No --container given and the terminal size is unavailable")?;
    Ok(Rect::new(0.0, 0.0, cols as f64, rows as f64))
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load();

        match self.command.unwrap_or(Commands::Tui {
            source: SourceArgs::default(),
        }) {
            Commands::Tui { source } => {
                let window = window_for(&source, &config, today_utc());
                let (activity, cache) =
                    resolve_source(&source, &config, ActivityCacheService::new)?;
                // Terminal cells are coarse; sit the tooltip right next to the cell
                let options = config.tooltip_options().with_offset(0.0);
                tui::run(activity, cache, window, options)
            }
            Commands::Grid {
                source,
                today,
                json,
            } => {
                let today = today.unwrap_or_else(today_utc);
                let days = fetch_days(&source, &config, today)?;
                let weeks = build_weeks(&days, today);
                let labels = build_month_labels(&weeks);
                let max = max_solved(&days);

                if json {
                    let report = GridReport::new(&weeks, &labels, max, today);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render_grid(&weeks, &labels, max));
                }
                Ok(())
            }
            Commands::Stats {
                source,
                today,
                json,
            } => {
                let today = today.unwrap_or_else(today_utc);
                let days = fetch_days(&source, &config, today)?;
                let stats = ActivityStats::from_days(&days, today);

                if json {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                } else {
                    print!("{}", render_stats(&stats));
                }
                Ok(())
            }
            Commands::Place {
                anchor,
                tooltip,
                container,
                offset,
                order,
            } => {
                let container = match container {
                    Some(rect) => rect,
                    None => terminal_viewport()?,
                };
                let mut options = config.tooltip_options();
                if let Some(offset) = offset {
                    options = options.with_offset(offset);
                }
                if !order.is_empty() {
                    options = options.with_order(order);
                }

                let position = compute_position(anchor, tooltip, container, &options);
                println!("{}", serde_json::to_string_pretty(&position)?);
                Ok(())
            }
            Commands::ClearCache => {
                let cache = ActivityCacheService::new()?;
                if clear_cache(&cache)? {
                    println!("Cleared cached activity");
                } else {
                    println!("No cached activity");
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ========== parsing ==========

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["radquiz"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_tui_with_source() {
        let cli = Cli::try_parse_from(["radquiz", "tui", "--input", "a.json", "--days", "90"])
            .unwrap();
        match cli.command {
            Some(Commands::Tui { source }) => {
                assert_eq!(source.input, Some(PathBuf::from("a.json")));
                assert_eq!(source.days, Some(90));
            }
            _ => panic!("expected tui"),
        }
    }

    #[test]
    fn test_cli_parse_grid_json() {
        let cli = Cli::try_parse_from(["radquiz", "grid", "--today", "2024-01-03", "--json"])
            .unwrap();
        match cli.command {
            Some(Commands::Grid {
                source,
                today,
                json,
            }) => {
                assert_eq!(source, SourceArgs::default());
                assert_eq!(today, NaiveDate::from_ymd_opt(2024, 1, 3));
                assert!(json);
            }
            _ => panic!("expected grid"),
        }
    }

    #[test]
    fn test_cli_parse_stats() {
        let cli = Cli::try_parse_from(["radquiz", "stats"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Stats {
                today: None,
                json: false,
                ..
            })
        ));
    }

    #[test]
    fn test_cli_rejects_bad_today() {
        assert!(Cli::try_parse_from(["radquiz", "grid", "--today", "03/01/2024"]).is_err());
    }

    #[test]
    fn test_cli_parse_place() {
        let cli = Cli::try_parse_from([
            "radquiz",
            "place",
            "--anchor",
            "10,10,20,20",
            "--tooltip",
            "100,50",
            "--container",
            "0,0,500,500",
            "--offset",
            "4",
            "--order",
            "top-left,bottom-right",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Place {
                anchor,
                tooltip,
                container,
                offset,
                order,
            }) => {
                assert_eq!(anchor, Rect::new(10.0, 10.0, 20.0, 20.0));
                assert_eq!(tooltip, Rect::sized(100.0, 50.0));
                assert_eq!(container, Some(Rect::new(0.0, 0.0, 500.0, 500.0)));
                assert_eq!(offset, Some(4.0));
                assert_eq!(order, vec![Placement::TopLeft, Placement::BottomRight]);
            }
            _ => panic!("expected place"),
        }
    }

    #[test]
    fn test_cli_place_requires_anchor() {
        assert!(Cli::try_parse_from(["radquiz", "place", "--tooltip", "1,1"]).is_err());
    }

    // ========== value parsers ==========

    #[test]
    fn test_parse_rect() {
        assert_eq!(
            parse_rect(" 1.5, -2 ,3,4").unwrap(),
            Rect::new(1.5, -2.0, 3.0, 4.0)
        );
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("1,2,3,x").is_err());
        assert!(parse_rect("1,2,3,inf").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100,50").unwrap(), Rect::sized(100.0, 50.0));
        assert!(parse_size("100").is_err());
    }

    // ========== source resolution ==========

    #[test]
    fn test_resolve_source_prefers_input() {
        let args = SourceArgs {
            input: Some(PathBuf::from("export.json")),
            days: None,
        };
        let config = Config::default().with_api_url_override(Some("http://x".into()));
        let (source, cache) = resolve_source(&args, &config, || {
            panic!("file sources are not cached")
        })
        .unwrap();
        assert_eq!(source.name(), "file");
        assert!(cache.is_none());
    }

    #[test]
    fn test_resolve_source_uses_backend() {
        let temp_dir = TempDir::new().unwrap();
        let cache_dir = temp_dir.path().join("cache");
        let config = Config::default().with_api_url_override(Some("http://x".into()));

        let (source, cache) = resolve_source(&SourceArgs::default(), &config, || {
            Ok(ActivityCacheService::with_cache_dir(cache_dir.clone()))
        })
        .unwrap();
        assert_eq!(source.name(), "api");
        assert_eq!(
            cache.unwrap().cache_path("api"),
            cache_dir.join("api_activity.json")
        );
    }

    #[test]
    fn test_resolve_source_backend_without_cache() {
        let config = Config::default().with_api_url_override(Some("http://x".into()));
        let (source, cache) = resolve_source(&SourceArgs::default(), &config, || {
            Err(RadquizError::Cache("Cannot determine home directory".into()))
        })
        .unwrap();
        assert_eq!(source.name(), "api");
        assert!(cache.is_none());
    }

    #[test]
    fn test_resolve_source_without_any_source() {
        let Err(err) = resolve_source(&SourceArgs::default(), &Config::default(), || {
            panic!("no backend to cache")
        }) else {
            panic!("expected a config error");
        };
        assert!(err.to_string().contains("no activity source"));
    }

    // ========== clear-cache ==========

    #[test]
    fn test_cli_parse_clear_cache() {
        let cli = Cli::try_parse_from(["radquiz", "clear-cache"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::ClearCache)));
    }

    #[test]
    fn test_clear_cache_removes_backend_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ActivityCacheService::with_cache_dir(temp_dir.path().to_path_buf());
        let day = ActivityDay::new(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), 4);
        cache.save(HttpActivitySource::NAME, &[day]).unwrap();

        assert!(clear_cache(&cache).unwrap());
        assert!(!cache.cache_path(HttpActivitySource::NAME).exists());
        // Second run finds nothing
        assert!(!clear_cache(&cache).unwrap());
    }

    #[test]
    fn test_window_uses_config_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let config = Config {
            window_days: 7,
            ..Config::default()
        };
        assert_eq!(window_for(&SourceArgs::default(), &config, today).num_days(), 7);

        let args = SourceArgs {
            input: None,
            days: Some(30),
        };
        assert_eq!(window_for(&args, &config, today).num_days(), 30);
    }
}
