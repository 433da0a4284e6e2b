use dotenv::dotenv;
use hopbot::infra::TracingObserver;
use hopbot::ui::draw_frame;
use hopbot::{Episode, EpisodeConfig, EpisodeStatus, Level, PlannerConfig};
use std::env;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const GENERATED_ROWS: usize = 14;
const GENERATED_COLS: usize = 160;

fn get_env_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hopbot=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn load_level() -> Result<Level, Box<dyn std::error::Error>> {
    if let Ok(path) = env::var("HOPBOT_LEVEL") {
        tracing::info!("Loading level from {}", path);
        let text = std::fs::read_to_string(&path)?;
        let open_floor = get_env_var::<bool>("HOPBOT_OPEN_FLOOR").unwrap_or(true);
        return Ok(Level::parse(&text)?.with_open_floor(open_floor));
    }

    let seed = get_env_var::<u64>("HOPBOT_SEED").unwrap_or(1);
    tracing::info!("Generating level with seed {}", seed);
    Ok(Level::generate(seed, GENERATED_ROWS, GENERATED_COLS)?)
}

fn episode_config() -> EpisodeConfig {
    let defaults = PlannerConfig::default();
    let planner = PlannerConfig {
        max_expansions: get_env_var("HOPBOT_MAX_EXPANSIONS").unwrap_or(defaults.max_expansions),
        backward_limit: get_env_var("HOPBOT_BACKWARD_LIMIT").unwrap_or(defaults.backward_limit),
        goal_columns: get_env_var("HOPBOT_GOAL_COLUMNS").unwrap_or(defaults.goal_columns),
        ..defaults
    };

    EpisodeConfig {
        frames: get_env_var("HOPBOT_FRAMES").unwrap_or(60),
        planner,
        ..EpisodeConfig::default()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let render = get_env_var::<bool>("HOPBOT_RENDER").unwrap_or(false);
    let trace_planner = get_env_var::<bool>("HOPBOT_TRACE_PLANNER").unwrap_or(false);
    tracing::info!("Rendering enabled: {}", render);

    let level = load_level()?;
    let mut episode = Episode::from_level(level, episode_config())?;
    if trace_planner {
        episode = episode.with_observer(|| Box::new(TracingObserver));
    }

    while let Some(record) = episode.step() {
        tracing::info!(
            "frame: {}, pos: ({}, {}), action: {}, outcome: {:?}{}",
            record.frame,
            record.state.row,
            record.state.col,
            record.action,
            record.outcome,
            if record.survival_jump { " [survival]" } else { "" }
        );

        if render {
            let agent = episode.agent();
            println!(
                "{}",
                draw_frame(episode.terrain(), episode.hazards(), Some(&agent), true)
            );
        }
    }

    let agent = episode.agent();
    match episode.status() {
        EpisodeStatus::Lost => tracing::warn!("Agent lost at column {}", agent.col),
        status => tracing::info!(
            "Episode {:?} after {} frames at column {}, {} hazards left",
            status,
            episode.frame(),
            agent.col,
            episode.hazards().count()
        ),
    }

    Ok(())
}
