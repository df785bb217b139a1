//! River Swimmer entry point
//!
//! Native builds run a headless, seeded session against a bundled token feed
//! and print the resulting leaderboard. The browser build is driven through
//! `river_swimmer::wasm` instead.
//!
//! Usage: `river-swimmer [SEED] [--raft | --predict] [--config <PATH>]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::sync::Arc;

    use clap::Parser;
    use river_swimmer::consts::TICK_RATE_HZ;
    use river_swimmer::leaderboard::Player;
    use river_swimmer::sim::{
        GamePhase, PcgSource, PredictionGame, RaftInput, RaftState, RandomSource, tick_raft,
    };
    use river_swimmer::{GameConfig, GameEngine, Leaderboard, ScoreSubmission, TokenCatalog};

    #[derive(Parser, Debug)]
    #[command(author, version, about)]
    struct Cli {
        /// RNG seed for the session
        #[arg(default_value_t = 42)]
        seed: u64,
        /// Play the raft platformer instead of the river
        #[arg(long, conflicts_with = "predict")]
        raft: bool,
        /// Play price-prediction rounds instead of the river
        #[arg(long)]
        predict: bool,
        /// JSON game config; defaults apply when missing or invalid
        #[arg(long, env = "RIVER_SWIMMER_CONFIG")]
        config: Option<PathBuf>,
    }

    const SESSION_SECONDS: u32 = 60;
    const RAFT_MAX_TICKS: u32 = 60 * 60 * 10;
    const PREDICT_ROUNDS: u32 = 5;

    /// Stand-in for the trending-token endpoint
    const BUNDLED_FEED: &str = r#"[
        {"id": 101, "name": "Flood Coin", "symbol": "FLUD", "img_url": "", "username": "floodie",
         "marketData": {"price": 0.0021, "marketCap": 210000, "priceChange1h": 0.4, "priceChange24h": 8.1, "volume24h": 12000}},
        {"id": 102, "name": "Shiba Swim", "symbol": "SWIM", "img_url": "", "username": "paddler",
         "marketData": {"price": 0.013, "marketCap": 88000, "priceChange1h": -1.2, "priceChange24h": 2.5, "volume24h": 4300}},
        {"id": 103, "name": "River Raft", "symbol": "RAFT", "img_url": "", "username": "rafter",
         "marketData": {"price": 0.4, "marketCap": 51000, "priceChange1h": 0.0, "priceChange24h": -4.0, "volume24h": 900}},
        {"id": 104, "name": "Wet Dog", "symbol": "WET", "img_url": "", "username": "drip",
         "marketData": {"price": 0.0007, "marketCap": 19000, "priceChange1h": 3.3, "priceChange24h": 40.2, "volume24h": 15000}}
    ]"#;

    pub fn run() {
        env_logger::init();
        let cli = Cli::parse();
        let seed = cli.seed;
        let config = GameConfig::load_or_default(cli.config.as_deref());

        let catalog = match TokenCatalog::from_trending_json(BUNDLED_FEED, config.catalog_limit) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Bundled feed unusable: {e}");
                std::process::exit(1);
            }
        };

        log::info!("River Swimmer (native) starting, seed {seed}");
        let submission = if cli.raft {
            play_raft(catalog, seed)
        } else if cli.predict {
            play_predict(catalog, seed)
        } else {
            match play_river(config, catalog, seed) {
                Some(s) => s,
                None => std::process::exit(1),
            }
        };

        let mut board = Leaderboard::new();
        let player = Player {
            id: 1,
            display_name: "headless".to_string(),
            avatar: None,
        };
        if let Err(e) = board.submit(&player, submission, 0.0) {
            log::error!("Submission rejected: {e}");
        }
        println!("{}", board.to_json());
    }

    /// Scripted player: hold for 1.5 s, let go for 0.5 s
    fn play_river(config: GameConfig, catalog: TokenCatalog, seed: u64) -> Option<ScoreSubmission> {
        let mut engine = GameEngine::with_seed(config, seed);
        if let Err(e) = engine.splash_complete() {
            log::error!("{e}");
            return None;
        }
        if let Err(e) = engine.catalog_loaded(Ok(catalog), 0.0) {
            log::error!("{e}");
            return None;
        }

        let frames = SESSION_SECONDS * TICK_RATE_HZ;
        for frame in 1..=frames {
            let now_ms = frame as f64 * river_swimmer::tick_ms();
            match frame % 120 {
                0 => engine.action_pressed(),
                90 => engine.action_released(),
                _ => {}
            }

            if engine.phase() == GamePhase::BurnRequired && engine.snapshot().burn.is_none() {
                if engine.can_skip() {
                    if let Err(e) = engine.skip_burn() {
                        log::warn!("Skip refused: {e}");
                    }
                }
                if let Err(e) = engine.burn(now_ms) {
                    log::warn!("Burn refused: {e}");
                }
            }

            if !engine.frame(now_ms) {
                break;
            }
        }

        let snap = engine.snapshot();
        log::info!(
            "Session over: {} ticks, {} floods pending, multiplier {:.1}",
            snap.time_ticks,
            snap.flood_count,
            snap.multiplier
        );
        match engine.end_run() {
            Ok(submission) => Some(submission),
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    /// Scripted raft run: keep moving right, jump every second
    fn play_raft(catalog: TokenCatalog, seed: u64) -> ScoreSubmission {
        let mut rng = PcgSource::new(seed);
        let mut state = RaftState::new(Arc::new(catalog), &mut rng);
        for t in 0..RAFT_MAX_TICKS {
            let input = RaftInput {
                direction: 1,
                jump: t % TICK_RATE_HZ == 0,
            };
            state = tick_raft(&state, &input, &mut rng);
            if let Some(submission) = state.submission() {
                return submission;
            }
        }
        log::info!("Raft run still going after {RAFT_MAX_TICKS} ticks, stopping");
        ScoreSubmission {
            score: state.score,
            reward_earned: state.reward,
        }
    }

    /// Scripted predictor: a random pick each round, checked every frame
    fn play_predict(catalog: TokenCatalog, seed: u64) -> ScoreSubmission {
        let mut rng = PcgSource::new(seed);
        let mut game = PredictionGame::new(Arc::new(catalog));
        let mut now_ms = 0.0;
        for _ in 0..PREDICT_ROUNDS {
            let Some(token) = game.catalog.pick(rng.next_f32()) else {
                break;
            };
            if let Err(e) = game.select(token.id, now_ms) {
                log::warn!("Pick refused: {e}");
                break;
            }
            while game.update(now_ms).is_none() {
                now_ms += river_swimmer::tick_ms();
            }
            if let Err(e) = game.play_again() {
                log::warn!("{e}");
                break;
            }
        }
        log::info!("Prediction session over after {} rounds", game.rounds);
        game.submission()
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is river_swimmer::wasm::start
}
