use std::path::PathBuf;

use gabor_eye_core::config::ConfigError;
use gabor_eye_core::{
    angular_equal, CardStatus, DeferredQueue, Feedback, GameConfig, Mode1Session, Mode2Session,
    Session,
};
use tracing_subscriber::EnvFilter;

const ROUNDS: u32 = 3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    println!(
        "Loaded config: target patch={} pairs patch={} seed={}",
        config.target.patch_size, config.pairs.patch_size, config.seed
    );

    let mut scheduler = DeferredQueue::new();

    let mut target = Mode1Session::seeded(config.target.clone(), config.seed);
    target
        .layout()
        .render_target()?
        .to_png(PathBuf::from("out/target_round_1.png"))?;
    for _ in 0..ROUNDS {
        // One wrong guess first, when there is a distractor to pick.
        if let Some(miss) = (0..target.cell_count()).find(|&i| !target.layout().is_target(i)) {
            println!("{}", target.on_select(miss, &mut scheduler));
        }
        let hit = target.layout().target_indices()[0];
        println!("{}", target.on_select(hit, &mut scheduler));
        while let Some(event) = scheduler.pop_next() {
            println!("{}", target.fire(event, &mut scheduler));
        }
    }

    let mut pairs = Mode2Session::seeded(config.pairs.clone(), config.seed ^ 0xABCD_EF01);
    for (index, image) in pairs.layout().render_cells()?.iter().enumerate() {
        image.to_png(PathBuf::from(format!("out/pairs_card_{index:02}.png")))?;
    }
    for _ in 0..ROUNDS {
        while let Some((a, b)) = next_pair(&pairs) {
            pairs.on_select(a, &mut scheduler);
            pairs.on_select(b, &mut scheduler);
            if let Some(event) = scheduler.pop_next() {
                println!("{}", pairs.fire(event, &mut scheduler));
            }
        }
        if let Some(event) = scheduler.pop_next() {
            let feedback = pairs.fire(event, &mut scheduler);
            if feedback != Feedback::Stale {
                println!("{feedback}");
            }
        }
    }

    target.journal().write_jsonl("out/target_journal.jsonl")?;
    pairs.journal().write_jsonl("out/pairs_journal.jsonl")?;

    println!(
        "Demo complete. Score {} after {} rounds; pairs at round {} ({:.1} ms simulated)",
        target.score(),
        target.round() - 1,
        pairs.round(),
        scheduler.now().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn next_pair(session: &Mode2Session) -> Option<(usize, usize)> {
    let cells = &session.layout().cells;
    let hidden: Vec<usize> = (0..cells.len())
        .filter(|&i| session.card_status(i) == Some(CardStatus::Hidden))
        .collect();
    hidden.iter().enumerate().find_map(|(pos, &a)| {
        hidden[pos + 1..]
            .iter()
            .find(|&&b| angular_equal(cells[a], cells[b]))
            .map(|&b| (a, b))
    })
}

fn load_config() -> Result<GameConfig, ConfigError> {
    GameConfig::load_from_file("config/game.toml").or_else(|err| {
        eprintln!("Falling back to default config: {err}");
        Ok(GameConfig::default())
    })
}
