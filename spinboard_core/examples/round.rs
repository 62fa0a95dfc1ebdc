use spinboard_core::{GameConfig, ReelSpinner, RoundReport, SeededCategoryPicker, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A few rounds end to end with the headless presenter
    let server_seed = "example-server-seed";
    let client_seed = "example-client-seed";
    let config = GameConfig::default();
    let mut spinner = ReelSpinner::new(server_seed, client_seed, 0, Default::default());
    let mut picker = SeededCategoryPicker::new(server_seed, client_seed, config.category_weights);
    let mut session = Session::headless(&config);
    session.increase_bet();

    println!("server_seed_hash={}", spinner.server_seed_hash_hex());
    for _ in 0..5 {
        match session.play_round(&mut spinner, &mut picker).await {
            RoundReport::Played { bet, outcome, round } => println!(
                "nonce={} bet={} won={} payout={:?} window={:?}",
                spinner.nonce(),
                bet,
                outcome.won,
                round.payout,
                outcome.reel_window
            ),
            RoundReport::Skipped(reason) => {
                println!("skipped: {reason:?}");
                break;
            }
        }
    }
    println!("{}", session.scoreboard().snapshot());
}
