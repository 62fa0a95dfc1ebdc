use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement};
use yew::prelude::*;

use spinboard_core::{
    GameConfig, Payout, Presenter, ReelSpinner, ReelsConfig, ScoreboardView, SeededCategoryPicker,
    Session, StartOutcome, Symbol,
};

const SERVER_SEED: &str = "browser-demo-server-seed";

/// Everything the page renders; the presenter keeps it current.
#[derive(Debug, Clone, PartialEq, Default)]
struct View {
    bet: u64,
    board: Option<ScoreboardView>,
    start_enabled: bool,
    bet_enabled: bool,
    victory: Option<Payout>,
    notice: Option<String>,
}

#[derive(Default)]
struct ViewPresenter {
    view: View,
}

impl Presenter for ViewPresenter {
    fn set_start_enabled(&mut self, enabled: bool) {
        self.view.start_enabled = enabled;
    }

    fn set_bet_enabled(&mut self, enabled: bool) {
        self.view.bet_enabled = enabled;
    }

    fn show_bet(&mut self, bet: u64) {
        self.view.bet = bet;
    }

    fn show_scoreboard(&mut self, view: &ScoreboardView) {
        self.view.board = Some(*view);
    }

    fn show_victory(&mut self, payout: &Payout) {
        self.view.victory = Some(*payout);
    }

    fn notice(&mut self, message: &str) {
        self.view.notice = Some(message.to_string());
    }
}

struct Game {
    config: GameConfig,
    session: Session<ViewPresenter>,
    spinner: ReelSpinner,
    picker: SeededCategoryPicker,
}

impl Game {
    fn new(client_seed: &str) -> Self {
        let config = GameConfig::default();
        let session = Session::new(&config, ViewPresenter::default());
        Self {
            spinner: ReelSpinner::new(SERVER_SEED, client_seed, 0, ReelsConfig::default_3x3()),
            picker: SeededCategoryPicker::new(SERVER_SEED, client_seed, config.category_weights),
            config,
            session,
        }
    }

    /// New client seed restarts the nonce sequence; the balance carries over.
    fn reseed(&mut self, client_seed: &str) {
        self.spinner = ReelSpinner::new(SERVER_SEED, client_seed, 0, ReelsConfig::default_3x3());
        self.picker =
            SeededCategoryPicker::new(SERVER_SEED, client_seed, self.config.category_weights);
    }

    /// Reels stop immediately; the canvas shows the result on the next render.
    fn spin(&mut self) -> Option<Vec<Vec<Symbol>>> {
        self.session.presenter_mut().view.notice = None;
        match self.session.start() {
            StartOutcome::Started { .. } => {
                let outcome = self.spinner.spin_now();
                self.session.settle(&outcome, &mut self.picker);
                Some(outcome.reel_window)
            }
            _ => None,
        }
    }

    fn view(&self) -> View {
        self.session.presenter().view.clone()
    }
}

#[function_component(App)]
fn app() -> Html {
    let client_seed = use_state(|| "demo-seed".to_string());
    let game = use_mut_ref(|| Game::new("demo-seed"));
    let view = use_state(|| game.borrow().view());
    let window = use_state(Vec::<Vec<Symbol>>::new);

    let bet_action = |action: fn(&mut Session<ViewPresenter>) -> u64| {
        let game = game.clone();
        let view = view.clone();
        Callback::from(move |_: MouseEvent| {
            let mut g = game.borrow_mut();
            action(&mut g.session);
            view.set(g.view());
        })
    };

    let do_spin = {
        let game = game.clone();
        let view = view.clone();
        let window = window.clone();
        Callback::from(move |_: MouseEvent| {
            let mut g = game.borrow_mut();
            if let Some(stopped) = g.spin() {
                window.set(stopped);
            }
            view.set(g.view());
        })
    };

    let dismiss_victory = {
        let game = game.clone();
        let view = view.clone();
        Callback::from(move |_: MouseEvent| {
            let mut g = game.borrow_mut();
            g.session.presenter_mut().view.victory = None;
            view.set(g.view());
        })
    };

    let on_seed = {
        let client_seed = client_seed.clone();
        let game = game.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            game.borrow_mut().reseed(&input.value());
            client_seed.set(input.value());
        })
    };

    let v = (*view).clone();
    let locked = v.board.map_or(false, |b| b.out_of_money);

    html! {
        <div>
            <h1>{"Spinboard"}</h1>
            <label>{"Client seed "}<input value={(*client_seed).clone()} onchange={on_seed} /></label>
            <Canvas window={(*window).clone()} />
            <div class="bet-panel">
                <span>{format!("Bet: ${}", v.bet)}</span>
                <button onclick={bet_action(Session::decrease_bet)} disabled={!v.bet_enabled}>{"-"}</button>
                <button onclick={bet_action(Session::increase_bet)} disabled={!v.bet_enabled}>{"+"}</button>
                <button onclick={bet_action(Session::min_bet)} disabled={!v.bet_enabled}>{"Min"}</button>
                <button onclick={bet_action(Session::max_bet)} disabled={!v.bet_enabled}>{"Max"}</button>
            </div>
            <button onclick={do_spin} disabled={!v.start_enabled}>{"Spin"}</button>
            if let Some(board) = v.board {
                <pre class="scoreboard">{board.to_string()}</pre>
            }
            if let Some(notice) = v.notice.clone() {
                <p class="notice">{notice}</p>
            }
            if locked {
                <p class="notice">{"Out of money."}</p>
            }
            if let Some(payout) = v.victory {
                <div class="victory" onclick={dismiss_victory}>
                    <h2>{"YOU WIN!"}</h2>
                    <p>{format!("{} +${}", payout.category, payout.total())}</p>
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct CanvasProps {
    window: Vec<Vec<Symbol>>,
}

fn symbol_color(symbol: Symbol) -> &'static str {
    match symbol {
        Symbol::Cherry => "#e74c3c",
        Symbol::Lemon => "#f1c40f",
        Symbol::Bell => "#3498db",
        Symbol::Seven => "#2ecc71",
        Symbol::Wild => "#9b59b6",
    }
}

#[function_component(Canvas)]
fn canvas(props: &CanvasProps) -> Html {
    let node_ref = use_node_ref();
    {
        let node_ref = node_ref.clone();
        use_effect_with(props.window.clone(), move |window| {
            let Some(canvas) = node_ref.cast::<HtmlCanvasElement>() else {
                return;
            };
            let Some(ctx) = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            else {
                return;
            };
            ctx.set_fill_style(&JsValue::from_str("#111"));
            ctx.fill_rect(0.0, 0.0, 300.0, 150.0);
            for (row_idx, row) in window.iter().enumerate() {
                for (col_idx, sym) in row.iter().enumerate() {
                    let x = (col_idx as f64) * 90.0 + 10.0;
                    let y = (row_idx as f64) * 40.0 + 20.0;
                    ctx.set_fill_style(&JsValue::from_str(symbol_color(*sym)));
                    ctx.fill_rect(x, y, 80.0, 30.0);
                }
            }
        });
    }

    html! { <canvas ref={node_ref} width="300" height="150"></canvas> }
}

#[wasm_bindgen(start)]
pub fn run() {
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presenter_tracks_a_round() {
        let mut game = Game::new("seed");
        assert_eq!(game.view().bet, 5);
        assert!(game.view().start_enabled);
        let window = game.spin().expect("spin starts with a full balance");
        assert_eq!(window.len(), 3);
        let v = game.view();
        assert!(v.start_enabled);
        assert_eq!(v.victory.is_some(), game.session.scoreboard().streak() == 1);
    }

    #[test]
    fn presenter_records_insufficient_funds() {
        let mut game = Game::new("seed");
        game.session = Session::new(
            &GameConfig {
                starting_money: 2,
                ..GameConfig::default()
            },
            ViewPresenter::default(),
        );
        assert!(game.spin().is_none());
        assert!(game.view().notice.is_some());
    }
}
