use crate::reports;
use clap::Args;
use keystats::client::ApiClient;
use keystats::error::StatsResult;
use keystats::models::Metric;
use keystats::selection::{CompareState, SelectAction, Selection, SelectionField, Side};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Reference panel as `corpus,keyboard,layout` (parts may be left empty)
    #[arg(long, default_value = "")]
    pub left: Selection,

    /// Panel measured against the reference
    #[arg(long, default_value = "")]
    pub right: Selection,
}

/// Replays a raw pick through the reducer, one dropdown at a time.
fn select(state: CompareState, side: Side, pick: Selection, metrics: &[Metric]) -> CompareState {
    [
        (SelectionField::Corpus, pick.corpus),
        (SelectionField::Keyboard, pick.keyboard),
        (SelectionField::Layout, pick.layout),
    ]
    .into_iter()
    .fold(state, |acc, (field, value)| {
        acc.apply(SelectAction { side, field, value }, metrics)
    })
}

pub async fn run(args: CompareArgs, client: &ApiClient) -> StatsResult<()> {
    let dataset = client.fetch_dataset().await;
    for msg in dataset.errors() {
        println!("⚠️  {}", msg);
    }
    let metrics = dataset.metrics();

    let mut state = CompareState::default();
    for (side, pick) in [(Side::Left, args.left), (Side::Right, args.right)] {
        state = select(state, side, pick, metrics);
        let kept = state.side(side);
        if *kept != pick {
            warn!(
                "⚠️  {} selection {:?} narrowed to {:?}: not available in the loaded metrics",
                side, pick, kept
            );
        }
    }

    for side in [Side::Left, Side::Right] {
        let sel = state.side(side);
        if !sel.is_complete() {
            reports::print_selection_options(side, sel, &dataset);
        }
    }

    match (state.resolved(metrics), state.diff_rows(metrics)) {
        ((Some(reference), Some(current)), Some(rows)) => {
            reports::print_comparison(reference, current, &rows);
            reports::print_hand_balance(&[reference, current]);
        }
        _ => info!("Pick a complete corpus, keyboard and layout on both sides to see the diff."),
    }
    Ok(())
}
