mod bars;
mod tables;

pub use self::tables::{
    comparison as print_comparison, corpora as print_corpora, hand_balance as print_hand_balance,
    keyboards as print_keyboards, layouts as print_layouts, metric_detail as print_metric_detail,
    metrics as print_metrics, selection_options as print_selection_options,
};

use keystats::client::FetchState;

/// What a panel shows instead of data that failed to load.
pub fn placeholder<T>(state: &FetchState<T>) -> String {
    match state.error() {
        Some(msg) => format!("❌ {}", msg),
        None => "—".to_string(),
    }
}

pub fn print_placeholder<T>(state: &FetchState<T>) {
    println!("{}", placeholder(state));
}
