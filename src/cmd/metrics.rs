use crate::reports;
use clap::Args;
use keystats::client::ApiClient;
use keystats::error::StatsResult;
use keystats::models::{Id, MetricField, MetricGroup};
use keystats::pipeline::{filter_metrics, metric_ranges, sort_metrics, MetricFilter, SortOrder};
use strum::IntoEnumIterator;
use tracing::info;

/// Columns shown when no group is requested.
pub const SUMMARY_FIELDS: [MetricField; 9] = [
    MetricField::TotalTravel,
    MetricField::Sfb,
    MetricField::Sfs,
    MetricField::ScissorBigram,
    MetricField::LateralStretchBigram,
    MetricField::Alternate,
    MetricField::RollIn,
    MetricField::RollOut,
    MetricField::Redirect,
];

#[derive(Args, Debug, Clone)]
pub struct MetricsArgs {
    #[arg(long)]
    pub corpus: Option<Id>,
    #[arg(long)]
    pub keyboard: Option<Id>,
    #[arg(long)]
    pub layout: Option<Id>,

    /// Case-insensitive substring of the layout name
    #[arg(long)]
    pub name: Option<String>,

    /// Column to sort by, e.g. `sfb` or `total_travel`
    #[arg(long)]
    pub sort: Option<MetricField>,
    /// `asc` or `desc`; records without a value always go last
    #[arg(long, default_value_t = SortOrder::Asc)]
    pub order: SortOrder,

    /// Show every column of one group instead of the summary
    #[arg(long, value_enum)]
    pub group: Option<MetricGroup>,
}

pub async fn run(args: MetricsArgs, client: &ApiClient) -> StatsResult<()> {
    let dataset = client.fetch_dataset().await;
    for msg in dataset.errors() {
        println!("⚠️  {}", msg);
    }

    let metrics = dataset.metrics();
    // Bars are scaled against the whole dataset, not the filtered subset.
    let ranges = metric_ranges(metrics);

    let filter = MetricFilter {
        corpus: args.corpus,
        keyboard: args.keyboard,
        layout: args.layout,
        name_contains: args.name.clone(),
    };
    let mut rows = filter_metrics(metrics, &filter);
    info!("🔎 {} of {} records match", rows.len(), metrics.len());

    if let Some(field) = args.sort {
        info!("↕️  Sorting by {} ({})", field, args.order);
        sort_metrics(&mut rows, field, args.order);
    }

    let fields: Vec<MetricField> = match args.group {
        Some(group) => MetricField::iter().filter(|f| f.group() == group).collect(),
        None => SUMMARY_FIELDS.to_vec(),
    };

    if dataset.metrics.error().is_none() {
        reports::print_metrics(&rows, &fields, &ranges);
    }
    Ok(())
}
