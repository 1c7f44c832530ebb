use crate::reports;
use clap::Args;
use keystats::client::{ApiClient, FetchState};
use keystats::error::StatsResult;
use keystats::models::Id;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Metric record id
    #[arg(long)]
    pub id: Id,
}

pub async fn run(args: ShowArgs, client: &ApiClient) -> StatsResult<()> {
    let metric = FetchState::from_result("metric", client.metric(args.id).await);
    let Some(m) = metric.data() else {
        reports::print_placeholder(&metric);
        return Ok(());
    };

    let (keyboard, layout) = tokio::join!(client.keyboard(m.keyboard), client.layout(m.layout));
    let keyboard = FetchState::from_result("keyboard", keyboard);
    let layout = FetchState::from_result("layout", layout);

    reports::print_metric_detail(m, &keyboard, &layout);
    Ok(())
}
