use crate::reports;
use keystats::client::{ApiClient, FetchState};
use keystats::error::StatsResult;

pub async fn corpora(client: &ApiClient) -> StatsResult<()> {
    let state = FetchState::from_result("corpora", client.corpora().await);
    reports::print_corpora(&state);
    Ok(())
}

pub async fn keyboards(client: &ApiClient) -> StatsResult<()> {
    let state = FetchState::from_result("keyboards", client.keyboards().await);
    reports::print_keyboards(&state);
    Ok(())
}

pub async fn layouts(client: &ApiClient) -> StatsResult<()> {
    // Previews are optional decoration; the layout list stands on its own.
    let (layouts, previews) = tokio::join!(client.layouts(), client.layout_previews());
    let layouts = FetchState::from_result("layouts", layouts);
    let previews = FetchState::from_result("layout previews", previews);
    reports::print_layouts(&layouts, previews.items());
    Ok(())
}
