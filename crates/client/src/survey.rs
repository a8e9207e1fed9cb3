//! Chain-wide witness feed survey.

use crate::chain::ChainDataClient;
use crate::errors::Result;
use futures::future::join_all;
use graphene_types::WitnessFeed;

/// Collect the published price feed of every active witness, skipping
/// witnesses that never published (zero quote), sorted ascending by price.
pub async fn witness_feeds(client: &dyn ChainDataClient) -> Result<Vec<WitnessFeed>> {
    let owners = client.get_active_witnesses().await?;
    let witnesses = join_all(owners.iter().map(|owner| client.get_witness(owner))).await;

    let mut feeds = Vec::new();
    for result in witnesses {
        match result {
            Ok(witness) => {
                let price = witness.sbd_exchange_rate.price();
                if price > 0.0 {
                    feeds.push(WitnessFeed {
                        owner: witness.owner,
                        price,
                    });
                }
            }
            Err(err) => tracing::warn!(%err, "skipping witness in feed survey"),
        }
    }

    feeds.sort_by(|a, b| a.price.total_cmp(&b.price));
    Ok(feeds)
}

/// Median of a [`witness_feeds`] survey, which is the value the chain would
/// converge to on the next feed-median update. Expects the ascending order
/// the survey returns.
pub fn estimate_next_median(feeds: &[WitnessFeed]) -> Option<f64> {
    if feeds.is_empty() {
        return None;
    }
    Some(feeds[feeds.len() / 2].price)
}
