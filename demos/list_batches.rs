use std::io;

use futures::TryStreamExt;
use tracing_subscriber::EnvFilter;
use xms::{Auth, BatchFilter, XmsClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let service_plan_id = std::env::var("XMS_SERVICE_PLAN_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "XMS_SERVICE_PLAN_ID environment variable is required",
        )
    })?;
    let token = std::env::var("XMS_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "XMS_TOKEN environment variable is required",
        )
    })?;

    let client = XmsClient::new(Auth::new(service_plan_id, token)?);
    let filter = BatchFilter {
        page_size: Some(20),
        ..Default::default()
    };

    let pages = client.fetch_batches(&filter);
    let mut batches = Box::pin(pages.items());
    while let Some(batch) = batches.try_next().await? {
        println!(
            "{}  from {}  to {} recipient(s)  canceled: {}",
            batch.id.as_str(),
            batch.sender.as_str(),
            batch.recipients.len(),
            batch.canceled
        );
    }

    Ok(())
}
