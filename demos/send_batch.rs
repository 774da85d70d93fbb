use std::io;

use tracing_subscriber::EnvFilter;
use xms::{Auth, BatchCreate, BatchOptions, DeliveryReport, MessageText, Msisdn, XmsClient};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let service_plan_id = required_env("XMS_SERVICE_PLAN_ID")?;
    let token = required_env("XMS_TOKEN")?;
    let recipient = required_env("XMS_RECIPIENT")?;
    let sender = std::env::var("XMS_SENDER").unwrap_or_else(|_| "12345".to_owned());
    let message =
        std::env::var("XMS_MESSAGE").unwrap_or_else(|_| "Hello from the xms demo.".to_owned());

    let client = XmsClient::new(Auth::new(service_plan_id, token)?);
    let batch = BatchCreate::text(
        Msisdn::new(sender)?,
        vec![Msisdn::new(recipient)?],
        MessageText::new(message)?,
        BatchOptions {
            delivery_report: Some(DeliveryReport::Summary),
            ..Default::default()
        },
    )?;

    let result = client.create_batch(&batch).await?;
    println!(
        "batch {} created at {}, recipients: {}",
        result.id.as_str(),
        result.created_at,
        result.recipients.len()
    );

    Ok(())
}
