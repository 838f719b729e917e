use std::io;

use tracing_subscriber::EnvFilter;
use yalo::{
    AccountId, BearerToken, BotId, CancellationToken, NotificationOption, NotificationResult,
    NotificationType, Params, RawPhoneNumber, RequestContext, YaloClient,
};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(phone_raw), Some(params_raw)) = (args.next(), args.next()) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "usage: send_notification <phone_number> <json_params> [priority]",
        )
        .into());
    };
    let priority = args.next();

    let debug = env_flag("YALO_DEBUG");
    let default_filter = if debug { "yalo=debug" } else { "yalo=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let account_id = AccountId::new(required_env("YALO_ACCOUNT_ID")?)?;
    let bot_id = BotId::new(required_env("YALO_BOT_ID")?)?;
    let token = BearerToken::new(required_env("YALO_TOKEN")?)?;
    let notification_type = NotificationType::new(required_env("YALO_NOTIFICATION_TYPE")?)?;
    let base_url =
        std::env::var("YALO_BASE_URL").unwrap_or_else(|_| yalo::DEFAULT_BASE_URL.to_owned());

    let client = YaloClient::builder()
        .base_url(base_url)
        .account(account_id, bot_id)
        .token(token)
        .debug(debug)
        .build()?;

    let params: Params = serde_json::from_str(&params_raw)?;
    let mut options = Vec::new();
    if let Some(priority) = priority.as_deref() {
        options.push(NotificationOption::priority(priority)?);
    }

    println!("phone: {phone_raw}");
    println!("params: {params_raw}");
    println!("priority: {}", priority.as_deref().unwrap_or("1"));

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let result = client
        .send_notification(
            &RequestContext::with_cancellation(cancel),
            notification_type,
            RawPhoneNumber::new(phone_raw)?,
            params,
            &options,
        )
        .await?;

    match result {
        NotificationResult::Success { id, message_ids } => {
            println!("sent: id={id}, message_ids={message_ids:?}");
        }
        NotificationResult::Failure { reason } => {
            println!("rejected: {} ({})", reason.description, reason.error_code);
            for detail in &reason.details {
                println!(
                    "  {} {} {}: {}",
                    detail.phone, detail.kind, detail.parameter, detail.description
                );
            }
        }
    }

    Ok(())
}
