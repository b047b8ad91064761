pub mod models;
pub use models::*;

use anyhow::{Error, Result};
use tokio_rusqlite::Connection;
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushMessageBuilder,
};

/// Every push subscription registered through the dashboard client.
async fn subscribed_clients(db: &Connection) -> Result<Vec<PushSubscription>, Error> {
    let subscriptions = db
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT endpoint, p256dh, auth FROM push_subscription")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(PushSubscription {
                        endpoint: row.get(0)?,
                        p256dh: row.get(1)?,
                        auth: row.get(2)?,
                    })
                })?
                .filter_map(Result::ok)
                .collect::<Vec<PushSubscription>>();
            Ok(rows)
        })
        .await?;
    Ok(subscriptions)
}

pub async fn send_push_notification(
    vapid_private_pem_path: String,
    endpoint: String,
    p256dh: String,
    auth: String,
    payload: PushNotificationPayload,
) -> Result<(), Error> {
    // Create subscription info
    let subscription_info = SubscriptionInfo::new(endpoint, p256dh, auth);

    // Read the VAPID signing material from the PEM file
    let file = std::fs::File::open(vapid_private_pem_path)?;
    let sig_builder = VapidSignatureBuilder::from_pem(file, &subscription_info)?.build()?;

    // Create the message with payload
    let mut builder = WebPushMessageBuilder::new(&subscription_info);
    let content = serde_json::to_string(&payload)?;
    builder.set_payload(ContentEncoding::Aes128Gcm, content.as_bytes());
    builder.set_vapid_signature(sig_builder);
    let message = builder.build()?;

    // Send the notification
    let client = HyperWebPushClient::new();
    let result = client.send(message).await;

    if let Err(error) = result {
        tracing::error!("Failed to send push notification: {:?}", error);
    }

    Ok(())
}

pub async fn broadcast_push_notification(
    subscriptions: Vec<PushSubscription>,
    vapid_key_path: String,
    payload: PushNotificationPayload,
) {
    let mut tasks = tokio::task::JoinSet::new();
    for sub in subscriptions {
        let vapid = vapid_key_path.clone();
        tasks.spawn(send_push_notification(
            vapid,
            sub.endpoint,
            sub.p256dh,
            sub.auth,
            payload.clone(),
        ));
    }
    while let Some(_res) = tasks.join_next().await {}
}

/// Best effort broadcast telling every subscribed dashboard client
/// that a webhook received a new payload.
pub async fn notify_new_payload(db: Connection, vapid_key_path: String, webhook_id: String) {
    let subscriptions = match subscribed_clients(&db).await {
        Ok(subscriptions) => subscriptions,
        Err(err) => {
            tracing::error!("Failed to load push subscriptions: {}", err);
            return;
        }
    };
    if subscriptions.is_empty() {
        return;
    }

    let payload = PushNotificationPayload::new(
        "New payload received",
        &format!("Webhook {} received a new payload", webhook_id),
        Some(&format!("/data/{}", webhook_id)),
        Some("new-payload"),
    );
    broadcast_push_notification(subscriptions, vapid_key_path, payload).await;
}
