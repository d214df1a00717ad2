use crate::client::ChatApi;
use crate::error::Error;
use crate::log::LogSink;
use crate::models::ChannelType;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const NAME: &str = "account chat channels";

/// Exercises the full account-channel lifecycle against a live chat service:
/// list, create, rename, read back, list members, then send / edit / list /
/// delete a message, and finally delete the channel.
///
/// Strictly sequential; each step feeds the next (the created channel id, the
/// sent message id). Cancellation is observed once, at entry — a scenario
/// that has started runs to completion. Any failure propagates immediately:
/// there is no retry and no cleanup of resources created before the failing
/// step, so an aborted run can leave an orphaned channel behind.
pub async fn run<C, L>(
    user_id: &str,
    client: &C,
    log: &mut L,
    cancel: &CancellationToken,
) -> Result<(), Error>
where
    C: ChatApi + ?Sized,
    L: LogSink + Send,
{
    if cancel.is_cancelled() {
        debug!(scenario = NAME, "cancelled before start");
        return Ok(());
    }

    // List the account channels this user already has
    let channels = client.account_channels(user_id, 100, None).await?;
    log.append_line(&format!(
        "There are {} account channels for user {}",
        channels.record_count(),
        user_id
    ))?;

    // Create a new channel
    let channel = client
        .create_account_channel(user_id, "INTEGRATION TESTING: new channel", ChannelType::Public)
        .await?;
    log.append_line(&format!(
        "Account channel \"{}\" created (Id={})",
        channel.name, channel.id
    ))?;

    // Rename it
    client
        .update_account_channel(user_id, &channel.id, "INTEGRATION TESTING: updated channel")
        .await?;
    log.append_line(&format!("Account channel \"{}\" updated", channel.id))?;

    // Read it back
    let channel = client.account_channel(user_id, &channel.id).await?;
    log.append_line(&format!("Account channel \"{}\" retrieved", channel.id))?;

    // List its members
    let members = client
        .account_channel_members(user_id, &channel.id, 10, None)
        .await?;
    log.append_line(&format!(
        "Account channel \"{}\" has {} members",
        channel.id,
        members.record_count()
    ))?;

    // Send a message to the channel
    let message_id = client
        .send_message(&channel.id, "This is a test from integration test")
        .await?;
    log.append_line(&format!("Message \"{message_id}\" sent"))?;

    // Edit it
    client
        .update_message(
            &message_id,
            &channel.id,
            "This is an updated message from integration testing",
        )
        .await?;
    log.append_line(&format!("Message \"{message_id}\" updated"))?;

    // List the channel's messages; not every server reports a total, so fall
    // back to the page length when it is absent
    let messages = client.messages(&channel.id, 100, None).await?;
    log.append_line(&format!(
        "There are {} messages in channel \"{}\"",
        messages.record_count(),
        channel.id
    ))?;

    // Delete the message
    client.delete_message(&message_id, &channel.id).await?;
    log.append_line(&format!("Message \"{message_id}\" deleted"))?;

    // Delete the channel
    client.delete_account_channel(user_id, &channel.id).await?;
    log.append_line(&format!("Account channel \"{}\" deleted", channel.id))?;

    Ok(())
}
