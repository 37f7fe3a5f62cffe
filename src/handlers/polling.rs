use std::sync::Arc;
use std::time::Duration;

use crate::services::messaging::telegram::TelegramClient;
use crate::state::AppState;

use super::updates::handle_update;

const POLL_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-polls Telegram until the process stops; each update runs on its own task.
pub async fn run_polling(state: Arc<AppState>, client: Arc<TelegramClient>) {
    let mut offset = 0;
    tracing::info!("polling for updates");

    loop {
        match client.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        handle_update(&state, update).await;
                    });
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch updates, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}
