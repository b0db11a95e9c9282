// notify — outbound completion notifications.
//
// When a task is marked complete, a message is posted to a Slack-style
// chat.postMessage endpoint. The send runs on a detached tokio task after
// the completion has been committed: a slow or failing endpoint can never
// fault the request, and the task stays complete even if delivery fails.

use crate::config::ServerConfig;
use tracing::{debug, warn};

pub struct Notifier {
    client: reqwest::Client,
    token: Option<String>,
    channel: String,
    api_url: String,
}

impl Notifier {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: config.slack_token.clone(),
            channel: config.slack_channel.clone(),
            api_url: config.slack_api_url.clone(),
        }
    }

    /// Announce a completed task. Fire-and-forget: the response body is
    /// ignored and failures are logged at WARN, never surfaced to the caller.
    pub fn task_completed(&self, title: &str) {
        let Some(token) = self.token.clone() else {
            debug!("no notification token configured — skipping completion notice");
            return;
        };

        let client = self.client.clone();
        let api_url = self.api_url.clone();
        let channel = self.channel.clone();
        let text = format!("Someone just completed the task {title} :clap:");

        tokio::spawn(async move {
            let result = client
                .post(&api_url)
                .bearer_auth(token)
                .form(&[("channel", channel.as_str()), ("text", text.as_str())])
                .send()
                .await;
            match result {
                Ok(resp) if !resp.status().is_success() => {
                    warn!(status = %resp.status(), "completion notification rejected");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(err = %e, "completion notification failed");
                }
            }
        });
    }
}
