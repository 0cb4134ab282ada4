//! Log file access for managed bots
//!
//! Tail reads, file downloads, and the realtime watch registry. A watch is
//! an explicit subscription backed by a cancellable tokio task: stopping it
//! deregisters and aborts the task, so no timer outlives its subscription.

use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::services::gateway::{MessagingGateway, TextFormat};
use crate::utils::errors::Result;

/// Telegram messages cap out at 4096 characters; keep headroom for the
/// surrounding text.
const MAX_CHUNK: usize = 4000;

/// Escape log content for HTML `<code>` rendering
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[derive(Debug, Clone)]
pub struct LogService {
    logs_dir: PathBuf,
}

impl LogService {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self { logs_dir: logs_dir.into() }
    }

    /// Resolve a stored log path; relative paths live under the logs dir.
    pub fn resolve(&self, log_path: &str) -> PathBuf {
        let path = Path::new(log_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.logs_dir.join(path)
        }
    }

    /// Last `n` lines of the file, trimmed from the front to the Telegram
    /// message limit. `None` when the file is missing or empty.
    pub async fn tail(&self, log_path: &str, n: usize) -> Result<Option<String>> {
        let path = self.resolve(log_path);
        if !path.exists() {
            warn!(path = %path.display(), "Log file not found");
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(n);
        let mut tail = lines[start..].join("\n");
        if tail.is_empty() {
            return Ok(None);
        }

        if tail.len() > MAX_CHUNK {
            let mut cut = tail.len() - MAX_CHUNK;
            while !tail.is_char_boundary(cut) {
                cut += 1;
            }
            tail = tail[cut..].to_string();
        }

        Ok(Some(tail))
    }
}

struct WatchEntry {
    bot_name: String,
    handle: JoinHandle<()>,
}

/// Registry of active realtime log watches, one per chat.
pub struct LogWatchRegistry {
    watches: Arc<Mutex<HashMap<i64, WatchEntry>>>,
    interval: Duration,
}

impl LogWatchRegistry {
    pub fn new(interval: Duration) -> Self {
        Self {
            watches: Arc::new(Mutex::new(HashMap::new())),
            interval,
        }
    }

    /// Start watching a bot's log for a chat. A chat holds at most one
    /// watch; subscribing again replaces (and aborts) the previous one.
    /// Forwarding starts from the current end of the file.
    pub async fn subscribe(
        &self,
        chat_id: i64,
        bot_name: &str,
        path: PathBuf,
        gateway: Arc<dyn MessagingGateway>,
    ) -> Result<()> {
        let mut offset = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(e) => return Err(e.into()),
        };

        let mut watches = self.watches.lock().await;
        if let Some(previous) = watches.remove(&chat_id) {
            previous.handle.abort();
            debug!(chat_id = chat_id, bot = %previous.bot_name, "Replaced existing log watch");
        }

        let interval = self.interval;
        let bot = bot_name.to_string();
        let watch_map = Arc::clone(&self.watches);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so the watch only
            // reports content written after subscription.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match read_from_offset(&path, offset).await {
                    Ok((new_content, new_offset)) => {
                        offset = new_offset;
                        if new_content.is_empty() {
                            continue;
                        }
                        let text = format!(
                            "🔄 New log entries for {}:\n<code>{}</code>",
                            bot,
                            html_escape(&new_content)
                        );
                        if let Err(e) = gateway
                            .send_message(chat_id, &text, None, TextFormat::Html)
                            .await
                        {
                            warn!(chat_id = chat_id, error = %e, "Failed to forward log update");
                        }
                    }
                    Err(e) => {
                        error!(chat_id = chat_id, bot = %bot, error = %e, "Log watch read failed, stopping");
                        let text = format!(
                            "❌ Error reading logs for {}. Realtime mode stopped.",
                            bot
                        );
                        let _ = gateway
                            .send_message(chat_id, &text, None, TextFormat::Plain)
                            .await;
                        watch_map.lock().await.remove(&chat_id);
                        return;
                    }
                }
            }
        });

        watches.insert(chat_id, WatchEntry { bot_name: bot_name.to_string(), handle });
        info!(chat_id = chat_id, bot = bot_name, "Log watch started");
        Ok(())
    }

    /// Stop the chat's watch. Returns the watched bot's name, or `None`
    /// when nothing was being watched.
    pub async fn unsubscribe(&self, chat_id: i64) -> Option<String> {
        let entry = self.watches.lock().await.remove(&chat_id)?;
        entry.handle.abort();
        info!(chat_id = chat_id, bot = %entry.bot_name, "Log watch stopped");
        Some(entry.bot_name)
    }

    /// The bot currently watched by this chat, if any.
    pub async fn watching(&self, chat_id: i64) -> Option<String> {
        self.watches
            .lock()
            .await
            .get(&chat_id)
            .map(|entry| entry.bot_name.clone())
    }
}

async fn read_from_offset(path: &Path, offset: u64) -> std::io::Result<(String, u64)> {
    let mut file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    // Truncated or rotated file: start over from the beginning.
    let offset = if len < offset { 0 } else { offset };
    file.seek(SeekFrom::Start(offset)).await?;
    let mut content = String::new();
    file.read_to_string(&mut content).await?;
    let new_offset = offset + content.len() as u64;
    Ok((content, new_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn escapes_html_markup() {
        assert_eq!(html_escape("<a & b>"), "&lt;a &amp; b&gt;");
    }

    #[tokio::test]
    async fn tail_returns_last_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.log");
        let mut file = std::fs::File::create(&path).unwrap();
        for i in 0..10 {
            writeln!(file, "line {}", i).unwrap();
        }

        let service = LogService::new(dir.path());
        let tail = service.tail("alpha.log", 3).await.unwrap().unwrap();
        assert_eq!(tail, "line 7\nline 8\nline 9");
    }

    #[tokio::test]
    async fn tail_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let service = LogService::new(dir.path());
        assert!(service.tail("ghost.log", 20).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tail_respects_message_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.log");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", "x".repeat(10_000)).unwrap();

        let service = LogService::new(dir.path());
        let tail = service.tail("big.log", 5).await.unwrap().unwrap();
        assert!(tail.len() <= 4000);
    }
}
