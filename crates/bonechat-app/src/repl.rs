//! Line-oriented terminal chat.
//!
//! Reads commands from any async reader and prints each appended transcript
//! entry with a role prefix. Used by `bonechat chat` over stdin/stdout.

use std::path::PathBuf;

use bonechat_chat::ChatOrchestrator;
use bonechat_core::types::ChatEntry;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Image(PathBuf),
    Restart,
    Quit,
    Text(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "/quit" | "/exit" => Command::Quit,
            "/restart" => Command::Restart,
            _ => match trimmed.strip_prefix("/image") {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                    Command::Image(PathBuf::from(rest.trim()))
                }
                _ => Command::Text(line.to_string()),
            },
        }
    }
}

fn render(entry: &ChatEntry) -> String {
    format!("[{}] {}\n", entry.role, entry.content)
}

async fn print_entries<W>(out: &mut W, entries: &[ChatEntry]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for entry in entries {
        out.write_all(render(entry).as_bytes()).await?;
    }
    out.flush().await
}

/// Run the chat loop until `/quit` or end of input.
pub async fn run<R, W>(orchestrator: &ChatOrchestrator, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Restart => {
                orchestrator.restart();
                out.write_all(b"-- conversation restarted --\n").await?;
            }
            Command::Image(path) => {
                // An unreadable path is submitted as an empty payload so the
                // orchestrator reports it as "no image selected".
                let bytes = if path.as_os_str().is_empty() {
                    Vec::new()
                } else {
                    match tokio::fs::read(&path).await {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "Failed to read image");
                            Vec::new()
                        }
                    }
                };
                match orchestrator.submit_image(&bytes).await {
                    Ok(entries) => print_entries(out, &entries).await?,
                    Err(e) => out.write_all(format!("error: {}\n", e).as_bytes()).await?,
                }
            }
            Command::Text(text) => {
                let entries = orchestrator.submit_text(&text).await;
                print_entries(out, &entries).await?;
            }
        }
        out.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bonechat_core::config::ChatConfig;
    use bonechat_dialogue::MockDialogueService;
    use bonechat_predictor::MockImageAnalyzer;

    fn make_orchestrator(dialogue: Arc<MockDialogueService>) -> ChatOrchestrator {
        ChatOrchestrator::new(
            Arc::new(MockImageAnalyzer::with_result("fractured", "Wrist")),
            dialogue,
            &ChatConfig::default(),
        )
    }

    async fn run_script(orch: &ChatOrchestrator, script: &str) -> String {
        let mut out = Vec::new();
        run(orch, tokio::io::BufReader::new(script.as_bytes()), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("  /restart "), Command::Restart);
        assert_eq!(
            Command::parse("/image scans/arm.png"),
            Command::Image(PathBuf::from("scans/arm.png"))
        );
        assert_eq!(Command::parse("/image"), Command::Image(PathBuf::new()));
        assert_eq!(Command::parse("/images"), Command::Text("/images".to_string()));
        assert_eq!(Command::parse(" Yes "), Command::Text(" Yes ".to_string()));
    }

    #[tokio::test]
    async fn test_text_is_echoed_with_role_prefix() {
        let orch = make_orchestrator(Arc::new(MockDialogueService::echo()));
        let out = run_script(&orch, "Hello\n").await;
        assert_eq!(out, "[user] hello\n[system] Echo: hello\n");
    }

    #[tokio::test]
    async fn test_image_then_yes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrist.png");
        std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let dialogue = Arc::new(MockDialogueService::echo());
        let orch = make_orchestrator(dialogue.clone());
        let out = run_script(&orch, &format!("/image {}\nyes\n", path.display())).await;

        assert!(out.contains("[user] Analyzing the X-ray image...\n"));
        assert!(out.contains("[system] Body part affected: Wrist\n"));
        assert_eq!(
            dialogue.prompts(),
            vec!["tell me more about the fracture in my Wrist"]
        );
    }

    #[tokio::test]
    async fn test_missing_image_reports_error() {
        let orch = make_orchestrator(Arc::new(MockDialogueService::echo()));
        let out = run_script(&orch, "/image /nonexistent/scan.png\n").await;
        assert_eq!(out, "error: no image selected\n");
        assert!(orch.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let dialogue = Arc::new(MockDialogueService::echo());
        let orch = make_orchestrator(dialogue.clone());
        run_script(&orch, "/quit\nhello\n").await;
        assert_eq!(dialogue.call_count(), 0);
    }

    #[tokio::test]
    async fn test_restart_clears_transcript() {
        let orch = make_orchestrator(Arc::new(MockDialogueService::echo()));
        let out = run_script(&orch, "hello\n/restart\n").await;
        assert!(out.ends_with("-- conversation restarted --\n"));
        assert!(orch.transcript().is_empty());
    }
}
