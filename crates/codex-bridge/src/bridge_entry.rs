use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use codex_bridge_cli::{bridge_config_from_cli, posting_config_from_cli, validate_cli, Cli};
use codex_bridge_github::{parse_comment_event, ThreadRef};
use codex_bridge_runtime::{BridgeRunOutcome, BridgeRuntime, NoOpReason};

/// `None` when no path is configured or the file does not exist. Any other
/// read failure is an error.
fn read_event_payload(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "event payload file does not exist");
            Ok(None)
        }
        Err(error) => Err(error)
            .with_context(|| format!("failed to read event payload {}", path.display())),
    }
}

fn report_outcome(outcome: &BridgeRunOutcome, target: Option<&ThreadRef>) {
    match outcome {
        BridgeRunOutcome::NoOp(reason) => {
            eprintln!("codex-bridge: no reply (reason={})", reason.as_str());
        }
        BridgeRunOutcome::Posted { source, posted } => {
            eprintln!(
                "codex-bridge: replied on {} (source={} comment_id={} url={})",
                target.map(ThreadRef::display_name).unwrap_or_default(),
                source.as_str(),
                posted
                    .comment_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                posted.html_url.as_deref().unwrap_or("none"),
            );
        }
    }
}

pub(crate) async fn run_cli(cli: Cli) -> Result<()> {
    validate_cli(&cli)?;
    let config = bridge_config_from_cli(&cli);
    let posting = posting_config_from_cli(&cli)?;

    let Some(raw) = read_event_payload(cli.event_path.as_deref())? else {
        report_outcome(&BridgeRunOutcome::NoOp(NoOpReason::NoEventPayload), None);
        return Ok(());
    };
    let event = parse_comment_event(&cli.event_name, &raw)?;

    let runtime = BridgeRuntime::new(config, posting.clone())?;
    let outcome = runtime.handle_event(event.as_ref()).await?;
    let target = event
        .as_ref()
        .map(|event| posting.post_target(&event.thread));
    report_outcome(&outcome, target.as_ref());
    Ok(())
}
