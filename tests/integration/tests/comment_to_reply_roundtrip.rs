//! Cross-crate roundtrips: clap flags → configuration → classifier → CLI
//! template chain → tiered API → formatted reply.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use codex_bridge_ai::TieredApiClient;
use codex_bridge_cli::{bridge_config_from_cli, posting_config_from_cli, validate_cli, Cli};
use codex_bridge_core::{BridgeConfig, ReplyText};
use codex_bridge_github::{parse_comment_event, CommentEvent, ThreadRef};
use codex_bridge_provider::CommandInvoker;
use codex_bridge_runtime::{
    BridgeRunOutcome, BridgeRuntime, PostedReply, ReplyPoster, ReplySource,
};
use httpmock::prelude::*;
use serde_json::json;
use tokio::sync::Mutex as AsyncMutex;

#[derive(Default)]
struct CapturingPoster {
    replies: AsyncMutex<Vec<(ThreadRef, ReplyText)>>,
}

impl CapturingPoster {
    async fn single_reply(&self) -> (ThreadRef, ReplyText) {
        let replies = self.replies.lock().await;
        assert_eq!(replies.len(), 1, "expected exactly one posted reply");
        replies[0].clone()
    }
}

#[async_trait]
impl ReplyPoster for CapturingPoster {
    async fn post_reply(&self, thread: &ThreadRef, reply: &ReplyText) -> Result<PostedReply> {
        self.replies
            .lock()
            .await
            .push((thread.clone(), reply.clone()));
        Ok(PostedReply::default())
    }
}

fn cli_from(args: &[&str]) -> Cli {
    let mut argv = vec!["codex-bridge", "--event-path", "/dev/null"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("cli parses");
    validate_cli(&cli).expect("cli validates");
    cli
}

fn runtime_for(config: BridgeConfig, cli: &Cli, poster: Arc<CapturingPoster>) -> BridgeRuntime {
    let posting = posting_config_from_cli(cli).expect("posting config");
    BridgeRuntime::with_components(
        config.clone(),
        posting,
        Arc::new(CommandInvoker::from_config(&config)),
        Arc::new(TieredApiClient::from_config(&config)),
        poster,
    )
}

fn comment_event(body: &str) -> CommentEvent {
    let payload = json!({
        "action": "created",
        "comment": {"id": 1, "body": body, "user": {"login": "octocat", "type": "User"}},
        "issue": {"number": 314},
        "repository": {"name": "bridge", "owner": {"login": "acme"}}
    });
    parse_comment_event("issue_comment", &payload.to_string())
        .expect("payload parses")
        .expect("issue_comment event")
}

#[tokio::test]
async fn integration_cli_disabled_reasoning_model_falls_back_to_chat_model() {
    let openai = MockServer::start();
    let primary = openai.mock(|when, then| {
        when.method(POST)
            .path("/v1/responses")
            .json_body_includes(json!({"model": "o3-mini"}).to_string());
        then.status(400)
            .json_body(json!({"error": {"message": "model not enabled for responses"}}));
    });
    let secondary = openai.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .json_body_includes(json!({"model": "gpt-4o-mini"}).to_string());
        then.status(200).json_body(json!({
            "choices": [{"message": {"content": [{"type": "text", "text": "fallback reply"}]}}]
        }));
    });

    let api_base = format!("{}/v1", openai.base_url());
    let cli = cli_from(&[
        "--cli-disable",
        "--model",
        "o3-mini",
        "--api-base",
        api_base.as_str(),
        "--api-key",
        "sk-test",
    ]);
    let config = bridge_config_from_cli(&cli);
    let poster = Arc::new(CapturingPoster::default());
    let runtime = runtime_for(config, &cli, poster.clone());

    let outcome = runtime
        .handle_event(Some(&comment_event("/codex explain the failure")))
        .await
        .expect("outcome");

    primary.assert_calls(1);
    secondary.assert_calls(1);
    assert!(matches!(
        outcome,
        BridgeRunOutcome::Posted {
            source: ReplySource::ApiSecondary,
            ..
        }
    ));
    let (thread, reply) = poster.single_reply().await;
    assert_eq!(thread.display_name(), "acme/bridge#314");
    assert_eq!(reply.body, "@octocat\n\nfallback reply");
}

#[tokio::test]
async fn integration_disabled_fallback_posts_primary_diagnostic() {
    let openai = MockServer::start();
    let primary = openai.mock(|when, then| {
        when.method(POST).path("/v1/responses");
        then.status(200)
            .json_body(json!({"status": "failed", "error": {"message": "rate limited"}}));
    });
    let secondary = openai.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"content": "unused"}}]}));
    });

    let api_base = format!("{}/v1", openai.base_url());
    let cli = cli_from(&[
        "--cli-disable",
        "--disable-chat-fallback",
        "--mention-author=false",
        "--api-base",
        api_base.as_str(),
        "--api-key",
        "sk-test",
    ]);
    let poster = Arc::new(CapturingPoster::default());
    let runtime = runtime_for(bridge_config_from_cli(&cli), &cli, poster.clone());

    runtime
        .handle_event(Some(&comment_event("/codex explain")))
        .await
        .expect("outcome");

    primary.assert_calls(1);
    secondary.assert_calls(0);
    let (_, reply) = poster.single_reply().await;
    assert!(reply.body.starts_with("Codex could not generate a reply"));
    assert!(reply.body.contains("api-primary-failed, fallback-disabled"));
    assert!(reply.body.contains("rate limited"));
    assert_eq!(reply.mention_target, None);
}

#[cfg(unix)]
mod cli_chain {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use super::*;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let script = dir.join("codex");
        std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).expect("write script");
        let mut perms = std::fs::metadata(&script)
            .expect("script metadata")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).expect("chmod script");
        script
    }

    #[tokio::test]
    async fn integration_default_templates_fall_through_to_argument_form() {
        let temp = tempfile::tempdir().expect("tempdir");
        let log = temp.path().join("calls.log");
        let script = write_script(
            temp.path(),
            &format!(
                "echo \"$*\" >> '{log}'\n\
                 if [ \"$1\" = exec ] && [ \"$2\" = - ]; then echo 'stdin mode unsupported' >&2; exit 2; fi\n\
                 if [ \"$1\" = exec ]; then printf 'exec answered: %s\\n' \"$2\"; exit 0; fi\n\
                 exit 9",
                log = log.display()
            ),
        );
        let openai = MockServer::start();
        let any_api = openai.mock(|when, then| {
            when.method(POST);
            then.status(500);
        });

        let script_arg = script.display().to_string();
        let api_base = format!("{}/v1", openai.base_url());
        let cli = cli_from(&[
            "--cli",
            script_arg.as_str(),
            "--api-base",
            api_base.as_str(),
            "--api-key",
            "sk-test",
        ]);
        let poster = Arc::new(CapturingPoster::default());
        let runtime = runtime_for(bridge_config_from_cli(&cli), &cli, poster.clone());

        let outcome = runtime
            .handle_event(Some(&comment_event("/codex list the $PATH entries")))
            .await
            .expect("outcome");

        any_api.assert_calls(0);
        assert!(matches!(
            outcome,
            BridgeRunOutcome::Posted {
                source: ReplySource::Cli,
                ..
            }
        ));
        let (_, reply) = poster.single_reply().await;
        assert_eq!(
            reply.body,
            "@octocat\n\nexec answered: list the $PATH entries"
        );
        let calls = std::fs::read_to_string(&log).expect("call log");
        assert_eq!(calls.lines().count(), 2, "third template must not run");
    }

    #[tokio::test]
    async fn integration_exhausted_templates_hand_over_to_api() {
        let temp = tempfile::tempdir().expect("tempdir");
        let log = temp.path().join("calls.log");
        let script = write_script(
            temp.path(),
            &format!(
                "echo run >> '{log}'\necho 'auth required' >&2\nexit 3",
                log = log.display()
            ),
        );
        let openai = MockServer::start();
        let primary = openai.mock(|when, then| {
            when.method(POST).path("/v1/responses");
            then.status(200)
                .json_body(json!({"output_text": "api answered"}));
        });

        let script_arg = script.display().to_string();
        let api_base = format!("{}/v1", openai.base_url());
        let cli = cli_from(&[
            "--cli",
            script_arg.as_str(),
            "--api-base",
            api_base.as_str(),
            "--api-key",
            "sk-test",
        ]);
        let poster = Arc::new(CapturingPoster::default());
        let runtime = runtime_for(bridge_config_from_cli(&cli), &cli, poster.clone());

        let outcome = runtime
            .handle_event(Some(&comment_event("/codex hello")))
            .await
            .expect("outcome");

        primary.assert_calls(1);
        assert!(matches!(
            outcome,
            BridgeRunOutcome::Posted {
                source: ReplySource::ApiPrimary,
                ..
            }
        ));
        let calls = std::fs::read_to_string(&log).expect("call log");
        assert_eq!(calls.lines().count(), 3, "every default template is tried");
        let (_, reply) = poster.single_reply().await;
        assert_eq!(reply.body, "@octocat\n\napi answered");
    }
}
