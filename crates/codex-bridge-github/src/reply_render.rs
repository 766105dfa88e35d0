use codex_bridge_core::{truncate_chars, truncate_for_error, ReplyText};

pub const GITHUB_COMMENT_MAX_CHARS: usize = 65_536;
const TRUNCATION_NOTICE: &str = "\n\n_(reply truncated to fit GitHub's comment size limit)_";

/// Builds the reply posted back to the thread. With `mention_author` set the
/// body opens with `@author` on its own line followed by `content`.
pub fn render_reply(author: &str, content: &str, mention_author: bool) -> ReplyText {
    let content = content.trim();
    let login = author.trim().trim_start_matches('@');
    if !mention_author || login.is_empty() {
        return ReplyText {
            body: clamp_comment_body(content.to_string()),
            mention_target: None,
        };
    }

    ReplyText {
        body: clamp_comment_body(format!("@{login}\n\n{content}")),
        mention_target: Some(login.to_string()),
    }
}

/// Render the markdown body used when every generation path failed.
pub fn render_generation_failure(diagnostic: &str) -> String {
    format!(
        "Codex could not generate a reply for this request.\n\nError: `{}`",
        truncate_for_error(diagnostic.trim(), 600).replace('`', "'")
    )
}

/// Keeps `body` within GitHub's comment limit, cutting on a character
/// boundary and appending a notice when truncated.
pub fn clamp_comment_body(body: String) -> String {
    if body.chars().count() <= GITHUB_COMMENT_MAX_CHARS {
        return body;
    }
    let budget = GITHUB_COMMENT_MAX_CHARS - TRUNCATION_NOTICE.chars().count();
    let mut clamped = truncate_chars(&body, budget).to_string();
    clamped.push_str(TRUNCATION_NOTICE);
    clamped
}
