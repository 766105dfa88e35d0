#[derive(Debug, Clone, PartialEq, Eq)]
/// Actionable request extracted from a triggering comment. `prompt` is never
/// empty; the classifier refuses to build one otherwise.
pub struct Instruction {
    pub prompt: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Markdown reply ready to post back to the originating thread.
pub struct ReplyText {
    pub body: String,
    pub mention_target: Option<String>,
}
