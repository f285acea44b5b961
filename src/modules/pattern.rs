//! Canned replies to chat lines matching a regular expression.

use super::{Module, ModuleArgs};
use crate::commands::HandlerResult;
use crate::config::ReplyConfig;
use crate::message::{IncomingMessage, OutgoingMessage};
use async_trait::async_trait;
use regex::Regex;

/// Replies with a template whenever a message matches `pattern`.
///
/// The template may reference `{sender}`, `{channel}` and any named
/// capture group of the pattern. Unknown placeholders are left as is.
#[derive(Debug)]
pub struct PatternReplyModule {
    name: String,
    pattern: Regex,
    template: String,
    as_reply: bool,
}

impl PatternReplyModule {
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        template: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            template: template.into(),
            as_reply: false,
        })
    }

    /// Thread the reply under the matching message.
    pub fn as_reply(mut self, as_reply: bool) -> Self {
        self.as_reply = as_reply;
        self
    }

    pub fn from_config(config: &ReplyConfig) -> Result<Self, regex::Error> {
        Ok(Self::new(&config.name, &config.pattern, &config.reply)?.as_reply(config.as_reply))
    }
}

#[async_trait]
impl Module for PatternReplyModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn message_trigger(&self, incoming: &IncomingMessage) -> Option<ModuleArgs> {
        let captures = self.pattern.captures(&incoming.text)?;
        let mut args = ModuleArgs::for_channel(&incoming.channel)
            .with_param("sender", &incoming.sender)
            .with_param("channel", &incoming.channel);
        for group in self.pattern.capture_names().flatten() {
            if let Some(m) = captures.name(group) {
                args.parameters.insert(group.to_string(), m.as_str().to_string());
            }
        }
        Some(args)
    }

    async fn handle(&self, args: ModuleArgs) -> HandlerResult {
        let text = render(&self.template, &args);
        let out = if self.as_reply {
            OutgoingMessage::reply(text)
        } else {
            OutgoingMessage::say(text)
        };
        Ok(Some(out.to_channel(args.channel)))
    }
}

/// Substitute `{name}` placeholders from `args`.
fn render(template: &str, args: &ModuleArgs) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => match args.get(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
