//! Chat message rendering
//!
//! Post-processes a raw chat message into display-ready segments: emote
//! substitution, mention detection, self-message highlighting. Pure and
//! deterministic over its three inputs (no network, no state), so it is
//! equally usable from interactive UI and non-interactive transcript export.

use std::collections::HashMap;

use crate::events::{ChatMessage, Emote};

/// One run of a rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSegment {
    /// Literal text, verbatim from the message
    Text(String),

    /// An emote token substituted by its image
    Emote { code: String, image: String },

    /// A literal `@username` mention of the rendering user
    Mention(String),
}

/// Display-ready form of a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub segments: Vec<MessageSegment>,
    /// The rendering user sent this message
    pub is_self: bool,
    /// The rendering user is mentioned in this message
    pub is_mention: bool,
}

impl RenderedMessage {
    /// Flatten back to plain text; emotes render as their `:code:` token.
    /// Used for transcript export.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                MessageSegment::Text(text) => out.push_str(text),
                MessageSegment::Emote { code, .. } => {
                    out.push(':');
                    out.push_str(code);
                    out.push(':');
                }
                MessageSegment::Mention(mention) => out.push_str(mention),
            }
        }
        out
    }
}

/// Render a chat message for display.
///
/// Emote tokens (`:code:`) resolve against `known_emotes` plus the emotes
/// the gateway resolved into the message itself, with the message's own
/// entries taking precedence. The mention check is a case-sensitive exact
/// token match against `@self_username`.
pub fn render(message: &ChatMessage, known_emotes: &[Emote], self_username: &str) -> RenderedMessage {
    let mut emotes: HashMap<&str, &str> = known_emotes
        .iter()
        .map(|e| (e.code.as_str(), e.image.as_str()))
        .collect();
    if let Some(resolved) = &message.emotes {
        for emote in resolved {
            emotes.insert(&emote.code, &emote.image);
        }
    }

    let mut segments = Vec::new();
    let mut is_mention = false;
    for piece in split_emotes(&message.message, &emotes) {
        match piece {
            Piece::Text(text) => {
                is_mention |= push_text(&mut segments, text, self_username);
            }
            Piece::Emote { code, image } => segments.push(MessageSegment::Emote {
                code: code.to_string(),
                image: image.to_string(),
            }),
        }
    }

    RenderedMessage {
        segments,
        is_self: !self_username.is_empty() && message.username == self_username,
        is_mention,
    }
}

enum Piece<'a> {
    Text(&'a str),
    Emote { code: &'a str, image: &'a str },
}

/// Split message text on resolvable `:code:` tokens.
///
/// A colon pair whose inner text is not a known code stays literal, and
/// scanning resumes at the second colon, so `5:30 :wave:` still resolves
/// the wave.
fn split_emotes<'a>(text: &'a str, emotes: &HashMap<&str, &'a str>) -> Vec<Piece<'a>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut cursor = 0;

    while let Some(open) = text[cursor..].find(':').map(|i| cursor + i) {
        let Some(close) = text[open + 1..].find(':').map(|i| open + 1 + i) else {
            break;
        };
        let code = &text[open + 1..close];
        match emotes.get(code).copied() {
            Some(image) if !code.is_empty() => {
                if start < open {
                    pieces.push(Piece::Text(&text[start..open]));
                }
                pieces.push(Piece::Emote { code, image });
                start = close + 1;
                cursor = start;
            }
            _ => {
                cursor = close;
            }
        }
    }

    if start < text.len() {
        pieces.push(Piece::Text(&text[start..]));
    }
    pieces
}

/// Append a text run, splitting out exact `@self_username` tokens.
/// Returns whether a mention was found.
fn push_text(segments: &mut Vec<MessageSegment>, text: &str, self_username: &str) -> bool {
    if self_username.is_empty() {
        push_merged(segments, text);
        return false;
    }
    let needle = format!("@{}", self_username);

    let mut found = false;
    let mut start = 0;
    for (index, word) in tokenize(text) {
        if word == needle {
            if start < index {
                push_merged(segments, &text[start..index]);
            }
            segments.push(MessageSegment::Mention(word.to_string()));
            start = index + word.len();
            found = true;
        }
    }
    if start < text.len() {
        push_merged(segments, &text[start..]);
    }
    found
}

/// Whitespace-delimited tokens with their byte offsets
fn tokenize(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_whitespace()
        .map(move |word| (word.as_ptr() as usize - text.as_ptr() as usize, word))
}

fn push_merged(segments: &mut Vec<MessageSegment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(MessageSegment::Text(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(MessageSegment::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::UserRole;

    fn message(text: &str, emotes: Option<Vec<Emote>>) -> ChatMessage {
        ChatMessage {
            id: "m1".to_string(),
            channel: "/live/123".to_string(),
            user_guid: "guid-1".to_string(),
            username: "alice".to_string(),
            user_role: UserRole::Normal,
            message: text.to_string(),
            emotes,
            success: None,
        }
    }

    fn wave() -> Emote {
        Emote {
            code: "wave".to_string(),
            image: "/e/wave.png".to_string(),
        }
    }

    #[test]
    fn test_emote_substitution_scenario() {
        // join /live/123, receive radioChatter{message:"hi :wave:",
        // emotes:[wave]}: inline wave image at the token, "hi " verbatim
        let rendered = render(&message("hi :wave:", Some(vec![wave()])), &[], "bob");
        assert_eq!(
            rendered.segments,
            vec![
                MessageSegment::Text("hi ".to_string()),
                MessageSegment::Emote {
                    code: "wave".to_string(),
                    image: "/e/wave.png".to_string(),
                },
            ]
        );
        assert!(!rendered.is_self);
        assert!(!rendered.is_mention);
    }

    #[test]
    fn test_unknown_emote_stays_literal() {
        let rendered = render(&message("hi :wave:", None), &[], "bob");
        assert_eq!(
            rendered.segments,
            vec![MessageSegment::Text("hi :wave:".to_string())]
        );
    }

    #[test]
    fn test_known_emotes_param_resolves() {
        let rendered = render(&message("hi :wave:", None), &[wave()], "bob");
        assert!(matches!(
            rendered.segments[1],
            MessageSegment::Emote { .. }
        ));
    }

    #[test]
    fn test_colon_pairs_resync() {
        let rendered = render(&message("5:30 :wave: bye", Some(vec![wave()])), &[], "bob");
        assert_eq!(
            rendered.segments,
            vec![
                MessageSegment::Text("5:30 ".to_string()),
                MessageSegment::Emote {
                    code: "wave".to_string(),
                    image: "/e/wave.png".to_string(),
                },
                MessageSegment::Text(" bye".to_string()),
            ]
        );
    }

    #[test]
    fn test_mention_exact_token() {
        let rendered = render(&message("hey @bob look", None), &[], "bob");
        assert_eq!(
            rendered.segments,
            vec![
                MessageSegment::Text("hey ".to_string()),
                MessageSegment::Mention("@bob".to_string()),
                MessageSegment::Text(" look".to_string()),
            ]
        );
        assert!(rendered.is_mention);
    }

    #[test]
    fn test_mention_is_case_sensitive_and_exact() {
        assert!(!render(&message("hey @Bob", None), &[], "bob").is_mention);
        assert!(!render(&message("hey @bobby", None), &[], "bob").is_mention);
        assert!(!render(&message("hey bob", None), &[], "bob").is_mention);
    }

    #[test]
    fn test_self_highlighting() {
        let rendered = render(&message("hi", None), &[], "alice");
        assert!(rendered.is_self);

        let rendered = render(&message("hi", None), &[], "");
        assert!(!rendered.is_self);
    }

    #[test]
    fn test_mention_inside_emote_text() {
        let rendered = render(
            &message("@bob :wave: @bob", Some(vec![wave()])),
            &[],
            "bob",
        );
        assert_eq!(
            rendered.segments,
            vec![
                MessageSegment::Mention("@bob".to_string()),
                MessageSegment::Text(" ".to_string()),
                MessageSegment::Emote {
                    code: "wave".to_string(),
                    image: "/e/wave.png".to_string(),
                },
                MessageSegment::Text(" ".to_string()),
                MessageSegment::Mention("@bob".to_string()),
            ]
        );
    }

    #[test]
    fn test_plain_text_roundtrip() {
        let rendered = render(&message("hi :wave: @bob", Some(vec![wave()])), &[], "bob");
        assert_eq!(rendered.plain_text(), "hi :wave: @bob");
    }

    #[test]
    fn test_deterministic() {
        let msg = message("hey @bob :wave:", Some(vec![wave()]));
        assert_eq!(render(&msg, &[], "bob"), render(&msg, &[], "bob"));
    }
}
