//! Spectator message log.
//!
//! Messages are what players and spectators see in the game chat. They
//! are unrelated to `tracing` diagnostics. Templates use positional
//! placeholders:
//!
//! ```
//! use keyforge_pipeline::core::messages::render_with;
//! use keyforge_pipeline::core::MessageArg;
//!
//! let text = render_with("{0} draws {1} cards", &["Alice".into(), MessageArg::Number(2)], |_| unreachable!());
//! assert_eq!(text, "Alice draws 2 cards");
//! ```

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::player::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Info,
    /// Highlighted in the chat (e.g. manual mode toggles).
    Alert,
}

/// A rendered chat line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMessage {
    pub level: MessageLevel,
    pub text: String,
}

/// A template argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageArg {
    Player(PlayerId),
    /// A player or card, rendered by name.
    Entity(EntityId),
    /// Several entities, rendered as "A, B and C".
    Entities(Vec<EntityId>),
    Text(String),
    Number(i64),
}

impl From<PlayerId> for MessageArg {
    fn from(id: PlayerId) -> Self {
        MessageArg::Player(id)
    }
}

impl From<EntityId> for MessageArg {
    fn from(id: EntityId) -> Self {
        MessageArg::Entity(id)
    }
}

impl From<&str> for MessageArg {
    fn from(text: &str) -> Self {
        MessageArg::Text(text.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(text: String) -> Self {
        MessageArg::Text(text)
    }
}

impl From<i64> for MessageArg {
    fn from(n: i64) -> Self {
        MessageArg::Number(n)
    }
}

impl From<u32> for MessageArg {
    fn from(n: u32) -> Self {
        MessageArg::Number(i64::from(n))
    }
}

/// Substitute `{n}` placeholders. `name_of` renders players and entities.
/// Placeholders without a matching argument are left as written.
pub fn render_with(
    template: &str,
    args: &[MessageArg],
    name_of: impl Fn(EntityId) -> String,
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let index = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)));

        match index.and_then(|(i, close)| args.get(i).map(|arg| (arg, close))) {
            Some((arg, close)) => {
                render_arg(&mut out, arg, &name_of);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_arg(out: &mut String, arg: &MessageArg, name_of: &impl Fn(EntityId) -> String) {
    match arg {
        MessageArg::Player(id) => out.push_str(&name_of(EntityId::player(*id))),
        MessageArg::Entity(id) => out.push_str(&name_of(*id)),
        MessageArg::Entities(ids) => {
            let names: Vec<String> = ids.iter().map(|&id| name_of(id)).collect();
            out.push_str(&join_names(&names));
        }
        MessageArg::Text(text) => out.push_str(text),
        MessageArg::Number(n) => out.push_str(&n.to_string()),
    }
}

fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(id: EntityId) -> String {
        match id.0 {
            0 => "Alice".into(),
            1 => "Bob".into(),
            n => format!("Card{n}"),
        }
    }

    #[test]
    fn test_positional_args() {
        let text = render_with(
            "{1} is attacked by {0}",
            &[EntityId(4).into(), PlayerId::new(1).into()],
            names,
        );
        assert_eq!(text, "Bob is attacked by Card4");
    }

    #[test]
    fn test_entity_lists() {
        let args = [MessageArg::Entities(vec![EntityId(2), EntityId(3), EntityId(4)])];
        assert_eq!(render_with("return {0}", &args, names), "return Card2, Card3 and Card4");

        let args = [MessageArg::Entities(vec![EntityId(2)])];
        assert_eq!(render_with("return {0}", &args, names), "return Card2");
    }

    #[test]
    fn test_unmatched_placeholders_are_kept() {
        assert_eq!(render_with("{0} {5} {x}", &["a".into()], names), "a {5} {x}");
        assert_eq!(render_with("brace { only", &[], names), "brace { only");
    }
}
