// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash command definitions and option parsing.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, ResolvedOption, ResolvedValue};

use pairbot_core::PairbotError;
use pairbot_service::Command;

pub const PAIR: &str = "pair";
pub const COMMENT: &str = "comment";
pub const OPT_WRITER: &str = "writer";
pub const OPT_TARGET: &str = "target";

/// Commands registered on the guild at startup.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(PAIR).description("Form this week's groups now"),
        CreateCommand::new(COMMENT)
            .description("Record a comment on someone's weekly post")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    OPT_TARGET,
                    "Whose post was commented on",
                )
                .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::User,
                OPT_WRITER,
                "Who wrote the comment (defaults to you)",
            )),
    ]
}

/// User-typed options as `(name, user id)` pairs; other option types are dropped.
pub fn user_options(options: &[ResolvedOption<'_>]) -> Vec<(String, String)> {
    options
        .iter()
        .filter_map(|opt| match &opt.value {
            ResolvedValue::User(user, _) => Some((opt.name.to_string(), user.id.to_string())),
            _ => None,
        })
        .collect()
}

/// Builds a [`Command`] from its name and resolved user options.
pub fn parse(name: &str, options: &[(String, String)]) -> Result<Command, PairbotError> {
    let find = |key: &str| {
        options
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, id)| id.clone())
    };
    match name {
        PAIR => Ok(Command::Pair),
        COMMENT => {
            let target = find(OPT_TARGET).ok_or_else(|| {
                PairbotError::InvalidInput("Please choose whose post was commented on.".into())
            })?;
            Ok(Command::Comment {
                writer: find(OPT_WRITER),
                target,
            })
        }
        other => Err(PairbotError::InvalidInput(format!(
            "Unknown command `/{other}`."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn comment_writer_is_optional() {
        assert_eq!(
            parse(COMMENT, &opts(&[("target", "2")])).unwrap(),
            Command::Comment {
                writer: None,
                target: "2".into()
            }
        );
        assert_eq!(
            parse(COMMENT, &opts(&[("writer", "1"), ("target", "2")])).unwrap(),
            Command::Comment {
                writer: Some("1".into()),
                target: "2".into()
            }
        );
    }

    #[test]
    fn comment_without_target_is_invalid() {
        assert!(matches!(
            parse(COMMENT, &opts(&[("writer", "1")])),
            Err(PairbotError::InvalidInput(_))
        ));
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert!(matches!(parse("ping", &[]), Err(PairbotError::InvalidInput(_))));
        assert_eq!(parse(PAIR, &[]).unwrap(), Command::Pair);
    }

    #[test]
    fn definitions_declare_required_target() {
        let defs = serde_json::to_value(definitions()).unwrap();
        assert_eq!(defs[0]["name"], PAIR);
        assert_eq!(defs[1]["name"], COMMENT);
        let options = defs[1]["options"].as_array().unwrap();
        assert_eq!(options[0]["name"], OPT_TARGET);
        assert_eq!(options[0]["required"], true);
        assert_eq!(options[1]["name"], OPT_WRITER);
    }
}
