//! Token extraction from slot strings
//!
//! A slot string looks like `name(assist)[latent,latent]*repeat|stats`. The
//! card name must come first; everything after it may appear in any order.
//! Matching walks an ordered rule table and the first rule that matches at the
//! current position wins, so overlapping patterns resolve by table order.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::latent::{Latent, MAX_LATENTS};
use crate::parser::ParseError;

/// Highest value accepted by a plus-all marker.
pub const MAX_PLUS_ALL: u32 = 297;

/// Highest repeat count for a single slot.
pub const MAX_REPEAT: u32 = 6;

/// Characters that end the name segment.
const NAME_TERMINATORS: [char; 4] = ['(', '[', '|', '*'];

/// The value carried by a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Name(String),
    /// Raw inner text of a `(...)` modifier, parsed later as an assist
    AssistModifier(String),
    LatentList(Vec<Latent>),
    LevelStat(u32),
    SkillLevelStat(u32),
    AwakeningStat(u32),
    SuperAwakeningStat(u32),
    PlusAll(u32),
    PlusHp(u32),
    PlusAtk(u32),
    PlusRcv(u32),
    RepeatCount(u32),
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Turns a match into a token; `None` means the text is consumed silently.
type Handler = fn(&Captures<'_>) -> Option<TokenKind>;

struct Rule {
    pattern: Regex,
    handler: Handler,
}

fn rule(pattern: &str, handler: Handler) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("token patterns are valid"),
        handler,
    }
}

fn number(caps: &Captures<'_>) -> u32 {
    caps.get(1)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Rules tried after the name, in priority order.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r"^\((.*?)\)", |c| {
            Some(TokenKind::AssistModifier(c[1].to_string()))
        }),
        rule(r"^\[(.+?)\]", |c| {
            Some(TokenKind::LatentList(parse_latent_list(&c[1])))
        }),
        rule(r"^\|", |_| None),
        rule(r"^\s", |_| None),
        rule(r"(?i)^lv\s?([0-9]{1,3})", |c| {
            Some(TokenKind::LevelStat(number(c)))
        }),
        rule(r"(?i)^slv\s?([0-9]{1,2}|max)", |c| {
            let level = if c[1].eq_ignore_ascii_case("max") {
                99
            } else {
                number(c)
            };
            Some(TokenKind::SkillLevelStat(level))
        }),
        rule(r"(?i)^aw\s?([0-9])", |c| {
            Some(TokenKind::AwakeningStat(number(c)))
        }),
        rule(r"(?i)^sa\s?([0-9])", |c| {
            Some(TokenKind::SuperAwakeningStat(number(c)))
        }),
        rule(r"^\+\s?([0-9]{1,3})", |c| {
            Some(TokenKind::PlusAll(number(c).min(MAX_PLUS_ALL)))
        }),
        rule(r"(?i)^\+h\s?([0-9]{1,2})", |c| {
            Some(TokenKind::PlusHp(number(c)))
        }),
        rule(r"(?i)^\+a\s?([0-9]{1,2})", |c| {
            Some(TokenKind::PlusAtk(number(c)))
        }),
        rule(r"(?i)^\+r\s?([0-9]{1,2})", |c| {
            Some(TokenKind::PlusRcv(number(c)))
        }),
        rule(r"^\*\s?([0-9])", |c| {
            Some(TokenKind::RepeatCount(number(c).clamp(1, MAX_REPEAT)))
        }),
    ]
});

/// Length of the leading name segment, if the text starts with one.
///
/// The name runs up to the first terminator found after its first character,
/// or covers the whole text when no terminator occurs at all.
fn match_name(input: &str) -> Option<usize> {
    let mut chars = input.char_indices();
    chars.next()?;
    for (i, c) in chars {
        if NAME_TERMINATORS.contains(&c) {
            return Some(i);
        }
    }
    if input.contains(NAME_TERMINATORS) {
        None
    } else {
        Some(input.len())
    }
}

/// Parse the inside of a `[...]` latent list.
///
/// Entries are trimmed and lowercased, `N*code` or `code*N` (single digit N)
/// expands in place, the list is cut to six entries and unknown names are
/// dropped afterwards.
///
/// # Examples
///
/// ```
/// use teamcard::latent::Latent;
/// use teamcard::tokenizer::parse_latent_list;
///
/// let latents = parse_latent_list("sdr *4, dek");
/// assert_eq!(latents.len(), 5);
/// assert_eq!(latents[4], Latent::DevilKiller);
/// ```
pub fn parse_latent_list(inner: &str) -> Vec<Latent> {
    let mut names: Vec<String> = Vec::new();
    for entry in inner.split(',') {
        let entry = entry.trim().to_lowercase();
        if !entry.contains('*') {
            names.push(entry);
            continue;
        }
        let parts: Vec<&str> = entry.split('*').map(str::trim).collect();
        let single_digit = |s: &str| s.len() == 1 && s.chars().all(|c| c.is_ascii_digit());
        let (count, name) = if single_digit(parts[0]) {
            (parts[0], parts[1])
        } else if single_digit(parts[1]) {
            (parts[1], parts[0])
        } else {
            names.push(entry);
            continue;
        };
        let count: usize = count.parse().unwrap_or(0);
        names.extend(std::iter::repeat(name.to_string()).take(count));
    }

    names.truncate(MAX_LATENTS);
    names.iter().filter_map(|n| Latent::from_name(n)).collect()
}

/// Split a slot string into tokens.
///
/// # Errors
///
/// Returns [`ParseError::UnknownText`] with the unmatched remainder and its
/// byte position when no rule matches.
///
/// # Examples
///
/// ```
/// use teamcard::tokenizer::{tokenize, TokenKind};
///
/// let tokens = tokenize("bj(weld)lv110").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, vec![
///     TokenKind::Name("bj".to_string()),
///     TokenKind::AssistModifier("weld".to_string()),
///     TokenKind::LevelStat(110),
/// ]);
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    if let Some(end) = match_name(input) {
        let name = input[..end].trim();
        if !name.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Name(name.to_string()),
                position: 0,
            });
        }
        pos = end;
    }

    'scan: while pos < input.len() {
        let rest = &input[pos..];
        for rule in RULES.iter() {
            if let Some(caps) = rule.pattern.captures(rest) {
                let len = caps.get(0).map(|m| m.end()).unwrap_or(0);
                if let Some(kind) = (rule.handler)(&caps) {
                    tokens.push(Token {
                        kind,
                        position: pos,
                    });
                }
                pos += len;
                continue 'scan;
            }
        }
        return Err(ParseError::UnknownText {
            text: rest.to_string(),
            position: pos,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_name_only() {
        assert_eq!(
            kinds("base raizer"),
            vec![TokenKind::Name("base raizer".to_string())]
        );
    }

    #[test]
    fn test_name_stops_at_terminators() {
        assert_eq!(
            kinds("zela * 6"),
            vec![
                TokenKind::Name("zela".to_string()),
                TokenKind::RepeatCount(6),
            ]
        );
        assert_eq!(
            kinds("eir[sdr]"),
            vec![
                TokenKind::Name("eir".to_string()),
                TokenKind::LatentList(vec![Latent::SkillDelayResist]),
            ]
        );
    }

    #[test]
    fn test_stats_are_not_names_after_the_bar() {
        assert_eq!(
            kinds("dmeta|+h33+a66+r99lv110slv15"),
            vec![
                TokenKind::Name("dmeta".to_string()),
                TokenKind::PlusHp(33),
                TokenKind::PlusAtk(66),
                TokenKind::PlusRcv(99),
                TokenKind::LevelStat(110),
                TokenKind::SkillLevelStat(15),
            ]
        );
    }

    #[test]
    fn test_stats_are_case_insensitive_with_spaces() {
        assert_eq!(
            kinds("x|LV 99 SLV MAX aw5 Sa 2 + 297"),
            vec![
                TokenKind::Name("x".to_string()),
                TokenKind::LevelStat(99),
                TokenKind::SkillLevelStat(99),
                TokenKind::AwakeningStat(5),
                TokenKind::SuperAwakeningStat(2),
                TokenKind::PlusAll(297),
            ]
        );
    }

    #[test]
    fn test_plus_all_clamped() {
        assert_eq!(
            kinds("x|+999"),
            vec![TokenKind::Name("x".to_string()), TokenKind::PlusAll(297)]
        );
    }

    #[test]
    fn test_repeat_clamped() {
        assert_eq!(
            kinds("x*9"),
            vec![TokenKind::Name("x".to_string()), TokenKind::RepeatCount(6)]
        );
        assert_eq!(
            kinds("x*0"),
            vec![TokenKind::Name("x".to_string()), TokenKind::RepeatCount(1)]
        );
    }

    #[test]
    fn test_assist_keeps_inner_text() {
        assert_eq!(
            kinds("dios(sdr) * 3"),
            vec![
                TokenKind::Name("dios".to_string()),
                TokenKind::AssistModifier("sdr".to_string()),
                TokenKind::RepeatCount(3),
            ]
        );
        assert_eq!(
            kinds("x()"),
            vec![
                TokenKind::Name("x".to_string()),
                TokenKind::AssistModifier(String::new()),
            ]
        );
    }

    #[test]
    fn test_unknown_text_error() {
        let err = tokenize("bj|lv110 wat").unwrap_err();
        match err {
            ParseError::UnknownText { text, position } => {
                assert_eq!(text, "wat");
                assert_eq!(position, 9);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_leading_terminator_has_no_name() {
        assert_eq!(kinds("|lv5"), vec![TokenKind::LevelStat(5)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_latent_expansion_both_directions() {
        assert_eq!(
            parse_latent_list("3*gok"),
            vec![Latent::GodKiller, Latent::GodKiller, Latent::GodKiller]
        );
        assert_eq!(
            parse_latent_list("gok *2"),
            vec![Latent::GodKiller, Latent::GodKiller]
        );
    }

    #[test]
    fn test_latent_truncated_to_six_before_lookup() {
        assert_eq!(parse_latent_list("sdr *8, dek").len(), 6);
        // Unknown names still take one of the six places
        let latents = parse_latent_list("x,x,x,x,x,hp,atk");
        assert_eq!(latents, vec![Latent::Hp]);
    }

    #[test]
    fn test_latent_names_normalized() {
        assert_eq!(
            parse_latent_list(" HP+ , Ah "),
            vec![Latent::HpPlus, Latent::AutoHeal]
        );
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = tokenize("ab(c)lv1").unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 5]);
    }
}
