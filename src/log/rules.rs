//! Ordered line rules.
//!
//! Each rule pairs a pattern with an extractor. Rules are tried in table
//! order and the first rule whose pattern matches *and* whose extractor
//! accepts the captures wins. Extractors reject captures they cannot type
//! (an unmodeled tag name, a non-terminal PLAYSTATE), letting later rules
//! have a go.

use regex::{Captures, Regex};

use super::event::{EntityDescriptor, LogEvent};
use crate::cards::{CardId, NumericTag};
use crate::core::player::Side;
use crate::core::state::Outcome;

/// Which table entry matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    GameStart,
    PlayerNumber,
    PlayState,
    GameComplete,
    CurrentPlayer,
    Draw,
    OpposingPlay,
    FriendlyPlay,
    Graveyard,
    ZoneTag,
    Position,
    Attack,
    CardTarget,
    Tag,
    OpposingCast,
}

/// Bracketed entity block. `{p}` prefixes the group names so one pattern
/// can hold two descriptors.
const ENTITY: &str = r"\[name=(?P<{p}name>.*?) id=(?P<{p}id>\d+) zone=(?P<{p}zone>\w+) zonePos=(?P<{p}pos>\d+) cardId=(?P<{p}card>\w*) player=(?P<{p}player>\d+)\]";

const PLAY_SUFFIX: &str = r"(?: \((?:Hero|Hero Power|Weapon)\))?\s*$";

/// The rule table. `{E}`, `{A}` and `{D}` expand to entity descriptors,
/// `{NAME}` to our account name.
const TABLE: &[(RuleKind, &str)] = &[
    (RuleKind::GameStart, r"CREATE_GAME"),
    (
        RuleKind::PlayerNumber,
        r"TRANSITIONING card {E} to FRIENDLY PLAY \(Hero\)",
    ),
    (
        RuleKind::PlayState,
        r"TAG_CHANGE Entity={NAME} tag=PLAYSTATE value=(?P<value>\w+)",
    ),
    (
        RuleKind::GameComplete,
        r"TAG_CHANGE Entity=GameEntity tag=STATE value=COMPLETE",
    ),
    (
        RuleKind::CurrentPlayer,
        r"TAG_CHANGE Entity={NAME} tag=CURRENT_PLAYER value=(?P<value>\d+)",
    ),
    (RuleKind::Draw, r"{E} zone from .*-> FRIENDLY HAND\s*$"),
    (RuleKind::OpposingPlay, r"{E} zone from .*-> OPPOSING PLAY{SUFFIX}"),
    (RuleKind::FriendlyPlay, r"{E} zone from .*-> FRIENDLY PLAY{SUFFIX}"),
    (
        RuleKind::Graveyard,
        r"{E} zone from .*-> (?:FRIENDLY|OPPOSING) GRAVEYARD\s*$",
    ),
    (
        RuleKind::ZoneTag,
        r"TAG_CHANGE Entity={E} tag=ZONE value=(?P<zone>\w+)",
    ),
    (RuleKind::Position, r"{E} pos from \d+ -> (?P<to>\d+)"),
    (
        RuleKind::Attack,
        r"ACTION_START Entity={A} SubType=ATTACK .*?Target={D}",
    ),
    (
        RuleKind::CardTarget,
        r"TAG_CHANGE .*?\bid=(?P<id>\d+).*?tag=CARD_TARGET value=(?P<target>\d+)",
    ),
    (
        RuleKind::Tag,
        r"TAG_CHANGE Entity={E} tag=(?P<tag>[A-Z_]+) value=(?P<value>-?\d+)\s*$",
    ),
    (RuleKind::OpposingCast, r"{E} zone from OPPOSING HAND ->\s*$"),
];

struct Rule {
    kind: RuleKind,
    pattern: Regex,
}

/// Compiled rule table for one account name.
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile the table. The account name is matched literally.
    pub fn new(player_name: &str) -> Result<Self, regex::Error> {
        let name = regex::escape(player_name);
        let rules = TABLE
            .iter()
            .map(|&(kind, template)| {
                let source = template
                    .replace("{SUFFIX}", PLAY_SUFFIX)
                    .replace("{NAME}", &name)
                    .replace("{E}", &ENTITY.replace("{p}", "e_"))
                    .replace("{A}", &ENTITY.replace("{p}", "a_"))
                    .replace("{D}", &ENTITY.replace("{p}", "d_"));
                Ok(Rule {
                    kind,
                    pattern: Regex::new(&source)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// First matching rule and its event.
    #[must_use]
    pub fn classify(&self, line: &str) -> Option<(RuleKind, LogEvent)> {
        self.classify_among(line, |_| true)
    }

    /// Like `classify`, restricted to the given rule kinds.
    #[must_use]
    pub fn classify_only(&self, line: &str, kinds: &[RuleKind]) -> Option<(RuleKind, LogEvent)> {
        self.classify_among(line, |kind| kinds.contains(&kind))
    }

    fn classify_among(
        &self,
        line: &str,
        allowed: impl Fn(RuleKind) -> bool,
    ) -> Option<(RuleKind, LogEvent)> {
        self.rules
            .iter()
            .filter(|rule| allowed(rule.kind))
            .find_map(|rule| {
                let caps = rule.pattern.captures(line)?;
                extract(rule.kind, &caps).map(|event| (rule.kind, event))
            })
    }
}

fn group<'h>(caps: &Captures<'h>, name: &str) -> Option<&'h str> {
    caps.name(name).map(|m| m.as_str())
}

fn descriptor(caps: &Captures<'_>, prefix: &str) -> Option<EntityDescriptor> {
    let field = |name: &str| group(caps, &format!("{prefix}{name}"));
    Some(EntityDescriptor {
        name: field("name")?.to_string(),
        id: field("id")?.parse().ok()?,
        zone: field("zone")?.parse().ok()?,
        position: field("pos")?.parse().ok()?,
        card_id: CardId::new(field("card")?),
        player: field("player")?.parse().ok()?,
    })
}

fn extract(kind: RuleKind, caps: &Captures<'_>) -> Option<LogEvent> {
    let event = match kind {
        RuleKind::GameStart => LogEvent::GameStart,
        RuleKind::PlayerNumber => LogEvent::PlayerNumber(descriptor(caps, "e_")?.player),
        RuleKind::PlayState => match group(caps, "value")? {
            "WON" => LogEvent::GameOver(Outcome::Won),
            "LOST" | "CONCEDED" => LogEvent::GameOver(Outcome::Lost),
            "TIED" => LogEvent::GameOver(Outcome::Tied),
            _ => return None,
        },
        RuleKind::GameComplete => LogEvent::GameComplete,
        RuleKind::CurrentPlayer => match group(caps, "value")? {
            "1" => LogEvent::TurnStart(Side::Friendly),
            "0" => LogEvent::TurnStart(Side::Opposing),
            _ => return None,
        },
        RuleKind::Draw => LogEvent::Draw(descriptor(caps, "e_")?),
        RuleKind::OpposingPlay => LogEvent::Play {
            side: Side::Opposing,
            entity: descriptor(caps, "e_")?,
        },
        RuleKind::FriendlyPlay => LogEvent::Play {
            side: Side::Friendly,
            entity: descriptor(caps, "e_")?,
        },
        RuleKind::Graveyard => LogEvent::Graveyard(descriptor(caps, "e_")?),
        RuleKind::ZoneTag => LogEvent::ZoneChange {
            entity: descriptor(caps, "e_")?,
            zone: group(caps, "zone")?.parse().ok()?,
        },
        RuleKind::Position => LogEvent::Position {
            entity: descriptor(caps, "e_")?,
            to: group(caps, "to")?.parse().ok()?,
        },
        RuleKind::Attack => LogEvent::Attack {
            attacker: descriptor(caps, "a_")?,
            defender: descriptor(caps, "d_")?,
        },
        RuleKind::CardTarget => LogEvent::Target {
            source: group(caps, "id")?.parse().ok()?,
            target: group(caps, "target")?.parse().ok()?,
        },
        RuleKind::Tag => {
            let entity = descriptor(caps, "e_")?;
            let tag = group(caps, "tag")?;
            let value: i32 = group(caps, "value")?.parse().ok()?;
            if tag == "CONTROLLER" {
                LogEvent::Controller {
                    entity,
                    player: u8::try_from(value).ok()?,
                }
            } else {
                LogEvent::Tag {
                    entity,
                    tag: NumericTag::parse(tag)?,
                    value,
                }
            }
        }
        RuleKind::OpposingCast => LogEvent::OpposingCast(descriptor(caps, "e_")?),
    };
    Some(event)
}
