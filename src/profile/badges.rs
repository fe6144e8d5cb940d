//! Decoding of the `public_flags` bit-field into badge emojis.

/// Rendered text when no known badge bit is set
pub const NO_BADGES: &str = "**No badges**";

/// A badge the profile card knows how to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub flag: u64,
    pub name: &'static str,
    pub emoji: &'static str,
}

/// Known badges, in the order they are displayed
pub const BADGES: &[Badge] = &[
    Badge { flag: 1 << 0, name: "Discord Staff", emoji: "<:staff:1434657967659155578>" },
    Badge { flag: 1 << 1, name: "Partnered Server Owner", emoji: "<:partner:1434657966111330335>" },
    Badge { flag: 1 << 2, name: "HypeSquad Events", emoji: "<:hypesquad:1434657982653923469>" },
    Badge { flag: 1 << 3, name: "Bug Hunter Level 1", emoji: "<:bughunter1:1434657958108725469>" },
    Badge { flag: 1 << 6, name: "HypeSquad Bravery", emoji: "<:bravery:1434657977939267644>" },
    Badge { flag: 1 << 7, name: "HypeSquad Brilliance", emoji: "<:brilliance:1434657980212707350>" },
    Badge { flag: 1 << 8, name: "HypeSquad Balance", emoji: "<:balance:1434657970180067459>" },
    Badge { flag: 1 << 9, name: "Early Supporter", emoji: "<:earlysupporter:1434657961690665142>" },
    Badge { flag: 1 << 14, name: "Bug Hunter Level 2", emoji: "<:bughunter2:1434657959841108050>" },
    Badge { flag: 1 << 17, name: "Early Verified Bot Developer", emoji: "<:developer:1434657956108173523>" },
    Badge { flag: 1 << 18, name: "Moderator Programs Alumni", emoji: "<:moderator:1434657963913642034>" },
    Badge { flag: 1 << 22, name: "Active Developer", emoji: "<:activedeveloper:1434657953453047858>" },
];

/// Badges decoded from a flag value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeSet {
    None,
    Some(Vec<Badge>),
}

impl BadgeSet {
    pub fn decode(flags: u64) -> Self {
        decode_with(BADGES, flags)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BadgeSet::None)
    }

    pub fn badges(&self) -> &[Badge] {
        match self {
            BadgeSet::None => &[],
            BadgeSet::Some(badges) => badges.as_slice(),
        }
    }

    /// Emojis side by side in a block quote, or the "no badges" sentinel
    pub fn render(&self) -> String {
        match self {
            BadgeSet::None => NO_BADGES.to_string(),
            BadgeSet::Some(badges) => {
                let emojis: String = badges.iter().map(|b| b.emoji).collect();
                format!(">>> {}", emojis)
            }
        }
    }
}

fn decode_with(table: &[Badge], flags: u64) -> BadgeSet {
    let badges: Vec<Badge> = table
        .iter()
        .filter(|badge| flags & badge.flag != 0)
        .copied()
        .collect();

    if badges.is_empty() {
        BadgeSet::None
    } else {
        BadgeSet::Some(badges)
    }
}
