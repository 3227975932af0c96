//! Text clean-up and the two compound-field grammars.
//!
//! Source descriptions carry HTML markup and irregular whitespace. Weapon
//! rows pack special rules and, for some weapons, the full stat line into a
//! single `|`-separated field. Stratagem descriptions embed `WHEN:`,
//! `TARGET:` and `EFFECT:` sections in free text.

use codex_catalog::{MELEE, Weapon};

/// Placeholder for a stratagem section whose markers are missing.
pub const UNKNOWN: &str = "Unknown";

/// Tags rendered as a word break when stripped.
const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "tr", "td", "th", "table", "h1", "h2", "h3", "h4", "h5",
    "h6",
];

/// Strip markup and collapse whitespace.
pub fn normalize(text: &str) -> String {
    collapse_whitespace(&strip_markup(text))
}

/// Collapse runs of whitespace (including newlines) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove markup tags and decode character entities.
///
/// Block-level tags become a space so adjacent words stay apart; inline tags
/// disappear. A `<` or `&` that does not start a tag or entity is kept.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(['<', '&']) {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if tail.starts_with('<') {
            match scan_tag(tail) {
                Some((len, block)) => {
                    if block {
                        out.push(' ');
                    }
                    rest = &tail[len..];
                }
                None => {
                    out.push('<');
                    rest = &tail[1..];
                }
            }
        } else {
            match decode_entity(tail) {
                Some((ch, len)) => {
                    out.push(ch);
                    rest = &tail[len..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            }
        }
    }

    out.push_str(rest);
    out
}

/// Length of the tag at the start of `tail` and whether it is block-level.
fn scan_tag(tail: &str) -> Option<(usize, bool)> {
    let body = &tail[1..];
    let first = body.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '/' || first == '!') {
        return None;
    }
    let end = body.find('>')?;

    let name: String = body
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    let block = BLOCK_TAGS.contains(&name.as_str());

    Some((end + 2, block))
}

/// Decode the entity at the start of `tail`, returning the character and the
/// entity's length.
fn decode_entity(tail: &str) -> Option<(char, usize)> {
    let semi = tail.get(..12).unwrap_or(tail).find(';')?;
    let name = &tail[1..semi];

    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "lsquo" | "rsquo" => '\'',
        "ldquo" | "rdquo" => '"',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "times" => '×',
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };

    Some((ch, semi + 1))
}

// ── Weapons ─────────────────────────────────────────────────────────────────

/// A wargear row's own stat columns, used when the compound text runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponColumns<'a> {
    pub range: &'a str,
    pub weapon_type: &'a str,
    pub attacks: &'a str,
    pub skill: &'a str,
    pub strength: &'a str,
    pub ap: &'a str,
    pub damage: &'a str,
}

/// Whether a segment ends the special-rule prefix: empty, or starting with a
/// number (`24"`, `-1`, `3+`, `.5`).
fn starts_numeric(segment: &str) -> bool {
    let s = segment.trim();
    if s.is_empty() {
        return true;
    }
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Parse a weapon's compound description.
///
/// Leading `|`-segments that are neither numeric nor `Melee` are special-rule
/// tags, each split on commas. The remaining segments map in order to range,
/// type, attacks, skill, strength, AP and damage; a missing or empty segment
/// falls back to the matching column.
pub fn parse_weapon_text(name: &str, text: &str, columns: &WeaponColumns<'_>) -> Weapon {
    let mut segments = text.split('|').map(str::trim).peekable();

    let mut special_rules = Vec::new();
    while let Some(segment) = segments.next_if(|s| !starts_numeric(s) && *s != MELEE) {
        special_rules.extend(
            segment
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from),
        );
    }

    let mut next_or = |fallback: &str| -> String {
        segments
            .next()
            .filter(|s| !s.is_empty())
            .map_or_else(|| fallback.to_string(), str::to_string)
    };

    Weapon {
        name: name.to_string(),
        special_rules,
        range: next_or(columns.range),
        weapon_type: next_or(columns.weapon_type),
        attacks: next_or(columns.attacks),
        skill: next_or(columns.skill),
        strength: next_or(columns.strength),
        ap: next_or(columns.ap),
        damage: next_or(columns.damage),
    }
}

// ── Stratagems ──────────────────────────────────────────────────────────────

/// The sections of a stratagem description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StratagemSections {
    pub when: String,
    pub target: String,
    pub effect: String,
    /// The whole description, normalized.
    pub full_description: String,
}

/// Split a stratagem description on its `WHEN:`, `TARGET:` and `EFFECT:`
/// markers (matched case-insensitively).
///
/// A section whose bounding markers are missing reads [`UNKNOWN`].
pub fn split_stratagem(text: &str) -> StratagemSections {
    const WHEN: &str = "when:";
    const TARGET: &str = "target:";
    const EFFECT: &str = "effect:";

    let full = normalize(text);
    // ASCII lowering keeps byte offsets valid for `full`.
    let lower = full.to_ascii_lowercase();

    let when_at = lower.find(WHEN);
    let target_from = when_at.map_or(0, |w| w + WHEN.len());
    let target_at = lower[target_from..].find(TARGET).map(|t| t + target_from);
    let effect_from = target_at
        .map(|t| t + TARGET.len())
        .unwrap_or(target_from);
    let effect_at = lower[effect_from..].find(EFFECT).map(|e| e + effect_from);

    let section = |start: Option<usize>, marker: &str, end: Option<usize>| -> String {
        match start {
            Some(s) => {
                let body = &full[s + marker.len()..end.unwrap_or(full.len())];
                body.trim().to_string()
            }
            None => UNKNOWN.to_string(),
        }
    };

    let when = match target_at {
        Some(_) => section(when_at, WHEN, target_at),
        None => UNKNOWN.to_string(),
    };
    let target = match effect_at {
        Some(_) => section(target_at, TARGET, effect_at),
        None => UNKNOWN.to_string(),
    };
    let effect = section(effect_at, EFFECT, None);

    StratagemSections {
        when,
        target,
        effect,
        full_description: full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_tags_and_whitespace() {
        assert_eq!(
            normalize("  <b>Deep</b>  Strike\n\n<i>ability</i> "),
            "Deep Strike ability"
        );
        assert_eq!(normalize("one<br>two<p>three</p>"), "one two three");
        assert_eq!(normalize("<span class=\"kwb\">ADEPTUS</span>"), "ADEPTUS");
    }

    #[test]
    fn normalize_decodes_entities() {
        assert_eq!(normalize("Hit &amp; Run"), "Hit & Run");
        assert_eq!(normalize("&lt;3&gt; &quot;x&quot; &#39;y&#x27;"), "<3> \"x\" 'y'");
        assert_eq!(normalize("a&nbsp;b"), "a b");
    }

    #[test]
    fn normalize_keeps_stray_symbols() {
        assert_eq!(normalize("3 < 4 & 5"), "3 < 4 & 5");
        assert_eq!(normalize("AT&T"), "AT&T");
    }

    #[test]
    fn weapon_compound_text() {
        let weapon = parse_weapon_text(
            "Boltstorm",
            "Lethal Hits,Anti-Infantry 2+|24\"|Rapid Fire 1|2|3+|4|-1|1",
            &WeaponColumns::default(),
        );
        assert_eq!(weapon.special_rules, vec!["Lethal Hits", "Anti-Infantry 2+"]);
        assert_eq!(weapon.range, "24\"");
        assert_eq!(weapon.weapon_type, "Rapid Fire 1");
        assert_eq!(weapon.attacks, "2");
        assert_eq!(weapon.skill, "3+");
        assert_eq!(weapon.strength, "4");
        assert_eq!(weapon.ap, "-1");
        assert_eq!(weapon.damage, "1");
    }

    #[test]
    fn weapon_rules_only_uses_columns() {
        let columns = WeaponColumns {
            range: "Melee",
            weapon_type: "Melee",
            attacks: "4",
            skill: "2+",
            strength: "5",
            ap: "-2",
            damage: "1",
        };
        let weapon = parse_weapon_text("Power sword", "Precision, Sustained Hits 1", &columns);
        assert_eq!(weapon.special_rules, vec!["Precision", "Sustained Hits 1"]);
        assert_eq!(weapon.range, "Melee");
        assert!(weapon.is_melee());
        assert_eq!(weapon.ap, "-2");
    }

    #[test]
    fn weapon_melee_stops_rule_prefix() {
        let weapon = parse_weapon_text(
            "Claws",
            "Twin-linked|Melee|Melee|6|3+|6|-1|2",
            &WeaponColumns::default(),
        );
        assert_eq!(weapon.special_rules, vec!["Twin-linked"]);
        assert_eq!(weapon.range, "Melee");
        assert_eq!(weapon.weapon_type, "Melee");
        assert_eq!(weapon.damage, "2");
    }

    #[test]
    fn weapon_partial_inline_stats_fall_back() {
        let columns = WeaponColumns {
            range: "18\"",
            weapon_type: "Ranged",
            attacks: "D6",
            skill: "N/A",
            strength: "6",
            ap: "-1",
            damage: "1",
        };
        let weapon = parse_weapon_text("Flamer", "Ignores Cover|12\"||D3", &columns);
        assert_eq!(weapon.special_rules, vec!["Ignores Cover"]);
        assert_eq!(weapon.range, "12\"");
        assert_eq!(weapon.weapon_type, "Ranged");
        assert_eq!(weapon.attacks, "D3");
        assert_eq!(weapon.skill, "N/A");
    }

    #[test]
    fn weapon_empty_text() {
        let columns = WeaponColumns {
            range: "24\"",
            weapon_type: "Ranged",
            ..Default::default()
        };
        let weapon = parse_weapon_text("Bolter", "", &columns);
        assert!(weapon.special_rules.is_empty());
        assert_eq!(weapon.range, "24\"");
        assert_eq!(weapon.weapon_type, "Ranged");
        assert_eq!(weapon.attacks, "");
    }

    #[test]
    fn numeric_segments() {
        assert!(starts_numeric("24\""));
        assert!(starts_numeric("-1"));
        assert!(starts_numeric(".5"));
        assert!(starts_numeric(""));
        assert!(!starts_numeric("Anti-Infantry 2+"));
        assert!(!starts_numeric("D6"));
        assert!(!starts_numeric("-"));
    }

    #[test]
    fn stratagem_sections() {
        let s = split_stratagem("WHEN: Your turn. TARGET: One unit. EFFECT: Deal 1 damage.");
        assert_eq!(s.when, "Your turn.");
        assert_eq!(s.target, "One unit.");
        assert_eq!(s.effect, "Deal 1 damage.");
        assert_eq!(
            s.full_description,
            "WHEN: Your turn. TARGET: One unit. EFFECT: Deal 1 damage."
        );
    }

    #[test]
    fn stratagem_markers_ignore_case_and_markup() {
        let s = split_stratagem(
            "<b>When:</b> Fight phase.<br><b>Target:</b>  One\nunit.<br><b>Effect:</b> +1 to hit.",
        );
        assert_eq!(s.when, "Fight phase.");
        assert_eq!(s.target, "One unit.");
        assert_eq!(s.effect, "+1 to hit.");
        assert_eq!(
            s.full_description,
            "When: Fight phase. Target: One unit. Effect: +1 to hit."
        );
    }

    #[test]
    fn stratagem_missing_markers() {
        let s = split_stratagem("Just some flavour text.");
        assert_eq!(s.when, UNKNOWN);
        assert_eq!(s.target, UNKNOWN);
        assert_eq!(s.effect, UNKNOWN);
        assert_eq!(s.full_description, "Just some flavour text.");

        let s = split_stratagem("WHEN: Any phase. EFFECT: Heal.");
        assert_eq!(s.when, UNKNOWN);
        assert_eq!(s.target, UNKNOWN);
        assert_eq!(s.effect, "Heal.");
    }
}
