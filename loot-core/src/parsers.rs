//! Line-pattern extraction for monster infobox and drop-table fields.
//!
//! The source markup places one template field per line, so extraction is a
//! line scan against a fixed table of field patterns rather than a full
//! wiki-markup parse. A line that matches no pattern is ignored.

use crate::models::{DropEntry, Monster};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

/// Marker token identifying a drop-table row.
const DROPS_LINE_MARKER: &str = "DropsLine";

/// Name-notes code marking an individual drop as members-only.
const MEMBERS_NOTE_CODE: &str = "m";

lazy_static! {
    static ref MEMBERS: Regex = Regex::new(r"(?i)\|\s*members\s*=\s*(yes|no)").unwrap();
    // The digit suffix covers task-giver variants (slaylvl2) and combat
    // variants (combat2) of the same field.
    static ref SLAYER_LVL: Regex = Regex::new(r"(?i)\|\s*slaylvl\d?\s*=\s*(\d+)").unwrap();
    static ref COMBAT_LVL: Regex = Regex::new(r"(?i)\|\s*combat\d?\s*=\s*(\d+)").unwrap();
    // DropsLine sub-fields: `Field = value` terminated by `|` or `}`.
    static ref DROP_NAME: Regex = Regex::new(r"Name\s*=\s*(.*?)\s*[|}]").unwrap();
    static ref DROP_QUANTITY: Regex = Regex::new(r"Quantity\s*=\s*(.*?)\s*[|}]").unwrap();
    static ref DROP_RARITY: Regex = Regex::new(r"Rarity\s*=\s*(.*?)\s*[|}]").unwrap();
    static ref NAME_NOTES: Regex = Regex::new(r"Namenotes\s*=\s*\{\{\((.*?)\)\}\}\s*[|}]").unwrap();
}

/// Extract a [`Monster`] from one wiki page body.
///
/// Every line is tested independently against the recognized patterns:
/// membership (last match wins), slayer level (maximum of all candidates,
/// default 1), combat level (deduplicated set), and drop-table rows. A page
/// with no recognized drop lines yields an empty drop list, not an error.
pub fn extract_monster(title: &str, text: &str) -> Monster {
    let mut members_only = false;
    let mut slayer_lvl: u32 = 1;
    let mut combat_lvls = BTreeSet::new();
    let mut drop_list = Vec::new();

    for line in text.lines() {
        if let Some(caps) = MEMBERS.captures(line) {
            members_only = caps[1].eq_ignore_ascii_case("yes");
        }
        if let Some(caps) = SLAYER_LVL.captures(line) {
            if let Ok(lvl) = caps[1].parse::<u32>() {
                slayer_lvl = slayer_lvl.max(lvl);
            }
        }
        if let Some(caps) = COMBAT_LVL.captures(line) {
            if let Ok(lvl) = caps[1].parse::<u32>() {
                combat_lvls.insert(lvl);
            }
        }
        if line.contains(DROPS_LINE_MARKER) {
            if let Some(drop) = extract_drop_entry(line, members_only) {
                drop_list.push(drop);
            }
        }
    }

    Monster {
        name: title.to_string(),
        members_only,
        slayer_lvl,
        combat_lvls,
        drop_list,
    }
}

/// A line is accepted as a drop entry only when all three of the name,
/// quantity, and rarity fields match; otherwise it is silently skipped.
///
/// A drop on a members-only monster is always members-only. On a free
/// monster, a `Namenotes = {{(m)}}` code restricts just that drop.
fn extract_drop_entry(line: &str, monster_members: bool) -> Option<DropEntry> {
    let item = DROP_NAME.captures(line)?[1].to_string();
    let quantity = DROP_QUANTITY.captures(line)?[1].to_string();
    let rarity = DROP_RARITY.captures(line)?[1].to_string();

    let members_only = monster_members
        || NAME_NOTES
            .captures(line)
            .is_some_and(|caps| caps[1].eq_ignore_ascii_case(MEMBERS_NOTE_CODE));

    Some(DropEntry {
        item,
        quantity,
        rarity,
        members_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_drop_lines_yields_empty_list() {
        let text = "| members = No\n|combat = 5\nJust some article prose.";
        let monster = extract_monster("Goblin", text);
        assert_eq!(monster.name, "Goblin");
        assert!(monster.drop_list.is_empty());
        assert!(!monster.members_only);
    }

    #[test]
    fn test_drop_fields_extracted() {
        let text = "{{DropsLine|Name=Bones|Quantity=1|Rarity=Always}}";
        let monster = extract_monster("Goblin", text);
        assert_eq!(monster.drop_list.len(), 1);
        let drop = &monster.drop_list[0];
        assert_eq!(drop.item, "Bones");
        assert_eq!(drop.quantity, "1");
        assert_eq!(drop.rarity, "Always");
        assert!(!drop.members_only);
    }

    #[test]
    fn test_quantity_and_rarity_stay_opaque_text() {
        let text = "{{DropsLine|Name=Coins|Quantity=5-10|Rarity=1/128}}";
        let monster = extract_monster("Imp", text);
        assert_eq!(monster.drop_list[0].quantity, "5-10");
        assert_eq!(monster.drop_list[0].rarity, "1/128");
    }

    #[test]
    fn test_malformed_drop_line_skipped() {
        // Missing Rarity: the whole line is dropped, no error.
        let text = "{{DropsLine|Name=Bones|Quantity=1}}\n{{DropsLine|Name=Coins|Quantity=3|Rarity=Common}}";
        let monster = extract_monster("Goblin", text);
        assert_eq!(monster.drop_list.len(), 1);
        assert_eq!(monster.drop_list[0].item, "Coins");
    }

    #[test]
    fn test_slayer_level_takes_maximum() {
        let text = "| slaylvl = 5\n| slaylvl2 = 10";
        let monster = extract_monster("Banshee", text);
        assert_eq!(monster.slayer_lvl, 10);
    }

    #[test]
    fn test_slayer_level_defaults_to_one() {
        let monster = extract_monster("Goblin", "| members = No");
        assert_eq!(monster.slayer_lvl, 1);
    }

    #[test]
    fn test_combat_levels_deduplicated() {
        let text = "|combat = 50\n|combat = 50\n|combat2 = 50";
        let monster = extract_monster("Skeleton", text);
        assert_eq!(monster.combat_lvls.len(), 1);
        assert!(monster.combat_lvls.contains(&50));
    }

    #[test]
    fn test_combat_level_variants_collected() {
        let text = "|combat = 2\n|combat2 = 5\n|combat3 = 11";
        let monster = extract_monster("Goblin", text);
        assert_eq!(
            monster.combat_lvls.iter().copied().collect::<Vec<_>>(),
            vec![2, 5, 11]
        );
    }

    #[test]
    fn test_members_flag_last_match_wins() {
        let monster = extract_monster("Goblin", "| members = Yes\n| members = No");
        assert!(!monster.members_only);
    }

    #[test]
    fn test_members_flag_case_insensitive() {
        let monster = extract_monster("Abyssal demon", "| MEMBERS = Yes");
        assert!(monster.members_only);
    }

    #[test]
    fn test_members_monster_drops_inherit() {
        let text = "| members = Yes\n{{DropsLine|Name=Ashes|Quantity=1|Rarity=Always}}\n{{DropsLine|Name=Coins|Quantity=44|Rarity=Common}}";
        let monster = extract_monster("Abyssal demon", text);
        assert!(monster.members_only);
        assert!(monster.drop_list.iter().all(|d| d.members_only));
    }

    #[test]
    fn test_namenotes_m_marks_members_drop() {
        let text = "| members = No\n{{DropsLine|Name=Dragon spear|Namenotes={{(M)}}|Quantity=1|Rarity=Rare}}\n{{DropsLine|Name=Coins|Quantity=3|Rarity=Common}}";
        let monster = extract_monster("Hobgoblin", text);
        assert!(!monster.members_only);
        assert_eq!(monster.drop_list.len(), 2);
        assert!(monster.drop_list[0].members_only);
        assert!(!monster.drop_list[1].members_only);
    }

    #[test]
    fn test_namenotes_other_code_stays_free() {
        let text = "{{DropsLine|Name=Coins|Namenotes={{(x)}}|Quantity=3|Rarity=Common}}";
        let monster = extract_monster("Goblin", text);
        assert!(!monster.drop_list[0].members_only);
    }
}
