//! Query result formatting: CSV rows or OSRS wiki ItemDropsLine markup.

use crate::error::Result;
use crate::models::DropRow;
use std::io::Write;

/// Column headers matching the query's fixed projection.
const CSV_HEADER: [&str; 5] = ["monster", "item", "combat_lvls", "rarity", "quantity"];

/// Placeholder rendered when a monster has no recorded combat levels.
const NO_COMBAT_LVL: &str = "N/A";

/// Write rows as CSV with a header line. The csv crate quotes fields
/// containing the delimiter, so free-text rarities and quantities survive.
pub fn write_csv<W: Write>(rows: &[DropRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for row in rows {
        csv_writer.write_record([
            row.monster.as_str(),
            row.item.as_str(),
            row.combat_lvls.as_deref().unwrap_or(""),
            row.rarity.as_str(),
            row.quantity.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write rows as an OSRS wiki ItemDropsTable section: a fixed two-line
/// header, then one ItemDropsLine per row. Only meaningful for
/// monster-centric queries, but renders whatever rows it is given.
pub fn write_drops_lines<W: Write>(rows: &[DropRow], mut writer: W) -> Result<()> {
    writeln!(writer, "==Dropping monsters==")?;
    writeln!(writer, "{{{{ItemDropsTableHead}}}}")?;
    for row in rows {
        let combat_lvls = match row.combat_lvls.as_deref() {
            Some(lvls) if !lvls.is_empty() => lvls,
            _ => NO_COMBAT_LVL,
        };
        writeln!(
            writer,
            "{{{{ItemDropsLine|Monster={}|Combat={}|Quantity={}|Rarity={}}}}}",
            row.monster, combat_lvls, row.quantity, row.rarity
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(monster: &str, item: &str, combat_lvls: Option<&str>) -> DropRow {
        DropRow {
            monster: monster.to_string(),
            item: item.to_string(),
            combat_lvls: combat_lvls.map(str::to_string),
            rarity: "Common".to_string(),
            quantity: "1".to_string(),
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let rows = vec![row("Goblin", "Bones", Some("2,5"))];
        let mut out = Vec::new();
        write_csv(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "monster,item,combat_lvls,rarity,quantity");
        assert_eq!(lines[1], "Goblin,Bones,\"2,5\",Common,1");
    }

    #[test]
    fn test_csv_empty_combat_lvls_renders_empty_field() {
        let rows = vec![row("Scarecrow", "Straw", None)];
        let mut out = Vec::new();
        write_csv(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1).unwrap(), "Scarecrow,Straw,,Common,1");
    }

    #[test]
    fn test_drops_lines_header_and_fields() {
        let rows = vec![row("Goblin", "Bones", Some("2,5"))];
        let mut out = Vec::new();
        write_drops_lines(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "==Dropping monsters==");
        assert_eq!(lines[1], "{{ItemDropsTableHead}}");
        assert_eq!(
            lines[2],
            "{{ItemDropsLine|Monster=Goblin|Combat=2,5|Quantity=1|Rarity=Common}}"
        );
    }

    #[test]
    fn test_drops_lines_absent_combat_uses_placeholder() {
        let rows = vec![row("Scarecrow", "Straw", None), row("Ghost", "Ecto", Some(""))];
        let mut out = Vec::new();
        write_drops_lines(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for line in text.lines().skip(2) {
            assert!(line.contains("|Combat=N/A|"), "line was: {}", line);
        }
    }
}
