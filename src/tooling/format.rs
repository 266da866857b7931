//! Text and JSON rendering of listing entries.

use crate::error::NexusError;
use crate::view::{DirEntry, ObjectEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a listing as a table, or as a JSON array when `format` is "json".
pub fn format_entries(entries: &[DirEntry], format: &str) -> Result<String, NexusError> {
    if format == "json" {
        return serde_json::to_string_pretty(entries)
            .map_err(|e| NexusError::Decode(e.to_string()));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Type", "Size", "Modified", "Path"]);
    for entry in entries {
        match entry {
            DirEntry::Directory(dir) => table.add_row(vec![
                "dir".to_string(),
                format!("{} items", dir.items),
                timestamp(dir.mod_time),
                format!("{}/", dir.path),
            ]),
            DirEntry::Object(object) => table.add_row(vec![
                "file".to_string(),
                object.size.to_string(),
                timestamp(object.mod_time),
                object.path.clone(),
            ]),
        };
    }
    Ok(table.to_string())
}

/// Render a single object.
pub fn format_object(object: &ObjectEntry, format: &str) -> Result<String, NexusError> {
    if format == "json" {
        return serde_json::to_string_pretty(object)
            .map_err(|e| NexusError::Decode(e.to_string()));
    }
    let mut out = String::new();
    out.push_str(&format!("Path:     {}\n", object.path));
    out.push_str(&format!("Size:     {}\n", object.size));
    out.push_str(&format!("Modified: {}\n", timestamp(object.mod_time)));
    out.push_str(&format!("MD5:      {}\n", object.checksum.md5));
    out.push_str(&format!("SHA-1:    {}", object.checksum.sha1));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Checksum;
    use crate::view::DirectoryEntry;
    use chrono::TimeZone;

    fn sample() -> Vec<DirEntry> {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
        vec![
            DirEntry::Directory(DirectoryEntry {
                path: "a/b".to_string(),
                mod_time: time,
                items: 2,
            }),
            DirEntry::Object(ObjectEntry {
                path: "a/d.txt".to_string(),
                size: 4,
                checksum: Checksum {
                    md5: "m".to_string(),
                    sha1: "s".to_string(),
                },
                mod_time: time,
            }),
        ]
    }

    #[test]
    fn test_text_listing() {
        let out = format_entries(&sample(), "text").unwrap();
        assert!(out.contains("a/b/"));
        assert!(out.contains("2 items"));
        assert!(out.contains("a/d.txt"));
        assert!(out.contains("2024-03-01T10:15:00.000Z"));
    }

    #[test]
    fn test_json_listing_is_tagged() {
        let out = format_entries(&sample(), "json").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries[0]["type"], "directory");
        assert_eq!(entries[0]["items"], 2);
        assert_eq!(entries[1]["type"], "object");
        assert_eq!(entries[1]["checksum"]["md5"], "m");
    }

    #[test]
    fn test_object_text() {
        let entries = sample();
        let object = entries[1].as_object().unwrap();
        let out = format_object(object, "text").unwrap();
        assert!(out.starts_with("Path:     a/d.txt"));
        assert!(out.contains("SHA-1:    s"));
    }
}
