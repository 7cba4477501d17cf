//! Parser for the markdown checklist that lists rooms by category.
//!
//! Only two line shapes carry data:
//!
//! ```text
//! ## <category heading>
//! - [ ] [<room title>](<room url>)
//! ```
//!
//! Every other line, including checked items (`- [x] ...`), is skipped.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Prefix the source document puts in front of most room titles.
pub const TITLE_PREFIX: &str = "TryHackMe | ";

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+(.+)$").expect("heading pattern is valid"));

static ROOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s+\[\s*\]\s+\[(.+?)\]\((.+?)\)").expect("room pattern is valid")
});

/// Source heading -> display name. Self-mapped entries are kept as listed.
const CATEGORY_NAMES: [(&str, &str); 26] = [
    ("Intro Rooms", "Introductory Rooms"),
    ("Linux Fundamentals", "Linux Fundamentals"),
    ("Windows Fundamentals", "Windows Fundamentals"),
    ("Basics Rooms", "Basic Rooms"),
    ("Recon", "Reconnaissance"),
    ("Scripting", "Scripting"),
    ("Networking", "Networking"),
    ("Tooling", "Tooling"),
    ("Crypto & Hashes", "Crypto & Hashes"),
    ("Steganography", "Steganography"),
    ("Web", "Web"),
    ("Android", "Android"),
    ("Forensics", "Forensics"),
    ("Wi-Fi Hacking", "Wifi Hacking"),
    ("Reverse Engineering", "Reverse Engineering"),
    ("Malware Analysis", "Malware Analysis"),
    ("PrivEsc", "Privilege Escalation"),
    ("Windows", "Windows"),
    ("Active Directory", "Active Directory"),
    ("PCAP Analysis", "PCAP Analysis"),
    ("BufferOverflow", "Buffer Overflow"),
    ("Easy CTF", "Easy CTF"),
    ("Medium CTF", "Medium CTF"),
    ("Hard CTF", "Hard CTF"),
    ("Misc", "Misc"),
    ("Special Events", "Special Events"),
];

/// A room line as found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRoom {
    pub title: String,
    pub url: String,
    /// 1-based position within the owning category.
    pub display_order: i32,
}

/// A category section with the rooms listed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCategory {
    pub name: String,
    /// 1-based position of the heading in the document.
    pub display_order: i32,
    pub rooms: Vec<ParsedRoom>,
}

impl ParsedCategory {
    fn new(name: String, display_order: i32) -> Self {
        Self {
            name,
            display_order,
            rooms: Vec::new(),
        }
    }

    /// Number of rooms listed under this category.
    pub fn total_rooms(&self) -> usize {
        self.rooms.len()
    }
}

/// Map a raw heading to its display name. Unknown headings pass through.
pub fn normalize_category_name(heading: &str) -> &str {
    CATEGORY_NAMES
        .iter()
        .find(|(source, _)| *source == heading)
        .map_or(heading, |(_, display)| *display)
}

/// Remove [`TITLE_PREFIX`] once from the start of `title`.
pub fn strip_title_prefix(title: &str) -> &str {
    title.strip_prefix(TITLE_PREFIX).unwrap_or(title)
}

/// Parse the whole document into categories in document order.
pub fn parse_checklist(content: &str) -> Vec<ParsedCategory> {
    let mut categories = Vec::new();
    let mut current: Option<ParsedCategory> = None;
    let mut category_order = 0;
    let mut room_order = 0;

    for line in content.lines() {
        let line = line.trim();

        if let Some(caps) = HEADING.captures(line) {
            if let Some(done) = current.take() {
                categories.push(done);
            }
            category_order += 1;
            room_order = 0;
            let name = normalize_category_name(&caps[1]).to_string();
            current = Some(ParsedCategory::new(name, category_order));
            continue;
        }

        // Rooms before the first heading have no owner.
        let Some(category) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = ROOM.captures(line) {
            room_order += 1;
            category.rooms.push(ParsedRoom {
                title: strip_title_prefix(&caps[1]).to_string(),
                url: caps[2].to_string(),
                display_order: room_order,
            });
        }
    }

    if let Some(done) = current {
        categories.push(done);
    }

    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
## Intro Rooms
- [ ] [TryHackMe | Intro](http://example.com/a)
- [ ] [Second](http://example.com/b)
## Recon
- [ ] [Nmap](http://example.com/c)
";

    #[test]
    fn parses_two_categories_in_order() {
        let categories = parse_checklist(SAMPLE);

        assert_eq!(
            categories,
            vec![
                ParsedCategory {
                    name: "Introductory Rooms".to_string(),
                    display_order: 1,
                    rooms: vec![
                        ParsedRoom {
                            title: "Intro".to_string(),
                            url: "http://example.com/a".to_string(),
                            display_order: 1,
                        },
                        ParsedRoom {
                            title: "Second".to_string(),
                            url: "http://example.com/b".to_string(),
                            display_order: 2,
                        },
                    ],
                },
                ParsedCategory {
                    name: "Reconnaissance".to_string(),
                    display_order: 2,
                    rooms: vec![ParsedRoom {
                        title: "Nmap".to_string(),
                        url: "http://example.com/c".to_string(),
                        display_order: 1,
                    }],
                },
            ]
        );
    }

    #[test]
    fn no_headings_means_no_categories() {
        let doc = "# Title\n\nSome prose.\n- [ ] [Orphan](http://example.com/o)\n";
        assert!(parse_checklist(doc).is_empty());
        assert!(parse_checklist("").is_empty());
    }

    #[test]
    fn category_orders_are_contiguous() {
        let doc = "## A\n\n### Not a category\n## B\ntext\n## C\n";
        let orders: Vec<i32> = parse_checklist(doc)
            .iter()
            .map(|c| c.display_order)
            .collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn room_orders_restart_per_category() {
        let doc = "\
## A
- [ ] [a1](u1)
- [ ] [a2](u2)
- [ ] [a3](u3)
## B
- [ ] [b1](u4)
";
        let categories = parse_checklist(doc);
        let orders: Vec<Vec<i32>> = categories
            .iter()
            .map(|c| c.rooms.iter().map(|r| r.display_order).collect())
            .collect();
        assert_eq!(orders, vec![vec![1, 2, 3], vec![1]]);
        assert_eq!(categories[0].total_rooms(), 3);
    }

    #[test]
    fn rooms_before_first_heading_do_not_shift_orders() {
        let doc = "\
- [ ] [orphan](u0)
- [ ] [orphan too](u1)
## A
- [ ] [a1](u2)
";
        let categories = parse_checklist(doc);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].rooms.len(), 1);
        assert_eq!(categories[0].rooms[0].display_order, 1);
    }

    #[test]
    fn title_padding_after_prefix_is_kept() {
        let doc = "## A\n- [ ] [TryHackMe |  Padded ](http://example.com/p)\n";
        let room = &parse_checklist(doc)[0].rooms[0];
        assert_eq!(room.title, " Padded ");
    }

    #[test]
    fn skipped_lines_do_not_advance_counters() {
        let doc = "\
## A
- [x] [done](u0)
Plain prose here.

- [ ] [first](u1)
- [X] [also done](u2)
- [ ] [second](u3)
";
        let rooms = &parse_checklist(doc)[0].rooms;
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].title, "first");
        assert_eq!(rooms[0].display_order, 1);
        assert_eq!(rooms[1].title, "second");
        assert_eq!(rooms[1].display_order, 2);
    }

    #[test]
    fn indented_lines_are_trimmed_before_matching() {
        let doc = "   ## Recon   \n    - [ ] [Nmap](http://example.com/c)\n";
        let categories = parse_checklist(doc);
        assert_eq!(categories[0].name, "Reconnaissance");
        assert_eq!(categories[0].rooms.len(), 1);
    }

    #[test]
    fn prefix_is_removed_once_from_the_start() {
        assert_eq!(strip_title_prefix("TryHackMe | Intro"), "Intro");
        assert_eq!(
            strip_title_prefix("TryHackMe | TryHackMe | Twice"),
            "TryHackMe | Twice"
        );
        assert_eq!(strip_title_prefix("Intro TryHackMe | "), "Intro TryHackMe | ");
        assert_eq!(strip_title_prefix("tryhackme | Intro"), "tryhackme | Intro");
        assert_eq!(strip_title_prefix("Plain"), "Plain");
    }

    #[test]
    fn normalization_uses_exact_matches() {
        assert_eq!(normalize_category_name("Intro Rooms"), "Introductory Rooms");
        assert_eq!(normalize_category_name("PrivEsc"), "Privilege Escalation");
        assert_eq!(normalize_category_name("Wi-Fi Hacking"), "Wifi Hacking");
        assert_eq!(normalize_category_name("Networking"), "Networking");
        assert_eq!(normalize_category_name("recon"), "recon");
        assert_eq!(normalize_category_name("Brand New"), "Brand New");
    }

    #[test]
    fn title_and_url_use_first_closing_delimiters() {
        let doc = "## A\n- [ ] [Title](http://example.com/x) trailing [note](y)\n";
        let room = &parse_checklist(doc)[0].rooms[0];
        assert_eq!(room.title, "Title");
        assert_eq!(room.url, "http://example.com/x");
    }
}
