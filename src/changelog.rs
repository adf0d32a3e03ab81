//! Changelog model and release-note synthesis.
//!
//! The on-disk format is the contract: a `# Changelog` title line followed by
//! reverse-chronological `## <version> (<date>)` sections, each with a
//! `### Changed` marker and `- <note>` lines. Files are parsed into a
//! structured sequence of sections on read and serialized back on write, so
//! none of the logic here works on raw line offsets.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{ReleaseError, Result};

const TITLE: &str = "# Changelog";

/// One block of the document: a `## <version> (<date>)` section, or the
/// header-less run of lines a hand-written changelog may carry between the
/// title and its first version section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub header: Option<String>,
    pub body: Vec<String>,
}

impl Section {
    /// Build a fresh section for a release: blank line, `### Changed`
    /// marker, the note lines, and a trailing blank separator.
    pub fn for_release(version: &str, date: &str, notes: &[String]) -> Self {
        let mut body = vec![String::new(), "### Changed".to_string()];
        body.extend(notes.iter().cloned());
        body.push(String::new());

        Section {
            header: Some(format!("## {} ({})", version, date)),
            body,
        }
    }

    /// Whether this section belongs to the given version.
    fn is_for(&self, version: &str) -> bool {
        let Some(header) = &self.header else {
            return false;
        };
        let exact = format!("## {}", version);
        header.starts_with(&format!("{} ", exact)) || header.trim() == exact
    }

    /// The section body joined and trimmed, as release-notes text.
    pub fn notes_text(&self) -> String {
        self.body.join("\n").trim().to_string()
    }
}

/// In-memory changelog document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changelog {
    /// Blocks in document order, newest release first; everything below
    /// the title lives here so a prepended section always lands directly
    /// under the title, ahead of any pre-existing text
    sections: Vec<Section>,
}

impl Changelog {
    /// Parse changelog text into the structured model.
    ///
    /// A leading `# Changelog` title (and one following blank line) is
    /// dropped here and re-emitted by [Changelog::render], so the title can
    /// never duplicate no matter how many times a file round-trips.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines().peekable();

        if lines
            .peek()
            .is_some_and(|l| l.trim_start().starts_with(TITLE))
        {
            lines.next();
            if lines.peek().is_some_and(|l| l.trim().is_empty()) {
                lines.next();
            }
        }

        let mut sections: Vec<Section> = Vec::new();

        for line in lines {
            if line.starts_with("## ") {
                sections.push(Section {
                    header: Some(line.to_string()),
                    body: Vec::new(),
                });
            } else if let Some(current) = sections.last_mut() {
                current.body.push(line.to_string());
            } else {
                // hand-written text ahead of the first version section
                sections.push(Section {
                    header: None,
                    body: vec![line.to_string()],
                });
            }
        }

        Changelog { sections }
    }

    /// Read a changelog from disk; a missing file yields an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Changelog::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(Changelog::parse(&text))
    }

    /// Serialize back to the on-disk format, title first.
    pub fn render(&self) -> String {
        let mut lines = vec![TITLE.to_string(), String::new()];
        for section in &self.sections {
            if let Some(header) = &section.header {
                lines.push(header.clone());
            }
            lines.extend(section.body.iter().cloned());
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Insert a section ahead of all existing ones.
    pub fn prepend(&mut self, section: Section) {
        self.sections.insert(0, section);
    }

    /// Notes text for a version's section, if present.
    pub fn notes_for(&self, version: &str) -> Option<String> {
        self.sections
            .iter()
            .find(|s| s.is_for(version))
            .map(Section::notes_text)
    }

    /// Version of the newest section, used as a fallback source for the
    /// current version when no tag exists.
    pub fn latest_version(&self) -> Option<String> {
        let re = version_header_re().ok()?;
        self.sections
            .iter()
            .filter_map(|s| s.header.as_deref())
            .find_map(|h| re.captures(h).map(|c| c[1].to_string()))
    }

    #[cfg(test)]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

fn version_header_re() -> std::result::Result<Regex, regex::Error> {
    Regex::new(r"^##\s+(\d+\.\d+\.\d+)\b")
}

/// Turn commit subjects into `- <subject>` note lines.
///
/// Maintenance subjects are dropped: merge commits, `chore:`/`chore(...)`
/// commits, and the tool's own `docs(changelog)` commits. When nothing
/// survives the filter a single placeholder note is substituted so the new
/// section is never empty.
pub fn notes_from_subjects(subjects: &[String]) -> Result<Vec<String>> {
    let exclude = Regex::new(r"(?i)^(Merge( pull request)?|chore[(:]|docs\(changelog\))")
        .map_err(|e| ReleaseError::changelog(e.to_string()))?;

    let notes: Vec<String> = subjects
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !exclude.is_match(s))
        .map(|s| format!("- {}", s))
        .collect();

    if notes.is_empty() {
        Ok(vec!["- No changes recorded since last version.".to_string()])
    } else {
        Ok(notes)
    }
}

/// Prepend a dated section for `version` to the changelog file.
///
/// The existing document (prior sections included) is preserved below the
/// new section; the title always appears exactly once, at the top.
pub fn update_changelog(path: &Path, version: &str, date: &str, notes: &[String]) -> Result<()> {
    let mut changelog = Changelog::load(path)?;
    changelog.prepend(Section::for_release(version, date, notes));
    fs::write(path, changelog.render())?;
    Ok(())
}

/// Re-read the changelog and extract the notes block for `version`.
///
/// Returns an empty string when the file or the section is missing; the
/// caller substitutes a default release description.
pub fn extract_release_notes(path: &Path, version: &str) -> Result<String> {
    let changelog = Changelog::load(path)?;
    Ok(changelog.notes_for(version).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_empty() {
        let changelog = Changelog::parse("");
        assert_eq!(changelog.section_count(), 0);
        assert_eq!(changelog.latest_version(), None);
    }

    #[test]
    fn test_render_starts_with_single_title() {
        let changelog = Changelog::parse("# Changelog\n\n## 1.0.0 (2024-01-01)\n\n- x\n");
        let rendered = changelog.render();
        assert!(rendered.starts_with("# Changelog\n\n"));
        assert_eq!(rendered.matches("# Changelog").count(), 1);
    }

    #[test]
    fn test_parse_render_round_trip() {
        let text = "# Changelog\n\n## 1.2.0 (2024-05-01)\n\n### Changed\n- feat: a\n\n## 1.1.0 (2024-04-01)\n\n### Changed\n- fix: b\n";
        assert_eq!(Changelog::parse(text).render(), text);
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut changelog = Changelog::parse("# Changelog\n\n## 1.0.0 (2024-01-01)\n\n- old\n");
        changelog.prepend(Section::for_release("1.1.0", "2024-02-01", &notes(&["- new"])));
        let rendered = changelog.render();
        let new_pos = rendered.find("## 1.1.0").unwrap();
        let old_pos = rendered.find("## 1.0.0").unwrap();
        assert!(new_pos < old_pos);
    }

    #[test]
    fn test_title_never_duplicates_across_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");

        update_changelog(&path, "0.1.0", "2024-01-01", &notes(&["- first"])).unwrap();
        update_changelog(&path, "0.2.0", "2024-02-01", &notes(&["- second"])).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("# Changelog").count(), 1);
        assert!(text.starts_with("# Changelog\n"));
        assert!(text.find("## 0.2.0").unwrap() < text.find("## 0.1.0").unwrap());
    }

    #[test]
    fn test_notes_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        let written = notes(&["- feat: one", "- fix: two"]);

        update_changelog(&path, "1.4.0", "2024-06-01", &written).unwrap();
        let extracted = extract_release_notes(&path, "1.4.0").unwrap();

        assert_eq!(extracted, "### Changed\n- feat: one\n- fix: two");
    }

    #[test]
    fn test_extract_missing_version_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        update_changelog(&path, "1.0.0", "2024-01-01", &notes(&["- a"])).unwrap();

        assert_eq!(extract_release_notes(&path, "9.9.9").unwrap(), "");
    }

    #[test]
    fn test_extract_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        assert_eq!(extract_release_notes(&path, "1.0.0").unwrap(), "");
    }

    #[test]
    fn test_extract_does_not_match_version_prefix() {
        let text = "# Changelog\n\n## 1.2.30 (2024-01-01)\n\n- other\n";
        let changelog = Changelog::parse(text);
        assert_eq!(changelog.notes_for("1.2.3"), None);
        assert_eq!(changelog.notes_for("1.2.30").unwrap(), "- other");
    }

    #[test]
    fn test_latest_version_reads_top_section() {
        let text = "# Changelog\n\n## 2.1.0 (2024-05-01)\n\n- a\n\n## 2.0.0 (2024-04-01)\n\n- b\n";
        assert_eq!(
            Changelog::parse(text).latest_version(),
            Some("2.1.0".to_string())
        );
    }

    #[test]
    fn test_preamble_is_preserved() {
        let text = "# Changelog\n\nAll notable changes are documented here.\n\n## 1.0.0 (2024-01-01)\n\n- a\n";
        assert_eq!(Changelog::parse(text).render(), text);
    }

    #[test]
    fn test_prepend_lands_above_existing_preamble() {
        let text = "# Changelog\n\nAll notable changes are documented here.\n\n## 1.0.0 (2024-01-01)\n\n- a\n";
        let mut changelog = Changelog::parse(text);
        changelog.prepend(Section::for_release("1.1.0", "2024-02-01", &notes(&["- b"])));
        let rendered = changelog.render();

        let pos = |needle: &str| rendered.find(needle).unwrap();
        assert!(pos("## 1.1.0") < pos("All notable changes are documented here."));
        assert!(pos("All notable changes are documented here.") < pos("## 1.0.0"));
    }

    #[test]
    fn test_filter_drops_maintenance_subjects() {
        let subjects = notes(&[
            "fix: bug",
            "chore: cleanup",
            "Merge pull request #1",
            "docs(changelog): 1.2.3",
            "feat: thing",
        ]);
        let filtered = notes_from_subjects(&subjects).unwrap();
        assert_eq!(filtered, vec!["- fix: bug", "- feat: thing"]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let subjects = notes(&["CHORE: noise", "merge branch 'x'", "feat: keep"]);
        let filtered = notes_from_subjects(&subjects).unwrap();
        assert_eq!(filtered, vec!["- feat: keep"]);
    }

    #[test]
    fn test_filter_scoped_chore() {
        let subjects = notes(&["chore(deps): bump serde", "fix: real"]);
        let filtered = notes_from_subjects(&subjects).unwrap();
        assert_eq!(filtered, vec!["- fix: real"]);
    }

    #[test]
    fn test_filter_placeholder_when_empty() {
        let filtered = notes_from_subjects(&notes(&["chore: only noise"])).unwrap();
        assert_eq!(filtered, vec!["- No changes recorded since last version."]);
    }

    #[test]
    fn test_filter_preserves_source_order() {
        let subjects = notes(&["feat: newest", "fix: older", "feat: oldest"]);
        let filtered = notes_from_subjects(&subjects).unwrap();
        assert_eq!(
            filtered,
            vec!["- feat: newest", "- fix: older", "- feat: oldest"]
        );
    }
}
