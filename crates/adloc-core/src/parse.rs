//! Bulk loading of the `name:/path1[,/path2...]` line format.
//!
//! ```text
//! Yandex.Direct:/ru
//! Revdinsky worker:/ru/svrd/revda,/ru/svrd/pervik
//! ```
//!
//! Each line names one platform and lists every location it covers. Loading
//! always replaces the existing hierarchy. Any malformed line aborts the load;
//! nodes created before the failure are left in place, so callers should clear
//! the tree when loading fails.

use std::path::Path;

use crate::error::{LineFault, PlatformError, Result};
use crate::segment;
use crate::tree::{NodeId, PlatformTree};

impl PlatformTree {
    /// Replace the hierarchy under the root with the contents of `text`.
    pub fn parse(&mut self, text: &str) -> Result<()> {
        self.parse_into(self.root(), text)
    }

    /// Replace the hierarchy under `target` with the contents of `text`.
    pub fn parse_into(&mut self, target: NodeId, text: &str) -> Result<()> {
        self.clear(target)?;

        let mut lines = text.lines().enumerate().peekable();
        if lines.peek().is_none() {
            return Err(PlatformError::NoData);
        }

        let mut parsed = 0usize;
        for (index, line) in lines {
            let line_number = index + 1;
            let (name, locations) = split_line(line).map_err(|fault| PlatformError::ParseFormat {
                line: line_number,
                fault,
            })?;

            for location in locations.split(',') {
                if !segment::is_valid_path(location, self.delimiter()) {
                    return Err(PlatformError::ParseFormat {
                        line: line_number,
                        fault: LineFault::InvalidPath(location.to_string()),
                    });
                }
                let node = self.realize(target, location)?;
                self.set_name(node, name)?;
            }

            tracing::debug!(line = line_number, name, locations, "parsed platform line");
            parsed += 1;
        }

        tracing::info!(
            lines = parsed,
            platforms = self.platform_count(),
            "loaded platform hierarchy"
        );
        Ok(())
    }

    /// Read a UTF-8 file and load it with [`PlatformTree::parse`].
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PlatformError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        self.parse(&content)
    }

    /// Walk `location` from `from`, creating structural nodes as needed, and
    /// return the terminal node.
    fn realize(&mut self, from: NodeId, location: &str) -> Result<NodeId> {
        let delimiter = self.delimiter();
        let mut current = from;
        for segment in segment::segments(location, delimiter) {
            current = self.get_or_add(current, segment)?;
        }
        Ok(current)
    }
}

/// Split a line into its name and locations fields.
fn split_line(line: &str) -> std::result::Result<(&str, &str), LineFault> {
    let mut fields = line.split(':');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(locations), None) => {
            if name.is_empty() || locations.is_empty() {
                Err(LineFault::EmptyField)
            } else {
                Ok((name, locations))
            }
        }
        _ => Err(LineFault::MissingSeparator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_DATA: &str =
        "Yandex.Marketing:/ru\nVkusno i tochka:/ru/vkustoch,/ru/nevktch";

    fn parse_err(text: &str) -> PlatformError {
        PlatformTree::new().parse(text).unwrap_err()
    }

    #[test]
    fn parse_valid_data() {
        let mut tree = PlatformTree::new();
        tree.parse(VALID_DATA).unwrap();
        assert_eq!(tree.platform_count(), 3);
        assert_eq!(
            tree.find_names("/ru/vkustoch").unwrap(),
            vec!["Yandex.Marketing", "Vkusno i tochka"]
        );
    }

    #[test]
    fn parse_round_trip_queries() {
        let mut tree = PlatformTree::new();
        tree.parse("A:/xx\nB:/xx/yy,/xx/zz").unwrap();
        assert_eq!(tree.find_names("/xx/yy").unwrap(), vec!["A", "B"]);
        assert_eq!(tree.find_names("/xx/zz").unwrap(), vec!["A", "B"]);
        assert!(tree.find_names("/nope").unwrap().is_empty());
    }

    #[test]
    fn parse_accepts_crlf_and_trailing_newline() {
        let mut tree = PlatformTree::new();
        tree.parse("A:/xx\r\nB:/xx/yy\r\n").unwrap();
        assert_eq!(tree.find_names("/xx/yy").unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn parse_empty_is_no_data() {
        assert!(matches!(parse_err(""), PlatformError::NoData));
    }

    #[test]
    fn parse_whitespace_is_malformed() {
        assert!(matches!(
            parse_err(" "),
            PlatformError::ParseFormat {
                line: 1,
                fault: LineFault::MissingSeparator
            }
        ));
    }

    #[test]
    fn parse_unparseable_text() {
        assert!(matches!(
            parse_err("Impossible text to parse"),
            PlatformError::ParseFormat { line: 1, .. }
        ));
    }

    #[test]
    fn missing_separator_reports_line_number() {
        let err = parse_err("A:/xx\nB /yy\nC:/zz");
        assert!(matches!(
            err,
            PlatformError::ParseFormat {
                line: 2,
                fault: LineFault::MissingSeparator
            }
        ));
        assert!(err.to_string().starts_with("line 2:"));
    }

    #[test]
    fn repeated_separator_is_malformed() {
        assert!(matches!(
            parse_err("A:/xx:/yy"),
            PlatformError::ParseFormat {
                line: 1,
                fault: LineFault::MissingSeparator
            }
        ));
    }

    #[test]
    fn empty_fields_are_malformed() {
        for text in ["A:", ":/xx", ":"] {
            assert!(
                matches!(
                    parse_err(text),
                    PlatformError::ParseFormat {
                        line: 1,
                        fault: LineFault::EmptyField
                    }
                ),
                "{text:?}"
            );
        }
    }

    #[test]
    fn invalid_path_is_reported_with_line() {
        let err = parse_err("A:/xx\nB:/yy,/zz/");
        match err {
            PlatformError::ParseFormat {
                line,
                fault: LineFault::InvalidPath(path),
            } => {
                assert_eq!(line, 2);
                assert_eq!(path, "/zz/");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_line_in_middle_is_malformed() {
        assert!(matches!(
            parse_err("A:/xx\n\nB:/yy"),
            PlatformError::ParseFormat { line: 2, .. }
        ));
    }

    #[test]
    fn parse_replaces_previous_data() {
        let mut tree = PlatformTree::new();
        tree.parse("A:/xx,/yy").unwrap();
        tree.parse("B:/zz").unwrap();
        assert!(tree.find_names("/xx").unwrap().is_empty());
        assert_eq!(tree.find_names("/zz").unwrap(), vec!["B"]);
    }

    #[test]
    fn failed_parse_can_be_cleared() {
        let mut tree = PlatformTree::new();
        assert!(tree.parse("A:/xx\nbroken").is_err());
        tree.clear(tree.root()).unwrap();
        assert!(tree.is_empty());
        assert!(tree.find_names("/xx").unwrap().is_empty());
    }

    #[test]
    fn later_line_names_structural_node() {
        let mut tree = PlatformTree::new();
        tree.parse("Leaf:/aa/bb\nMiddle:/aa").unwrap();
        assert_eq!(tree.find_names("/aa/bb").unwrap(), vec!["Middle", "Leaf"]);
    }

    #[test]
    fn parse_into_inner_node() {
        let mut tree = PlatformTree::new();
        let ru = tree.get_or_add(tree.root(), "/ru").unwrap();
        tree.parse_into(ru, "Moscow:/msk").unwrap();
        assert_eq!(tree.location(tree.lookup(ru, "/msk").unwrap().unwrap()).unwrap(), "/ru/msk");
        assert_eq!(tree.find_names("/ru/msk").unwrap(), vec!["Moscow"]);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.txt");
        std::fs::write(&path, VALID_DATA).unwrap();

        let mut tree = PlatformTree::new();
        tree.load_file(&path).unwrap();
        assert_eq!(tree.platform_count(), 3);
    }

    #[test]
    fn load_not_found() {
        let result = PlatformTree::new().load_file(Path::new("/nonexistent/platforms.txt"));
        assert!(matches!(result.unwrap_err(), PlatformError::NotFound { .. }));
    }
}
