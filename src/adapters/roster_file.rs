use crate::core::{Participant, ParticipantSource};
use crate::utils::error::{Result, SantaError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Json,
    Yaml,
    Toml,
    Csv,
}

impl RosterFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(RosterFormat::Json),
            Some("yaml") | Some("yml") => Ok(RosterFormat::Yaml),
            Some("toml") => Ok(RosterFormat::Toml),
            Some("csv") => Ok(RosterFormat::Csv),
            other => Err(SantaError::InvalidConfigValueError {
                field: "participants".to_string(),
                value: path.display().to_string(),
                reason: format!(
                    "Unsupported file extension: {}. Allowed extensions: json, yaml, yml, toml, csv",
                    other.unwrap_or("<none>")
                ),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterDocument {
    participants: Vec<Participant>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    email: String,
    #[serde(default)]
    exclusions: Option<String>,
}

impl From<CsvRow> for Participant {
    fn from(row: CsvRow) -> Self {
        let exclusions = row
            .exclusions
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        Participant::new(row.name.trim(), row.email.trim()).with_exclusions(exclusions)
    }
}

pub fn parse_participants(content: &str, format: RosterFormat) -> Result<Vec<Participant>> {
    match format {
        RosterFormat::Json => Ok(serde_json::from_str::<RosterDocument>(content)?.participants),
        RosterFormat::Yaml => Ok(serde_yaml::from_str::<RosterDocument>(content)?.participants),
        RosterFormat::Toml => toml::from_str::<RosterDocument>(content)
            .map(|doc| doc.participants)
            .map_err(|e| SantaError::TomlError {
                message: e.to_string(),
            }),
        RosterFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::Headers)
                .from_reader(content.as_bytes());
            let mut participants: Vec<Participant> = Vec::new();
            for row in reader.deserialize::<CsvRow>() {
                participants.push(row?.into());
            }
            Ok(participants)
        }
    }
}

/// Participant list stored in a local file. The format follows the file
/// extension.
#[derive(Debug, Clone)]
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ParticipantSource for RosterFile {
    fn load_participants(&self) -> Result<Vec<Participant>> {
        let format = RosterFormat::from_path(&self.path)?;
        tracing::debug!("Reading {:?} participant list from {}", format, self.path.display());
        let content = std::fs::read_to_string(&self.path)?;
        let participants = parse_participants(&content, format)?;
        tracing::info!(
            "📋 Loaded {} participants from {}",
            participants.len(),
            self.path.display()
        );
        Ok(participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Roster;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            RosterFormat::from_path(Path::new("people.JSON")).unwrap(),
            RosterFormat::Json
        );
        assert_eq!(
            RosterFormat::from_path(Path::new("people.yml")).unwrap(),
            RosterFormat::Yaml
        );
        assert!(RosterFormat::from_path(Path::new("people.txt")).is_err());
        assert!(RosterFormat::from_path(Path::new("people")).is_err());
    }

    #[test]
    fn test_parse_json_without_exclusions_field() {
        let content = r#"{
            "participants": [
                {"name": "Alice", "email": "alice@example.com", "exclusions": ["Bob"]},
                {"name": "Bob", "email": "bob@example.com"}
            ]
        }"#;
        let participants = parse_participants(content, RosterFormat::Json).unwrap();
        assert_eq!(participants.len(), 2);
        assert!(participants[0].excludes("Bob"));
        assert!(participants[1].exclusions.is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let content = "
participants:
  - name: Alice
    email: alice@example.com
    exclusions: [Bob]
  - name: Bob
    email: bob@example.com
    exclusions: []
";
        let participants = parse_participants(content, RosterFormat::Yaml).unwrap();
        assert_eq!(participants[1].name, "Bob");
        assert!(participants[0].excludes("Bob"));
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
[[participants]]
name = "Alice"
email = "alice@example.com"
exclusions = ["Bob"]

[[participants]]
name = "Bob"
email = "bob@example.com"
"#;
        let participants = parse_participants(content, RosterFormat::Toml).unwrap();
        assert_eq!(participants.len(), 2);
        assert!(participants[0].excludes("Bob"));
    }

    #[test]
    fn test_parse_csv_with_semicolon_exclusions() {
        let content = "name,email,exclusions
Alice,alice@example.com,Bob; Carol
Bob,bob@example.com,
Carol,carol@example.com,Alice
";
        let participants = parse_participants(content, RosterFormat::Csv).unwrap();
        assert_eq!(participants.len(), 3);
        assert!(participants[0].excludes("Bob"));
        assert!(participants[0].excludes("Carol"));
        assert!(participants[1].exclusions.is_empty());
        assert!(participants[2].excludes("Alice"));
    }

    #[test]
    fn test_json_whitespace_matches_csv_after_roster_check() {
        let content = r#"{
            "participants": [
                {"name": " Alice", "email": "alice@example.com ", "exclusions": ["Bob "]},
                {"name": "Bob", "email": "bob@example.com"}
            ]
        }"#;
        let roster = Roster::new(parse_participants(content, RosterFormat::Json).unwrap()).unwrap();
        let alice = roster.get("Alice").unwrap();
        assert!(alice.excludes("Bob"));
        assert_eq!(alice.email, "alice@example.com");
    }

    #[test]
    fn test_missing_email_is_an_error() {
        let content = r#"{"participants": [{"name": "Alice"}]}"#;
        assert!(matches!(
            parse_participants(content, RosterFormat::Json),
            Err(SantaError::JsonError(_))
        ));
    }
}
