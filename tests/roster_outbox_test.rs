use anyhow::Result;
use secret_santa::core::ParticipantSource;
use secret_santa::{
    DeliveryPolicy, ExchangeDetails, MatchOptions, MatchingEngine, Notifier, OutboxMailer, Roster,
    RosterFile, RunOutcome, SantaError, SecretSanta,
};
use tempfile::TempDir;

fn details() -> ExchangeDetails {
    ExchangeDetails {
        exchange_name: "Office Gift Exchange".to_string(),
        year: "2026".to_string(),
        wish_list: "https://example.com/wishes".to_string(),
        sender: "organizer@example.com".to_string(),
        reply_to: Some("elf@example.com".to_string()),
        budget: "$15".to_string(),
    }
}

#[test]
fn test_load_json_roster() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("participants.json");
    std::fs::write(
        &path,
        r#"{
  "participants": [
    {"name": "Ann", "email": "ann@example.com", "exclusions": ["Ben"]},
    {"name": "Ben", "email": "ben@example.com", "exclusions": ["Ann"]},
    {"name": "Cat", "email": "cat@example.com", "exclusions": []}
  ]
}"#,
    )?;

    let roster = Roster::new(RosterFile::new(&path).load_participants()?)?;

    assert_eq!(roster.len(), 3);
    assert!(roster.get("Ann").unwrap().excludes("Ben"));
    assert_eq!(roster.get("Cat").unwrap().email, "cat@example.com");
    Ok(())
}

#[test]
fn test_duplicate_names_rejected_on_load() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("participants.csv");
    std::fs::write(
        &path,
        "name,email,exclusions\nAnn,ann@example.com,\nAnn,ann2@example.com,\n",
    )?;

    let participants = RosterFile::new(&path).load_participants()?;
    assert!(matches!(
        Roster::new(participants),
        Err(SantaError::RosterError { .. })
    ));
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let result = RosterFile::new("/definitely/not/here/participants.yaml").load_participants();
    assert!(matches!(result, Err(SantaError::IoError(_))));
}

#[tokio::test]
async fn test_end_to_end_with_outbox() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let roster_path = temp_dir.path().join("participants.yaml");
    std::fs::write(
        &roster_path,
        "participants:
  - name: Ann
    email: ann@example.com
    exclusions: [Ben]
  - name: Ben
    email: ben@example.com
    exclusions: [Ann]
  - name: Cat
    email: cat@example.com
  - name: Dan
    email: dan@example.com
",
    )?;
    let outbox_dir = temp_dir.path().join("outbox");

    let roster = Roster::new(RosterFile::new(&roster_path).load_participants()?)?;
    let engine = MatchingEngine::new(MatchOptions {
        max_attempts: 100,
        preflight: true,
    });
    let notifier = Notifier::new(OutboxMailer::new(&outbox_dir), details())
        .with_policy(DeliveryPolicy::AbortOnFailure);
    let santa = SecretSanta::new(roster, engine, notifier);

    let outcome = santa.run().await?;
    assert!(matches!(outcome, RunOutcome::Delivered(ref report) if report.delivered.len() == 4));

    for name in ["ann", "ben", "cat", "dan"] {
        let eml = std::fs::read_to_string(outbox_dir.join(format!("{}.eml", name)))?;
        assert!(eml.contains(&format!("To: {}@example.com", name)));
        assert!(eml.contains("Reply-To: elf@example.com"));
        assert!(eml.contains("Subject: Office Gift Exchange 2026!"));
        assert!(eml.contains("under $15"));
    }

    let ann = std::fs::read_to_string(outbox_dir.join("ann.eml"))?;
    assert!(!ann.contains("gift for Ben."));
    assert!(!ann.contains("gift for Ann."));
    Ok(())
}

#[tokio::test]
async fn test_infeasible_roster_writes_no_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outbox_dir = temp_dir.path().join("outbox");

    let roster = Roster::new(vec![
        secret_santa::Participant::new("Ann", "ann@example.com").with_exclusions(["Ben", "Cat"]),
        secret_santa::Participant::new("Ben", "ben@example.com"),
        secret_santa::Participant::new("Cat", "cat@example.com"),
    ])?;
    let santa = SecretSanta::new(
        roster,
        MatchingEngine::new(MatchOptions {
            max_attempts: 10,
            preflight: false,
        }),
        Notifier::new(OutboxMailer::new(&outbox_dir), details()),
    );

    assert_eq!(santa.run().await?, RunOutcome::NoMatch { attempts: 10 });
    assert!(!outbox_dir.exists());
    Ok(())
}

#[tokio::test]
async fn test_names_differing_in_case_each_get_a_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outbox_dir = temp_dir.path().join("outbox");

    let roster = Roster::new(vec![
        secret_santa::Participant::new("Bob", "bob@example.com"),
        secret_santa::Participant::new("bob", "little.bob@example.com"),
        secret_santa::Participant::new("Cat", "cat@example.com"),
    ])?;
    let santa = SecretSanta::new(
        roster,
        MatchingEngine::new(MatchOptions {
            max_attempts: 200,
            preflight: false,
        }),
        Notifier::new(OutboxMailer::new(&outbox_dir), details()),
    );

    let delivered = match santa.run().await? {
        RunOutcome::Delivered(report) => report.delivered.len(),
        RunOutcome::NoMatch { attempts } => panic!("no match after {} attempts", attempts),
    };
    let files = std::fs::read_dir(&outbox_dir)?.count();
    assert_eq!(delivered, 3);
    assert_eq!(files, 3);

    let mut recipients = Vec::new();
    for entry in std::fs::read_dir(&outbox_dir)? {
        let eml = std::fs::read_to_string(entry?.path())?;
        let to = eml
            .lines()
            .find_map(|line| line.strip_prefix("To: "))
            .map(str::to_string);
        recipients.extend(to);
    }
    recipients.sort();
    assert_eq!(
        recipients,
        ["bob@example.com", "cat@example.com", "little.bob@example.com"]
    );
    Ok(())
}
