//! On-disk ticket persistence.

use chrono::{Duration, Utc};
use nurseai_client::{FileTicketStore, TICKET_FILE_NAME, TicketStore, RetryTicket};
use nurseai_core::TargetId;
use tempfile::TempDir;

fn ticket() -> RetryTicket {
    let now = Utc::now();
    RetryTicket::new(
        TargetId::from("cap-9"),
        1,
        now + Duration::seconds(60),
        now + Duration::minutes(30),
    )
}

#[tokio::test]
async fn test_save_load_clear() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = FileTicketStore::new(dir.path().join("nested").join(TICKET_FILE_NAME));

    assert!(store.load().await?.is_none());

    let ticket = ticket();
    store.save(&ticket).await?;
    assert_eq!(store.load().await?, Some(ticket));

    store.clear().await?;
    assert!(store.load().await?.is_none());
    // Clearing twice is fine
    store.clear().await?;
    Ok(())
}

#[tokio::test]
async fn test_ticket_survives_a_new_store_instance() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join(TICKET_FILE_NAME);

    let ticket = ticket();
    FileTicketStore::new(&path).save(&ticket).await?;

    let reopened = FileTicketStore::new(&path);
    assert_eq!(reopened.load().await?, Some(ticket));
    Ok(())
}

#[tokio::test]
async fn test_file_layout() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join(TICKET_FILE_NAME);
    FileTicketStore::new(&path).save(&ticket()).await?;

    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&path)?)?;
    assert_eq!(json["targetId"], "cap-9");
    assert_eq!(json["attempts"], 1);
    assert!(json["nextEligibleAt"].is_string());
    assert!(json["expiresAt"].is_string());

    // No temp files left behind
    let entries = std::fs::read_dir(dir.path())?.count();
    assert_eq!(entries, 1);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_file_is_a_load_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join(TICKET_FILE_NAME);
    std::fs::write(&path, b"{not json")?;

    assert!(FileTicketStore::new(&path).load().await.is_err());
    Ok(())
}

#[test]
fn test_default_path_ends_with_well_known_name() {
    let path = FileTicketStore::default_path();
    assert!(path.ends_with(format!("nurseai/{TICKET_FILE_NAME}")));
}
