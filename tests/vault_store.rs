use chrono::Utc;
use tempfile::TempDir;

use remindr::{Alarm, Priority, Reminder, Vault};

fn open_vault(dir: &TempDir) -> Vault {
    Vault::new(dir.path().join("vault.sqlite3")).unwrap()
}

fn sample_reminder(id: &str, title: &str) -> Reminder {
    Reminder {
        id: id.to_string(),
        title: title.to_string(),
        is_completed: false,
        date: None,
        time: Some("07:00".to_string()),
        tags: vec!["home".to_string()],
        priority: Priority::Normal,
        location: None,
        recurrence: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn blobs_round_trip_and_missing_keys_read_none() {
    let dir = TempDir::new().unwrap();
    let vault = open_vault(&dir);

    assert_eq!(vault.get_blob("nope").await.unwrap(), None);

    vault.put_blob("k", "v1".to_string()).await.unwrap();
    assert_eq!(vault.get_blob("k").await.unwrap().as_deref(), Some("v1"));

    // Overwrite, not append.
    vault.put_blob("k", "v2".to_string()).await.unwrap();
    assert_eq!(vault.get_blob("k").await.unwrap().as_deref(), Some("v2"));
}

#[tokio::test]
async fn reminders_survive_reopen_and_newest_sits_first() {
    let dir = TempDir::new().unwrap();
    {
        let vault = open_vault(&dir);
        vault.add_reminder(sample_reminder("r1", "first")).await.unwrap();
        vault.add_reminder(sample_reminder("r2", "second")).await.unwrap();
    }

    let vault = open_vault(&dir);
    let reminders = vault.get_reminders().await.unwrap();
    assert_eq!(reminders.len(), 2);
    assert_eq!(reminders[0].id, "r2");
    assert_eq!(reminders[1].id, "r1");
    assert_eq!(reminders[1].tags, vec!["home".to_string()]);
}

#[tokio::test]
async fn toggle_flips_completion_and_reports_membership() {
    let dir = TempDir::new().unwrap();
    let vault = open_vault(&dir);
    vault.add_reminder(sample_reminder("r1", "task")).await.unwrap();

    assert!(vault.toggle_reminder("r1").await.unwrap());
    assert!(vault.get_reminders().await.unwrap()[0].is_completed);

    assert!(vault.toggle_reminder("r1").await.unwrap());
    assert!(!vault.get_reminders().await.unwrap()[0].is_completed);

    assert!(!vault.toggle_reminder("ghost").await.unwrap());
}

#[tokio::test]
async fn expiry_sweep_batch_delete() {
    let dir = TempDir::new().unwrap();
    let vault = open_vault(&dir);
    for id in ["r1", "r2", "r3"] {
        vault.add_reminder(sample_reminder(id, id)).await.unwrap();
    }

    vault
        .delete_reminders(&["r1".to_string(), "r3".to_string()])
        .await
        .unwrap();

    let left = vault.get_reminders().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, "r2");

    vault.delete_reminder("r2").await.unwrap();
    assert!(vault.get_reminders().await.unwrap().is_empty());
}

#[tokio::test]
async fn alarms_round_trip_with_toggle_and_delete() {
    let dir = TempDir::new().unwrap();
    let vault = open_vault(&dir);

    vault
        .add_alarm(Alarm::new("06:30", "Wake up", "radar"))
        .await
        .unwrap();
    let alarms = vault.get_alarms().await.unwrap();
    assert_eq!(alarms.len(), 1);
    assert!(alarms[0].is_enabled);
    assert_eq!(alarms[0].days.len(), 7);

    let id = alarms[0].id.clone();
    assert!(vault.toggle_alarm(&id).await.unwrap());
    assert!(!vault.get_alarms().await.unwrap()[0].is_enabled);

    vault.delete_alarm(&id).await.unwrap();
    assert!(vault.get_alarms().await.unwrap().is_empty());
}

#[tokio::test]
async fn fresh_vault_seeds_tag_vocabulary() {
    let dir = TempDir::new().unwrap();
    let vault = open_vault(&dir);

    let names: Vec<String> = vault
        .get_tags()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["home", "work", "shopping"]);
}

#[tokio::test]
async fn corrupt_blob_reads_as_empty_collection() {
    let dir = TempDir::new().unwrap();
    let vault = open_vault(&dir);

    vault
        .put_blob("vault_reminders_v1", "not json at all".to_string())
        .await
        .unwrap();

    // Corrupt data must degrade to empty, never crash the loop.
    assert!(vault.get_reminders().await.unwrap().is_empty());
}
