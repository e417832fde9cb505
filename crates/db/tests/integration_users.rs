//! Integration-Tests fuer UserRepository (In-Memory SQLite)

use torhaus_db::{BenutzerFilter, BenutzerUpdate, NeuerBenutzer, SqliteDb, UserRepository};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn neuer_benutzer<'a>(username: &'a str, email: &'a str) -> NeuerBenutzer<'a> {
    NeuerBenutzer {
        username,
        email,
        password_hash: "hash",
        security_stamp: "stempel",
        phone_number: "+4915112345678",
        first_name: "Alice",
        middle_name: None,
        last_name: "Beispiel",
    }
}

#[tokio::test]
async fn benutzer_erstellen_und_laden() {
    let db = db().await;

    let benutzer = db
        .create(neuer_benutzer("alice", "alice@example.com"))
        .await
        .expect("Benutzer erstellen fehlgeschlagen");

    assert!(benutzer.id >= 1);
    assert_eq!(benutzer.username, "alice");
    assert!(!benutzer.is_deleted);

    let geladen = db
        .get_by_id(benutzer.id)
        .await
        .expect("get_by_id fehlgeschlagen")
        .expect("Benutzer sollte gefunden werden");

    assert_eq!(geladen.id, benutzer.id);
    assert_eq!(geladen.email, "alice@example.com");
}

#[tokio::test]
async fn benutzer_nach_username_laden() {
    let db = db().await;

    db.create(neuer_benutzer("bob", "bob@example.com"))
        .await
        .unwrap();

    let geladen = db
        .get_by_username("bob")
        .await
        .unwrap()
        .expect("Benutzer sollte gefunden werden");
    assert_eq!(geladen.username, "bob");

    let fehlt = db.get_by_username("unbekannt").await.unwrap();
    assert!(fehlt.is_none());
}

#[tokio::test]
async fn doppelter_username_gibt_eindeutigkeitsfehler() {
    let db = db().await;

    db.create(neuer_benutzer("carla", "carla@example.com"))
        .await
        .unwrap();
    let ergebnis = db.create(neuer_benutzer("carla", "carla2@example.com")).await;

    let fehler = ergebnis.expect_err("Doppelter Username muss fehlschlagen");
    assert!(fehler.ist_eindeutigkeit());
}

#[tokio::test]
async fn benutzer_aktualisieren() {
    let db = db().await;
    let benutzer = db
        .create(neuer_benutzer("dora", "dora@example.com"))
        .await
        .unwrap();

    let aktualisiert = db
        .update(
            benutzer.id,
            BenutzerUpdate {
                first_name: Some("Dorothea".into()),
                middle_name: Some(Some("Maria".into())),
                ..Default::default()
            },
        )
        .await
        .expect("Update fehlgeschlagen");

    assert_eq!(aktualisiert.first_name, "Dorothea");
    assert_eq!(aktualisiert.middle_name.as_deref(), Some("Maria"));
    assert_eq!(aktualisiert.last_name, "Beispiel");
    assert!(aktualisiert.modified_at >= benutzer.modified_at);
}

#[tokio::test]
async fn soft_delete_versteckt_benutzer() {
    let db = db().await;
    let benutzer = db
        .create(neuer_benutzer("emil", "emil@example.com"))
        .await
        .unwrap();

    let entfernt = db.remove(benutzer.id).await.unwrap();
    assert!(entfernt);

    assert!(db.get_by_id(benutzer.id).await.unwrap().is_none());
    assert!(db.get_by_username("emil").await.unwrap().is_none());

    // Zweites Loeschen trifft keine Zeile mehr
    assert!(!db.remove(benutzer.id).await.unwrap());
}

#[tokio::test]
async fn filter_und_anzahl() {
    let db = db().await;

    db.create(neuer_benutzer("frida", "frida@example.com"))
        .await
        .unwrap();
    db.create(neuer_benutzer("georg", "georg@example.com"))
        .await
        .unwrap();

    let filter = BenutzerFilter {
        username: Some("frida".into()),
        ..Default::default()
    };
    let treffer = db.get_by_filter(&filter).await.unwrap();
    assert_eq!(treffer.len(), 1);
    assert_eq!(treffer[0].username, "frida");

    let alle = db.get_by_filter(&BenutzerFilter::default()).await.unwrap();
    assert_eq!(alle.len(), 2);

    let anzahl = db.count_by_filter(&BenutzerFilter::default()).await.unwrap();
    assert_eq!(anzahl, 2);

    // Namens-Filter matcht per LIKE ueber alle Namensfelder
    let nach_name = db
        .get_by_filter(&BenutzerFilter {
            name: Some("Beisp".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(nach_name.len(), 2);
}

#[tokio::test]
async fn limit_und_offset() {
    let db = db().await;

    for (username, email) in [
        ("heinz", "heinz@example.com"),
        ("ida", "ida@example.com"),
        ("jonas", "jonas@example.com"),
    ] {
        db.create(neuer_benutzer(username, email)).await.unwrap();
    }

    let seite = db
        .get_by_filter(&BenutzerFilter {
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(seite.len(), 2);
    // Sortierung nach Username: heinz, ida, jonas
    assert_eq!(seite[0].username, "ida");
    assert_eq!(seite[1].username, "jonas");
}
