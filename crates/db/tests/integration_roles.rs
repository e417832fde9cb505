//! Integration-Tests fuer RoleRepository (In-Memory SQLite)

use torhaus_db::{DbError, NeuerBenutzer, RoleRepository, SqliteDb, UserRepository};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

#[tokio::test]
async fn rolle_erstellen_und_finden() {
    let db = db().await;

    assert!(!db.exists("Admin").await.unwrap());

    // Qualifiziert, da SqliteDb mehrere Repository-Traits implementiert
    let rolle = RoleRepository::create(&db, "Admin")
        .await
        .expect("Rolle erstellen fehlgeschlagen");
    assert!(rolle.id >= 1);
    assert_eq!(rolle.name, "Admin");

    assert!(db.exists("Admin").await.unwrap());

    let geladen = db
        .get_by_name("Admin")
        .await
        .unwrap()
        .expect("Rolle sollte gefunden werden");
    assert_eq!(geladen.id, rolle.id);
}

#[tokio::test]
async fn doppelte_rolle_gibt_eindeutigkeitsfehler() {
    let db = db().await;
    RoleRepository::create(&db, "User").await.unwrap();

    let fehler = RoleRepository::create(&db, "User")
        .await
        .expect_err("Doppelte Rolle muss fehlschlagen");
    assert!(fehler.ist_eindeutigkeit());
}

#[tokio::test]
async fn claims_anhaengen_und_laden() {
    let db = db().await;
    let rolle = RoleRepository::create(&db, "User").await.unwrap();

    db.add_claim(rolle.id, "permission", "users.view").await.unwrap();
    db.add_claim(rolle.id, "permission", "users.update").await.unwrap();

    let claims = db.get_claims(rolle.id).await.unwrap();
    assert_eq!(claims.len(), 2);
    assert!(claims
        .iter()
        .all(|c| c.claim_type == "permission"));
    assert!(claims.iter().any(|c| c.claim_value == "users.view"));
}

#[tokio::test]
async fn rollen_namen_zaehlen() {
    let db = db().await;
    RoleRepository::create(&db, "Admin").await.unwrap();
    RoleRepository::create(&db, "User").await.unwrap();

    let namen = vec!["Admin".to_string(), "User".to_string(), "Geist".to_string()];
    assert_eq!(db.count_by_names(&namen).await.unwrap(), 2);
    assert_eq!(db.count_by_names(&[]).await.unwrap(), 0);
}

#[tokio::test]
async fn benutzer_rollen_zuweisen_und_laden() {
    let db = db().await;

    let benutzer = UserRepository::create(
        &db,
        NeuerBenutzer {
            username: "alice",
            email: "alice@example.com",
            password_hash: "hash",
            security_stamp: "stempel",
            phone_number: "+4915112345678",
            first_name: "Alice",
            middle_name: None,
            last_name: "Beispiel",
        },
    )
    .await
    .unwrap();

    RoleRepository::create(&db, "Admin").await.unwrap();
    RoleRepository::create(&db, "User").await.unwrap();

    db.add_user_roles(benutzer.id, &["Admin".to_string(), "User".to_string()])
        .await
        .unwrap();

    let rollen = db.get_user_roles(benutzer.id).await.unwrap();
    let namen: Vec<&str> = rollen.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(namen, vec!["Admin", "User"]);

    // Doppelte Zuweisung ist idempotent
    db.add_user_roles(benutzer.id, &["Admin".to_string()])
        .await
        .unwrap();
    assert_eq!(db.get_user_roles(benutzer.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn unbekannte_rollennamen_geben_fehler() {
    let db = db().await;

    let benutzer = UserRepository::create(
        &db,
        NeuerBenutzer {
            username: "bob",
            email: "bob@example.com",
            password_hash: "hash",
            security_stamp: "stempel",
            phone_number: "+4915112345678",
            first_name: "Bob",
            middle_name: None,
            last_name: "Beispiel",
        },
    )
    .await
    .unwrap();

    RoleRepository::create(&db, "User").await.unwrap();

    let ergebnis = db
        .add_user_roles(benutzer.id, &["User".to_string(), "Geist".to_string()])
        .await;
    assert!(matches!(ergebnis, Err(DbError::SchluesselWerteFehlen(_))));

    let leer = db.add_user_roles(benutzer.id, &[]).await;
    assert!(matches!(leer, Err(DbError::ParameterFehlen(_))));
}
