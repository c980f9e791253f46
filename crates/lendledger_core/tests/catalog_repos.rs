use lendledger_core::db::{open_db_in_memory, LedgerWrite};
use lendledger_core::{
    Asset, AssetRepository, AssetType, Loan, LoanRepository, RepoError, Role,
    SqliteAssetRepository, SqliteLoanRepository, SqliteUserRepository, User, UserRepository,
    ValidationError,
};
use rusqlite::Connection;

#[test]
fn add_and_find_asset() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let inserted = repo
        .add(&Asset::new("A1", AssetType::Book, "Dune", "Herbert"))
        .unwrap();
    assert!(inserted);

    let loaded = repo.find("A1").unwrap().unwrap();
    assert_eq!(loaded.kind, AssetType::Book);
    assert_eq!(loaded.title, "Dune");
    assert_eq!(loaded.author_or_owner, "Herbert");
    assert!(loaded.is_available());
    assert!(repo.find("A2").unwrap().is_none());
}

#[test]
fn duplicate_asset_add_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    repo.add(&Asset::new("A1", AssetType::Book, "Dune", "Herbert"))
        .unwrap();
    let inserted = repo
        .add(&Asset::new("A1", AssetType::Laptop, "ThinkPad", "IT desk"))
        .unwrap();

    assert!(!inserted);
    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Dune");
    assert_eq!(all[0].kind, AssetType::Book);
}

#[test]
fn new_assets_are_stored_available() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let mut asset = Asset::new("L1", AssetType::Laptop, "ThinkPad", "IT desk");
    asset.issued = true;
    repo.add(&asset).unwrap();

    assert!(!repo.is_issued("L1").unwrap());
}

#[test]
fn get_all_returns_assets_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    for id in ["C3", "A1", "B2"] {
        repo.add(&Asset::new(id, AssetType::Book, "Title", "Author"))
            .unwrap();
    }

    let ids: Vec<String> = repo.get_all().unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["A1", "B2", "C3"]);
}

#[test]
fn set_issued_toggles_flag() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();
    repo.add(&Asset::new("A1", AssetType::Book, "Dune", "Herbert"))
        .unwrap();

    repo.set_issued("A1", true).unwrap();
    assert!(repo.is_issued("A1").unwrap());
    repo.set_issued("A1", false).unwrap();
    assert!(!repo.is_issued("A1").unwrap());
}

#[test]
fn flag_access_on_missing_asset_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let set_err = repo.set_issued("nope", true).unwrap_err();
    assert!(matches!(set_err, RepoError::NotFound { entity: "asset", ref id } if id == "nope"));

    let get_err = repo.is_issued("nope").unwrap_err();
    assert!(matches!(get_err, RepoError::NotFound { .. }));
}

#[test]
fn invalid_asset_is_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();

    let bad_id = repo
        .add(&Asset::new("has space", AssetType::Book, "Dune", "Herbert"))
        .unwrap_err();
    assert!(matches!(
        bad_id,
        RepoError::Validation(ValidationError::InvalidId { .. })
    ));

    let blank_title = repo
        .add(&Asset::new("A1", AssetType::Book, "   ", "Herbert"))
        .unwrap_err();
    assert!(matches!(
        blank_title,
        RepoError::Validation(ValidationError::BlankField(_))
    ));
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn corrupted_asset_row_fails_validation_on_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssetRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO assets (id, type, title, author_or_owner, is_issued)
         VALUES ('A1', 'book', '', 'Herbert', 0);",
        [],
    )
    .unwrap();

    let err = repo.find("A1").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn add_and_find_user() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    assert!(repo
        .add(&User::new("S1", "Desk", Role::Staff, "hash-s1"))
        .unwrap());
    let loaded = repo.find("S1").unwrap().unwrap();
    assert!(loaded.is_staff());
    assert_eq!(loaded.credential_hash, "hash-s1");
    assert!(repo.find("U9").unwrap().is_none());
}

#[test]
fn duplicate_user_add_keeps_original_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.add(&User::new("U1", "Paul", Role::User, "first"))
        .unwrap();
    let inserted = repo
        .add(&User::new("U1", "Impostor", Role::Staff, "second"))
        .unwrap();

    assert!(!inserted);
    let loaded = repo.find("U1").unwrap().unwrap();
    assert_eq!(loaded.name, "Paul");
    assert_eq!(loaded.role, Role::User);
    assert_eq!(loaded.credential_hash, "first");
}

#[test]
fn user_without_credential_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let err = repo
        .add(&User::new("U1", "Paul", Role::User, ""))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingCredential)
    ));
}

#[test]
fn get_all_users_returns_snapshot_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.add(&User::new("U2", "Chani", Role::User, "h"))
        .unwrap();
    repo.add(&User::new("S1", "Desk", Role::Staff, "h"))
        .unwrap();

    let ids: Vec<String> = repo.get_all().unwrap().into_iter().map(|u| u.id).collect();
    assert_eq!(ids, vec!["S1", "U2"]);
}

#[test]
fn repositories_reject_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let asset_err = SqliteAssetRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        asset_err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
    assert!(SqliteUserRepository::try_new(&conn).is_err());
    assert!(SqliteLoanRepository::try_new(&conn).is_err());
}

#[test]
fn loan_batch_with_invalid_loan_is_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let assets = SqliteAssetRepository::try_new(&conn).unwrap();
    let loans = SqliteLoanRepository::try_new(&conn).unwrap();
    assets
        .add(&Asset::new("A1", AssetType::Book, "Dune", "Herbert"))
        .unwrap();

    let err = loans
        .apply(&[
            LedgerWrite::SetAssetIssued {
                asset_id: "A1".to_string(),
                issued: true,
            },
            LedgerWrite::PutLoan(Loan::new("A1", "U1", -5)),
        ])
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonPositiveIssueDate(-5))
    ));
    assert!(!assets.is_issued("A1").unwrap());
}

#[test]
fn find_by_user_returns_only_that_users_loans() {
    let conn = open_db_in_memory().unwrap();
    let assets = SqliteAssetRepository::try_new(&conn).unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let loans = SqliteLoanRepository::try_new(&conn).unwrap();
    for id in ["C3", "A1", "B2"] {
        assets
            .add(&Asset::new(id, AssetType::Book, "Title", "Author"))
            .unwrap();
    }
    users
        .add(&User::new("U1", "Paul", Role::User, "h"))
        .unwrap();
    users
        .add(&User::new("U2", "Chani", Role::User, "h"))
        .unwrap();

    loans
        .apply(&[
            LedgerWrite::PutLoan(Loan::new("C3", "U1", 300)),
            LedgerWrite::PutLoan(Loan::new("B2", "U2", 200)),
            LedgerWrite::PutLoan(Loan::new("A1", "U1", 100)),
        ])
        .unwrap();

    assert_eq!(
        loans.find_by_user("U1").unwrap(),
        vec![Loan::new("A1", "U1", 100), Loan::new("C3", "U1", 300)]
    );
    assert_eq!(
        loans.find_by_user("U2").unwrap(),
        vec![Loan::new("B2", "U2", 200)]
    );
    assert!(loans.find_by_user("U9").unwrap().is_empty());
}
