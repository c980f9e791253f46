use lendledger_core::model::is_valid_record_id;
use lendledger_core::{Asset, AssetType, Loan, Role, User, ValidationError};
use serde_json::{json, Value};

#[test]
fn asset_serializes_kind_as_type_field() {
    let asset = Asset::new("L1", AssetType::Laptop, "ThinkPad X1", "IT desk");
    let value = serde_json::to_value(&asset).unwrap();

    assert_eq!(
        value,
        json!({
            "id": "L1",
            "type": "laptop",
            "title": "ThinkPad X1",
            "author_or_owner": "IT desk",
            "issued": false
        })
    );

    let decoded: Asset = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, asset);
}

#[test]
fn user_serialization_omits_credential_hash() {
    let user = User::new("S1", "Desk", Role::Staff, "$argon2id$secret");
    let value = serde_json::to_value(&user).unwrap();

    assert_eq!(value["role"], Value::from("staff"));
    assert!(value.get("credential_hash").is_none());

    let decoded: User = serde_json::from_value(value).unwrap();
    assert!(decoded.credential_hash.is_empty());
    assert_eq!(
        decoded.validate().unwrap_err(),
        ValidationError::MissingCredential
    );
}

#[test]
fn storage_strings_parse_back_to_variants() {
    for kind in [AssetType::Book, AssetType::Laptop, AssetType::Unknown] {
        assert_eq!(AssetType::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(AssetType::parse("tablet"), None);
    assert_eq!(Role::parse("staff"), Some(Role::Staff));
    assert_eq!(Role::parse("admin"), None);
}

#[test]
fn record_ids_follow_storage_rules() {
    assert!(is_valid_record_id("A1"));
    assert!(is_valid_record_id("book-42.v2_a"));
    assert!(!is_valid_record_id(""));
    assert!(!is_valid_record_id("-leading"));
    assert!(!is_valid_record_id("with space"));
    assert!(!is_valid_record_id(&"x".repeat(65)));
    assert!(is_valid_record_id(&"x".repeat(64)));
}

#[test]
fn loan_validation_rejects_non_positive_issue_date() {
    assert!(Loan::new("A1", "U1", 1).validate().is_ok());
    assert_eq!(
        Loan::new("A1", "U1", 0).validate().unwrap_err(),
        ValidationError::NonPositiveIssueDate(0)
    );
    assert!(matches!(
        Loan::new("A1", "", 10).validate().unwrap_err(),
        ValidationError::InvalidId { field: "user id", .. }
    ));
}
