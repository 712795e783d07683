use chrono::{TimeZone, Utc};
use minnow_core::{Checkup, ItemStatus, ItemType, OwnedItem};
use uuid::Uuid;

#[test]
fn item_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let now = Utc.with_ymd_and_hms(2025, 2, 21, 15, 30, 0).unwrap();
    let received = Utc.with_ymd_and_hms(2018, 12, 25, 8, 0, 0).unwrap();
    let mut item = OwnedItem::with_id(id, "K2 Keyboard", "⌨️", received, ItemType::HouseholdItem, now);
    item.status = ItemStatus::Give;

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["name"], "K2 Keyboard");
    assert_eq!(json["pictureGlyph"], "⌨️");
    assert_eq!(json["receivedDate"], "2018-12-01T00:00:00Z");
    assert_eq!(json["status"], "Give");
    assert_eq!(json["lastUsedDate"], "2025-02-21T15:30:00Z");
    assert_eq!(json["itemType"], "Household Item");

    let decoded: OwnedItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn every_tag_decodes_back_to_its_variant() {
    for item_type in ItemType::ALL {
        let json = serde_json::to_value(item_type).unwrap();
        assert_eq!(json, item_type.as_str());
        assert_eq!(serde_json::from_value::<ItemType>(json).unwrap(), item_type);
    }
    for status in ItemStatus::ALL {
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json, status.as_str());
        assert_eq!(serde_json::from_value::<ItemStatus>(json).unwrap(), status);
    }
}

#[test]
fn unknown_status_tag_is_rejected() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Lamp",
        "pictureGlyph": "💡",
        "receivedDate": "2024-01-01T00:00:00Z",
        "status": "Sell",
        "lastUsedDate": "2024-03-01T00:00:00Z",
        "itemType": "Other"
    });

    let err = serde_json::from_value::<OwnedItem>(value).unwrap_err();
    assert!(err.to_string().contains("Sell"), "unexpected error: {err}");
}

#[test]
fn checkup_serialization_uses_expected_wire_fields() {
    let last = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let checkup = Checkup::new(last, 4);

    let json = serde_json::to_value(checkup).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "lastCheckupDate": "2025-01-01T00:00:00Z",
            "intervalMonths": 4
        })
    );
    assert_eq!(serde_json::from_value::<Checkup>(json).unwrap(), checkup);
}
