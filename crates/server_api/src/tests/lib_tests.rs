use super::*;
use shared::domain::ItemStatus;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext::new(storage)
}

fn wallet_form() -> CreateItemForm {
    CreateItemForm {
        title: Some("Wallet".into()),
        description: Some("".into()),
        item_type: Some("LOST".into()),
        location: Some("".into()),
        contact_name: Some("Jo".into()),
        contact_phone: Some("555-1234".into()),
    }
}

#[tokio::test]
async fn create_assigns_id_and_open_status() {
    let ctx = setup().await;
    let item = create_item(&ctx, &wallet_form()).await.expect("create");

    assert!(item.id.0 > 0);
    assert_eq!(item.status, ItemStatus::Open);
    assert_eq!(item.item_type, ItemType::Lost);

    let listed = list_items(&ctx).await.expect("list");
    assert_eq!(listed, vec![item]);
}

#[tokio::test]
async fn create_trims_values_and_rejects_blank_required_fields() {
    let ctx = setup().await;

    let mut padded = wallet_form();
    padded.title = Some("  Wallet  ".into());
    padded.location = Some(" Gym ".into());
    let item = create_item(&ctx, &padded).await.expect("create");
    assert_eq!(item.title, "Wallet");
    assert_eq!(item.location, "Gym");

    for blank in [
        CreateItemForm {
            title: Some("   ".into()),
            ..wallet_form()
        },
        CreateItemForm {
            contact_name: None,
            ..wallet_form()
        },
        CreateItemForm {
            contact_phone: Some(String::new()),
            ..wallet_form()
        },
        CreateItemForm {
            item_type: None,
            ..wallet_form()
        },
    ] {
        let err = create_item(&ctx, &blank).await.expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, MISSING_FIELDS_MESSAGE);
    }

    assert_eq!(list_items(&ctx).await.expect("list").len(), 1);
}

#[tokio::test]
async fn create_rejects_unknown_item_type() {
    let ctx = setup().await;
    let form = CreateItemForm {
        item_type: Some("STOLEN".into()),
        ..wallet_form()
    };
    let err = create_item(&ctx, &form).await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.message, INVALID_TYPE_MESSAGE);
}

#[tokio::test]
async fn list_is_capped_at_configured_limit() {
    let mut ctx = setup().await;
    ctx.list_limit = 2;
    for _ in 0..3 {
        create_item(&ctx, &wallet_form()).await.expect("create");
    }
    assert_eq!(list_items(&ctx).await.expect("list").len(), 2);
}

#[tokio::test]
async fn claim_is_idempotent() {
    let ctx = setup().await;
    let item = create_item(&ctx, &wallet_form()).await.expect("create");

    assert_eq!(
        claim_item(&ctx, item.id).await.expect("claim"),
        ClaimUpdate::Claimed
    );
    assert_eq!(
        claim_item(&ctx, item.id).await.expect("claim again"),
        ClaimUpdate::AlreadyClaimed
    );

    let listed = list_items(&ctx).await.expect("list");
    assert_eq!(listed[0].status, ItemStatus::Claimed);
}

#[tokio::test]
async fn claim_unknown_item_is_not_found() {
    let ctx = setup().await;
    let err = claim_item(&ctx, ItemId(99)).await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[test]
fn parse_item_id_rejects_missing_and_non_numeric() {
    assert_eq!(parse_item_id(Some(" 7 ")).expect("id"), ItemId(7));
    assert_eq!(
        parse_item_id(None).expect_err("missing").message,
        INVALID_ID_MESSAGE
    );
    assert_eq!(
        parse_item_id(Some("seven")).expect_err("bad").code,
        ErrorCode::Validation
    );
}
