//! Editing a card end to end: hydrate loose backend data, edit through the
//! reducer, save sections independently through a CardStore

use async_trait::async_trait;
use ivgk_editor::{
    AssetUpload, CardStore, EditorAction, FieldInput, ItemField, ListKind, SaveController,
    SectionPayload, StoreError,
};
use serde_json::{Value, json};
use shared::models::{CurrencyInfo, SectionKey, VcardDetail};
use std::sync::Mutex;

/// Backend double holding one card as JSON; patches merge top-level keys
struct InMemoryBackend {
    card: Mutex<Value>,
    plan_warnings: Option<Vec<String>>,
    fail_with: Option<(u16, Option<String>)>,
    patches: Mutex<Vec<Value>>,
}

impl InMemoryBackend {
    fn new(card: Value) -> Self {
        Self {
            card: Mutex::new(card),
            plan_warnings: None,
            fail_with: None,
            patches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CardStore for InMemoryBackend {
    async fn patch_section(
        &self,
        _card_id: &str,
        payload: &SectionPayload,
    ) -> Result<VcardDetail, StoreError> {
        let body = serde_json::to_value(payload).map_err(|e| StoreError::Transport(e.to_string()))?;
        self.patches.lock().unwrap().push(body.clone());
        if let Some((status, message)) = &self.fail_with {
            return Err(StoreError::Rejected {
                status: *status,
                message: message.clone(),
            });
        }

        let mut card = self.card.lock().unwrap();
        if let (Value::Object(card), Value::Object(patch)) = (&mut *card, body) {
            card.extend(patch);
        }
        let mut response = card.clone();
        if let Some(warnings) = &self.plan_warnings {
            response["planWarnings"] = json!(warnings);
        }
        serde_json::from_value(response).map_err(|e| StoreError::Transport(e.to_string()))
    }

    async fn upload_asset(
        &self,
        _card_id: &str,
        sub_category: &str,
        upload: AssetUpload,
    ) -> Result<String, StoreError> {
        Ok(format!("https://cdn.test/{sub_category}/{}", upload.file_name))
    }

    async fn active_currencies(&self) -> Result<Vec<CurrencyInfo>, StoreError> {
        Ok(vec![CurrencyInfo {
            id: "EUR".into(),
            code: "EUR".into(),
            name: "Euro".into(),
            symbol: Some("€".into()),
        }])
    }
}

fn loose_card() -> Value {
    json!({
        "id": "card-1",
        "urlAlias": "jane",
        "firstName": "Jane",
        "lastName": "Doe",
        "branding": null,
        "sections": {"services": "yes", "products": true},
        "services": [{"title": "Design", "price": "120"}, {"title": "Audit", "price": null}],
        "products": null,
        "testimonials": [{"name": "Sam", "rating": "7"}, {"name": "Ann", "rating": "great"}],
        "businessHours": [
            {"dayOfWeek": 1, "openTime": "09:00", "closeTime": "17:00"},
            {"dayOfWeek": 9, "isOpen": true}
        ]
    })
}

fn card(value: Value) -> VcardDetail {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn hydrated_state_is_complete() {
    let controller = SaveController::new(InMemoryBackend::new(loose_card()), &card(loose_card()));
    let state = controller.state();
    let model = &state.model;

    assert_eq!(model.general.display_name, "Jane Doe");
    assert!(model.general.branding);
    assert_eq!(model.services[0].price, Some(120.0));
    assert_eq!(model.services[1].price, None);
    assert_eq!(model.services[1].order, Some(1));
    assert!(model.products.is_empty());
    assert_eq!(model.testimonials[0].rating, Some(5.0));
    assert_eq!(model.testimonials[1].rating, None);

    assert_eq!(model.business_hours.len(), 7);
    for (day, slot) in model.business_hours.iter().enumerate() {
        assert_eq!(slot.day_of_week as usize, day);
    }
    assert!(model.business_hours[1].is_open);
    assert_eq!(model.business_hours[1].close_time, "17:00");
    assert!(!model.business_hours[0].is_open);
    assert_eq!(model.business_hours[0].open_time, "09:00");
    assert_eq!(model.business_hours[0].close_time, "18:00");
}

#[tokio::test]
async fn product_save_round_trip() {
    let backend = InMemoryBackend::new(loose_card());
    let controller = SaveController::new(backend, &card(loose_card()));
    controller.load_currencies().await;

    controller.dispatch(EditorAction::AddItem(ListKind::Products));
    controller.dispatch(EditorAction::AddItem(ListKind::Products));
    for (field, value) in [(ItemField::Name, " Mug "), (ItemField::Price, "12.5")] {
        controller.dispatch(EditorAction::UpdateItem {
            list: ListKind::Products,
            index: 0,
            field,
            input: FieldInput::Text(value.into()),
        });
    }

    assert!(controller.save(SectionKey::Products).await);

    let patches = controller.store().patches.lock().unwrap().clone();
    assert_eq!(patches.len(), 1);
    let body = patches[0].as_object().unwrap();
    assert_eq!(body.len(), 1);
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1, "unnamed product is dropped");
    assert_eq!(products[0]["name"], "Mug");
    assert_eq!(products[0]["price"], 12.5);
    assert_eq!(products[0]["currencyId"], "EUR");
    assert_eq!(products[0]["order"], 0);

    let state = controller.state();
    assert_eq!(state.model.products.len(), 1);
    let status = state.status(SectionKey::Products);
    assert!(!status.saving);
    assert_eq!(status.status.as_deref(), Some("Products updated successfully."));
    assert_eq!(status.error, None);
}

#[tokio::test]
async fn plan_warnings_replace_success_message() {
    let mut backend = InMemoryBackend::new(loose_card());
    backend.plan_warnings = Some(vec![
        "Your plan allows 1 service.".into(),
        "Upgrade to add more.".into(),
    ]);
    let controller = SaveController::new(backend, &card(loose_card()));

    assert!(controller.save(SectionKey::Services).await);
    let status = controller.state().status(SectionKey::Services);
    assert_eq!(
        status.status.as_deref(),
        Some("Your plan allows 1 service. Upgrade to add more.")
    );
}

#[tokio::test]
async fn failures_stay_scoped_to_their_section() {
    let mut backend = InMemoryBackend::new(loose_card());
    backend.fail_with = Some((400, None));
    let controller = SaveController::new(backend, &card(loose_card()));

    assert!(!controller.save(SectionKey::Testimonials).await);
    let failed = controller.state().status(SectionKey::Testimonials);
    assert_eq!(
        failed.error.as_deref(),
        Some(SectionKey::Testimonials.failure_message())
    );
    assert_eq!(controller.state().status(SectionKey::Services).error, None);

    let mut backend = InMemoryBackend::new(loose_card());
    backend.fail_with = Some((403, Some("Plan limit reached".into())));
    let controller = SaveController::new(backend, &card(loose_card()));
    controller.save(SectionKey::Services).await;
    assert_eq!(
        controller.state().status(SectionKey::Services).error.as_deref(),
        Some("Plan limit reached")
    );
}
