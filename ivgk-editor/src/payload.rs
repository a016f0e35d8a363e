//! Section payloads
//!
//! Each editor section saves independently through `PATCH /vcards/{id}`.
//! The body carries exactly one top-level key for list sections and the
//! visibility map, and the flat general fields for [`SectionKey::General`].
//! Sanitizers drop empty items, trim optional strings (empty ones are
//! omitted) and renumber `order` by position among the kept items.

use crate::normalize::{
    AppointmentItem, BusinessHourSlot, CustomLinkItem, DEFAULT_CLOSE_TIME, DEFAULT_OPEN_TIME,
    EditorModel, GalleryItem, GeneralState, MIN_APPOINTMENT_MINUTES, ProductItem, ServiceItem,
    SocialLinkItem, TestimonialItem,
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use shared::models::{SectionKey, VcardSections};

/// Currency sent for products with none selected
pub const FALLBACK_CURRENCY_ID: &str = "USD";

/// Trimmed, `None` when empty
fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Explicit order if set, else position among kept items
fn resolve_order(order: Option<i64>, index: usize) -> i64 {
    order.unwrap_or(index as i64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralPayload {
    pub url_alias: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_embed_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub branding: bool,
}

impl From<&GeneralState> for GeneralPayload {
    fn from(general: &GeneralState) -> Self {
        let first_name = general.first_name.trim().to_string();
        let last_name = general.last_name.trim().to_string();
        let display = general.display_name.trim();
        let name = if display.is_empty() {
            [first_name.as_str(), last_name.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            display.to_string()
        };

        Self {
            url_alias: general.url_alias.trim().to_string(),
            first_name,
            last_name,
            name,
            email: optional_text(&general.email),
            phone: optional_text(&general.phone),
            company: optional_text(&general.company),
            job_title: optional_text(&general.job_title),
            occupation: optional_text(&general.occupation),
            region_code: optional_text(&general.region_code),
            description: optional_text(&general.description),
            location: optional_text(&general.location),
            location_url: optional_text(&general.location_url),
            location_embed_tag: optional_text(&general.location_embed_tag),
            profile_image: optional_text(&general.profile_image),
            cover_image: optional_text(&general.cover_image),
            favicon: optional_text(&general.favicon),
            branding: general.branding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub currency_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub in_stock: bool,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub image_url: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHourPayload {
    pub day_of_week: u8,
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkPayload {
    pub platform: String,
    pub url: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLinkPayload {
    pub label: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: i64,
}

pub fn services_payload(items: &[ServiceItem]) -> Vec<ServicePayload> {
    items
        .iter()
        .filter_map(|item| optional_text(&item.title).map(|title| (title, item)))
        .enumerate()
        .map(|(index, (title, item))| ServicePayload {
            title,
            description: optional_text(&item.description),
            icon: optional_text(&item.icon),
            image: optional_text(&item.image),
            price: item.price.filter(|p| p.is_finite()),
            order: resolve_order(item.order, index),
        })
        .collect()
}

pub fn products_payload(items: &[ProductItem]) -> Vec<ProductPayload> {
    items
        .iter()
        .filter_map(|item| optional_text(&item.name).map(|name| (name, item)))
        .enumerate()
        .map(|(index, (name, item))| ProductPayload {
            name,
            description: optional_text(&item.description),
            price: if item.price.is_finite() { item.price } else { 0.0 },
            currency_id: item
                .currency_id
                .as_deref()
                .and_then(optional_text)
                .unwrap_or_else(|| FALLBACK_CURRENCY_ID.to_string()),
            image: optional_text(&item.image),
            in_stock: item.in_stock,
            order: resolve_order(item.order, index),
        })
        .collect()
}

pub fn galleries_payload(items: &[GalleryItem]) -> Vec<GalleryPayload> {
    items
        .iter()
        .filter_map(|item| optional_text(&item.image_url).map(|url| (url, item)))
        .enumerate()
        .map(|(index, (image_url, item))| GalleryPayload {
            title: optional_text(&item.title),
            image_url,
            order: resolve_order(item.order, index),
        })
        .collect()
}

pub fn testimonials_payload(items: &[TestimonialItem]) -> Vec<TestimonialPayload> {
    items
        .iter()
        .filter_map(|item| optional_text(&item.name).map(|name| (name, item)))
        .enumerate()
        .map(|(index, (name, item))| TestimonialPayload {
            name,
            position: optional_text(&item.position),
            company: optional_text(&item.company),
            content: optional_text(&item.content),
            image_url: optional_text(&item.image_url),
            rating: item
                .rating
                .filter(|r| r.is_finite())
                .map(|r| r.clamp(1.0, 5.0)),
            order: resolve_order(item.order, index),
        })
        .collect()
}

/// All seven days, times only for open days
pub fn business_hours_payload(slots: &[BusinessHourSlot; 7]) -> Vec<BusinessHourPayload> {
    slots
        .iter()
        .map(|slot| {
            let (open_time, close_time) = if slot.is_open {
                (
                    Some(optional_text(&slot.open_time).unwrap_or_else(|| DEFAULT_OPEN_TIME.into())),
                    Some(
                        optional_text(&slot.close_time)
                            .unwrap_or_else(|| DEFAULT_CLOSE_TIME.into()),
                    ),
                )
            } else {
                (None, None)
            };
            BusinessHourPayload {
                day_of_week: slot.day_of_week,
                is_open: slot.is_open,
                open_time,
                close_time,
            }
        })
        .collect()
}

pub fn appointments_payload(items: &[AppointmentItem]) -> Vec<AppointmentPayload> {
    items
        .iter()
        .filter_map(|item| optional_text(&item.title).map(|title| (title, item)))
        .map(|(title, item)| AppointmentPayload {
            title,
            description: optional_text(&item.description),
            duration: if item.duration.is_finite() {
                item.duration.max(MIN_APPOINTMENT_MINUTES)
            } else {
                MIN_APPOINTMENT_MINUTES
            },
            price: item.price.filter(|p| p.is_finite()),
            available: item.available,
        })
        .collect()
}

pub fn social_links_payload(items: &[SocialLinkItem]) -> Vec<SocialLinkPayload> {
    items
        .iter()
        .filter_map(|item| Some((optional_text(&item.platform)?, optional_text(&item.url)?, item)))
        .enumerate()
        .map(|(index, (platform, url, item))| SocialLinkPayload {
            platform,
            url,
            order: resolve_order(item.order, index),
        })
        .collect()
}

pub fn custom_links_payload(items: &[CustomLinkItem]) -> Vec<CustomLinkPayload> {
    items
        .iter()
        .filter_map(|item| Some((optional_text(&item.label)?, optional_text(&item.url)?, item)))
        .enumerate()
        .map(|(index, (label, url, item))| CustomLinkPayload {
            label,
            url,
            icon: optional_text(&item.icon),
            order: resolve_order(item.order, index),
        })
        .collect()
}

/// Body of one section save
#[derive(Debug, Clone, PartialEq)]
pub enum SectionPayload {
    General(GeneralPayload),
    Sections(VcardSections),
    Services(Vec<ServicePayload>),
    Products(Vec<ProductPayload>),
    Galleries(Vec<GalleryPayload>),
    Testimonials(Vec<TestimonialPayload>),
    BusinessHours(Vec<BusinessHourPayload>),
    Appointments(Vec<AppointmentPayload>),
    SocialLinks(Vec<SocialLinkPayload>),
    CustomLinks(Vec<CustomLinkPayload>),
}

impl SectionPayload {
    /// Build the sanitized payload for `section` from current editing state
    pub fn build(section: SectionKey, model: &EditorModel) -> Self {
        match section {
            SectionKey::General => Self::General(GeneralPayload::from(&model.general)),
            SectionKey::Sections => Self::Sections(model.sections),
            SectionKey::Services => Self::Services(services_payload(&model.services)),
            SectionKey::Products => Self::Products(products_payload(&model.products)),
            SectionKey::Galleries => Self::Galleries(galleries_payload(&model.galleries)),
            SectionKey::Testimonials => {
                Self::Testimonials(testimonials_payload(&model.testimonials))
            }
            SectionKey::BusinessHours => {
                Self::BusinessHours(business_hours_payload(&model.business_hours))
            }
            SectionKey::Appointments => {
                Self::Appointments(appointments_payload(&model.appointments))
            }
            SectionKey::SocialLinks => Self::SocialLinks(social_links_payload(&model.social_links)),
            SectionKey::CustomLinks => Self::CustomLinks(custom_links_payload(&model.custom_links)),
        }
    }

    pub fn section(&self) -> SectionKey {
        match self {
            Self::General(_) => SectionKey::General,
            Self::Sections(_) => SectionKey::Sections,
            Self::Services(_) => SectionKey::Services,
            Self::Products(_) => SectionKey::Products,
            Self::Galleries(_) => SectionKey::Galleries,
            Self::Testimonials(_) => SectionKey::Testimonials,
            Self::BusinessHours(_) => SectionKey::BusinessHours,
            Self::Appointments(_) => SectionKey::Appointments,
            Self::SocialLinks(_) => SectionKey::SocialLinks,
            Self::CustomLinks(_) => SectionKey::CustomLinks,
        }
    }
}

impl Serialize for SectionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        fn single<S: Serializer, T: Serialize + ?Sized>(
            serializer: S,
            key: Option<&'static str>,
            value: &T,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(key.unwrap_or_default(), value)?;
            map.end()
        }

        let key = self.section().body_key();
        match self {
            Self::General(general) => general.serialize(serializer),
            Self::Sections(sections) => single(serializer, key, sections),
            Self::Services(items) => single(serializer, key, items),
            Self::Products(items) => single(serializer, key, items),
            Self::Galleries(items) => single(serializer, key, items),
            Self::Testimonials(items) => single(serializer, key, items),
            Self::BusinessHours(items) => single(serializer, key, items),
            Self::Appointments(items) => single(serializer, key, items),
            Self::SocialLinks(items) => single(serializer, key, items),
            Self::CustomLinks(items) => single(serializer, key, items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::VcardDetail;

    fn model(value: serde_json::Value) -> EditorModel {
        let detail: VcardDetail = serde_json::from_value(value).unwrap();
        EditorModel::from_card(&detail)
    }

    #[test]
    fn list_payload_has_single_top_level_key() {
        let m = model(json!({
            "id": "c", "urlAlias": "a",
            "services": [{"title": "Design"}]
        }));
        let body = serde_json::to_value(SectionPayload::build(SectionKey::Services, &m)).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(body["services"][0]["title"], json!("Design"));
        assert!(body["services"][0].get("price").is_none());
    }

    #[test]
    fn general_payload_is_flat() {
        let m = model(json!({
            "id": "c", "urlAlias": " jane ",
            "firstName": " Jane ", "lastName": "Doe", "email": "  ",
            "company": " Acme "
        }));
        let body = serde_json::to_value(SectionPayload::build(SectionKey::General, &m)).unwrap();
        assert_eq!(body["urlAlias"], json!("jane"));
        assert_eq!(body["firstName"], json!("Jane"));
        assert_eq!(body["name"], json!("Jane Doe"));
        assert_eq!(body["company"], json!("Acme"));
        assert!(body.get("email").is_none());
        assert_eq!(body["branding"], json!(true));
    }

    #[test]
    fn empty_items_dropped_and_orders_renumbered() {
        let services = vec![
            ServiceItem {
                title: "  ".into(),
                order: None,
                ..Default::default()
            },
            ServiceItem {
                title: "Second".into(),
                description: "  ".into(),
                order: None,
                ..Default::default()
            },
        ];
        let payload = services_payload(&services);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].order, 0);
        assert_eq!(payload[0].description, None);
    }

    #[test]
    fn product_currency_falls_back_to_usd() {
        let products = vec![ProductItem {
            id: None,
            name: "Mug".into(),
            description: String::new(),
            price: 12.0,
            currency_id: Some(" ".into()),
            currency: None,
            image: String::new(),
            in_stock: false,
            order: Some(4),
        }];
        let payload = products_payload(&products);
        assert_eq!(payload[0].currency_id, "USD");
        assert_eq!(payload[0].order, 4);
        assert!(!payload[0].in_stock);
    }

    #[test]
    fn galleries_require_image_links_require_url() {
        let galleries = vec![
            GalleryItem {
                title: "No image".into(),
                ..Default::default()
            },
            GalleryItem {
                image_url: "https://cdn/x.png".into(),
                ..Default::default()
            },
        ];
        assert_eq!(galleries_payload(&galleries).len(), 1);

        let links = vec![
            SocialLinkItem {
                platform: "x".into(),
                url: "".into(),
                ..Default::default()
            },
            SocialLinkItem {
                platform: " linkedin ".into(),
                url: "https://linkedin.com/in/j".into(),
                ..Default::default()
            },
        ];
        let payload = social_links_payload(&links);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].platform, "linkedin");
        assert_eq!(payload[0].order, 0);

        let custom = vec![
            CustomLinkItem {
                label: " ".into(),
                url: "https://a.test".into(),
                ..Default::default()
            },
            CustomLinkItem {
                label: "Shop".into(),
                url: "https://shop.test".into(),
                icon: "  ".into(),
                ..Default::default()
            },
        ];
        let payload = custom_links_payload(&custom);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].label, "Shop");
        assert_eq!(payload[0].icon, None);
    }

    #[test]
    fn business_hours_send_times_only_when_open() {
        let mut m = model(json!({"id": "c", "urlAlias": "a"}));
        m.business_hours[2].is_open = true;
        m.business_hours[2].open_time = " ".into();
        let payload = business_hours_payload(&m.business_hours);
        assert_eq!(payload.len(), 7);
        assert_eq!(payload[2].open_time.as_deref(), Some("09:00"));
        assert_eq!(payload[2].close_time.as_deref(), Some("18:00"));
        assert_eq!(payload[0].open_time, None);

        let body = serde_json::to_value(&payload[0]).unwrap();
        assert!(body.get("openTime").is_none());
    }

    #[test]
    fn appointment_duration_has_floor() {
        let items = vec![AppointmentItem {
            id: None,
            title: "Call".into(),
            description: String::new(),
            duration: 2.0,
            price: None,
            available: true,
        }];
        assert_eq!(appointments_payload(&items)[0].duration, 5.0);
    }

    #[test]
    fn sections_payload_wraps_flags() {
        let m = model(json!({"id": "c", "urlAlias": "a", "sections": {"map": true}}));
        let body = serde_json::to_value(SectionPayload::build(SectionKey::Sections, &m)).unwrap();
        assert_eq!(body["sections"]["map"], json!(true));
        assert_eq!(body["sections"]["header"], json!(true));
    }
}
