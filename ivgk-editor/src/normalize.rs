//! Card data normalization
//!
//! Turns a loosely-typed [`VcardDetail`] into complete editing state:
//! every string present, every list item ordered, exactly seven
//! business-hour slots, and section flags defaulted.

use serde::{Deserialize, Serialize};
use shared::models::{
    CurrencyInfo, LooseNumber, VcardAppointmentItem, VcardBusinessHourItem, VcardCustomLinkItem,
    VcardDetail, VcardGalleryItem, VcardProductItem, VcardSections, VcardServiceItem,
    VcardSocialLinkItem, VcardTestimonialItem, coerce,
};

pub const DEFAULT_OPEN_TIME: &str = "09:00";
pub const DEFAULT_CLOSE_TIME: &str = "18:00";
pub const DEFAULT_APPOINTMENT_MINUTES: f64 = 30.0;
pub const MIN_APPOINTMENT_MINUTES: f64 = 5.0;

/// Weekday names indexed by `dayOfWeek` (0 = Sunday)
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralState {
    pub url_alias: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
    pub occupation: String,
    pub region_code: String,
    pub description: String,
    pub location: String,
    pub location_url: String,
    pub location_embed_tag: String,
    pub profile_image: String,
    pub cover_image: String,
    pub favicon: String,
    pub branding: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub image: String,
    /// `None` means "not priced"
    pub price: Option<f64>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency_id: Option<String>,
    pub currency: Option<CurrencyInfo>,
    pub image: String,
    pub in_stock: bool,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: Option<String>,
    pub title: String,
    pub image_url: String,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialItem {
    pub id: Option<String>,
    pub name: String,
    pub position: String,
    pub company: String,
    pub content: String,
    pub image_url: String,
    /// Always within [1, 5] when present
    pub rating: Option<f64>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHourSlot {
    pub id: Option<String>,
    pub day_of_week: u8,
    pub is_open: bool,
    pub open_time: String,
    pub close_time: String,
}

impl BusinessHourSlot {
    pub fn closed(day_of_week: u8) -> Self {
        Self {
            id: None,
            day_of_week,
            is_open: false,
            open_time: DEFAULT_OPEN_TIME.to_string(),
            close_time: DEFAULT_CLOSE_TIME.to_string(),
        }
    }

    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[usize::from(self.day_of_week) % 7]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentItem {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub price: Option<f64>,
    pub available: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinkItem {
    pub id: Option<String>,
    pub platform: String,
    pub url: String,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomLinkItem {
    pub id: Option<String>,
    pub label: String,
    pub url: String,
    pub icon: String,
    pub order: Option<i64>,
}

/// Complete, default-filled editing state of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorModel {
    pub general: GeneralState,
    pub sections: VcardSections,
    pub services: Vec<ServiceItem>,
    pub products: Vec<ProductItem>,
    pub galleries: Vec<GalleryItem>,
    pub testimonials: Vec<TestimonialItem>,
    /// Indexed by `dayOfWeek`
    pub business_hours: [BusinessHourSlot; 7],
    pub appointments: Vec<AppointmentItem>,
    pub social_links: Vec<SocialLinkItem>,
    pub custom_links: Vec<CustomLinkItem>,
}

impl EditorModel {
    pub fn from_card(card: &VcardDetail) -> Self {
        Self {
            general: general_state(card),
            sections: VcardSections::from_raw(card.sections.as_ref()),
            services: normalize_services(&card.services),
            products: normalize_products(&card.products),
            galleries: normalize_galleries(&card.galleries),
            testimonials: normalize_testimonials(&card.testimonials),
            business_hours: normalize_business_hours(&card.business_hours),
            appointments: normalize_appointments(&card.appointments),
            social_links: normalize_social_links(&card.social_links),
            custom_links: normalize_custom_links(&card.custom_links),
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// `order` as given, else the item's position
fn order_or_index(order: Option<&LooseNumber>, index: usize) -> Option<i64> {
    Some(
        order
            .and_then(LooseNumber::to_f64)
            .map_or(index as i64, |n| n.trunc() as i64),
    )
}

/// Absent or null stays `None`; anything else coerces with a 0 fallback
fn optional_price(value: Option<&LooseNumber>) -> Option<f64> {
    value.map(|v| v.or(0.0))
}

/// Numeric ratings clamp to [1, 5]; non-numeric or absent becomes `None`
pub fn clamp_rating(value: Option<&LooseNumber>) -> Option<f64> {
    value.and_then(LooseNumber::to_f64).map(|r| r.clamp(1.0, 5.0))
}

pub fn general_state(card: &VcardDetail) -> GeneralState {
    let full_name = card.name.as_deref().map(str::trim).unwrap_or_default();
    let display_name = if full_name.is_empty() {
        [card.first_name.as_deref(), card.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    } else {
        full_name.to_string()
    };

    GeneralState {
        url_alias: card.url_alias.clone(),
        first_name: text(&card.first_name),
        last_name: text(&card.last_name),
        display_name,
        email: text(&card.email),
        phone: text(&card.phone),
        company: text(&card.company),
        job_title: text(&card.job_title),
        occupation: text(&card.occupation),
        region_code: text(&card.region_code),
        description: text(&card.description),
        location: text(&card.location),
        location_url: text(&card.location_url),
        location_embed_tag: text(&card.location_embed_tag),
        profile_image: text(&card.profile_image),
        cover_image: text(&card.cover_image),
        favicon: text(&card.favicon),
        branding: card.branding.unwrap_or(true),
    }
}

pub fn normalize_services(items: &[VcardServiceItem]) -> Vec<ServiceItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| ServiceItem {
            id: item.id.clone(),
            title: text(&item.title),
            description: text(&item.description),
            icon: text(&item.icon),
            image: text(&item.image),
            price: optional_price(item.price.as_ref()),
            order: order_or_index(item.order.as_ref(), index),
        })
        .collect()
}

pub fn normalize_products(items: &[VcardProductItem]) -> Vec<ProductItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| ProductItem {
            id: item.id.clone(),
            name: text(&item.name),
            description: text(&item.description),
            price: coerce(item.price.as_ref(), 0.0),
            currency_id: item.currency_id.clone(),
            currency: item.currency.clone(),
            image: text(&item.image),
            in_stock: item.in_stock.unwrap_or(true),
            order: order_or_index(item.order.as_ref(), index),
        })
        .collect()
}

pub fn normalize_galleries(items: &[VcardGalleryItem]) -> Vec<GalleryItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| GalleryItem {
            id: item.id.clone(),
            title: text(&item.title),
            image_url: text(&item.image_url),
            order: order_or_index(item.order.as_ref(), index),
        })
        .collect()
}

pub fn normalize_testimonials(items: &[VcardTestimonialItem]) -> Vec<TestimonialItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| TestimonialItem {
            id: item.id.clone(),
            name: text(&item.name),
            position: text(&item.position),
            company: text(&item.company),
            content: text(&item.content),
            image_url: text(&item.image_url),
            rating: clamp_rating(item.rating.as_ref()),
            order: order_or_index(item.order.as_ref(), index),
        })
        .collect()
}

/// Seven slots indexed 0..=6; missing days closed 09:00-18:00, out-of-range
/// or non-integral days dropped, later duplicates win
pub fn normalize_business_hours(items: &[VcardBusinessHourItem]) -> [BusinessHourSlot; 7] {
    let mut slots: [BusinessHourSlot; 7] = std::array::from_fn(|day| BusinessHourSlot::closed(day as u8));

    for item in items {
        let Some(day) = item.day_of_week.as_ref().and_then(LooseNumber::to_f64) else {
            continue;
        };
        if day.fract() != 0.0 || !(0.0..=6.0).contains(&day) {
            continue;
        }
        let day = day as u8;
        slots[usize::from(day)] = BusinessHourSlot {
            id: item.id.clone(),
            day_of_week: day,
            is_open: item.is_open.unwrap_or(true),
            open_time: item
                .open_time
                .clone()
                .unwrap_or_else(|| DEFAULT_OPEN_TIME.to_string()),
            close_time: item
                .close_time
                .clone()
                .unwrap_or_else(|| DEFAULT_CLOSE_TIME.to_string()),
        };
    }

    slots
}

pub fn normalize_appointments(items: &[VcardAppointmentItem]) -> Vec<AppointmentItem> {
    items
        .iter()
        .map(|item| AppointmentItem {
            id: item.id.clone(),
            title: text(&item.title),
            description: text(&item.description),
            duration: coerce(item.duration.as_ref(), DEFAULT_APPOINTMENT_MINUTES),
            price: optional_price(item.price.as_ref()),
            available: item.available.unwrap_or(true),
        })
        .collect()
}

pub fn normalize_social_links(items: &[VcardSocialLinkItem]) -> Vec<SocialLinkItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| SocialLinkItem {
            id: item.id.clone(),
            platform: text(&item.platform),
            url: text(&item.url),
            order: order_or_index(item.order.as_ref(), index),
        })
        .collect()
}

pub fn normalize_custom_links(items: &[VcardCustomLinkItem]) -> Vec<CustomLinkItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| CustomLinkItem {
            id: item.id.clone(),
            label: text(&item.label),
            url: text(&item.url),
            icon: text(&item.icon),
            order: order_or_index(item.order.as_ref(), index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: serde_json::Value) -> VcardDetail {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn business_hours_always_seven_slots() {
        let detail = card(json!({"id": "c", "urlAlias": "a"}));
        let model = EditorModel::from_card(&detail);
        assert_eq!(model.business_hours.len(), 7);
        for (day, slot) in model.business_hours.iter().enumerate() {
            assert_eq!(usize::from(slot.day_of_week), day);
            assert!(!slot.is_open);
            assert_eq!(slot.open_time, "09:00");
            assert_eq!(slot.close_time, "18:00");
        }
    }

    #[test]
    fn business_hours_merge_provided_slots() {
        let detail = card(json!({
            "id": "c", "urlAlias": "a",
            "businessHours": [
                {"dayOfWeek": 1, "openTime": "08:00"},
                {"dayOfWeek": 5, "isOpen": false, "closeTime": "14:00"},
                {"dayOfWeek": 9, "isOpen": true},
                {"dayOfWeek": -1, "isOpen": true},
                {"isOpen": true}
            ]
        }));
        let hours = EditorModel::from_card(&detail).business_hours;
        assert!(hours[1].is_open);
        assert_eq!(hours[1].open_time, "08:00");
        assert_eq!(hours[1].close_time, "18:00");
        assert!(!hours[5].is_open);
        assert_eq!(hours[5].close_time, "14:00");
        assert_eq!(hours.iter().filter(|s| s.is_open).count(), 1);
        assert_eq!(hours[0].day_name(), "Sunday");
    }

    #[test]
    fn rating_clamps_and_non_numeric_becomes_none() {
        let detail = card(json!({
            "id": "c", "urlAlias": "a",
            "testimonials": [
                {"name": "a", "rating": 9},
                {"name": "b", "rating": 0},
                {"name": "c", "rating": "4"},
                {"name": "d", "rating": "great"},
                {"name": "e"},
                {"name": "f", "rating": null}
            ]
        }));
        let ratings: Vec<_> = EditorModel::from_card(&detail)
            .testimonials
            .iter()
            .map(|t| t.rating)
            .collect();
        assert_eq!(
            ratings,
            vec![Some(5.0), Some(1.0), Some(4.0), None, None, None]
        );
    }

    #[test]
    fn prices_and_durations_coerce() {
        let detail = card(json!({
            "id": "c", "urlAlias": "a",
            "services": [{"title": "a"}, {"title": "b", "price": "abc"}, {"title": "c", "price": "12.5"}],
            "products": [{"name": "p", "price": "n/a"}],
            "appointments": [{"title": "x"}, {"title": "y", "duration": "45", "price": null}]
        }));
        let model = EditorModel::from_card(&detail);
        assert_eq!(model.services[0].price, None);
        assert_eq!(model.services[1].price, Some(0.0));
        assert_eq!(model.services[2].price, Some(12.5));
        assert_eq!(model.products[0].price, 0.0);
        assert!(model.products[0].in_stock);
        assert_eq!(model.appointments[0].duration, 30.0);
        assert!(model.appointments[0].available);
        assert_eq!(model.appointments[1].duration, 45.0);
        assert_eq!(model.appointments[1].price, None);
    }

    #[test]
    fn order_falls_back_to_index() {
        let detail = card(json!({
            "id": "c", "urlAlias": "a",
            "galleries": [{"imageUrl": "x", "order": 7}, {"imageUrl": "y"}],
            "socialLinks": [{"platform": "x"}, {"platform": "y"}, {"platform": "z", "order": "bad"}]
        }));
        let model = EditorModel::from_card(&detail);
        assert_eq!(model.galleries[0].order, Some(7));
        assert_eq!(model.galleries[1].order, Some(1));
        assert_eq!(model.social_links[2].order, Some(2));
    }

    #[test]
    fn general_state_defaults() {
        let detail = card(json!({
            "id": "c", "urlAlias": "jane",
            "name": "  ", "firstName": "Jane", "lastName": "Doe",
            "email": null
        }));
        let general = general_state(&detail);
        assert_eq!(general.display_name, "Jane Doe");
        assert_eq!(general.email, "");
        assert!(general.branding);

        let named = card(json!({"id": "c", "urlAlias": "j", "name": " JD ", "branding": false}));
        let general = general_state(&named);
        assert_eq!(general.display_name, "JD");
        assert!(!general.branding);
    }

    #[test]
    fn sections_default_header_and_contact_list() {
        let detail = card(json!({"id": "c", "urlAlias": "a", "sections": {"services": "true"}}));
        let model = EditorModel::from_card(&detail);
        assert!(model.sections.header);
        assert!(model.sections.contact_list);
        assert!(!model.sections.services);
    }
}
