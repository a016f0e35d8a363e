//! Rendered card data
//!
//! Read-only projection handed to card templates as `window.vcardData`.
//! Currency objects are resolved and asset URLs absolute. Fields the
//! renderer does not know about are preserved in `extra` so templates
//! still receive them.

use super::vcard::RawSections;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedSocialLink {
    pub platform: String,
    pub url: String,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedCustomLink {
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedService {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedCurrency {
    pub id: String,
    pub code: String,
    pub symbol: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: RenderedCurrency,
    pub image: Option<String>,
    pub in_stock: bool,
    pub order: i64,
}

impl Default for RenderedProduct {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            price: 0.0,
            currency: RenderedCurrency::default(),
            image: None,
            in_stock: true,
            order: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedGalleryItem {
    pub title: Option<String>,
    pub image_url: String,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedTestimonial {
    pub name: String,
    pub position: Option<String>,
    pub company: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedBusinessHour {
    pub day_of_week: i64,
    pub is_open: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedAppointment {
    pub title: String,
    pub description: Option<String>,
    pub duration: f64,
    pub price: Option<f64>,
    pub available: bool,
}

impl Default for RenderedAppointment {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            duration: 30.0,
            price: None,
            available: true,
        }
    }
}

/// QR descriptor: public card URL plus an embedded image for download
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrCode {
    pub url: String,
    /// `data:<mime>;base64,<payload>`
    pub image_data_url: String,
    pub download_file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedCardData {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub region_code: String,
    pub website: String,
    pub address: String,
    pub bio: String,
    pub profile_image: String,
    pub cover_image: String,
    pub favicon: String,
    pub branding: Option<bool>,
    pub location: String,
    pub location_url: String,
    pub location_embed_tag: Option<String>,
    pub social_links: Vec<RenderedSocialLink>,
    pub custom_links: Vec<RenderedCustomLink>,
    pub services: Vec<RenderedService>,
    pub products: Vec<RenderedProduct>,
    pub galleries: Vec<RenderedGalleryItem>,
    pub testimonials: Vec<RenderedTestimonial>,
    pub business_hours: Vec<RenderedBusinessHour>,
    pub appointments: Vec<RenderedAppointment>,
    pub sections: Option<RawSections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<QrCode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RenderedCardData {
    /// True only when the section flag is present and literally `false`
    pub fn section_disabled(&self, key: &str) -> bool {
        matches!(
            self.sections.as_ref().and_then(|s| s.get(key)),
            Some(Value::Bool(false))
        )
    }
}
