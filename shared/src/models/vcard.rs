//! vCard Model
//!
//! Wire shapes of `/vcards` responses. Item fields are optional and numeric
//! fields are [`LooseNumber`] because the backend does not guarantee either;
//! the editor crate turns these into complete editing state.

use super::currency::CurrencyInfo;
use super::loose::{LooseNumber, null_as_default};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Section visibility flags exactly as received (values may be non-boolean)
pub type RawSections = Map<String, Value>;

/// Section visibility flag names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionFlag {
    Header,
    ContactList,
    Services,
    Products,
    Galleries,
    Blogs,
    Map,
    Testimonials,
    BusinessHours,
    Appointments,
    InstaEmbed,
    Banner,
    Iframe,
    NewsletterPopup,
    OneSignalNotification,
}

impl SectionFlag {
    pub const ALL: [SectionFlag; 15] = [
        Self::Header,
        Self::ContactList,
        Self::Services,
        Self::Products,
        Self::Galleries,
        Self::Blogs,
        Self::Map,
        Self::Testimonials,
        Self::BusinessHours,
        Self::Appointments,
        Self::InstaEmbed,
        Self::Banner,
        Self::Iframe,
        Self::NewsletterPopup,
        Self::OneSignalNotification,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::ContactList => "contactList",
            Self::Services => "services",
            Self::Products => "products",
            Self::Galleries => "galleries",
            Self::Blogs => "blogs",
            Self::Map => "map",
            Self::Testimonials => "testimonials",
            Self::BusinessHours => "businessHours",
            Self::Appointments => "appointments",
            Self::InstaEmbed => "instaEmbed",
            Self::Banner => "banner",
            Self::Iframe => "iframe",
            Self::NewsletterPopup => "newsletterPopup",
            Self::OneSignalNotification => "oneSignalNotification",
        }
    }

    pub fn default_value(&self) -> bool {
        matches!(self, Self::Header | Self::ContactList)
    }

    /// Label and description shown next to the toggle; header and contact
    /// list are always on and have no toggle
    pub fn toggle_copy(&self) -> Option<(&'static str, &'static str)> {
        let copy = match self {
            Self::Header | Self::ContactList => return None,
            Self::Services => ("Services", "Showcase your service offerings with pricing or CTAs."),
            Self::Products => ("Products", "List products or packages available for purchase."),
            Self::Galleries => ("Gallery", "Share photos of your work, events, or storefront."),
            Self::Testimonials => ("Testimonials", "Highlight client stories and feedback."),
            Self::BusinessHours => ("Business hours", "Display when customers can reach you."),
            Self::Appointments => ("Appointments", "Allow booking of time slots for consultations."),
            Self::Blogs => ("Blog & updates", "Publish articles, news, or announcements."),
            Self::Map => ("Map embed", "Embed a map to help visitors find your location."),
            Self::InstaEmbed => ("Instagram embed", "Showcase Instagram content directly on the card."),
            Self::Banner => ("Hero banner", "Display promotional banners or seasonal offers."),
            Self::Iframe => ("Custom iframe", "Embed booking widgets or external forms."),
            Self::NewsletterPopup => ("Newsletter popup", "Collect leads with a newsletter signup popup."),
            Self::OneSignalNotification => (
                "Push notifications",
                "Enable OneSignal notifications for repeat engagement.",
            ),
        };
        Some(copy)
    }
}

/// Normalized section visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcardSections {
    pub header: bool,
    pub contact_list: bool,
    pub services: bool,
    pub products: bool,
    pub galleries: bool,
    pub blogs: bool,
    pub map: bool,
    pub testimonials: bool,
    pub business_hours: bool,
    pub appointments: bool,
    pub insta_embed: bool,
    pub banner: bool,
    pub iframe: bool,
    pub newsletter_popup: bool,
    pub one_signal_notification: bool,
}

impl Default for VcardSections {
    fn default() -> Self {
        let mut sections = Self::all(false);
        sections.header = true;
        sections.contact_list = true;
        sections
    }
}

impl VcardSections {
    fn all(value: bool) -> Self {
        Self {
            header: value,
            contact_list: value,
            services: value,
            products: value,
            galleries: value,
            blogs: value,
            map: value,
            testimonials: value,
            business_hours: value,
            appointments: value,
            insta_embed: value,
            banner: value,
            iframe: value,
            newsletter_popup: value,
            one_signal_notification: value,
        }
    }

    /// Boolean entries are taken as-is; anything else takes the default
    pub fn from_raw(raw: Option<&RawSections>) -> Self {
        let mut sections = Self::default();
        for flag in SectionFlag::ALL {
            if let Some(Value::Bool(value)) = raw.and_then(|r| r.get(flag.key())) {
                sections.set(flag, *value);
            }
        }
        sections
    }

    pub fn get(&self, flag: SectionFlag) -> bool {
        match flag {
            SectionFlag::Header => self.header,
            SectionFlag::ContactList => self.contact_list,
            SectionFlag::Services => self.services,
            SectionFlag::Products => self.products,
            SectionFlag::Galleries => self.galleries,
            SectionFlag::Blogs => self.blogs,
            SectionFlag::Map => self.map,
            SectionFlag::Testimonials => self.testimonials,
            SectionFlag::BusinessHours => self.business_hours,
            SectionFlag::Appointments => self.appointments,
            SectionFlag::InstaEmbed => self.insta_embed,
            SectionFlag::Banner => self.banner,
            SectionFlag::Iframe => self.iframe,
            SectionFlag::NewsletterPopup => self.newsletter_popup,
            SectionFlag::OneSignalNotification => self.one_signal_notification,
        }
    }

    pub fn set(&mut self, flag: SectionFlag, value: bool) {
        let slot = match flag {
            SectionFlag::Header => &mut self.header,
            SectionFlag::ContactList => &mut self.contact_list,
            SectionFlag::Services => &mut self.services,
            SectionFlag::Products => &mut self.products,
            SectionFlag::Galleries => &mut self.galleries,
            SectionFlag::Blogs => &mut self.blogs,
            SectionFlag::Map => &mut self.map,
            SectionFlag::Testimonials => &mut self.testimonials,
            SectionFlag::BusinessHours => &mut self.business_hours,
            SectionFlag::Appointments => &mut self.appointments,
            SectionFlag::InstaEmbed => &mut self.insta_embed,
            SectionFlag::Banner => &mut self.banner,
            SectionFlag::Iframe => &mut self.iframe,
            SectionFlag::NewsletterPopup => &mut self.newsletter_popup,
            SectionFlag::OneSignalNotification => &mut self.one_signal_notification,
        };
        *slot = value;
    }
}

/// Independently saved parts of a card; each maps to one top-level key of
/// the `PATCH /vcards/{id}` body (general fields are sent flat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    General,
    Sections,
    Services,
    Products,
    Galleries,
    Testimonials,
    BusinessHours,
    Appointments,
    SocialLinks,
    CustomLinks,
}

impl SectionKey {
    pub const ALL: [SectionKey; 10] = [
        Self::General,
        Self::Sections,
        Self::Services,
        Self::Products,
        Self::Galleries,
        Self::Testimonials,
        Self::BusinessHours,
        Self::Appointments,
        Self::SocialLinks,
        Self::CustomLinks,
    ];

    /// Body key, `None` for general fields
    pub fn body_key(&self) -> Option<&'static str> {
        match self {
            Self::General => None,
            Self::Sections => Some("sections"),
            Self::Services => Some("services"),
            Self::Products => Some("products"),
            Self::Galleries => Some("galleries"),
            Self::Testimonials => Some("testimonials"),
            Self::BusinessHours => Some("businessHours"),
            Self::Appointments => Some("appointments"),
            Self::SocialLinks => Some("socialLinks"),
            Self::CustomLinks => Some("customLinks"),
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::General => "Card details updated successfully.",
            Self::Sections => "Section visibility updated.",
            Self::Services => "Services updated successfully.",
            Self::Products => "Products updated successfully.",
            Self::Galleries => "Gallery updated successfully.",
            Self::Testimonials => "Testimonials updated successfully.",
            Self::BusinessHours => "Business hours updated successfully.",
            Self::Appointments => "Appointments updated successfully.",
            Self::SocialLinks => "Social links updated successfully.",
            Self::CustomLinks => "Custom links updated successfully.",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::General => "Unable to update card details. Please try again.",
            Self::Sections => "Unable to update sections. Please review your plan permissions.",
            Self::Services => {
                "Unable to update services. Review your plan limits or try again later."
            }
            Self::Products => "Unable to update products. Ensure currency and price are provided.",
            Self::Galleries => "Unable to update gallery. Please try again.",
            Self::Testimonials => "Unable to update testimonials. Please try again.",
            Self::BusinessHours => "Unable to update business hours. Please try again.",
            Self::Appointments => "Unable to update appointments. Please try again.",
            Self::SocialLinks => "Unable to update social links. Please check the URLs provided.",
            Self::CustomLinks => "Unable to update custom links. Please verify the URLs.",
        }
    }
}

// ========== Collection items (wire form) ==========

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardServiceItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub price: Option<LooseNumber>,
    pub order: Option<LooseNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardProductItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<LooseNumber>,
    pub currency_id: Option<String>,
    pub currency: Option<CurrencyInfo>,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
    pub order: Option<LooseNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardGalleryItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub order: Option<LooseNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardTestimonialItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<LooseNumber>,
    pub order: Option<LooseNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardBusinessHourItem {
    pub id: Option<String>,
    pub day_of_week: Option<LooseNumber>,
    pub is_open: Option<bool>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardAppointmentItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<LooseNumber>,
    pub price: Option<LooseNumber>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardSocialLinkItem {
    pub id: Option<String>,
    pub platform: Option<String>,
    pub url: Option<String>,
    pub order: Option<LooseNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardCustomLinkItem {
    pub id: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub order: Option<LooseNumber>,
}

// ========== Cards ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcardTemplateRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// Card row in the dashboard listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcardSummary {
    pub id: String,
    pub url_alias: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub template: Option<VcardTemplateRef>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub sections: Option<RawSections>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Full card as returned by `GET /vcards/{id}` and every `PATCH`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VcardDetail {
    pub id: String,
    pub url_alias: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub region_code: Option<String>,
    pub occupation: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub location_url: Option<String>,
    pub location_type: Option<String>,
    pub location_embed_tag: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub favicon: Option<String>,
    pub branding: Option<bool>,
    pub template: Option<VcardTemplateRef>,
    pub status: Option<i64>,
    pub sections: Option<RawSections>,
    #[serde(deserialize_with = "null_as_default")]
    pub services: Vec<VcardServiceItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub products: Vec<VcardProductItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub galleries: Vec<VcardGalleryItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub testimonials: Vec<VcardTestimonialItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub business_hours: Vec<VcardBusinessHourItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub appointments: Vec<VcardAppointmentItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub social_links: Vec<VcardSocialLinkItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub custom_links: Vec<VcardCustomLinkItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_warnings: Option<Vec<String>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl VcardDetail {
    /// Plan warnings joined with a single space, `None` when there are none
    pub fn plan_warnings_message(&self) -> Option<String> {
        self.plan_warnings
            .as_ref()
            .filter(|w| !w.is_empty())
            .map(|w| w.join(" "))
    }
}

/// `POST /vcards`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcardCreate {
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
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
}

impl VcardCreate {
    /// Display name falls back to "first last" when not given
    pub fn resolve_name(display_name: &str, first_name: &str, last_name: &str) -> String {
        if !display_name.trim().is_empty() {
            return display_name.trim().to_string();
        }
        [first_name.trim(), last_name.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Public card URL for an alias under the given site origin
pub fn public_card_link(origin: &str, alias: &str) -> String {
    let mut base = if origin.trim().is_empty() {
        "http://localhost:3001".to_string()
    } else {
        origin.trim().to_string()
    };
    if !base.starts_with("http") {
        base = format!("http://{base}");
    }
    format!("{}/cards/{}", base.trim_end_matches('/'), alias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sections_from_raw_ignores_non_booleans() {
        let raw: RawSections = serde_json::from_value(json!({
            "header": false,
            "services": true,
            "products": "yes",
            "map": null
        }))
        .unwrap();
        let sections = VcardSections::from_raw(Some(&raw));
        assert!(!sections.header);
        assert!(sections.contact_list);
        assert!(sections.services);
        assert!(!sections.products);
        assert!(!sections.map);
    }

    #[test]
    fn sections_default_when_absent() {
        let sections = VcardSections::from_raw(None);
        assert_eq!(sections, VcardSections::default());
        for flag in SectionFlag::ALL {
            assert_eq!(sections.get(flag), flag.default_value());
        }
    }

    #[test]
    fn sections_serialize_camel_case() {
        let mut sections = VcardSections::default();
        sections.set(SectionFlag::BusinessHours, true);
        let value = serde_json::to_value(sections).unwrap();
        assert_eq!(value["businessHours"], json!(true));
        assert_eq!(value["oneSignalNotification"], json!(false));
    }

    #[test]
    fn detail_tolerates_nulls_and_string_numbers() {
        let detail: VcardDetail = serde_json::from_value(json!({
            "id": "c1",
            "urlAlias": "jane",
            "services": null,
            "products": [{"name": "Mug", "price": "12.50"}],
            "businessHours": [{"dayOfWeek": 1}],
            "planWarnings": []
        }))
        .unwrap();
        assert!(detail.services.is_empty());
        assert_eq!(
            detail.products[0].price.as_ref().and_then(LooseNumber::to_f64),
            Some(12.5)
        );
        assert_eq!(detail.plan_warnings_message(), None);
    }

    #[test]
    fn plan_warnings_join_with_space() {
        let detail = VcardDetail {
            plan_warnings: Some(vec!["Limit reached.".into(), "Upgrade.".into()]),
            ..Default::default()
        };
        assert_eq!(
            detail.plan_warnings_message().as_deref(),
            Some("Limit reached. Upgrade.")
        );
    }

    #[test]
    fn public_link_normalizes_origin() {
        assert_eq!(
            public_card_link("example.com/", "jane"),
            "http://example.com/cards/jane"
        );
        assert_eq!(public_card_link("", "a"), "http://localhost:3001/cards/a");
        assert_eq!(
            public_card_link("https://ivgk.io", "a"),
            "https://ivgk.io/cards/a"
        );
    }

    #[test]
    fn create_name_falls_back_to_first_last() {
        assert_eq!(VcardCreate::resolve_name(" ", "Jane", "Doe"), "Jane Doe");
        assert_eq!(VcardCreate::resolve_name("JD", "Jane", "Doe"), "JD");
        assert_eq!(VcardCreate::resolve_name("", "", "Doe"), "Doe");
    }
}
