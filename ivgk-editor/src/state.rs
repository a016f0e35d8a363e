//! Editor state and reducer
//!
//! All editing goes through [`reduce`], a pure function from the current
//! state and one [`EditorAction`] to the next state. Save and upload
//! progress is tracked per section so independent saves never share
//! status.

use crate::normalize::{
    AppointmentItem, CustomLinkItem, DEFAULT_APPOINTMENT_MINUTES, EditorModel, GalleryItem,
    MIN_APPOINTMENT_MINUTES, ProductItem, ServiceItem, SocialLinkItem, TestimonialItem,
};
use crate::payload::FALLBACK_CURRENCY_ID;
use shared::models::{CurrencyInfo, SectionFlag, SectionKey, VcardDetail};
use std::collections::HashMap;

pub const CURRENCY_LOAD_FAILED: &str = "Unable to load currencies. Defaulting to USD.";
pub const UPLOAD_FAILED: &str = "Unable to upload image. Please try again.";

/// Save progress of one section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionStatus {
    pub saving: bool,
    pub uploading: bool,
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralField {
    UrlAlias,
    FirstName,
    LastName,
    DisplayName,
    Email,
    Phone,
    Company,
    JobTitle,
    Occupation,
    RegionCode,
    Description,
    Location,
    LocationUrl,
    LocationEmbedTag,
    ProfileImage,
    CoverImage,
    Favicon,
}

/// Editable lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Services,
    Products,
    Galleries,
    Testimonials,
    Appointments,
    SocialLinks,
    CustomLinks,
}

impl ListKind {
    pub fn section(&self) -> SectionKey {
        match self {
            Self::Services => SectionKey::Services,
            Self::Products => SectionKey::Products,
            Self::Galleries => SectionKey::Galleries,
            Self::Testimonials => SectionKey::Testimonials,
            Self::Appointments => SectionKey::Appointments,
            Self::SocialLinks => SectionKey::SocialLinks,
            Self::CustomLinks => SectionKey::CustomLinks,
        }
    }
}

/// Item fields across all lists; a field an item does not have is ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Title,
    Name,
    Description,
    Icon,
    Image,
    ImageUrl,
    Price,
    CurrencyId,
    InStock,
    Position,
    Company,
    Content,
    Rating,
    Duration,
    Available,
    Platform,
    Url,
    Label,
    Order,
}

/// Raw user input for a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text(String),
    Flag(bool),
}

impl FieldInput {
    fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    fn flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

/// Number from form input, `fallback` when unparsable
fn number_or(input: &str, fallback: f64) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(fallback)
}

/// Blank input clears the value
fn optional_number(input: &str, fallback: f64) -> Option<f64> {
    (!input.trim().is_empty()).then(|| number_or(input, fallback))
}

fn optional_order(input: &str, index: usize) -> Option<i64> {
    optional_number(input, index as f64).map(|n| n.trunc() as i64)
}

/// Each whitespace run becomes a single `-`
fn dash_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for c in value.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('-');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Field edits on one list item
trait EditableItem {
    /// Returns false when the item has no such field
    fn apply(&mut self, field: ItemField, input: &FieldInput, index: usize) -> bool;
}

macro_rules! set_text {
    ($slot:expr, $input:expr) => {
        match $input.text() {
            Some(value) => {
                $slot = value.to_string();
                true
            }
            None => false,
        }
    };
}

impl EditableItem for ServiceItem {
    fn apply(&mut self, field: ItemField, input: &FieldInput, index: usize) -> bool {
        match field {
            ItemField::Title => set_text!(self.title, input),
            ItemField::Description => set_text!(self.description, input),
            ItemField::Icon => set_text!(self.icon, input),
            ItemField::Image => set_text!(self.image, input),
            ItemField::Price => input
                .text()
                .map(|v| self.price = optional_number(v, 0.0))
                .is_some(),
            ItemField::Order => input
                .text()
                .map(|v| self.order = optional_order(v, index))
                .is_some(),
            _ => false,
        }
    }
}

impl EditableItem for ProductItem {
    fn apply(&mut self, field: ItemField, input: &FieldInput, index: usize) -> bool {
        match field {
            ItemField::Name => set_text!(self.name, input),
            ItemField::Description => set_text!(self.description, input),
            ItemField::Image => set_text!(self.image, input),
            ItemField::Price => input
                .text()
                .map(|v| self.price = number_or(v, 0.0))
                .is_some(),
            ItemField::CurrencyId => input
                .text()
                .map(|v| {
                    self.currency_id = Some(v.to_string());
                    self.currency = None;
                })
                .is_some(),
            ItemField::InStock => input.flag().map(|b| self.in_stock = b).is_some(),
            ItemField::Order => input
                .text()
                .map(|v| self.order = optional_order(v, index))
                .is_some(),
            _ => false,
        }
    }
}

impl EditableItem for GalleryItem {
    fn apply(&mut self, field: ItemField, input: &FieldInput, index: usize) -> bool {
        match field {
            ItemField::Title => set_text!(self.title, input),
            ItemField::ImageUrl => set_text!(self.image_url, input),
            ItemField::Order => input
                .text()
                .map(|v| self.order = optional_order(v, index))
                .is_some(),
            _ => false,
        }
    }
}

impl EditableItem for TestimonialItem {
    fn apply(&mut self, field: ItemField, input: &FieldInput, index: usize) -> bool {
        match field {
            ItemField::Name => set_text!(self.name, input),
            ItemField::Position => set_text!(self.position, input),
            ItemField::Company => set_text!(self.company, input),
            ItemField::Content => set_text!(self.content, input),
            ItemField::ImageUrl => set_text!(self.image_url, input),
            ItemField::Rating => input
                .text()
                .map(|v| self.rating = optional_number(v, 0.0).map(|r| r.clamp(1.0, 5.0)))
                .is_some(),
            ItemField::Order => input
                .text()
                .map(|v| self.order = optional_order(v, index))
                .is_some(),
            _ => false,
        }
    }
}

impl EditableItem for AppointmentItem {
    fn apply(&mut self, field: ItemField, input: &FieldInput, _index: usize) -> bool {
        match field {
            ItemField::Title => set_text!(self.title, input),
            ItemField::Description => set_text!(self.description, input),
            ItemField::Duration => input
                .text()
                .map(|v| {
                    self.duration =
                        number_or(v, DEFAULT_APPOINTMENT_MINUTES).max(MIN_APPOINTMENT_MINUTES)
                })
                .is_some(),
            ItemField::Price => input
                .text()
                .map(|v| self.price = optional_number(v, 0.0))
                .is_some(),
            ItemField::Available => input.flag().map(|b| self.available = b).is_some(),
            _ => false,
        }
    }
}

impl EditableItem for SocialLinkItem {
    fn apply(&mut self, field: ItemField, input: &FieldInput, index: usize) -> bool {
        match field {
            ItemField::Platform => set_text!(self.platform, input),
            ItemField::Url => set_text!(self.url, input),
            ItemField::Order => input
                .text()
                .map(|v| self.order = optional_order(v, index))
                .is_some(),
            _ => false,
        }
    }
}

impl EditableItem for CustomLinkItem {
    fn apply(&mut self, field: ItemField, input: &FieldInput, index: usize) -> bool {
        match field {
            ItemField::Label => set_text!(self.label, input),
            ItemField::Url => set_text!(self.url, input),
            ItemField::Icon => set_text!(self.icon, input),
            ItemField::Order => input
                .text()
                .map(|v| self.order = optional_order(v, index))
                .is_some(),
            _ => false,
        }
    }
}

fn apply_at<T: EditableItem>(
    items: &mut [T],
    index: usize,
    field: ItemField,
    input: &FieldInput,
) -> bool {
    items
        .get_mut(index)
        .is_some_and(|item| item.apply(field, input, index))
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralAsset {
    ProfileImage,
    CoverImage,
    Favicon,
}

/// Where an uploaded image lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetTarget {
    General(GeneralAsset),
    Service(usize),
    Product(usize),
    Gallery(usize),
    Testimonial(usize),
}

impl AssetTarget {
    /// Storage sub-category sent with the upload
    pub fn sub_category(&self) -> &'static str {
        match self {
            Self::General(GeneralAsset::ProfileImage) => "profile",
            Self::General(GeneralAsset::CoverImage) => "cover",
            Self::General(GeneralAsset::Favicon) => "favicon",
            Self::Service(_) => "service",
            Self::Product(_) => "product",
            Self::Gallery(_) => "gallery",
            Self::Testimonial(_) => "testimonial",
        }
    }

    pub fn section(&self) -> SectionKey {
        match self {
            Self::General(_) => SectionKey::General,
            Self::Service(_) => SectionKey::Services,
            Self::Product(_) => SectionKey::Products,
            Self::Gallery(_) => SectionKey::Galleries,
            Self::Testimonial(_) => SectionKey::Testimonials,
        }
    }

    pub fn uploaded_message(&self) -> &'static str {
        match self {
            Self::General(_) => "Image uploaded. Save changes to publish.",
            Self::Service(_) => "Image uploaded. Save services to publish.",
            Self::Product(_) => "Image uploaded. Save products to publish.",
            Self::Gallery(_) => "Image uploaded. Save gallery to publish.",
            Self::Testimonial(_) => "Image uploaded. Save testimonials to publish.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HourEdit {
    IsOpen(bool),
    OpenTime(String),
    CloseTime(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Replace all editing state from a fetched or saved card
    Hydrate(Box<VcardDetail>),
    EditGeneral {
        field: GeneralField,
        value: String,
    },
    SetBranding(bool),
    ToggleSection {
        flag: SectionFlag,
        enabled: bool,
    },
    AddItem(ListKind),
    UpdateItem {
        list: ListKind,
        index: usize,
        field: ItemField,
        input: FieldInput,
    },
    RemoveItem {
        list: ListKind,
        index: usize,
    },
    EditHour {
        day: usize,
        edit: HourEdit,
    },
    CurrenciesLoaded(Vec<CurrencyInfo>),
    CurrenciesFailed,
    SaveStarted(SectionKey),
    SaveSucceeded {
        section: SectionKey,
        card: Box<VcardDetail>,
    },
    SaveFailed {
        section: SectionKey,
        message: String,
    },
    UploadStarted(AssetTarget),
    UploadSucceeded {
        target: AssetTarget,
        url: String,
    },
    UploadFailed {
        target: AssetTarget,
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub card_id: String,
    pub model: EditorModel,
    pub currencies: Vec<CurrencyInfo>,
    pub currency_error: Option<String>,
    pub plan_warnings: Option<String>,
    pub sections: HashMap<SectionKey, SectionStatus>,
}

impl EditorState {
    pub fn new(card: &VcardDetail) -> Self {
        Self {
            card_id: card.id.clone(),
            model: EditorModel::from_card(card),
            currencies: Vec::new(),
            currency_error: None,
            plan_warnings: card.plan_warnings_message(),
            sections: HashMap::new(),
        }
    }

    pub fn status(&self, section: SectionKey) -> SectionStatus {
        self.sections.get(&section).cloned().unwrap_or_default()
    }

    pub fn is_saving(&self, section: SectionKey) -> bool {
        self.sections.get(&section).is_some_and(|s| s.saving)
    }

    fn status_mut(&mut self, section: SectionKey) -> &mut SectionStatus {
        self.sections.entry(section).or_default()
    }

    /// First loaded currency, else USD
    pub fn default_currency_id(&self) -> String {
        self.currencies
            .first()
            .map(|c| c.id.clone())
            .unwrap_or_else(|| FALLBACK_CURRENCY_ID.to_string())
    }

    fn hydrate(&mut self, card: &VcardDetail) {
        self.card_id = card.id.clone();
        self.model = EditorModel::from_card(card);
        self.plan_warnings = card.plan_warnings_message();
    }

    fn add_item(&mut self, list: ListKind) {
        let model = &mut self.model;
        match list {
            ListKind::Services => {
                let order = model.services.len() as i64;
                model.services.push(ServiceItem {
                    order: Some(order),
                    ..Default::default()
                });
            }
            ListKind::Products => {
                let order = model.products.len() as i64;
                let currency_id = self
                    .currencies
                    .first()
                    .map(|c| c.id.clone())
                    .unwrap_or_else(|| FALLBACK_CURRENCY_ID.to_string());
                model.products.push(ProductItem {
                    id: None,
                    name: String::new(),
                    description: String::new(),
                    price: 0.0,
                    currency_id: Some(currency_id),
                    currency: None,
                    image: String::new(),
                    in_stock: true,
                    order: Some(order),
                });
            }
            ListKind::Galleries => {
                let order = model.galleries.len() as i64;
                model.galleries.push(GalleryItem {
                    order: Some(order),
                    ..Default::default()
                });
            }
            ListKind::Testimonials => {
                let order = model.testimonials.len() as i64;
                model.testimonials.push(TestimonialItem {
                    rating: Some(5.0),
                    order: Some(order),
                    ..Default::default()
                });
            }
            ListKind::Appointments => model.appointments.push(AppointmentItem {
                id: None,
                title: String::new(),
                description: String::new(),
                duration: DEFAULT_APPOINTMENT_MINUTES,
                price: None,
                available: true,
            }),
            ListKind::SocialLinks => {
                let order = model.social_links.len() as i64;
                model.social_links.push(SocialLinkItem {
                    order: Some(order),
                    ..Default::default()
                });
            }
            ListKind::CustomLinks => {
                let order = model.custom_links.len() as i64;
                model.custom_links.push(CustomLinkItem {
                    order: Some(order),
                    ..Default::default()
                });
            }
        }
    }

    fn update_item(&mut self, list: ListKind, index: usize, field: ItemField, input: &FieldInput) {
        let model = &mut self.model;
        let applied = match list {
            ListKind::Services => apply_at(&mut model.services, index, field, input),
            ListKind::Products => apply_at(&mut model.products, index, field, input),
            ListKind::Galleries => apply_at(&mut model.galleries, index, field, input),
            ListKind::Testimonials => apply_at(&mut model.testimonials, index, field, input),
            ListKind::Appointments => apply_at(&mut model.appointments, index, field, input),
            ListKind::SocialLinks => apply_at(&mut model.social_links, index, field, input),
            ListKind::CustomLinks => apply_at(&mut model.custom_links, index, field, input),
        };
        if !applied {
            tracing::debug!(?list, index, ?field, "Ignored item edit");
        }
    }

    fn remove_item(&mut self, list: ListKind, index: usize) {
        let model = &mut self.model;
        let removed = match list {
            ListKind::Services => remove_at(&mut model.services, index),
            ListKind::Products => remove_at(&mut model.products, index),
            ListKind::Galleries => remove_at(&mut model.galleries, index),
            ListKind::Testimonials => remove_at(&mut model.testimonials, index),
            ListKind::Appointments => remove_at(&mut model.appointments, index),
            ListKind::SocialLinks => remove_at(&mut model.social_links, index),
            ListKind::CustomLinks => remove_at(&mut model.custom_links, index),
        };
        if !removed {
            tracing::debug!(?list, index, "Ignored removal of missing item");
        }
    }

    fn edit_general(&mut self, field: GeneralField, value: String) {
        let general = &mut self.model.general;
        let slot = match field {
            GeneralField::UrlAlias => {
                general.url_alias = dash_whitespace(&value);
                return;
            }
            GeneralField::FirstName => &mut general.first_name,
            GeneralField::LastName => &mut general.last_name,
            GeneralField::DisplayName => &mut general.display_name,
            GeneralField::Email => &mut general.email,
            GeneralField::Phone => &mut general.phone,
            GeneralField::Company => &mut general.company,
            GeneralField::JobTitle => &mut general.job_title,
            GeneralField::Occupation => &mut general.occupation,
            GeneralField::RegionCode => &mut general.region_code,
            GeneralField::Description => &mut general.description,
            GeneralField::Location => &mut general.location,
            GeneralField::LocationUrl => &mut general.location_url,
            GeneralField::LocationEmbedTag => &mut general.location_embed_tag,
            GeneralField::ProfileImage => &mut general.profile_image,
            GeneralField::CoverImage => &mut general.cover_image,
            GeneralField::Favicon => &mut general.favicon,
        };
        *slot = value;
    }

    fn edit_hour(&mut self, day: usize, edit: HourEdit) {
        let Some(slot) = self.model.business_hours.get_mut(day) else {
            tracing::debug!(day, "Ignored edit of unknown weekday");
            return;
        };
        match edit {
            HourEdit::IsOpen(open) => slot.is_open = open,
            HourEdit::OpenTime(time) => slot.open_time = time,
            HourEdit::CloseTime(time) => slot.close_time = time,
        }
    }

    fn place_asset(&mut self, target: AssetTarget, url: String) -> bool {
        let model = &mut self.model;
        match target {
            AssetTarget::General(GeneralAsset::ProfileImage) => model.general.profile_image = url,
            AssetTarget::General(GeneralAsset::CoverImage) => model.general.cover_image = url,
            AssetTarget::General(GeneralAsset::Favicon) => model.general.favicon = url,
            AssetTarget::Service(i) => match model.services.get_mut(i) {
                Some(item) => item.image = url,
                None => return false,
            },
            AssetTarget::Product(i) => match model.products.get_mut(i) {
                Some(item) => item.image = url,
                None => return false,
            },
            AssetTarget::Gallery(i) => match model.galleries.get_mut(i) {
                Some(item) => item.image_url = url,
                None => return false,
            },
            AssetTarget::Testimonial(i) => match model.testimonials.get_mut(i) {
                Some(item) => item.image_url = url,
                None => return false,
            },
        }
        true
    }
}

impl EditorState {
    /// Apply one action in place
    pub fn apply(&mut self, action: EditorAction) {
        match action {
            EditorAction::Hydrate(card) => self.hydrate(&card),
            EditorAction::EditGeneral { field, value } => self.edit_general(field, value),
            EditorAction::SetBranding(on) => self.model.general.branding = on,
            EditorAction::ToggleSection { flag, enabled } => self.model.sections.set(flag, enabled),
            EditorAction::AddItem(list) => self.add_item(list),
            EditorAction::UpdateItem {
                list,
                index,
                field,
                input,
            } => self.update_item(list, index, field, &input),
            EditorAction::RemoveItem { list, index } => self.remove_item(list, index),
            EditorAction::EditHour { day, edit } => self.edit_hour(day, edit),
            EditorAction::CurrenciesLoaded(list) => {
                if list.is_empty() {
                    self.currencies = CurrencyInfo::fallback_set();
                    self.currency_error = Some(CURRENCY_LOAD_FAILED.to_string());
                } else {
                    self.currencies = list;
                    self.currency_error = None;
                }
            }
            EditorAction::CurrenciesFailed => {
                self.currencies = CurrencyInfo::fallback_set();
                self.currency_error = Some(CURRENCY_LOAD_FAILED.to_string());
            }
            EditorAction::SaveStarted(section) => {
                let status = self.status_mut(section);
                status.saving = true;
                status.status = None;
                status.error = None;
            }
            EditorAction::SaveSucceeded { section, card } => {
                self.hydrate(&card);
                let message = self
                    .plan_warnings
                    .clone()
                    .unwrap_or_else(|| section.success_message().to_string());
                let status = self.status_mut(section);
                status.saving = false;
                status.status = Some(message);
                status.error = None;
            }
            EditorAction::SaveFailed { section, message } => {
                let status = self.status_mut(section);
                status.saving = false;
                status.error = Some(message);
            }
            EditorAction::UploadStarted(target) => {
                let status = self.status_mut(target.section());
                status.uploading = true;
                status.error = None;
            }
            EditorAction::UploadSucceeded { target, url } => {
                let placed = self.place_asset(target, url);
                let status = self.status_mut(target.section());
                status.uploading = false;
                if placed {
                    status.status = Some(target.uploaded_message().to_string());
                } else {
                    tracing::debug!(?target, "Uploaded image target no longer exists");
                }
            }
            EditorAction::UploadFailed { target, message } => {
                let status = self.status_mut(target.section());
                status.uploading = false;
                status.error = Some(message.unwrap_or_else(|| UPLOAD_FAILED.to_string()));
            }
        }
    }
}

/// Apply one action
pub fn reduce(mut state: EditorState, action: EditorAction) -> EditorState {
    state.apply(action);
    state
}
