//! Fallback section renderers
//!
//! One renderer per category. Each returns `None` when its backing data is
//! empty or its visibility flag is explicitly `false`.

use crate::html::Element;
use shared::models::{
    QrCode, RenderedAppointment, RenderedBusinessHour, RenderedCardData, RenderedCustomLink,
    RenderedGalleryItem, RenderedProduct, RenderedService, RenderedTestimonial,
};

/// Attribute identifying a synthesized section and its category
pub const SECTION_ATTR: &str = "data-vcard-section";
pub const QR_DOWNLOAD_ATTR: &str = "data-vcard-qr-download";
pub const QR_COPY_ATTR: &str = "data-vcard-qr-copy";

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const GRID_STYLE: &str =
    "display:grid;grid-template-columns:repeat(auto-fit,minmax(220px,1fr));gap:16px;";
const CARD_STYLE: &str = "border:1px solid rgba(0,0,0,0.08);border-radius:12px;padding:16px;background:#fff;";
const IMAGE_STYLE: &str = "width:100%;height:160px;object-fit:cover;border-radius:8px;";
const BADGE_STYLE: &str = "display:inline-block;margin-top:8px;padding:2px 10px;border-radius:999px;background:rgba(0,0,0,0.06);font-size:0.875rem;";

/// Rendering categories in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Services,
    Products,
    Gallery,
    Testimonials,
    BusinessHours,
    Appointments,
    Map,
    CustomLinks,
    Qr,
}

impl Category {
    pub const ORDER: [Category; 9] = [
        Self::Services,
        Self::Products,
        Self::Gallery,
        Self::Testimonials,
        Self::BusinessHours,
        Self::Appointments,
        Self::Map,
        Self::CustomLinks,
        Self::Qr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Products => "products",
            Self::Gallery => "gallery",
            Self::Testimonials => "testimonials",
            Self::BusinessHours => "business-hours",
            Self::Appointments => "appointments",
            Self::Map => "map",
            Self::CustomLinks => "custom-links",
            Self::Qr => "qr-code",
        }
    }

    /// Visibility flag key, if the category has one
    pub fn flag_key(&self) -> Option<&'static str> {
        match self {
            Self::Services => Some("services"),
            Self::Products => Some("products"),
            Self::Gallery => Some("galleries"),
            Self::Testimonials => Some("testimonials"),
            Self::BusinessHours => Some("businessHours"),
            Self::Appointments => Some("appointments"),
            Self::Map => Some("map"),
            Self::CustomLinks | Self::Qr => None,
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Self::Services => "Services",
            Self::Products => "Products",
            Self::Gallery => "Gallery",
            Self::Testimonials => "Testimonials",
            Self::BusinessHours => "Business Hours",
            Self::Appointments => "Appointments",
            Self::Map => "Location",
            Self::CustomLinks => "Links",
            Self::Qr => "Share",
        }
    }

    pub fn render(&self, data: &RenderedCardData) -> Option<Element> {
        if self.flag_key().is_some_and(|k| data.section_disabled(k)) {
            return None;
        }
        match self {
            Self::Services => services(&data.services),
            Self::Products => products(&data.products),
            Self::Gallery => gallery(&data.galleries),
            Self::Testimonials => testimonials(&data.testimonials),
            Self::BusinessHours => business_hours(&data.business_hours),
            Self::Appointments => appointments(&data.appointments),
            Self::Map => map(data),
            Self::CustomLinks => custom_links(&data.custom_links),
            Self::Qr => data.qr_code.as_ref().and_then(qr_code),
        }
    }
}

/// Every non-empty section in insertion order
pub fn render_all(data: &RenderedCardData) -> Vec<Element> {
    Category::ORDER
        .iter()
        .filter_map(|c| c.render(data))
        .collect()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Whole amounts without decimals, otherwise two places
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn section(category: Category) -> Element {
    Element::new("section")
        .attr(SECTION_ATTR, category.name())
        .class(&format!("vcard-fallback-section vcard-fallback-{}", category.name()))
        .style("margin:24px 0;")
        .child(Element::new("h2").text(category.heading()))
}

fn grid(cards: Vec<Element>) -> Element {
    Element::new("div")
        .class("vcard-fallback-grid")
        .style(GRID_STYLE)
        .children_from(cards)
}

fn card() -> Element {
    Element::new("article")
        .class("vcard-fallback-card")
        .style(CARD_STYLE)
}

fn image(src: Option<&str>, alt: &str) -> Option<Element> {
    non_empty(src).map(|src| {
        Element::new("img")
            .attr("src", src)
            .attr("alt", alt)
            .attr("loading", "lazy")
            .style(IMAGE_STYLE)
    })
}

fn badge(text: String) -> Element {
    Element::new("span")
        .class("vcard-fallback-badge")
        .style(BADGE_STYLE)
        .text(text)
}

fn paragraph(text: Option<&str>) -> Option<Element> {
    non_empty(text).map(|t| Element::new("p").text(t))
}

/// Stable sort by `order`
fn sorted<T, F: Fn(&T) -> i64>(items: &[T], order: F) -> Vec<&T> {
    let mut refs: Vec<&T> = items.iter().collect();
    refs.sort_by_key(|item| order(item));
    refs
}

fn services(items: &[RenderedService]) -> Option<Element> {
    let cards: Vec<Element> = sorted(items, |s| s.order)
        .into_iter()
        .filter(|s| !s.title.trim().is_empty())
        .map(|s| {
            card()
                .child_if(image(s.image.as_deref(), &s.title))
                .child(Element::new("h3").text(s.title.trim()))
                .child_if(paragraph(s.description.as_deref()))
                .child_if(s.price.map(|p| badge(format_amount(p))))
        })
        .collect();
    (!cards.is_empty()).then(|| section(Category::Services).child(grid(cards)))
}

fn products(items: &[RenderedProduct]) -> Option<Element> {
    let cards: Vec<Element> = sorted(items, |p| p.order)
        .into_iter()
        .filter(|p| !p.name.trim().is_empty())
        .map(|p| {
            let symbol = non_empty(p.currency.symbol.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} ", p.currency.code).trim_start().to_string());
            let mut el = card()
                .child_if(image(p.image.as_deref(), &p.name))
                .child(Element::new("h3").text(p.name.trim()))
                .child_if(paragraph(p.description.as_deref()))
                .child(badge(format!("{symbol}{}", format_amount(p.price))));
            if !p.in_stock {
                el = el.child(Element::new("p").class("vcard-fallback-stock").text("Out of stock"));
            }
            el
        })
        .collect();
    (!cards.is_empty()).then(|| section(Category::Products).child(grid(cards)))
}

fn gallery(items: &[RenderedGalleryItem]) -> Option<Element> {
    let cards: Vec<Element> = sorted(items, |g| g.order)
        .into_iter()
        .filter_map(|g| {
            let title = g.title.as_deref().unwrap_or("Gallery image");
            image(Some(g.image_url.as_str()), title).map(|img| {
                card()
                    .child(img)
                    .child_if(non_empty(g.title.as_deref()).map(|t| Element::new("h3").text(t)))
            })
        })
        .collect();
    (!cards.is_empty()).then(|| section(Category::Gallery).child(grid(cards)))
}

fn testimonials(items: &[RenderedTestimonial]) -> Option<Element> {
    let cards: Vec<Element> = sorted(items, |t| t.order)
        .into_iter()
        .filter(|t| !t.name.trim().is_empty() || !t.content.trim().is_empty())
        .map(|t| {
            let byline = [t.position.as_deref(), t.company.as_deref()]
                .into_iter()
                .filter_map(non_empty)
                .collect::<Vec<_>>()
                .join(", ");
            card()
                .child_if(image(t.image_url.as_deref(), &t.name))
                .child_if(paragraph(Some(t.content.as_str())).map(|p| p.class("vcard-fallback-quote")))
                .child(Element::new("h3").text(t.name.trim()))
                .child_if(paragraph(Some(byline.as_str())))
                .child_if(
                    t.rating
                        .filter(|r| r.is_finite())
                        .map(|r| badge(format!("★ {}/5", format_amount(r.clamp(1.0, 5.0))))),
                )
        })
        .collect();
    (!cards.is_empty()).then(|| section(Category::Testimonials).child(grid(cards)))
}

/// `"Day: open–close"` for one slot
pub fn hours_line(slot: &RenderedBusinessHour) -> Option<String> {
    let day = usize::try_from(slot.day_of_week).ok().filter(|d| *d < 7)?;
    let open = non_empty(slot.open_time.as_deref()).unwrap_or("09:00");
    let close = non_empty(slot.close_time.as_deref()).unwrap_or("18:00");
    Some(format!("{}: {open}–{close}", DAY_NAMES[day]))
}

fn business_hours(items: &[RenderedBusinessHour]) -> Option<Element> {
    let mut open: Vec<&RenderedBusinessHour> = items.iter().filter(|h| h.is_open).collect();
    open.sort_by_key(|h| h.day_of_week);
    let lines: Vec<Element> = open
        .into_iter()
        .filter_map(hours_line)
        .map(|line| Element::new("li").text(line))
        .collect();
    (!lines.is_empty()).then(|| {
        section(Category::BusinessHours).child(
            Element::new("ul")
                .class("vcard-fallback-hours")
                .style("list-style:none;padding:0;margin:0;")
                .children_from(lines),
        )
    })
}

fn appointments(items: &[RenderedAppointment]) -> Option<Element> {
    let cards: Vec<Element> = items
        .iter()
        .filter(|a| a.available && !a.title.trim().is_empty())
        .map(|a| {
            let price = a
                .price
                .filter(|p| p.is_finite() && *p > 0.0)
                .map_or_else(|| "Free".to_string(), format_amount);
            card()
                .child(Element::new("h3").text(a.title.trim()))
                .child(
                    Element::new("p")
                        .class("vcard-fallback-meta")
                        .text(format!("{} min • {price}", format_amount(a.duration))),
                )
                .child_if(paragraph(a.description.as_deref()))
        })
        .collect();
    (!cards.is_empty()).then(|| section(Category::Appointments).child(grid(cards)))
}

fn map(data: &RenderedCardData) -> Option<Element> {
    if let Some(embed) = non_empty(data.location_embed_tag.as_deref()) {
        return Some(
            section(Category::Map).child(Element::new("div").class("vcard-fallback-map").raw(embed)),
        );
    }
    let url = non_empty(Some(data.location_url.as_str()))?;
    Some(
        section(Category::Map).child(
            Element::new("iframe")
                .attr("src", url)
                .attr("title", "Location map")
                .attr("loading", "lazy")
                .attr("referrerpolicy", "no-referrer-when-downgrade")
                .style("width:100%;min-height:280px;border:0;border-radius:12px;"),
        ),
    )
}

fn custom_links(items: &[RenderedCustomLink]) -> Option<Element> {
    let links: Vec<Element> = sorted(items, |l| l.order)
        .into_iter()
        .filter_map(|l| {
            let label = non_empty(Some(l.label.as_str()))?;
            let url = non_empty(Some(l.url.as_str()))?;
            Some(
                Element::new("li").child(
                    Element::new("a")
                        .attr("href", url)
                        .attr("target", "_blank")
                        .attr("rel", "noopener noreferrer")
                        .text(label),
                ),
            )
        })
        .collect();
    (!links.is_empty()).then(|| {
        section(Category::CustomLinks).child(
            Element::new("ul")
                .class("vcard-fallback-links")
                .style("list-style:none;padding:0;margin:0;display:grid;gap:8px;")
                .children_from(links),
        )
    })
}

fn qr_code(qr: &QrCode) -> Option<Element> {
    let image_data = non_empty(Some(qr.image_data_url.as_str()))?;
    let file_name = non_empty(Some(qr.download_file_name.as_str())).unwrap_or("vcard-qr.png");
    Some(
        section(Category::Qr).child(
            Element::new("div")
                .class("vcard-fallback-qr")
                .style("text-align:center;")
                .child(
                    Element::new("img")
                        .attr("src", image_data)
                        .attr("alt", "QR code")
                        .style("width:200px;height:200px;"),
                )
                .child_if(non_empty(Some(qr.url.as_str())).map(|url| {
                    Element::new("p")
                        .style("font-family:monospace;word-break:break-all;")
                        .text(url)
                }))
                .child(
                    Element::new("button")
                        .attr("type", "button")
                        .attr(QR_DOWNLOAD_ATTR, file_name)
                        .attr("data-src", image_data)
                        .text("Download QR"),
                )
                .child(
                    Element::new("button")
                        .attr("type", "button")
                        .attr(QR_COPY_ATTR, qr.url.trim())
                        .text("Copy link"),
                ),
        ),
    )
}
