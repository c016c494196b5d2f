//! Extraction passes over dealer and vehicle pages.
//!
//! Selectors target the marketplace theme's class names and are brittle by
//! construction; a selector that finds nothing is never an error. Each page
//! region is one pass producing a partial [`Record`], combined with
//! last-wins precedence in [`vehicle_record`].

use scraper::{ElementRef, Html, Selector};

use crate::normalize::normalize_label;
use crate::record::Record;

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

/// Candidate containers for dealer details on dealer/author pages.
const DEALER_BLOCKS: &str = ".stm-dealer-info, .dealer-info, .stm-dealer-box, \
     .stm-dealer-details, .author-info, .stm-seller-info, .seller-info, .dealer-contact";

/// Dealer details block as it appears on an individual ad page.
const AD_PAGE_DEALER_BLOCKS: &str =
    ".dealer-info, .stm-dealer-box, .stm-dealer-info, .stm-seller-info";

/// Concatenated text of an element with whitespace runs collapsed.
fn element_text(el: ElementRef) -> String {
    let text: String = el.text().collect::<Vec<_>>().join(" ");

    let mut cleaned = String::new();
    let mut prev_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_was_space && !cleaned.is_empty() {
                cleaned.push(' ');
                prev_was_space = true;
            }
        } else {
            cleaned.push(c);
            prev_was_space = false;
        }
    }
    cleaned.trim_end().to_string()
}

/// Try candidate selectors in order until one yields a non-empty text.
///
/// Returns `None` when no candidate matched any element at all, and
/// `Some("")` when elements matched but every one was empty, so callers can
/// tell "tried and empty" from "not tried".
fn first_matching_text(scope: ElementRef, candidates: &[&str]) -> Option<String> {
    let mut matched_empty = false;
    for candidate in candidates {
        let selector = sel(candidate);
        for el in scope.select(&selector) {
            let text = element_text(el);
            if !text.is_empty() {
                return Some(text);
            }
            matched_empty = true;
        }
    }
    if matched_empty {
        Some(String::new())
    } else {
        None
    }
}

/// Anchor text, falling back to the href with its scheme stripped when the
/// anchor body is empty (e.g. icon-only mailto:/tel: links).
fn text_or_scheme_href(el: ElementRef, scheme: &str) -> String {
    let text = element_text(el);
    if !text.is_empty() {
        return text;
    }
    el.value()
        .attr("href")
        .and_then(|href| href.strip_prefix(scheme))
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Dealer-level fields, extracted once per dealer page and copied into every
/// vehicle record for that dealer. Empty string means the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealerInfo {
    pub name: String,
    pub location: String,
    pub sales_hours: String,
    pub email: String,
    pub contact_number: String,
}

impl DealerInfo {
    pub fn to_record(&self) -> Record {
        let mut rec = Record::new();
        rec.set("Dealer Name", self.name.clone());
        rec.set("Dealership Location", self.location.clone());
        rec.set("Sales Hours", self.sales_hours.clone());
        rec.set("Seller Email", self.email.clone());
        rec.set("Dealer Contact Number", self.contact_number.clone());
        rec
    }
}

/// Extract dealer details from a dealer/author page.
pub fn dealer_info(doc: &Html) -> DealerInfo {
    let root = doc.root_element();
    let block = root.select(&sel(DEALER_BLOCKS)).next();

    let mut info = DealerInfo::default();

    if let Some(block) = block {
        info.name = first_matching_text(
            block,
            &["h1", "h2", "h3", "h4", ".dealer-title", ".dealer-name", ".name", ".title"],
        )
        .unwrap_or_default();

        info.location = first_matching_text(
            block,
            &[".stm-dealer-location", ".dealer-location", ".location", ".dealer-address", "address"],
        )
        .unwrap_or_default();

        info.sales_hours = first_matching_text(
            block,
            &[".dealer-working-hours", ".working-hours", ".hours", ".dealer-hours"],
        )
        .unwrap_or_default();
    }

    if info.name.is_empty() {
        info.name = first_matching_text(root, &["h1", ".page-title", ".entry-title", ".author-title"])
            .unwrap_or_default();
    }

    // Email and phone anchors tend to live outside the dealer block.
    if let Some(el) = root.select(&sel("a[href^='mailto:']")).next() {
        info.email = text_or_scheme_href(el, "mailto:");
    }
    if let Some(el) = root.select(&sel("a[href^='tel:']")).next() {
        info.contact_number = text_or_scheme_href(el, "tel:");
    }

    info
}

/// Fill blank dealer fields in a merged record from the ad page's own dealer
/// block. Fields already present are never overwritten.
fn fill_dealer_gaps(doc: &Html, rec: &mut Record) {
    let Some(block) = doc.root_element().select(&sel(AD_PAGE_DEALER_BLOCKS)).next() else {
        return;
    };

    let is_blank = |rec: &Record, key: &str| rec.get(key).map_or(true, |v| v.is_empty());

    if is_blank(rec, "Dealer Name") {
        if let Some(name) =
            first_matching_text(block, &["h3", ".dealer-title", ".name", "h4"])
        {
            rec.set("Dealer Name", name);
        }
    }
    if is_blank(rec, "Dealership Location") {
        if let Some(location) =
            first_matching_text(block, &[".stm-dealer-location", ".dealer-location", ".location"])
        {
            rec.set("Dealership Location", location);
        }
    }
    if is_blank(rec, "Sales Hours") {
        if let Some(hours) =
            first_matching_text(block, &[".dealer-working-hours", ".working-hours"])
        {
            rec.set("Sales Hours", hours);
        }
    }
    if is_blank(rec, "Seller Email") {
        if let Some(el) = block.select(&sel("a[href^='mailto:']")).next() {
            rec.set("Seller Email", text_or_scheme_href(el, "mailto:"));
        }
    }
    if is_blank(rec, "Dealer Contact Number") {
        if let Some(el) = block.select(&sel("a[href^='tel:']")).next() {
            rec.set("Dealer Contact Number", text_or_scheme_href(el, "tel:"));
        }
    }
}

/// Headline fields: name, price, status, contact, registration, plus the
/// dealer seed and the ad URL. This is the base every pass overlays.
fn base_record(doc: &Html, dealer: &DealerInfo, ad_url: &str) -> Record {
    let root = doc.root_element();
    let mut rec = dealer.to_record();
    rec.set("Ad URL", ad_url);

    rec.set(
        "Vehicle Name",
        first_matching_text(root, &["h1.listing-title", "h6.title.stm_listing_title"])
            .unwrap_or_default(),
    );
    rec.set(
        "Vehicle Price",
        first_matching_text(root, &[".price .heading-font", "span.h3"]).unwrap_or_default(),
    );

    let sold = root
        .select(&sel("div.special-label.h5"))
        .next()
        .map(|el| element_text(el).to_lowercase().contains("sold"))
        .unwrap_or(false);
    rec.set("Status", if sold { "Sold" } else { "Available" });

    rec.set(
        "Contact Number",
        root.select(&sel(".listing-phone-wrap a[href^='tel:']"))
            .next()
            .map(element_text)
            .unwrap_or_default(),
    );

    rec.set(
        "Registration Number",
        find_div_containing(root, "Registration").unwrap_or_default(),
    );

    rec
}

/// Full text of the first div whose direct text mentions `needle`.
fn find_div_containing(root: ElementRef, needle: &str) -> Option<String> {
    let div = sel("div");
    for el in root.select(&div) {
        let own_text_matches = el
            .children()
            .filter_map(|child| child.value().as_text())
            .any(|t| t.contains(needle));
        if own_text_matches {
            return Some(element_text(el));
        }
    }
    None
}

/// Pass A: main attribute boxes. The key is written even when the value
/// element is missing; an empty value records that the field was looked
/// for. Missing values are not recovered from the surrounding text.
fn pass_attribute_boxes(doc: &Html) -> Record {
    let item_sel = sel(".single-listing-attribute-boxes .item");
    let label_sel = sel(".label-text");
    let value_sel = sel(".value-text");

    let mut rec = Record::new();
    for item in doc.select(&item_sel) {
        let Some(label) = item.select(&label_sel).next() else {
            continue;
        };
        let key = normalize_label(&element_text(label));
        let value = item
            .select(&value_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        rec.set(key, value);
    }
    rec
}

/// Pass B: data-list items. Unlike pass A, a pair with a missing value is
/// skipped entirely.
fn pass_data_list(doc: &Html) -> Record {
    let item_sel = sel(".stm-single-car-listing-data .data-list-item");
    let label_sel = sel(".item-label");
    let value_sel = sel(".heading-font");

    let mut rec = Record::new();
    for item in doc.select(&item_sel) {
        let (Some(label), Some(value)) = (
            item.select(&label_sel).next(),
            item.select(&value_sel).next(),
        ) else {
            continue;
        };
        rec.set(normalize_label(&element_text(label)), element_text(value));
    }
    rec
}

/// Pass C: grouped feature checkboxes. Each category becomes one key whose
/// value is the comma-joined list of non-empty leaf texts in document
/// order, duplicates kept.
fn pass_feature_groups(doc: &Html) -> Record {
    let group_sel = sel(".stm-single-listing-car-features .grouped_checkbox-3");
    let category_sel = sel("h4");
    let leaf_sel = sel("ul li span");

    let mut rec = Record::new();
    for group in doc.select(&group_sel) {
        let Some(category) = group.select(&category_sel).next() else {
            continue;
        };
        let features: Vec<String> = group
            .select(&leaf_sel)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();
        rec.set(normalize_label(&element_text(category)), features.join(", "));
    }
    rec
}

/// Pass D: seller notes, written only when the section is located.
fn pass_seller_notes(doc: &Html) -> Record {
    let section_sel = sel("section");
    let heading_sel = sel("h2");

    let mut rec = Record::new();
    for section in doc.select(&section_sel) {
        let has_notes_heading = section
            .select(&heading_sel)
            .any(|h| element_text(h).contains("Seller Notes"));
        if has_notes_heading {
            rec.set("Seller Notes", element_text(section));
            break;
        }
    }
    rec
}

/// Build the complete flat record for one vehicle page: dealer seed plus
/// headline fields first, then passes A through D, later passes winning on
/// key collision. Blank dealer fields are filled from the ad page last.
pub fn vehicle_record(doc: &Html, dealer: &DealerInfo, ad_url: &str) -> Record {
    let mut rec = Record::merged([
        base_record(doc, dealer, ad_url),
        pass_attribute_boxes(doc),
        pass_data_list(doc),
        pass_feature_groups(doc),
        pass_seller_notes(doc),
    ]);
    fill_dealer_gaps(doc, &mut rec);
    rec
}
