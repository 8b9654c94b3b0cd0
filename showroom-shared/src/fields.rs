//! Editorial metadata for the record fields: help text shown to editors and
//! the length limits the record layer enforces.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldHelp {
    pub name: &'static str,
    pub help: &'static str,
    /// Maximum length in characters, `None` for unbounded text.
    pub max_length: Option<usize>,
}

const fn field(name: &'static str, max_length: Option<usize>, help: &'static str) -> FieldHelp {
    FieldHelp {
        name,
        help,
        max_length,
    }
}

const ORDER_TIP: &str =
    "Numeric value for order. Tip: Use 100-200-300-... steps for easy reordering.";
const DEPRECATED: &str = "DEPRECATED! Will be removed in the future, please ignore";

pub const EDITION_FIELDS: &[FieldHelp] = &[
    field("site_title", Some(40), "Main title shown on page"),
    field(
        "country",
        Some(2),
        "2-letter-country-code for showing a corresponding flag (e.g. 'de', 'en'). Careful, not existing code will break site.",
    ),
    field(
        "order",
        None,
        "Numeric value for edition order. Tip: Use 100-200-300-... steps for easy reordering. Edition first in order will be used as edition default.",
    ),
    field(
        "short_description",
        Some(40),
        "Something like 'English version', used for mouseover on flag",
    ),
    field("html_title", Some(100), "Used for html title tag"),
    field("site_subtitle", Some(125), "Subtitle (HTML tags possible)"),
    field("rss_title", Some(100), "Title for rss feed"),
    field("rss_description", Some(200), "Description for rss feed"),
    field("facebook_url", Some(90), "Optional, link to Facebook page"),
    field("home_menu_title", Some(40), "Something like - e.g. - 'Home'"),
    field("home_menu_color", Some(7), "HTML color code, e.g. '#003300'"),
    field(
        "home_menu_active_color",
        Some(7),
        "HTML color code, e.g. '#006600'",
    ),
    field("home_num_websites", None, "Number of websites for home category"),
    field("footer_left", Some(200), "Left footer (HTML tags possible)"),
    field("footer_right", Some(200), "Right footer (HTML tags possible)"),
    field("contact_title", Some(40), "Title of contact navi"),
    field(
        "contact_html",
        None,
        "Complete HTML content of contact page, with <p>, <br> and all that stuff",
    ),
    field("comments", None, ""),
];

pub const CATEGORY_FIELDS: &[FieldHelp] = &[
    field("name", Some(40), ""),
    field(
        "url_name",
        Some(40),
        "Every url-conform string except 'contact'",
    ),
    field("order", None, ORDER_TIP),
    field("color", Some(7), "Format: #ffffff"),
    field("active_color", Some(7), "Format: #ffffff"),
];

pub const WEBSITE_FIELDS: &[FieldHelp] = &[
    field(
        "title",
        Some(50),
        "Generic title, used if no extra edition specific title is provided",
    ),
    field("order", None, DEPRECATED),
    field(
        "country",
        Some(2),
        "Optional, 2-letter-country-code for showing a corresponding flag (e.g. 'de', 'en'). Careful, not existing code will break site.",
    ),
    field("desc", None, DEPRECATED),
    field(
        "screenshot",
        None,
        "Image file, size: 300x200, name will be unified. If you provide a larger file image will be resized (use same proportions, e.g. 600x400 or 750x500).",
    ),
    field("url", Some(90), ""),
];

pub const EDITION_WEBSITE_FIELDS: &[FieldHelp] = &[
    field(
        "title",
        Some(50),
        "Edition specific title, if left empty, generic title is used",
    ),
    field("desc", None, "Edition specific description"),
    field("order", None, ORDER_TIP),
];

/// Looks up a field by name in one of the field tables above.
pub fn lookup(fields: &'static [FieldHelp], name: &str) -> Option<&'static FieldHelp> {
    fields.iter().find(|field| field.name == name)
}
