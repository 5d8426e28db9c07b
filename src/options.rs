//! Form options for each Gotenberg route family.
//!
//! Gotenberg takes all conversion settings as multipart text fields. This
//! module turns typed option structs into that flat field set:
//!
//! ```text
//! PageOptions ─┐
//! Screenshot…  ├─ to_raw() ──▶ build(family, raw) ──▶ ConversionOptions
//! Office…      │               (defaults, overlay,     (name → wire string)
//! PdfEngine… ──┘                bool coercion, drop
//!                               empty optionals)
//! ```
//!
//! [`build`] is the single merge engine. It is also usable directly with a
//! loose [`RawOptions`] map, which is what the CLI's `--set key=value` flags
//! feed into.
//!
//! Wire rules:
//! * booleans are always sent as the literal strings `"true"` / `"false"`;
//! * an empty optional field (`pdfa`) is omitted, never sent empty;
//! * lists and objects are JSON-encoded into one field;
//! * keys the family does not know about pass through unchanged.

use crate::error::ValidationError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ── Values ───────────────────────────────────────────────────────────────

/// A single user-supplied option value before it is rendered to the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Arrays and objects; rendered as compact JSON.
    Json(serde_json::Value),
}

impl FormValue {
    /// Loose truthiness used when a value lands on a boolean field.
    ///
    /// Numbers are true when non-zero. Text is false for `""`, `"0"`,
    /// `"false"`, `"off"` and `"no"` (case-insensitive), true otherwise.
    /// JSON is false for `null`, empty arrays and empty objects.
    pub fn is_truthy(&self) -> bool {
        match self {
            FormValue::Bool(b) => *b,
            FormValue::Int(i) => *i != 0,
            FormValue::Float(f) => *f != 0.0,
            FormValue::Text(s) => text_truthy(s),
            FormValue::Json(v) => match v {
                serde_json::Value::Null => false,
                serde_json::Value::Bool(b) => *b,
                serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
                serde_json::Value::String(s) => text_truthy(s),
                serde_json::Value::Array(a) => !a.is_empty(),
                serde_json::Value::Object(o) => !o.is_empty(),
            },
        }
    }

    /// True when an optional field holding this value should be dropped.
    ///
    /// `false`, zero, `""`, `"0"`, `null` and empty JSON collections are
    /// blank. Unlike [`Self::is_truthy`], `"false"` and `"off"` are not.
    pub fn is_blank(&self) -> bool {
        match self {
            FormValue::Bool(b) => !*b,
            FormValue::Int(i) => *i == 0,
            FormValue::Float(f) => *f == 0.0,
            FormValue::Text(s) => text_blank(s),
            FormValue::Json(v) => match v {
                serde_json::Value::Null => true,
                serde_json::Value::Bool(b) => !*b,
                serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
                serde_json::Value::String(s) => text_blank(s),
                serde_json::Value::Array(a) => a.is_empty(),
                serde_json::Value::Object(o) => o.is_empty(),
            },
        }
    }

    /// Render the value as the text Gotenberg expects in a form field.
    pub fn to_wire(&self) -> String {
        match self {
            FormValue::Bool(b) => bool_str(*b).to_string(),
            FormValue::Int(i) => i.to_string(),
            FormValue::Float(f) => f.to_string(),
            FormValue::Text(s) => s.clone(),
            FormValue::Json(serde_json::Value::String(s)) => s.clone(),
            FormValue::Json(v) => v.to_string(),
        }
    }

    /// Parse a CLI-style `value` string: `true`/`false`, integers and floats
    /// become typed values, JSON arrays/objects are parsed, anything else is
    /// kept as text.
    pub fn parse_loose(s: &str) -> Self {
        let t = s.trim();
        match t {
            "true" => return FormValue::Bool(true),
            "false" => return FormValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = t.parse::<i64>() {
            return FormValue::Int(i);
        }
        if let Ok(f) = t.parse::<f64>() {
            if f.is_finite() {
                return FormValue::Float(f);
            }
        }
        if t.starts_with('[') || t.starts_with('{') {
            if let Ok(v) = serde_json::from_str(t) {
                return FormValue::Json(v);
            }
        }
        FormValue::Text(s.to_string())
    }
}

fn text_blank(s: &str) -> bool {
    matches!(s.trim(), "" | "0")
}

fn text_truthy(s: &str) -> bool {
    !matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "off" | "no"
    )
}

fn bool_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

impl From<bool> for FormValue {
    fn from(v: bool) -> Self {
        FormValue::Bool(v)
    }
}

impl From<i32> for FormValue {
    fn from(v: i32) -> Self {
        FormValue::Int(v.into())
    }
}

impl From<i64> for FormValue {
    fn from(v: i64) -> Self {
        FormValue::Int(v)
    }
}

impl From<u32> for FormValue {
    fn from(v: u32) -> Self {
        FormValue::Int(v.into())
    }
}

impl From<f64> for FormValue {
    fn from(v: f64) -> Self {
        FormValue::Float(v)
    }
}

impl From<&str> for FormValue {
    fn from(v: &str) -> Self {
        FormValue::Text(v.to_string())
    }
}

impl From<String> for FormValue {
    fn from(v: String) -> Self {
        FormValue::Text(v)
    }
}

impl From<serde_json::Value> for FormValue {
    fn from(v: serde_json::Value) -> Self {
        FormValue::Json(v)
    }
}

/// Loose, user-supplied options keyed by Gotenberg field name.
pub type RawOptions = BTreeMap<String, FormValue>;

/// Built options: Gotenberg field name → wire string.
///
/// Iteration order is the lexical order of field names, so the same options
/// always produce the same multipart body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionOptions(BTreeMap<String, String>);

impl ConversionOptions {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for ConversionOptions {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ── Families ─────────────────────────────────────────────────────────────

/// The four option families, each with its own defaults and boolean set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormFamily {
    /// Chromium HTML/URL/Markdown → PDF.
    Page,
    /// Chromium URL → image.
    Screenshot,
    /// LibreOffice document → PDF.
    Office,
    /// PDF engines: merge, split, convert.
    PdfEngine,
}

const PAGE_BOOLEANS: &[&str] = &[
    "landscape",
    "printBackground",
    "omitBackground",
    "preferCssPageSize",
    "generateDocumentOutline",
    "generateTaggedPdf",
    "singlePage",
];

const SCREENSHOT_BOOLEANS: &[&str] = &["clip", "omitBackground", "optimizeForSpeed"];

const OFFICE_BOOLEANS: &[&str] = &[
    "landscape",
    "merge",
    "pdfua",
    "exportFormFields",
    "allowDuplicateFieldNames",
    "exportBookmarks",
    "exportBookmarksToPdfDestination",
    "exportPlaceholders",
    "exportNotes",
    "exportNotesPages",
    "exportOnlyNotesPages",
    "exportNotesInMargin",
    "convertOooTargetToPdfTarget",
    "exportLinksRelativeFsys",
    "exportHiddenSlides",
    "skipEmptyPages",
    "addOriginalDocumentAsStream",
    "singlePageSheets",
    "losslessImageCompression",
    "reduceImageResolution",
];

const PDF_ENGINE_BOOLEANS: &[&str] = &["pdfua", "flatten", "splitUnify"];

impl FormFamily {
    /// Documented default field set for the family.
    pub fn defaults(self) -> Vec<(&'static str, FormValue)> {
        use FormValue::*;
        match self {
            FormFamily::Page => vec![
                ("paperWidth", Float(8.5)),
                ("paperHeight", Int(11)),
                ("marginTop", Float(0.39)),
                ("marginBottom", Float(0.39)),
                ("marginLeft", Float(0.39)),
                ("marginRight", Float(0.39)),
                ("landscape", Bool(false)),
                ("printBackground", Bool(false)),
                ("scale", Float(1.0)),
            ],
            FormFamily::Screenshot => vec![
                ("width", Int(800)),
                ("height", Int(600)),
                ("format", Text("png".into())),
                ("quality", Int(100)),
                ("clip", Bool(false)),
                ("omitBackground", Bool(false)),
                ("optimizeForSpeed", Bool(false)),
            ],
            FormFamily::Office => {
                let mut d = vec![
                    ("landscape", Bool(false)),
                    ("merge", Bool(false)),
                    ("pdfa", Text(String::new())),
                    ("pdfua", Bool(false)),
                    ("exportFormFields", Bool(true)),
                    ("exportBookmarks", Bool(true)),
                    ("quality", Int(90)),
                    ("maxImageResolution", Int(300)),
                ];
                for name in OFFICE_BOOLEANS {
                    if !d.iter().any(|(k, _)| k == name) {
                        d.push((*name, Bool(false)));
                    }
                }
                d
            }
            FormFamily::PdfEngine => vec![
                ("pdfa", Text(String::new())),
                ("pdfua", Bool(false)),
                ("flatten", Bool(false)),
                ("splitUnify", Bool(false)),
            ],
        }
    }

    /// Field names whose values are coerced to `"true"` / `"false"`.
    pub fn boolean_fields(self) -> &'static [&'static str] {
        match self {
            FormFamily::Page => PAGE_BOOLEANS,
            FormFamily::Screenshot => SCREENSHOT_BOOLEANS,
            FormFamily::Office => OFFICE_BOOLEANS,
            FormFamily::PdfEngine => PDF_ENGINE_BOOLEANS,
        }
    }

    /// Field names that are omitted entirely when blank.
    pub fn optional_fields(self) -> &'static [&'static str] {
        match self {
            FormFamily::Office | FormFamily::PdfEngine => &["pdfa"],
            FormFamily::Page | FormFamily::Screenshot => &[],
        }
    }
}

/// Merge `user` over the family defaults and render every value to its wire
/// form.
///
/// User values win on conflict. Unknown keys pass through. Boolean fields are
/// coerced with [`FormValue::is_truthy`]. Blank optional fields are removed.
pub fn build(family: FormFamily, user: &RawOptions) -> ConversionOptions {
    let mut merged: RawOptions = family
        .defaults()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    for (k, v) in user {
        merged.insert(k.clone(), v.clone());
    }

    let booleans = family.boolean_fields();
    let optionals = family.optional_fields();

    let fields = merged
        .into_iter()
        .filter(|(k, v)| !(optionals.contains(&k.as_str()) && v.is_blank()))
        .map(|(k, v)| {
            let wire = if booleans.contains(&k.as_str()) {
                bool_str(v.is_truthy()).to_string()
            } else {
                v.to_wire()
            };
            (k, wire)
        })
        .collect();

    ConversionOptions(fields)
}

/// A typed option struct belonging to one [`FormFamily`].
pub trait FormOptions {
    const FAMILY: FormFamily;

    /// Every field this struct sets, keyed by Gotenberg name.
    fn to_raw(&self) -> RawOptions;

    /// Render to wire fields via [`build`].
    fn build(&self) -> ConversionOptions {
        build(Self::FAMILY, &self.to_raw())
    }
}

/// Generates consuming setters: `fn name(mut self, v: T) -> Self`.
macro_rules! setters {
    ($($(#[$doc:meta])* $field:ident: $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $field(mut self, v: $ty) -> Self {
                self.$field = v;
                self
            }
        )*
    };
}

/// Inserts `Some` values only.
fn put_opt(raw: &mut RawOptions, key: &str, v: Option<impl Into<FormValue>>) {
    if let Some(v) = v {
        raw.insert(key.to_string(), v.into());
    }
}

fn put(raw: &mut RawOptions, key: &str, v: impl Into<FormValue>) {
    raw.insert(key.to_string(), v.into());
}

// ── PDF/A ────────────────────────────────────────────────────────────────

/// Archival PDF target accepted by Gotenberg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PdfAFormat {
    #[serde(rename = "PDF/A-1b")]
    A1b,
    #[serde(rename = "PDF/A-2b")]
    A2b,
    #[serde(rename = "PDF/A-3b")]
    A3b,
}

impl PdfAFormat {
    pub const ALL: [PdfAFormat; 3] = [PdfAFormat::A1b, PdfAFormat::A2b, PdfAFormat::A3b];

    pub fn as_str(self) -> &'static str {
        match self {
            PdfAFormat::A1b => "PDF/A-1b",
            PdfAFormat::A2b => "PDF/A-2b",
            PdfAFormat::A3b => "PDF/A-3b",
        }
    }
}

impl fmt::Display for PdfAFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdfAFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PdfAFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedPdfA(s.to_string()))
    }
}

impl From<PdfAFormat> for FormValue {
    fn from(v: PdfAFormat) -> Self {
        FormValue::Text(v.as_str().to_string())
    }
}

// ── Page rendering ───────────────────────────────────────────────────────

/// Chromium page options. Dimensions are in inches.
///
/// ```rust
/// use gotenberg_client::{FormOptions, PageOptions};
///
/// let fields = PageOptions::default().landscape(true).build();
/// assert_eq!(fields.get("landscape"), Some("true"));
/// assert_eq!(fields.get("paperWidth"), Some("8.5"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub paper_width: f64,
    pub paper_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub landscape: bool,
    pub print_background: bool,
    pub scale: f64,
    pub omit_background: Option<bool>,
    pub prefer_css_page_size: Option<bool>,
    pub generate_document_outline: Option<bool>,
    pub generate_tagged_pdf: Option<bool>,
    pub single_page: Option<bool>,
    /// Page ranges to print, e.g. `1-5, 8`.
    pub native_page_ranges: Option<String>,
    /// Duration to wait before printing, e.g. `2s`.
    pub wait_delay: Option<String>,
    pub wait_for_expression: Option<String>,
    /// `screen` or `print`.
    pub emulated_media_type: Option<String>,
    /// Fields not modelled above; applied last.
    pub extra: RawOptions,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            paper_width: 8.5,
            paper_height: 11.0,
            margin_top: 0.39,
            margin_bottom: 0.39,
            margin_left: 0.39,
            margin_right: 0.39,
            landscape: false,
            print_background: false,
            scale: 1.0,
            omit_background: None,
            prefer_css_page_size: None,
            generate_document_outline: None,
            generate_tagged_pdf: None,
            single_page: None,
            native_page_ranges: None,
            wait_delay: None,
            wait_for_expression: None,
            emulated_media_type: None,
            extra: RawOptions::new(),
        }
    }
}

impl PageOptions {
    /// A4 paper, swapped to 11.7 × 8.27 when `landscape`.
    pub fn a4(landscape: bool) -> Self {
        let (w, h) = if landscape { (11.7, 8.27) } else { (8.27, 11.7) };
        Self::default().paper_size(w, h).landscape(landscape)
    }

    /// US Letter, swapped to 11 × 8.5 when `landscape`.
    pub fn letter(landscape: bool) -> Self {
        let (w, h) = if landscape { (11.0, 8.5) } else { (8.5, 11.0) };
        Self::default().paper_size(w, h).landscape(landscape)
    }

    pub fn paper_size(mut self, width: f64, height: f64) -> Self {
        self.paper_width = width;
        self.paper_height = height;
        self
    }

    /// Same margin on all four sides.
    pub fn margins(mut self, inches: f64) -> Self {
        self.margin_top = inches;
        self.margin_bottom = inches;
        self.margin_left = inches;
        self.margin_right = inches;
        self
    }

    setters! {
        margin_top: f64,
        margin_bottom: f64,
        margin_left: f64,
        margin_right: f64,
        landscape: bool,
        print_background: bool,
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale.clamp(0.1, 2.0);
        self
    }

    pub fn omit_background(mut self, v: bool) -> Self {
        self.omit_background = Some(v);
        self
    }

    pub fn prefer_css_page_size(mut self, v: bool) -> Self {
        self.prefer_css_page_size = Some(v);
        self
    }

    pub fn generate_document_outline(mut self, v: bool) -> Self {
        self.generate_document_outline = Some(v);
        self
    }

    pub fn generate_tagged_pdf(mut self, v: bool) -> Self {
        self.generate_tagged_pdf = Some(v);
        self
    }

    pub fn single_page(mut self, v: bool) -> Self {
        self.single_page = Some(v);
        self
    }

    pub fn native_page_ranges(mut self, ranges: impl Into<String>) -> Self {
        self.native_page_ranges = Some(ranges.into());
        self
    }

    pub fn wait_delay(mut self, delay: impl Into<String>) -> Self {
        self.wait_delay = Some(delay.into());
        self
    }

    pub fn wait_for_expression(mut self, expr: impl Into<String>) -> Self {
        self.wait_for_expression = Some(expr.into());
        self
    }

    pub fn emulated_media_type(mut self, media: impl Into<String>) -> Self {
        self.emulated_media_type = Some(media.into());
        self
    }

    /// Set an arbitrary field by its Gotenberg name.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl FormOptions for PageOptions {
    const FAMILY: FormFamily = FormFamily::Page;

    fn to_raw(&self) -> RawOptions {
        let mut raw = RawOptions::new();
        put(&mut raw, "paperWidth", self.paper_width);
        put(&mut raw, "paperHeight", self.paper_height);
        put(&mut raw, "marginTop", self.margin_top);
        put(&mut raw, "marginBottom", self.margin_bottom);
        put(&mut raw, "marginLeft", self.margin_left);
        put(&mut raw, "marginRight", self.margin_right);
        put(&mut raw, "landscape", self.landscape);
        put(&mut raw, "printBackground", self.print_background);
        put(&mut raw, "scale", self.scale);
        put_opt(&mut raw, "omitBackground", self.omit_background);
        put_opt(&mut raw, "preferCssPageSize", self.prefer_css_page_size);
        put_opt(&mut raw, "generateDocumentOutline", self.generate_document_outline);
        put_opt(&mut raw, "generateTaggedPdf", self.generate_tagged_pdf);
        put_opt(&mut raw, "singlePage", self.single_page);
        put_opt(&mut raw, "nativePageRanges", self.native_page_ranges.clone());
        put_opt(&mut raw, "waitDelay", self.wait_delay.clone());
        put_opt(&mut raw, "waitForExpression", self.wait_for_expression.clone());
        put_opt(&mut raw, "emulatedMediaType", self.emulated_media_type.clone());
        raw.extend(self.extra.clone());
        raw
    }
}

// ── Screenshots ──────────────────────────────────────────────────────────

/// Image format for Chromium screenshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenshotFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ScreenshotFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ScreenshotFormat::Png => "png",
            ScreenshotFormat::Jpeg => "jpeg",
            ScreenshotFormat::Webp => "webp",
        }
    }
}

/// Chromium screenshot options. Dimensions are device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotOptions {
    pub width: u32,
    pub height: u32,
    pub format: ScreenshotFormat,
    /// 0–100; only meaningful for JPEG.
    pub quality: u8,
    pub clip: bool,
    pub omit_background: bool,
    pub optimize_for_speed: bool,
    pub extra: RawOptions,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: ScreenshotFormat::Png,
            quality: 100,
            clip: false,
            omit_background: false,
            optimize_for_speed: false,
            extra: RawOptions::new(),
        }
    }
}

impl ScreenshotOptions {
    setters! {
        width: u32,
        height: u32,
        format: ScreenshotFormat,
        clip: bool,
        omit_background: bool,
        optimize_for_speed: bool,
    }

    pub fn quality(mut self, q: u8) -> Self {
        self.quality = q.min(100);
        self
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl FormOptions for ScreenshotOptions {
    const FAMILY: FormFamily = FormFamily::Screenshot;

    fn to_raw(&self) -> RawOptions {
        let mut raw = RawOptions::new();
        put(&mut raw, "width", self.width);
        put(&mut raw, "height", self.height);
        put(&mut raw, "format", self.format.as_str());
        put(&mut raw, "quality", u32::from(self.quality));
        put(&mut raw, "clip", self.clip);
        put(&mut raw, "omitBackground", self.omit_background);
        put(&mut raw, "optimizeForSpeed", self.optimize_for_speed);
        raw.extend(self.extra.clone());
        raw
    }
}

// ── LibreOffice ──────────────────────────────────────────────────────────

/// LibreOffice export options.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficeOptions {
    pub landscape: bool,
    /// Merge all converted documents into one PDF.
    pub merge: bool,
    pub pdfa: Option<PdfAFormat>,
    pub pdfua: bool,
    pub export_form_fields: bool,
    pub allow_duplicate_field_names: bool,
    pub export_bookmarks: bool,
    pub export_bookmarks_to_pdf_destination: bool,
    pub export_placeholders: bool,
    pub export_notes: bool,
    pub export_notes_pages: bool,
    pub export_only_notes_pages: bool,
    pub export_notes_in_margin: bool,
    pub convert_ooo_target_to_pdf_target: bool,
    pub export_links_relative_fsys: bool,
    pub export_hidden_slides: bool,
    pub skip_empty_pages: bool,
    pub add_original_document_as_stream: bool,
    pub single_page_sheets: bool,
    pub lossless_image_compression: bool,
    /// JPEG quality, 1–100.
    pub quality: u8,
    pub reduce_image_resolution: bool,
    /// DPI cap applied when `reduce_image_resolution` is set.
    pub max_image_resolution: u32,
    pub extra: RawOptions,
}

impl Default for OfficeOptions {
    fn default() -> Self {
        Self {
            landscape: false,
            merge: false,
            pdfa: None,
            pdfua: false,
            export_form_fields: true,
            allow_duplicate_field_names: false,
            export_bookmarks: true,
            export_bookmarks_to_pdf_destination: false,
            export_placeholders: false,
            export_notes: false,
            export_notes_pages: false,
            export_only_notes_pages: false,
            export_notes_in_margin: false,
            convert_ooo_target_to_pdf_target: false,
            export_links_relative_fsys: false,
            export_hidden_slides: false,
            skip_empty_pages: false,
            add_original_document_as_stream: false,
            single_page_sheets: false,
            lossless_image_compression: false,
            quality: 90,
            reduce_image_resolution: false,
            max_image_resolution: 300,
            extra: RawOptions::new(),
        }
    }
}

impl OfficeOptions {
    /// Maximum quality, lossless images, bookmarks and form fields kept.
    pub fn high_quality() -> Self {
        Self::default()
            .quality(100)
            .lossless_image_compression(true)
            .reduce_image_resolution(false)
            .export_form_fields(true)
            .export_bookmarks(true)
    }

    /// Smaller files: quality 50 and images capped at 150 DPI.
    pub fn compressed() -> Self {
        Self::default()
            .quality(50)
            .lossless_image_compression(false)
            .reduce_image_resolution(true)
            .max_image_resolution(150)
    }

    setters! {
        landscape: bool,
        merge: bool,
        pdfua: bool,
        export_form_fields: bool,
        allow_duplicate_field_names: bool,
        export_bookmarks: bool,
        export_bookmarks_to_pdf_destination: bool,
        export_placeholders: bool,
        export_notes: bool,
        export_notes_pages: bool,
        export_only_notes_pages: bool,
        export_notes_in_margin: bool,
        convert_ooo_target_to_pdf_target: bool,
        export_links_relative_fsys: bool,
        export_hidden_slides: bool,
        skip_empty_pages: bool,
        add_original_document_as_stream: bool,
        single_page_sheets: bool,
        lossless_image_compression: bool,
        reduce_image_resolution: bool,
        max_image_resolution: u32,
    }

    pub fn pdfa(mut self, format: PdfAFormat) -> Self {
        self.pdfa = Some(format);
        self
    }

    pub fn quality(mut self, q: u8) -> Self {
        self.quality = q.clamp(1, 100);
        self
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl FormOptions for OfficeOptions {
    const FAMILY: FormFamily = FormFamily::Office;

    fn to_raw(&self) -> RawOptions {
        let mut raw = RawOptions::new();
        put(&mut raw, "landscape", self.landscape);
        put(&mut raw, "merge", self.merge);
        put_opt(&mut raw, "pdfa", self.pdfa);
        put(&mut raw, "pdfua", self.pdfua);
        put(&mut raw, "exportFormFields", self.export_form_fields);
        put(&mut raw, "allowDuplicateFieldNames", self.allow_duplicate_field_names);
        put(&mut raw, "exportBookmarks", self.export_bookmarks);
        put(
            &mut raw,
            "exportBookmarksToPdfDestination",
            self.export_bookmarks_to_pdf_destination,
        );
        put(&mut raw, "exportPlaceholders", self.export_placeholders);
        put(&mut raw, "exportNotes", self.export_notes);
        put(&mut raw, "exportNotesPages", self.export_notes_pages);
        put(&mut raw, "exportOnlyNotesPages", self.export_only_notes_pages);
        put(&mut raw, "exportNotesInMargin", self.export_notes_in_margin);
        put(
            &mut raw,
            "convertOooTargetToPdfTarget",
            self.convert_ooo_target_to_pdf_target,
        );
        put(&mut raw, "exportLinksRelativeFsys", self.export_links_relative_fsys);
        put(&mut raw, "exportHiddenSlides", self.export_hidden_slides);
        put(&mut raw, "skipEmptyPages", self.skip_empty_pages);
        put(
            &mut raw,
            "addOriginalDocumentAsStream",
            self.add_original_document_as_stream,
        );
        put(&mut raw, "singlePageSheets", self.single_page_sheets);
        put(&mut raw, "losslessImageCompression", self.lossless_image_compression);
        put(&mut raw, "quality", u32::from(self.quality));
        put(&mut raw, "reduceImageResolution", self.reduce_image_resolution);
        put(&mut raw, "maxImageResolution", self.max_image_resolution);
        raw.extend(self.extra.clone());
        raw
    }
}

// ── PDF engines ──────────────────────────────────────────────────────────

/// Options shared by the PDF-engine routes (merge, split, convert).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfEngineOptions {
    pub pdfa: Option<PdfAFormat>,
    pub pdfua: bool,
    pub flatten: bool,
    /// With `split`, put all extracted pages into a single output PDF.
    pub split_unify: bool,
    /// Written into the output documents; sent as one JSON field.
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    pub extra: RawOptions,
}

impl PdfEngineOptions {
    setters! {
        pdfua: bool,
        flatten: bool,
        split_unify: bool,
    }

    pub fn pdfa(mut self, format: PdfAFormat) -> Self {
        self.pdfa = Some(format);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl FormOptions for PdfEngineOptions {
    const FAMILY: FormFamily = FormFamily::PdfEngine;

    fn to_raw(&self) -> RawOptions {
        let mut raw = RawOptions::new();
        put_opt(&mut raw, "pdfa", self.pdfa);
        put(&mut raw, "pdfua", self.pdfua);
        put(&mut raw, "flatten", self.flatten);
        put(&mut raw, "splitUnify", self.split_unify);
        put_opt(
            &mut raw,
            "metadata",
            self.metadata.clone().map(serde_json::Value::Object),
        );
        raw.extend(self.extra.clone());
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(opts: &ConversionOptions) -> Vec<(&str, &str)> {
        opts.iter().collect()
    }

    #[test]
    fn page_defaults_exact() {
        let built = build(FormFamily::Page, &RawOptions::new());
        assert_eq!(
            pairs(&built),
            vec![
                ("landscape", "false"),
                ("marginBottom", "0.39"),
                ("marginLeft", "0.39"),
                ("marginRight", "0.39"),
                ("marginTop", "0.39"),
                ("paperHeight", "11"),
                ("paperWidth", "8.5"),
                ("printBackground", "false"),
                ("scale", "1"),
            ]
        );
    }

    #[test]
    fn screenshot_defaults_exact() {
        let built = build(FormFamily::Screenshot, &RawOptions::new());
        assert_eq!(
            pairs(&built),
            vec![
                ("clip", "false"),
                ("format", "png"),
                ("height", "600"),
                ("omitBackground", "false"),
                ("optimizeForSpeed", "false"),
                ("quality", "100"),
                ("width", "800"),
            ]
        );
    }

    #[test]
    fn office_defaults_exact() {
        let built = build(FormFamily::Office, &RawOptions::new());
        assert!(!built.contains_key("pdfa"));
        assert_eq!(built.get("exportFormFields"), Some("true"));
        assert_eq!(built.get("exportBookmarks"), Some("true"));
        assert_eq!(built.get("quality"), Some("90"));
        assert_eq!(built.get("maxImageResolution"), Some("300"));
        for name in OFFICE_BOOLEANS {
            let expected = if matches!(*name, "exportFormFields" | "exportBookmarks") {
                "true"
            } else {
                "false"
            };
            assert_eq!(built.get(name), Some(expected), "field {name}");
        }
        // 20 booleans + quality + maxImageResolution
        assert_eq!(built.len(), 22);
    }

    #[test]
    fn pdf_engine_defaults_exact() {
        let built = build(FormFamily::PdfEngine, &RawOptions::new());
        assert_eq!(
            pairs(&built),
            vec![("flatten", "false"), ("pdfua", "false"), ("splitUnify", "false")]
        );
    }

    #[test]
    fn typed_defaults_match_untyped_defaults() {
        let empty = RawOptions::new();
        assert_eq!(PageOptions::default().build(), build(FormFamily::Page, &empty));
        assert_eq!(
            ScreenshotOptions::default().build(),
            build(FormFamily::Screenshot, &empty)
        );
        assert_eq!(OfficeOptions::default().build(), build(FormFamily::Office, &empty));
        assert_eq!(
            PdfEngineOptions::default().build(),
            build(FormFamily::PdfEngine, &empty)
        );
    }

    #[test]
    fn user_values_override_and_unknown_keys_pass_through() {
        let mut user = RawOptions::new();
        user.insert("paperWidth".into(), 8.27.into());
        user.insert("waitDelay".into(), "2s".into());
        let built = build(FormFamily::Page, &user);
        assert_eq!(built.get("paperWidth"), Some("8.27"));
        assert_eq!(built.get("waitDelay"), Some("2s"));
        assert_eq!(built.get("paperHeight"), Some("11"));
    }

    #[test]
    fn truthy_values_become_literal_strings() {
        let cases = [
            (FormValue::Bool(true), "true"),
            (FormValue::Bool(false), "false"),
            (FormValue::Int(1), "true"),
            (FormValue::Int(0), "false"),
            (FormValue::Float(0.0), "false"),
            (FormValue::Text("on".into()), "true"),
            (FormValue::Text("1".into()), "true"),
            (FormValue::Text("".into()), "false"),
            (FormValue::Text("FALSE".into()), "false"),
            (FormValue::Json(json!(null)), "false"),
        ];
        for (value, expected) in cases {
            let mut user = RawOptions::new();
            user.insert("printBackground".into(), value.clone());
            let built = build(FormFamily::Page, &user);
            assert_eq!(built.get("printBackground"), Some(expected), "value {value:?}");
        }
    }

    #[test]
    fn every_boolean_field_is_coerced_in_every_family() {
        let truthy = [
            FormValue::Bool(true),
            FormValue::Int(1),
            FormValue::Text("yes".into()),
            FormValue::Json(json!(true)),
        ];
        let falsy = [
            FormValue::Bool(false),
            FormValue::Int(0),
            FormValue::Text("false".into()),
            FormValue::Text(String::new()),
            FormValue::Json(json!([])),
        ];
        for family in [
            FormFamily::Page,
            FormFamily::Screenshot,
            FormFamily::Office,
            FormFamily::PdfEngine,
        ] {
            for &field in family.boolean_fields() {
                for (values, expected) in [(&truthy[..], "true"), (&falsy[..], "false")] {
                    for value in values {
                        let mut user = RawOptions::new();
                        user.insert(field.into(), value.clone());
                        let built = build(family, &user);
                        assert_eq!(
                            built.get(field),
                            Some(expected),
                            "{family:?}.{field} = {value:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn optional_page_booleans_only_sent_when_set() {
        let built = PageOptions::default().build();
        assert!(!built.contains_key("singlePage"));

        let built = PageOptions::default().single_page(true).omit_background(false).build();
        assert_eq!(built.get("singlePage"), Some("true"));
        assert_eq!(built.get("omitBackground"), Some("false"));
    }

    #[test]
    fn blank_pdfa_is_dropped() {
        for value in [
            FormValue::Text(String::new()),
            FormValue::Text("  ".into()),
            FormValue::Text("0".into()),
            FormValue::Int(0),
            FormValue::Json(json!(0)),
            FormValue::Json(json!(null)),
        ] {
            let mut user = RawOptions::new();
            user.insert("pdfa".into(), value);
            assert!(!build(FormFamily::Office, &user).contains_key("pdfa"));
            assert!(!build(FormFamily::PdfEngine, &user).contains_key("pdfa"));
        }

        let built = OfficeOptions::default().pdfa(PdfAFormat::A2b).build();
        assert_eq!(built.get("pdfa"), Some("PDF/A-2b"));
    }

    #[test]
    fn metadata_and_lists_are_json_encoded() {
        let mut meta = serde_json::Map::new();
        meta.insert("Author".into(), json!("Jane"));
        meta.insert("Keywords".into(), json!(["a", "b"]));
        let built = PdfEngineOptions::default().metadata(meta).build();
        let encoded = built.get("metadata").unwrap();
        let back: serde_json::Value = serde_json::from_str(encoded).unwrap();
        assert_eq!(back, json!({"Author": "Jane", "Keywords": ["a", "b"]}));
    }

    #[test]
    fn a4_and_letter_presets() {
        let a4 = PageOptions::a4(false);
        assert_eq!((a4.paper_width, a4.paper_height), (8.27, 11.7));
        assert!(!a4.landscape);

        let a4l = PageOptions::a4(true).build();
        assert_eq!(a4l.get("paperWidth"), Some("11.7"));
        assert_eq!(a4l.get("paperHeight"), Some("8.27"));
        assert_eq!(a4l.get("landscape"), Some("true"));

        let letter = PageOptions::letter(true);
        assert_eq!((letter.paper_width, letter.paper_height), (11.0, 8.5));
    }

    #[test]
    fn office_presets() {
        let hq = OfficeOptions::high_quality().build();
        assert_eq!(hq.get("quality"), Some("100"));
        assert_eq!(hq.get("losslessImageCompression"), Some("true"));
        assert_eq!(hq.get("reduceImageResolution"), Some("false"));

        let small = OfficeOptions::compressed().build();
        assert_eq!(small.get("quality"), Some("50"));
        assert_eq!(small.get("reduceImageResolution"), Some("true"));
        assert_eq!(small.get("maxImageResolution"), Some("150"));
    }

    #[test]
    fn pdfa_format_parsing() {
        assert_eq!("PDF/A-1b".parse::<PdfAFormat>().unwrap(), PdfAFormat::A1b);
        assert_eq!("PDF/A-3b".parse::<PdfAFormat>().unwrap(), PdfAFormat::A3b);
        assert!(matches!(
            "PDF/A-2u".parse::<PdfAFormat>(),
            Err(ValidationError::UnsupportedPdfA(_))
        ));
    }

    #[test]
    fn parse_loose_types() {
        assert_eq!(FormValue::parse_loose("true"), FormValue::Bool(true));
        assert_eq!(FormValue::parse_loose("42"), FormValue::Int(42));
        assert_eq!(FormValue::parse_loose("0.5"), FormValue::Float(0.5));
        assert_eq!(FormValue::parse_loose("2s"), FormValue::Text("2s".into()));
        assert_eq!(FormValue::parse_loose("[1,2]"), FormValue::Json(json!([1, 2])));
    }

    #[test]
    fn extra_overrides_typed_field() {
        let built = ScreenshotOptions::default().set("format", "jpeg").build();
        assert_eq!(built.get("format"), Some("jpeg"));
    }
}
