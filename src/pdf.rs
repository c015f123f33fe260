//! Paginated render target: interprets a composed [`Document`] into typst
//! source, compiles it in-memory and flattens the result to PDF bytes.
//! Either the whole artifact is produced or an error is returned; no
//! partial output ever escapes.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::{Datelike, Local};
use text_placeholder::Template;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_kit::fonts::{FontSearcher, FontSlot};
use typst_pdf::PdfOptions;

use crate::error::{AppError, Result};
use crate::template::{Document, HeaderLayout, Section};

static LIBRARY: LazyLock<LazyHash<Library>> =
    LazyLock::new(|| LazyHash::new(Library::builder().build()));

const PAGE_SKELETON: &str = include_str!("../templates/page.typ.tpl");

struct TypstWorld {
    source: Source,
    main_id: FileId,
    assets: HashMap<String, Bytes>,
    book: LazyHash<FontBook>,
    fonts: Vec<FontSlot>,
}

impl TypstWorld {
    fn new(source_text: String, assets: Vec<(String, Vec<u8>)>) -> Self {
        let main_id = FileId::new(None, VirtualPath::new("main.typ"));
        let source = Source::new(main_id, source_text);

        let fonts = FontSearcher::new().include_system_fonts(true).search();
        let book = LazyHash::new(fonts.book);

        Self {
            source,
            main_id,
            assets: assets
                .into_iter()
                .map(|(name, data)| (name, Bytes::new(data)))
                .collect(),
            fonts: fonts.fonts,
            book,
        }
    }
}

impl World for TypstWorld {
    fn library(&self) -> &LazyHash<Library> {
        &LIBRARY
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main_id
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main_id {
            Ok(self.source.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = id.vpath().as_rootless_path();
        let key = path.to_string_lossy();
        self.assets
            .get(key.as_ref())
            .cloned()
            .ok_or_else(|| FileError::NotFound(path.into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts[index].get()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Local::now().date_naive();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

/// Compile a composed document into PDF bytes.
pub fn render_pdf(doc: &Document) -> Result<Vec<u8>> {
    let (source, assets) = typst_source(doc);
    let world = TypstWorld::new(source, assets);

    let compiled = typst::compile(&world)
        .output
        .map_err(|errors| AppError::Export(format!("typst compilation failed: {errors:?}")))?;

    typst_pdf::pdf(&compiled, &PdfOptions::default())
        .map_err(|e| AppError::Export(format!("PDF generation failed: {e:?}")))
}

/// Build the typst source and the virtual image files it references.
/// Public so tests can assert on geometry and content without compiling.
pub fn typst_source(doc: &Document) -> (String, Vec<(String, Vec<u8>)>) {
    let (width, height) = doc.paper.size_mm();
    let style = doc.style;

    let page_extras = if style.page_frame {
        format!(
            ", background: pad(7mm, rect(width: 100%, height: 100%, stroke: 0.75pt + rgb(\"{}\")))",
            doc.accent
        )
    } else {
        String::new()
    };
    let fonts = if style.serif {
        "\"Libertinus Serif\", \"New Computer Modern\""
    } else {
        "\"Liberation Sans\", \"DejaVu Sans\", \"Arial\", \"Helvetica\""
    };

    let (body, assets) = body_markup(doc);

    let width_str = format!("{width}");
    let height_str = format!("{height}");
    let vars = HashMap::from([
        ("width", width_str.as_str()),
        ("height", height_str.as_str()),
        ("page_extras", page_extras.as_str()),
        ("fonts", fonts),
        ("lang", doc.lang.as_str()),
        ("accent", doc.accent.as_str()),
        ("body", body.as_str()),
    ]);

    (Template::new(PAGE_SKELETON).fill_with_hashmap(&vars), assets)
}

fn body_markup(doc: &Document) -> (String, Vec<(String, Vec<u8>)>) {
    let mut b = String::new();
    let mut assets: Vec<(String, Vec<u8>)> = Vec::new();
    let style = doc.style;

    for section in &doc.sections {
        match section {
            Section::Header(header) => {
                if let Some(banner) = &header.banner {
                    if let Some(data) = banner.decode() {
                        let path = format!("header.{}", banner.extension());
                        assets.push((path.clone(), data));
                        let _ = writeln!(b, "#image(\"{path}\", width: 100%)\n#v(3mm)");
                    }
                }
                let logo_markup = header.logo.as_ref().and_then(|logo| {
                    let data = logo.decode()?;
                    let path = format!("logo.{}", logo.extension());
                    assets.push((path.clone(), data));
                    Some(format!("#image(\"{path}\", height: 14mm)"))
                });
                let monogram = header
                    .company
                    .name
                    .chars()
                    .next()
                    .unwrap_or('F')
                    .to_uppercase()
                    .to_string();
                let identity = {
                    let mut s = String::new();
                    match &logo_markup {
                        Some(image) => {
                            let _ = writeln!(s, "{image}");
                        }
                        None => {
                            let _ = writeln!(
                                s,
                                "#box(fill: accent, inset: 6pt, radius: 3pt)[#text(fill: white, weight: \"bold\", size: 14pt)[{}]]",
                                esc(&monogram)
                            );
                        }
                    }
                    let _ = writeln!(
                        s,
                        "\n#text(weight: \"bold\", size: 13pt)[{}]\n",
                        esc(&header.company.name)
                    );
                    for line in &header.company.lines {
                        let _ = writeln!(s, "#text(size: 8.5pt, fill: rgb(\"#555\"))[{}] \\", esc(line));
                    }
                    s
                };
                let badge = format!(
                    "#box(fill: rgb(\"{}\"), inset: (x: 6pt, y: 3pt), radius: 3pt)[#text(fill: rgb(\"{}\"), size: 8pt, weight: \"bold\")[{}]]",
                    header.status.fill,
                    header.status.color,
                    esc(&header.status.label)
                );
                let title_block = format!(
                    "#text(fill: accent, weight: \"bold\", size: 22pt, tracking: 1pt)[{}]\n\n#text(size: 11pt, fill: rgb(\"#333\"))[{}]\n\n{badge}",
                    esc(&header.title),
                    esc(&header.number)
                );

                match style.header {
                    HeaderLayout::Banner => {
                        b.push_str("#block(width: 100%, height: 4mm, fill: accent)\n#v(4mm)\n");
                        let _ = writeln!(
                            b,
                            "#grid(columns: (1fr, auto), column-gutter: 8mm,\n[{identity}],\n[#align(right)[{title_block}]],\n)"
                        );
                    }
                    HeaderLayout::Split => {
                        let _ = writeln!(
                            b,
                            "#grid(columns: (1fr, auto), column-gutter: 8mm,\n[{identity}],\n[#align(right)[{title_block}]],\n)"
                        );
                    }
                    HeaderLayout::Centered => {
                        let _ = writeln!(
                            b,
                            "#align(center)[{identity}]\n#v(3mm)\n#align(center)[{title_block}]"
                        );
                    }
                    HeaderLayout::Sidebar => {
                        let sidebar_title = format!(
                            "#text(weight: \"bold\", size: 20pt)[{}]",
                            esc(&header.title)
                        );
                        let _ = writeln!(
                            b,
                            "#grid(columns: (auto, 1fr), column-gutter: 8mm,\n[#block(fill: accent, inset: 8pt, radius: 3pt)[#text(fill: white)[{sidebar_title}]]\n\n#text(size: 11pt)[{}]\n\n{badge}],\n[#align(right)[{identity}]],\n)",
                            esc(&header.number)
                        );
                    }
                    HeaderLayout::Sparse => {
                        let _ = writeln!(
                            b,
                            "#grid(columns: (1fr, auto), column-gutter: 8mm,\n[{title_block}],\n[#align(right)[{identity}]],\n)\n#line(length: 100%, stroke: 0.5pt + rgb(\"#ddd\"))"
                        );
                    }
                }

                b.push_str("#v(4mm)\n#grid(columns: (1fr, 1fr, 1fr), column-gutter: 6mm,\n");
                for row in &header.meta {
                    if row.emphasis {
                        let _ = writeln!(
                            b,
                            "[#text(size: 8pt, fill: rgb(\"#777\"))[{}] \\ #text(fill: accent, weight: \"bold\", size: 12pt)[{}]],",
                            esc(&row.label),
                            esc(&row.value)
                        );
                    } else {
                        let _ = writeln!(
                            b,
                            "[#text(size: 8pt, fill: rgb(\"#777\"))[{}] \\ #text(weight: \"medium\", size: 10pt)[{}]],",
                            esc(&row.label),
                            esc(&row.value)
                        );
                    }
                }
                b.push_str(")\n#v(5mm)\n");
            }
            Section::BillTo(party) => {
                let _ = writeln!(
                    b,
                    "#text(fill: accent, size: 9pt, weight: \"bold\", tracking: 0.8pt)[{}]\n",
                    esc(&party.label)
                );
                let _ = writeln!(b, "#text(weight: \"bold\", size: 11pt)[{}] \\", esc(&party.name));
                for line in &party.lines {
                    let _ = writeln!(b, "#text(size: 9pt, fill: rgb(\"#555\"))[{}] \\", esc(line));
                }
                b.push_str("#v(4mm)\n");
            }
            Section::Items(table) => {
                let fill = match (style.filled_table_header, style.zebra_rows) {
                    (true, true) => {
                        "(x, y) => if y == 0 { accent } else if calc.odd(y) { rgb(\"#f4f5f8\") } else { none }"
                    }
                    (true, false) => "(x, y) => if y == 0 { accent } else { none }",
                    (false, true) => {
                        "(x, y) => if y > 0 and calc.odd(y) { rgb(\"#f4f5f8\") } else { none }"
                    }
                    (false, false) => "(x, y) => none",
                };
                let header_color = if style.filled_table_header { "white" } else { "accent" };
                let _ = writeln!(
                    b,
                    "#table(\ncolumns: (1fr, auto, auto, auto),\nalign: (left, right, right, right),\ninset: 7pt,\nstroke: none,\nfill: {fill},\ntable.header("
                );
                for column in &table.columns {
                    let _ = writeln!(
                        b,
                        "text(fill: {header_color}, weight: \"bold\", size: 9pt)[{}],",
                        esc(column)
                    );
                }
                b.push_str("),\n");
                for row in &table.rows {
                    let _ = writeln!(
                        b,
                        "[{}], [{}], [{}], [{}],",
                        esc(&row.description),
                        esc(&row.quantity),
                        esc(&row.unit_price),
                        esc(&row.line_total)
                    );
                }
                b.push_str(")\n#v(3mm)\n");
            }
            Section::Totals(totals) => {
                b.push_str("#align(right)[\n#grid(columns: (auto, auto), column-gutter: 14pt, row-gutter: 7pt, align: (left, right),\n");
                for row in &totals.rows {
                    let _ = writeln!(
                        b,
                        "[#text(size: 9pt, fill: rgb(\"#555\"))[{}]], [#text(size: 9pt)[{}]],",
                        esc(&row.label),
                        esc(&row.value)
                    );
                }
                b.push_str(")\n#v(2mm)\n");
                let _ = writeln!(
                    b,
                    "#block(fill: accent, inset: (x: 12pt, y: 8pt), radius: 3pt)[#text(fill: white, weight: \"bold\", size: 11pt)[{}  {}]]\n]",
                    esc(&totals.grand_label),
                    esc(&totals.grand_value)
                );
                b.push_str("#v(4mm)\n");
            }
            Section::Notes { label, text } => {
                let _ = writeln!(
                    b,
                    "#text(fill: accent, size: 9pt, weight: \"bold\", tracking: 0.8pt)[{}]\n",
                    esc(label)
                );
                let _ = writeln!(b, "#text(size: 9pt, fill: rgb(\"#444\"))[{}]", esc(text));
                b.push_str("#v(4mm)\n");
            }
            Section::Attachments { label, images } => {
                let _ = writeln!(
                    b,
                    "#text(fill: accent, size: 9pt, weight: \"bold\", tracking: 0.8pt)[{}]\n",
                    esc(label)
                );
                b.push_str("#grid(columns: (1fr, 1fr, 1fr), column-gutter: 4mm, row-gutter: 4mm,\n");
                for (i, image) in images.iter().enumerate() {
                    if let Some(data) = image.decode() {
                        let path = format!("att-{i}.{}", image.extension());
                        assets.push((path.clone(), data));
                        let _ = writeln!(b, "image(\"{path}\", width: 100%),");
                    }
                }
                b.push_str(")\n#v(4mm)\n");
            }
            Section::Signatures(block) => {
                let boxes: Vec<String> = [&block.company, &block.client]
                    .into_iter()
                    .flatten()
                    .map(|sig| {
                        let mention = sig
                            .mention
                            .as_ref()
                            .map(|m| {
                                format!(
                                    "#text(size: 8pt, style: \"italic\", fill: rgb(\"#777\"))[{}] \\\n",
                                    esc(m)
                                )
                            })
                            .unwrap_or_default();
                        format!(
                            "#text(size: 9pt, weight: \"bold\")[{}] \\\n#v(12mm)\n#line(length: 70%, stroke: 0.5pt + rgb(\"#444\"))\n{mention}#text(size: 8.5pt)[{}] \\\n#text(size: 8pt, fill: rgb(\"#777\"))[{}]",
                            esc(&sig.label),
                            esc(&sig.signer_title),
                            esc(&sig.date_line)
                        )
                    })
                    .collect();
                match boxes.len() {
                    1 => {
                        let _ = writeln!(b, "#grid(columns: (1fr, 1fr),\n[{}], [],\n)", boxes[0]);
                    }
                    _ => {
                        let _ = writeln!(
                            b,
                            "#grid(columns: (1fr, 1fr), column-gutter: 10mm,\n[{}],\n[{}],\n)",
                            boxes[0], boxes[1]
                        );
                    }
                }
                b.push_str("#v(4mm)\n");
            }
            Section::Footer(footer) => {
                if style.footer_rule {
                    b.push_str("#line(length: 100%, stroke: 0.5pt + accent)\n#v(2mm)\n");
                }
                let _ = writeln!(
                    b,
                    "#align(center)[#text(size: 9pt, style: \"italic\", fill: rgb(\"#555\"))[{}]]",
                    esc(&footer.thanks)
                );
                if !footer.legal.is_empty() {
                    let legal = footer.legal.iter().map(|s| esc(s)).collect::<Vec<_>>().join(" • ");
                    let _ = writeln!(
                        b,
                        "#align(center)[#text(size: 7.5pt, fill: rgb(\"#888\"))[{legal}]]"
                    );
                }
                if !footer.contact.is_empty() {
                    let contact = footer
                        .contact
                        .iter()
                        .map(|s| esc(s))
                        .collect::<Vec<_>>()
                        .join(" • ");
                    let _ = writeln!(
                        b,
                        "#align(center)[#text(size: 7.5pt, fill: rgb(\"#888\"))[{contact}]]"
                    );
                }
                if let Some(image) = &footer.image {
                    if let Some(data) = image.decode() {
                        let path = format!("footer.{}", image.extension());
                        assets.push((path.clone(), data));
                        let _ = writeln!(b, "#v(2mm)\n#image(\"{path}\", width: 100%)");
                    }
                }
            }
        }
    }

    (b, assets)
}

/// Escape user text for interpolation into typst markup content.
fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '#' | '$' | '%' | '&' | '_' | '*' | '@' | '[' | ']' | '{' | '}' | '~' | '`'
            | '<' | '>' | '/' | '\'' | '"' | '=' | '-' | '+' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\\n"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_neutralizes_markup() {
        assert_eq!(esc("a#b"), "a\\#b");
        assert_eq!(esc("50%"), "50\\%");
        assert_eq!(esc("x_y*z"), "x\\_y\\*z");
        assert_eq!(esc("plain text"), "plain text");
    }
}
