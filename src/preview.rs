//! Interactive render target: draws a composed [`Document`] with egui
//! widgets. Runs synchronously on every frame, so edits re-render live.
//! The print-only signature rule is replaced by the digital sub-form here;
//! everything else mirrors the paginated output.

use egui::{Align, Color32, CornerRadius, Layout, Margin, RichText, Sense, Stroke, Vec2};

use crate::model::SignatureMode;
use crate::template::{Document, Header, HeaderLayout, Party, Section, SignatureBox};
use crate::types::{parse_hex_color, Attachment};

const PAPER_WIDTH: f32 = 560.0;
const INK: Color32 = Color32::from_rgb(0x22, 0x26, 0x30);
const MUTED: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);

pub fn show_document(ui: &mut egui::Ui, doc: &Document) {
    let accent = parse_hex_color(&doc.accent).unwrap_or(Color32::from_rgb(0x63, 0x66, 0xf1));
    let border = if doc.style.page_frame {
        Stroke::new(1.5, accent)
    } else {
        Stroke::new(1.0, Color32::from_gray(215))
    };

    egui::Frame::new()
        .fill(Color32::WHITE)
        .stroke(border)
        .inner_margin(Margin::same(24))
        .show(ui, |ui| {
            ui.set_width(PAPER_WIDTH);
            ui.style_mut().visuals.override_text_color = Some(INK);
            for section in &doc.sections {
                match section {
                    Section::Header(header) => show_header(ui, doc, header, accent),
                    Section::BillTo(party) => show_bill_to(ui, party, accent),
                    Section::Items(table) => show_items(ui, doc, table, accent),
                    Section::Totals(totals) => show_totals(ui, totals, accent),
                    Section::Notes { label, text } => {
                        section_label(ui, label, accent);
                        ui.label(RichText::new(text).size(11.0));
                        ui.add_space(10.0);
                    }
                    Section::Attachments { label, images } => {
                        section_label(ui, label, accent);
                        ui.horizontal_wrapped(|ui| {
                            for image in images {
                                attachment_thumbnail(ui, image, 90.0);
                            }
                        });
                        ui.add_space(10.0);
                    }
                    Section::Signatures(block) => {
                        show_signatures(ui, block.mode, &block.company, &block.client, accent);
                    }
                    Section::Footer(footer) => {
                        if doc.style.footer_rule {
                            accent_rule(ui, accent);
                        }
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(&footer.thanks).italics().size(11.0).color(MUTED));
                            for line in &footer.legal {
                                ui.label(RichText::new(line).size(9.0).color(MUTED));
                            }
                            for line in &footer.contact {
                                ui.label(RichText::new(line).size(9.0).color(MUTED));
                            }
                            if let Some(image) = &footer.image {
                                attachment_thumbnail(ui, image, PAPER_WIDTH);
                            }
                        });
                    }
                }
            }
        });
}

fn show_header(ui: &mut egui::Ui, doc: &Document, header: &Header, accent: Color32) {
    if let Some(banner) = &header.banner {
        attachment_thumbnail(ui, banner, PAPER_WIDTH);
        ui.add_space(6.0);
    }
    match doc.style.header {
        HeaderLayout::Banner => {
            accent_band(ui, accent, 6.0);
            ui.add_space(8.0);
            ui.columns(2, |cols| {
                identity_block(&mut cols[0], header, accent);
                cols[1].with_layout(Layout::top_down(Align::Max), |ui| {
                    title_block(ui, header, accent);
                });
            });
        }
        HeaderLayout::Split => {
            ui.columns(2, |cols| {
                identity_block(&mut cols[0], header, accent);
                cols[1].with_layout(Layout::top_down(Align::Max), |ui| {
                    title_block(ui, header, accent);
                });
            });
        }
        HeaderLayout::Centered => {
            ui.vertical_centered(|ui| {
                identity_block(ui, header, accent);
                ui.add_space(6.0);
                title_block(ui, header, accent);
            });
        }
        HeaderLayout::Sidebar => {
            ui.columns(2, |cols| {
                egui::Frame::new()
                    .fill(accent)
                    .corner_radius(CornerRadius::same(4))
                    .inner_margin(Margin::same(10))
                    .show(&mut cols[0], |ui| {
                        ui.label(
                            RichText::new(&header.title)
                                .color(Color32::WHITE)
                                .strong()
                                .size(22.0),
                        );
                        ui.label(RichText::new(&header.number).color(Color32::WHITE).size(12.0));
                    });
                cols[0].add_space(4.0);
                status_badge(&mut cols[0], header);
                cols[1].with_layout(Layout::top_down(Align::Max), |ui| {
                    identity_block(ui, header, accent);
                });
            });
        }
        HeaderLayout::Sparse => {
            ui.columns(2, |cols| {
                title_block(&mut cols[0], header, accent);
                cols[1].with_layout(Layout::top_down(Align::Max), |ui| {
                    identity_block(ui, header, accent);
                });
            });
            ui.separator();
        }
    }

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        for row in &header.meta {
            ui.vertical(|ui| {
                ui.label(RichText::new(&row.label).size(9.0).color(MUTED));
                if row.emphasis {
                    ui.label(RichText::new(&row.value).color(accent).strong().size(15.0));
                } else {
                    ui.label(RichText::new(&row.value).size(11.0));
                }
            });
            ui.add_space(18.0);
        }
    });
    ui.add_space(12.0);
}

fn identity_block(ui: &mut egui::Ui, header: &Header, accent: Color32) {
    match &header.logo {
        Some(logo) => attachment_thumbnail(ui, logo, 48.0),
        None => {
            let monogram = header
                .company
                .name
                .chars()
                .next()
                .unwrap_or('F')
                .to_uppercase()
                .to_string();
            egui::Frame::new()
                .fill(accent)
                .corner_radius(CornerRadius::same(4))
                .inner_margin(Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.label(RichText::new(monogram).color(Color32::WHITE).strong().size(18.0));
                });
        }
    }
    ui.label(RichText::new(&header.company.name).strong().size(15.0));
    for line in &header.company.lines {
        ui.label(RichText::new(line).size(10.0).color(MUTED));
    }
}

fn title_block(ui: &mut egui::Ui, header: &Header, accent: Color32) {
    ui.label(RichText::new(&header.title).color(accent).strong().size(26.0));
    ui.label(RichText::new(&header.number).size(13.0));
    ui.add_space(2.0);
    status_badge(ui, header);
}

fn status_badge(ui: &mut egui::Ui, header: &Header) {
    let color = parse_hex_color(&header.status.color).unwrap_or(MUTED);
    let fill = parse_hex_color(&header.status.fill).unwrap_or(Color32::from_gray(240));
    egui::Frame::new()
        .fill(fill)
        .corner_radius(CornerRadius::same(4))
        .inner_margin(Margin::symmetric(7, 3))
        .show(ui, |ui| {
            ui.label(RichText::new(&header.status.label).color(color).strong().size(10.0));
        });
}

fn show_bill_to(ui: &mut egui::Ui, party: &Party, accent: Color32) {
    section_label(ui, &party.label, accent);
    ui.label(RichText::new(&party.name).strong().size(13.0));
    for line in &party.lines {
        ui.label(RichText::new(line).size(10.0).color(MUTED));
    }
    ui.add_space(10.0);
}

fn show_items(
    ui: &mut egui::Ui,
    doc: &Document,
    table: &crate::template::ItemsTable,
    accent: Color32,
) {
    let filled = doc.style.filled_table_header;
    egui::Grid::new("invoice-items")
        .num_columns(4)
        .striped(doc.style.zebra_rows)
        .spacing([16.0, 7.0])
        .min_col_width(52.0)
        .show(ui, |ui| {
            for (i, column) in table.columns.iter().enumerate() {
                let text = if filled {
                    RichText::new(column)
                        .strong()
                        .size(10.0)
                        .color(Color32::WHITE)
                        .background_color(accent)
                } else {
                    RichText::new(column).strong().size(10.0).color(accent)
                };
                if i == 0 {
                    ui.label(text);
                } else {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(text);
                    });
                }
            }
            ui.end_row();
            for row in &table.rows {
                ui.label(RichText::new(&row.description).size(11.0));
                for value in [&row.quantity, &row.unit_price, &row.line_total] {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(RichText::new(value).size(11.0));
                    });
                }
                ui.end_row();
            }
        });
    ui.add_space(10.0);
}

fn show_totals(ui: &mut egui::Ui, totals: &crate::template::TotalsBlock, accent: Color32) {
    ui.with_layout(Layout::top_down(Align::Max), |ui| {
        for row in &totals.rows {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&row.label).size(10.0).color(MUTED));
                ui.add_space(10.0);
                ui.label(RichText::new(&row.value).size(11.0));
            });
        }
        ui.add_space(4.0);
        egui::Frame::new()
            .fill(accent)
            .corner_radius(CornerRadius::same(4))
            .inner_margin(Margin::symmetric(12, 7))
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("{}  {}", totals.grand_label, totals.grand_value))
                        .color(Color32::WHITE)
                        .strong()
                        .size(13.0),
                );
            });
    });
    ui.add_space(10.0);
}

fn show_signatures(
    ui: &mut egui::Ui,
    mode: SignatureMode,
    company: &Option<SignatureBox>,
    client: &Option<SignatureBox>,
    accent: Color32,
) {
    let digital = matches!(mode, SignatureMode::Digital | SignatureMode::Both);
    let boxes: Vec<&SignatureBox> = [company, client].into_iter().flatten().collect();
    ui.columns(2, |cols| {
        for (ui, sig) in cols.iter_mut().zip(&boxes) {
            ui.label(RichText::new(&sig.label).strong().size(10.0));
            if digital {
                ui.label(
                    RichText::new(&sig.signer_name)
                        .italics()
                        .color(accent)
                        .size(17.0),
                );
            } else {
                ui.add_space(20.0);
            }
            ui.label(RichText::new(&sig.signer_title).size(10.0));
            ui.label(RichText::new(&sig.date_line).size(9.0).color(MUTED));
        }
    });
    ui.add_space(10.0);
}

fn section_label(ui: &mut egui::Ui, label: &str, accent: Color32) {
    ui.label(RichText::new(label).color(accent).strong().size(10.5));
    ui.add_space(2.0);
}

fn attachment_thumbnail(ui: &mut egui::Ui, attachment: &Attachment, max: f32) {
    if let Some(bytes) = attachment.decode() {
        let uri = format!("bytes://att-{}-{}", attachment.size, attachment.name);
        ui.add(egui::Image::from_bytes(uri, bytes).max_size(Vec2::splat(max)));
    } else {
        ui.label(RichText::new(&attachment.name).size(10.0).color(MUTED));
    }
}

fn accent_band(ui: &mut egui::Ui, accent: Color32, height: f32) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::hover());
    ui.painter().rect_filled(rect, CornerRadius::ZERO, accent);
}

fn accent_rule(ui: &mut egui::Ui, accent: Color32) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 1.5), Sense::hover());
    ui.painter().rect_filled(rect, CornerRadius::ZERO, accent);
    ui.add_space(6.0);
}
