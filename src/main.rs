use facturier::app::InvoiceApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1180.0, 800.0])
            .with_min_inner_size([900.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Facturier",
        options,
        Box::new(|cc| Ok(Box::new(InvoiceApp::new(cc)))),
    )
}
