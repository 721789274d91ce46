use egui::{Color32, RichText};

const FPS_COLOR: Color32 = Color32::from_rgb(74, 158, 255);

/// Scene title, FPS readout and the scene's parameter widgets
///
/// `parameters` draws the widgets and reports whether one changed; the
/// panel returns that result.
pub fn gallery_panel(
    ctx: &egui::Context,
    title: &str,
    fps: f32,
    parameters: impl FnOnce(&mut egui::Ui) -> bool,
) -> bool {
    let mut changed = false;

    egui::Window::new(title)
        .resizable(false)
        .default_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("{:.0}", fps))
                        .size(24.0)
                        .color(FPS_COLOR),
                );
                ui.label(RichText::new("FPS").size(12.0).color(Color32::GRAY));
            });
            ui.separator();
            changed = parameters(ui);
        });

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_reports_parameter_changes() {
        let ctx = egui::Context::default();
        let mut reported = None;
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                reported = Some(gallery_panel(ctx, "Test", 60.0, |_| true));
            });
        }
        assert_eq!(reported, Some(true));
    }

    #[test]
    fn test_panel_without_parameters() {
        let ctx = egui::Context::default();
        let mut reported = None;
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                reported = Some(gallery_panel(ctx, "Test", 60.0, |ui| {
                    ui.label("no parameters");
                    false
                }));
            });
        }
        assert_eq!(reported, Some(false));
    }
}
