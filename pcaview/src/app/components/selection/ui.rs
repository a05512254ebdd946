use super::DetailContent;

impl super::SelectionController {
    /// Draws the detail panel: the prompt, the selected image with its
    /// title, or a message why the image cannot be shown.
    pub fn detail_ui(&mut self, ui: &mut egui::Ui, image_height: f32) {
        ui.vertical_centered(|ui| match self.detail.value() {
            DetailContent::Prompt(prompt) => {
                ui.label(prompt);
            }
            DetailContent::Loading { title } => {
                ui.spinner();
                ui.heading(title);
            }
            DetailContent::Image { title, image } => {
                let texture = self.texture.get_or_insert_with(|| {
                    log::debug!("creating texture for '{}'", title);
                    ui.ctx().load_texture(
                        format!("detail_{}", title),
                        (*image.pixels).clone(),
                        egui::TextureOptions::LINEAR,
                    )
                });
                ui.add(
                    egui::Image::new(&*texture)
                        .max_height(image_height)
                        .maintain_aspect_ratio(true),
                );
                ui.add_space(4.0);
                ui.heading(title);
                ui.weak(image.file_size_label());
            }
            DetailContent::Unavailable { title, message } => {
                ui.heading(title);
                ui.colored_label(ui.visuals().error_fg_color, message);
            }
        });
    }
}
