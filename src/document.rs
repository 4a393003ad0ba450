use std::path::{Path, PathBuf};

use egui::{ColorImage, Context, TextureHandle, TextureOptions, Vec2};
use image::RgbaImage;

/// The image currently being measured.
///
/// Holds the decoded raster for export and a lazily created GPU texture for
/// drawing. The texture is dropped with the image when another one is loaded.
pub struct LoadedImage {
    pixels: RgbaImage,
    source: Option<PathBuf>,
    texture: Option<TextureHandle>,
}

impl LoadedImage {
    pub fn new(pixels: RgbaImage, source: Option<PathBuf>) -> Self {
        Self {
            pixels,
            source,
            texture: None,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Width and height in pixels
    pub fn size(&self) -> [usize; 2] {
        [self.pixels.width() as usize, self.pixels.height() as usize]
    }

    pub fn size_vec2(&self) -> Vec2 {
        let [width, height] = self.size();
        Vec2::new(width as f32, height as f32)
    }

    /// File name for the window title and status line
    pub fn display_name(&self) -> String {
        self.source
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_owned())
    }

    /// Get the texture, uploading it on first use
    pub fn texture(&mut self, ctx: &Context) -> &TextureHandle {
        let pixels = &self.pixels;
        self.texture.get_or_insert_with(|| {
            log::debug!("Uploading image texture: {}x{}", pixels.width(), pixels.height());
            let color_image = ColorImage::from_rgba_unmultiplied(
                [pixels.width() as usize, pixels.height() as usize],
                pixels.as_raw(),
            );
            ctx.load_texture("measured_image", color_image, TextureOptions::LINEAR)
        })
    }
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("size", &self.size())
            .field("source", &self.source)
            .field("texture_uploaded", &self.texture.is_some())
            .finish()
    }
}
