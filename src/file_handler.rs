use std::path::{Path, PathBuf};

use egui::{Align2, Color32, Context, DroppedFile, FontId, Id, LayerId, Order};
use thiserror::Error;

use crate::document::LoadedImage;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff"];

/// Errors that can occur while loading an image
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Dropped file has no accessible data: {0}")]
    NoData(String),
}

/// Decode an image held in memory
pub fn load_from_bytes(bytes: &[u8], source: Option<PathBuf>) -> Result<LoadedImage, LoadError> {
    let decoded = image::load_from_memory(bytes)?;
    log::debug!("Decoded image: {}x{}", decoded.width(), decoded.height());
    Ok(LoadedImage::new(decoded.to_rgba8(), source))
}

/// Read and decode an image file
pub fn load_from_path(path: &Path) -> Result<LoadedImage, LoadError> {
    log::info!("Loading image from path: {}", path.display());
    let bytes = std::fs::read(path)?;
    load_from_bytes(&bytes, Some(path.to_path_buf()))
}

/// Ask the user for an image to open
pub fn pick_image_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Image")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
}

/// Ask the user where to save the annotated PNG
pub fn pick_save_path(suggested_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save Image")
        .set_file_name(suggested_name)
        .add_filter("PNG", &["png"])
        .save_file()
        .map(|path| {
            if path.extension().is_none() {
                path.with_extension("png")
            } else {
                path
            }
        })
}

/// Suggested export name derived from the source file, e.g. `part_measured.png`
pub fn export_file_name(source: Option<&Path>) -> String {
    source
        .and_then(|path| path.file_stem())
        .map(|stem| format!("{}_measured.png", stem.to_string_lossy()))
        .unwrap_or_else(|| "measured.png".to_owned())
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(file: &DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_ref()
        .and_then(|path| path.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| {
            Path::new(&file.name)
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
        });
    name.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn dropped_file_name(file: &DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Load the first image among the files dropped onto the window this frame.
///
/// Returns `None` when nothing usable was dropped.
pub fn take_dropped_image(ctx: &Context) -> Option<Result<LoadedImage, LoadError>> {
    let dropped = ctx.input(|input| input.raw.dropped_files.clone());
    if dropped.is_empty() {
        return None;
    }

    let Some(file) = dropped.iter().find(|file| is_image_file(file)) else {
        for file in &dropped {
            log::warn!("Dropped file is not a supported type: {}", dropped_file_name(file));
        }
        return None;
    };

    let file_name = dropped_file_name(file);
    let result = if let Some(bytes) = &file.bytes {
        log::info!("Loading dropped image from memory: {} ({} bytes)", file_name, bytes.len());
        load_from_bytes(bytes, file.path.clone())
    } else if let Some(path) = &file.path {
        load_from_path(path)
    } else {
        Err(LoadError::NoData(file_name))
    };
    Some(result)
}

/// Dim the window and list files while they are dragged over it
pub fn preview_files_being_dropped(ctx: &Context) {
    if ctx.input(|input| input.raw.hovered_files.is_empty()) {
        return;
    }

    let text = ctx.input(|input| {
        let mut text = "Drop image to measure:\n".to_owned();
        for file in &input.raw.hovered_files {
            if let Some(path) = &file.path {
                text += &format!("\n{}", path.display());
            } else {
                text += "\n(Path not available)";
            }
        }
        text
    });

    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
    let screen_rect = ctx.screen_rect();
    painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
    painter.text(
        screen_rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(20.0),
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(1, 1, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_load_from_bytes() {
        let loaded = load_from_bytes(&png_bytes(), None).unwrap();
        assert_eq!(loaded.size(), [3, 2]);
        assert_eq!(loaded.pixels().get_pixel(1, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_load_garbage_fails_to_decode() {
        let result = load_from_bytes(b"definitely not an image", None);
        assert!(matches!(result, Err(LoadError::Decode(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_from_path(Path::new("/nonexistent/vision-metrics/missing.png"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_is_image_file() {
        let by_mime = DroppedFile {
            mime: "image/jpeg".to_owned(),
            ..Default::default()
        };
        let by_path = DroppedFile {
            path: Some(PathBuf::from("scan.PNG")),
            ..Default::default()
        };
        let by_name = DroppedFile {
            name: "photo.webp".to_owned(),
            ..Default::default()
        };
        let text = DroppedFile {
            path: Some(PathBuf::from("notes.txt")),
            ..Default::default()
        };
        assert!(is_image_file(&by_mime));
        assert!(is_image_file(&by_path));
        assert!(is_image_file(&by_name));
        assert!(!is_image_file(&text));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(Some(Path::new("/data/part.jpg"))), "part_measured.png");
        assert_eq!(export_file_name(None), "measured.png");
    }
}
