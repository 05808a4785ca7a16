//! Image previews for the selected and the typed-in source.
//!
//! Loading and decoding run on a worker thread; finished images are uploaded as
//! egui textures in [`ImagePreview::pump`]. Failures only change what the preview
//! shows.
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use egui::{ColorImage, TextureHandle, TextureOptions};
use image::ImageReader;
use net::{FetchConfig, fetch_bytes};
use url::Url;

const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;
const MAX_IMAGE_PIXELS: usize = 16_777_216; // 4096 * 4096

/// Where an image value points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewSource {
    Remote(Url),
    Local(PathBuf),
}

impl PreviewSource {
    /// `http(s)` URLs are remote, `file:` URLs and everything else are local paths.
    /// Relative paths resolve against `base_dir` (the document's directory).
    pub fn classify(value: &str, base_dir: Option<&Path>) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(url) = Url::parse(value) {
            match url.scheme() {
                "http" | "https" => return Some(PreviewSource::Remote(url)),
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return Some(PreviewSource::Local(path));
                    }
                }
                // Windows drive letters parse as one-letter schemes.
                _ => {}
            }
        }

        let path = Path::new(value);
        let path = match base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        };
        Some(PreviewSource::Local(path))
    }

    fn load(&self, fetch: &FetchConfig) -> Result<Vec<u8>, String> {
        match self {
            PreviewSource::Remote(url) => fetch_bytes(url.as_str(), fetch).map_err(|e| e.to_string()),
            PreviewSource::Local(path) => {
                let len = std::fs::metadata(path)
                    .map_err(|e| format!("{}: {e}", path.display()))?
                    .len();
                if len > MAX_IMAGE_BYTES {
                    return Err(format!("image too large (>{MAX_IMAGE_BYTES} bytes)"));
                }
                std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))
            }
        }
    }
}

pub struct DecodedImage {
    pub size_px: [usize; 2],
    pub rgba: Vec<u8>,
}

pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, String> {
    if bytes.is_empty() {
        return Err("empty image data".to_string());
    }
    let reader = || {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| e.to_string())
    };
    // Header only: oversized images are refused before any pixel buffer is allocated.
    let (w, h) = reader()?.into_dimensions().map_err(|e| e.to_string())?;
    let pixel_count = (w as usize).saturating_mul(h as usize);
    if pixel_count == 0 || pixel_count > MAX_IMAGE_PIXELS {
        return Err(format!("image size {w}x{h} is not supported"));
    }
    let rgba = reader()?.decode().map_err(|e| e.to_string())?.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(DecodedImage {
        size_px: [w as usize, h as usize],
        rgba: rgba.into_raw(),
    })
}

pub fn size_text(size_px: [usize; 2]) -> String {
    format!("Size: {} x {} px", size_px[0], size_px[1])
}

pub enum PreviewState {
    Empty,
    Loading,
    Ready {
        texture: TextureHandle,
        size_px: [usize; 2],
    },
    Error(String),
}

struct LoadDone {
    generation: u64,
    decoded: Result<DecodedImage, String>,
}

/// One preview slot. Only the latest request is shown; results of superseded
/// requests are dropped when they arrive.
pub struct ImagePreview {
    name: &'static str,
    generation: u64,
    requested: Option<String>,
    state: PreviewState,
    done_tx: mpsc::Sender<LoadDone>,
    done_rx: mpsc::Receiver<LoadDone>,
}

impl ImagePreview {
    pub fn new(name: &'static str) -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            name,
            generation: 0,
            requested: None,
            state: PreviewState::Empty,
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Starts loading `value` unless it is already the shown or pending value.
    pub fn request(
        &mut self,
        ctx: &egui::Context,
        value: &str,
        base_dir: Option<&Path>,
        fetch: &FetchConfig,
    ) {
        if self.requested.as_deref() == Some(value) {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.requested = Some(value.to_string());

        let Some(source) = PreviewSource::classify(value, base_dir) else {
            self.state = PreviewState::Empty;
            return;
        };
        log::debug!(target: "ui.preview", "{}: loading {source:?}", self.name);
        self.state = PreviewState::Loading;

        let generation = self.generation;
        let tx = self.done_tx.clone();
        let fetch = fetch.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let decoded = source.load(&fetch).and_then(|bytes| decode_image(&bytes));
            let _ = tx.send(LoadDone {
                generation,
                decoded,
            });
            ctx.request_repaint();
        });
    }

    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.requested = None;
        self.state = PreviewState::Empty;
    }

    /// Drains finished loads and uploads the newest image. Returns true if the
    /// state changed.
    pub fn pump(&mut self, ctx: &egui::Context) -> bool {
        let mut changed = false;
        while let Ok(done) = self.done_rx.try_recv() {
            if done.generation != self.generation {
                continue;
            }
            self.state = match done.decoded {
                Ok(decoded) => {
                    let image = ColorImage::from_rgba_unmultiplied(decoded.size_px, &decoded.rgba);
                    let texture = ctx.load_texture(
                        format!("preview:{}", self.name),
                        image,
                        TextureOptions::LINEAR,
                    );
                    PreviewState::Ready {
                        texture,
                        size_px: decoded.size_px,
                    }
                }
                Err(error) => {
                    log::warn!(target: "ui.preview", "{}: {error}", self.name);
                    PreviewState::Error(error)
                }
            };
            changed = true;
        }
        changed
    }

    pub fn show(&self, ui: &mut egui::Ui, max_size: egui::Vec2) {
        match &self.state {
            PreviewState::Empty => {
                ui.weak("No image");
            }
            PreviewState::Loading => {
                ui.spinner();
            }
            PreviewState::Ready { texture, size_px } => {
                ui.add(
                    egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                        .max_size(max_size),
                );
                ui.label(size_text(*size_px));
            }
            PreviewState::Error(error) => {
                ui.colored_label(ui.visuals().error_fg_color, format!("Error: {error}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn classify_splits_remote_and_local() {
        let base = Path::new("/site");
        assert!(matches!(
            PreviewSource::classify("https://example.com/a.png", Some(base)),
            Some(PreviewSource::Remote(_))
        ));
        assert_eq!(
            PreviewSource::classify(" img/a.png ", Some(base)),
            Some(PreviewSource::Local(PathBuf::from("/site/img/a.png")))
        );
        assert_eq!(
            PreviewSource::classify("/abs/b.png", Some(base)),
            Some(PreviewSource::Local(PathBuf::from("/abs/b.png")))
        );
        assert_eq!(PreviewSource::classify("   ", Some(base)), None);
    }

    #[cfg(unix)]
    #[test]
    fn file_urls_become_paths() {
        assert_eq!(
            PreviewSource::classify("file:///tmp/x.png", None),
            Some(PreviewSource::Local(PathBuf::from("/tmp/x.png")))
        );
    }

    #[test]
    fn decode_reports_dimensions() {
        let decoded = decode_image(&png_bytes(3, 2)).expect("decode");
        assert_eq!(decoded.size_px, [3, 2]);
        assert_eq!(decoded.rgba.len(), 3 * 2 * 4);
        assert_eq!(size_text(decoded.size_px), "Size: 3 x 2 px");
    }

    fn crc32(data: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for &b in data {
            crc ^= u32::from(b);
            for _ in 0..8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ 0xEDB8_8320
                } else {
                    crc >> 1
                };
            }
        }
        !crc
    }

    #[test]
    fn oversized_dimensions_are_refused_from_the_header() {
        // A 1x1 PNG whose IHDR claims 100000x100000; decoding the pixels would fail
        // differently, so the message shows the header check ran first.
        let mut bytes = png_bytes(1, 1);
        bytes[16..20].copy_from_slice(&100_000u32.to_be_bytes());
        bytes[20..24].copy_from_slice(&100_000u32.to_be_bytes());
        let crc = crc32(&bytes[12..29]);
        bytes[29..33].copy_from_slice(&crc.to_be_bytes());

        let err = decode_image(&bytes).err().expect("oversized image");
        assert_eq!(err, "image size 100000x100000 is not supported");
    }

    #[test]
    fn garbage_bytes_are_an_error_not_a_panic() {
        assert!(decode_image(b"not an image").is_err());
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn local_source_reads_relative_to_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pic.png"), png_bytes(1, 1)).expect("write");
        let source = PreviewSource::classify("pic.png", Some(dir.path())).expect("source");
        let bytes = source.load(&FetchConfig::default()).expect("load");
        assert_eq!(decode_image(&bytes).expect("decode").size_px, [1, 1]);

        let missing = PreviewSource::classify("gone.png", Some(dir.path())).expect("source");
        assert!(missing.load(&FetchConfig::default()).is_err());
    }

    #[test]
    fn superseded_results_are_dropped() {
        let ctx = egui::Context::default();
        let mut preview = ImagePreview::new("test");
        preview.generation = 2;
        let _ = preview.done_tx.send(LoadDone {
            generation: 1,
            decoded: Err("old".into()),
        });
        assert!(!preview.pump(&ctx));
        assert!(matches!(preview.state(), PreviewState::Empty));

        let _ = preview.done_tx.send(LoadDone {
            generation: 2,
            decoded: Err("current".into()),
        });
        assert!(preview.pump(&ctx));
        assert!(matches!(preview.state(), PreviewState::Error(e) if e == "current"));
    }
}
