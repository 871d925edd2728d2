//! Label text, drawn by rasterizing an SVG overlay of `<text>` elements.
//!
//! Fonts come from the system plus an optional font file. A font file that
//! cannot be read or parsed is logged and replaced by the system
//! sans-serif family; text never fails a render.

use resvg::usvg::{self, Transform};
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use stitch_chart::layout::{Anchor, Baseline, Label};
use tiny_skia::Pixmap;

use crate::error::RenderError;

const DEFAULT_FAMILY: &str = "sans-serif";

/// Largest font file that will be loaded.
pub const MAX_FONT_BYTES: u64 = 32 * 1024 * 1024;

/// Draws positioned labels onto chart pixmaps.
pub struct TextRenderer {
    fontdb: Arc<fontdb::Database>,
    family: String,
}

impl TextRenderer {
    /// Load system fonts and, if given, the font at `font_path`.
    pub fn new(font_path: Option<&Path>) -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();

        let family = font_path
            .and_then(|path| load_font_file(&mut fontdb, path))
            .unwrap_or_else(|| DEFAULT_FAMILY.to_string());
        ensure_sans_serif(&mut fontdb);

        tracing::info!(
            font_count = fontdb.len(),
            family = %family,
            "Loaded fonts for chart labels"
        );

        Self {
            fontdb: Arc::new(fontdb),
            family,
        }
    }

    /// Font family labels are set in.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Draw `labels` onto `pixmap` at `font_size` pixels.
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        labels: &[Label],
        font_size: usize,
    ) -> Result<(), RenderError> {
        if labels.is_empty() {
            return Ok(());
        }

        let svg = self.overlay_svg(pixmap.width(), pixmap.height(), labels, font_size);
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }

    fn overlay_svg(&self, width: u32, height: u32, labels: &[Label], font_size: usize) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        svg.push_str(&format!(
            r#"<g font-family="{}" font-size="{}" fill="black">"#,
            escape_xml(&self.family),
            font_size
        ));
        for label in labels {
            let anchor = match label.anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
                Anchor::End => "end",
            };
            let baseline = match label.baseline {
                Baseline::Alphabetic => "alphabetic",
                Baseline::Central => "central",
            };
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" text-anchor="{}" dominant-baseline="{}">{}</text>"#,
                label.x,
                label.y,
                anchor,
                baseline,
                escape_xml(&label.text)
            ));
        }
        svg.push_str("</g></svg>");
        svg
    }
}

/// Load a font file and return the family name of its first face.
fn load_font_file(fontdb: &mut fontdb::Database, path: &Path) -> Option<String> {
    let data = match read_font(path, MAX_FONT_BYTES) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "Failed to read font, using default");
            return None;
        }
    };

    let ids = fontdb.load_font_source(fontdb::Source::Binary(Arc::new(data)));
    let family = ids
        .iter()
        .find_map(|&id| fontdb.face(id))
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone());

    match &family {
        Some(name) => tracing::debug!(path = %path.display(), family = %name, "Loaded font"),
        None => tracing::warn!(path = %path.display(), "No usable font face, using default"),
    }
    family
}

/// Read a regular file of at most `limit` bytes.
///
/// Anything else (directories, FIFOs, devices) is refused before it is
/// opened, so a bad path can neither block nor exhaust memory.
fn read_font(path: &Path, limit: u64) -> io::Result<Vec<u8>> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    if metadata.len() > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("font file exceeds {limit} bytes"),
        ));
    }

    let mut data = Vec::with_capacity(metadata.len() as usize);
    std::fs::File::open(path)?
        .take(limit + 1)
        .read_to_end(&mut data)?;
    if data.len() as u64 > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("font file exceeds {limit} bytes"),
        ));
    }
    Ok(data)
}

/// Point the generic sans-serif family at an installed face when the
/// database default is missing.
fn ensure_sans_serif(fontdb: &mut fontdb::Database) {
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        ..Default::default()
    };
    if fontdb.query(&query).is_some() {
        return;
    }

    let fallback = fontdb
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
    match fallback {
        Some(name) => {
            tracing::debug!(family = %name, "Using fallback sans-serif family");
            fontdb.set_sans_serif_family(name);
        }
        None => tracing::warn!("No fonts available, chart labels will be blank"),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
